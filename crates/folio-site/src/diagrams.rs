//! Diagram rendering through external layout engines.
//!
//! Each manifest diagram names a Graphviz layout engine. Engines outside
//! [`LayoutEngine`] are reported and skipped; everything else is run as a
//! subprocess whose standard output becomes `<stem>.svg` in the output
//! directory.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::str::FromStr;

use folio_config::DiagramEntry;

use crate::error::{BuildError, DiagramError};

/// Supported layout engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutEngine {
    Dot,
    Neato,
    Twopi,
    Circo,
    Fdp,
    Sfdp,
    Patchwork,
    Osage,
}

impl LayoutEngine {
    /// Executable name of this engine.
    #[must_use]
    pub fn command(self) -> &'static str {
        match self {
            Self::Dot => "dot",
            Self::Neato => "neato",
            Self::Twopi => "twopi",
            Self::Circo => "circo",
            Self::Fdp => "fdp",
            Self::Sfdp => "sfdp",
            Self::Patchwork => "patchwork",
            Self::Osage => "osage",
        }
    }
}

impl FromStr for LayoutEngine {
    type Err = DiagramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dot" => Ok(Self::Dot),
            "neato" => Ok(Self::Neato),
            "twopi" => Ok(Self::Twopi),
            "circo" => Ok(Self::Circo),
            "fdp" => Ok(Self::Fdp),
            "sfdp" => Ok(Self::Sfdp),
            "patchwork" => Ok(Self::Patchwork),
            "osage" => Ok(Self::Osage),
            _ => Err(DiagramError::UnsupportedEngine(s.to_owned())),
        }
    }
}

/// Turns a graph description file into SVG bytes.
pub trait LayoutRunner {
    /// Render `source` with `engine`, returning the SVG document.
    fn render_svg(&self, engine: LayoutEngine, source: &Path) -> Result<Vec<u8>, DiagramError>;
}

/// [`LayoutRunner`] that spawns the engine executable.
///
/// Runs `<engine> -Tsvg <source>` and captures standard output. Executables
/// are looked up on `PATH` unless an engine directory is given.
#[derive(Debug, Default, Clone)]
pub struct CommandRunner {
    engine_dir: Option<PathBuf>,
}

impl CommandRunner {
    #[must_use]
    pub fn new(engine_dir: Option<PathBuf>) -> Self {
        Self { engine_dir }
    }

    fn program(&self, engine: LayoutEngine) -> PathBuf {
        match &self.engine_dir {
            Some(dir) => dir.join(engine.command()),
            None => PathBuf::from(engine.command()),
        }
    }
}

impl LayoutRunner for CommandRunner {
    fn render_svg(&self, engine: LayoutEngine, source: &Path) -> Result<Vec<u8>, DiagramError> {
        let output = Command::new(self.program(engine))
            .arg("-Tsvg")
            .arg(source)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| DiagramError::Spawn {
                engine: engine.command().to_owned(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(DiagramError::Failed {
                engine: engine.command().to_owned(),
                path: source.to_path_buf(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }
        Ok(output.stdout)
    }
}

/// Outcome of the diagram phase.
#[derive(Debug, Default)]
pub(crate) struct DiagramSummary {
    pub rendered: usize,
    /// Sources skipped because of an unsupported engine.
    pub skipped: Vec<String>,
}

/// Render every diagram, in manifest order.
///
/// Stops at the first fatal error. The SVG is only written once the engine
/// has succeeded, so a failure never leaves a truncated file behind.
pub(crate) fn render_diagrams(
    diagrams: &[DiagramEntry],
    input_dir: &Path,
    output_dir: &Path,
    runner: &dyn LayoutRunner,
) -> Result<DiagramSummary, BuildError> {
    let mut summary = DiagramSummary::default();

    for diagram in diagrams {
        let engine = match diagram.engine.parse::<LayoutEngine>() {
            Ok(engine) => engine,
            Err(e) => {
                tracing::error!(diagram = %diagram.source, "{e}, skipping");
                summary.skipped.push(diagram.source.clone());
                continue;
            }
        };

        let source = input_dir.join(&diagram.source);
        if !source.is_file() {
            return Err(DiagramError::SourceNotFound(source).into());
        }

        let svg = runner.render_svg(engine, &source)?;
        let dest = output_dir.join(svg_name(&diagram.source));
        fs::write(&dest, svg).map_err(BuildError::io(&dest))?;
        tracing::debug!(diagram = %diagram.source, engine = engine.command(), "Rendered diagram");
        summary.rendered += 1;
    }

    Ok(summary)
}

/// Output file name for a diagram source: its stem with an `.svg` extension.
fn svg_name(source: &str) -> String {
    let stem = Path::new(source)
        .file_stem()
        .map_or(Cow::Borrowed(source), |s| s.to_string_lossy());
    format!("{stem}.svg")
}
