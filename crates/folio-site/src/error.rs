//! Build error types.

use std::path::PathBuf;
use std::process::ExitStatus;

/// Error returned by the static site builder.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Input directory doesn't exist.
    #[error("{} doesn't exist", .0.display())]
    NotFound(PathBuf),

    /// Input or output path exists but isn't a directory.
    #[error("{} isn't a directory", .0.display())]
    NotADirectory(PathBuf),

    /// Output directory resolves to the input directory.
    #[error("Output directory {} is the input directory", .0.display())]
    SameDirectory(PathBuf),

    /// Manifest page without a backing source file.
    #[error("{} not found", .0.display())]
    PageNotFound(PathBuf),

    /// Page template failed to compile or render.
    #[error("Failed to render {page}: {source}")]
    Template {
        page: String,
        source: minijinja::Error,
    },

    #[error("{0}")]
    Diagram(#[from] DiagramError),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl BuildError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}

/// Error raised while rendering a diagram.
///
/// [`DiagramError::UnsupportedEngine`] only skips the affected diagram. Every
/// other variant aborts the diagram phase.
#[derive(Debug, thiserror::Error)]
pub enum DiagramError {
    #[error("Unsupported layout engine: {0}")]
    UnsupportedEngine(String),

    #[error("Diagram source {} not found", .0.display())]
    SourceNotFound(PathBuf),

    /// Layout engine executable couldn't be started.
    #[error("Failed to run layout engine {engine}: {source}")]
    Spawn {
        engine: String,
        source: std::io::Error,
    },

    /// Layout engine exited unsuccessfully.
    #[error("Layout engine {engine} failed on {} ({status}): {stderr}", .path.display())]
    Failed {
        engine: String,
        path: PathBuf,
        status: ExitStatus,
        stderr: String,
    },
}
