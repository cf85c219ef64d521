//! Static site builder.

use std::borrow::Cow;
use std::fs;
use std::path::PathBuf;

use folio_config::Config;

use crate::assets::copy_assets;
use crate::diagrams::{CommandRunner, LayoutRunner, render_diagrams};
use crate::error::BuildError;
use crate::pages::PageRenderer;
use crate::template::DEFAULT_SHELL;

/// Source and destination of a build.
#[derive(Debug, Clone)]
pub struct BuildRequest {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl BuildRequest {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Check that the input directory exists and that the output path, if
    /// present, is a different directory.
    ///
    /// # Errors
    ///
    /// Returns `BuildError::NotFound`, `BuildError::NotADirectory` or
    /// `BuildError::SameDirectory`.
    pub fn validate(&self) -> Result<(), BuildError> {
        if !self.input_dir.exists() {
            return Err(BuildError::NotFound(self.input_dir.clone()));
        }
        if !self.input_dir.is_dir() {
            return Err(BuildError::NotADirectory(self.input_dir.clone()));
        }
        if !self.output_dir.exists() {
            return Ok(());
        }
        if !self.output_dir.is_dir() {
            return Err(BuildError::NotADirectory(self.output_dir.clone()));
        }

        // Copying a file onto itself truncates it.
        let input = self
            .input_dir
            .canonicalize()
            .map_err(BuildError::io(&self.input_dir))?;
        let output = self
            .output_dir
            .canonicalize()
            .map_err(BuildError::io(&self.output_dir))?;
        if input == output {
            return Err(BuildError::SameDirectory(self.output_dir.clone()));
        }
        Ok(())
    }
}

/// What a successful build produced.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub assets_copied: usize,
    pub pages_rendered: usize,
    pub diagrams_rendered: usize,
    /// Diagram sources skipped because their layout engine isn't supported.
    pub diagrams_skipped: Vec<String>,
}

/// Builds a static site from an input directory and its manifest.
pub struct StaticSiteBuilder {
    config: Config,
    runner: Box<dyn LayoutRunner>,
}

impl StaticSiteBuilder {
    /// Create a builder that runs layout engines as subprocesses.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let runner = CommandRunner::new(config.engine_dir.clone());
        Self {
            config,
            runner: Box::new(runner),
        }
    }

    /// Replace the layout engine runner.
    #[must_use]
    pub fn with_runner(mut self, runner: impl LayoutRunner + 'static) -> Self {
        self.runner = Box::new(runner);
        self
    }

    /// Run asset copy, page rendering and diagram rendering, in that order.
    ///
    /// The first fatal error stops the build. Files already written stay in
    /// the output directory.
    ///
    /// # Errors
    ///
    /// Returns `BuildError` for invalid directories, missing pages, template
    /// errors, layout engine failures and I/O errors.
    pub fn build(&self, request: &BuildRequest) -> Result<BuildReport, BuildError> {
        request.validate()?;
        let shell = self.load_shell()?;

        let input_dir = request.input_dir.as_path();
        let output_dir = request.output_dir.as_path();
        fs::create_dir_all(output_dir).map_err(BuildError::io(output_dir))?;

        tracing::info!(input = %input_dir.display(), output = %output_dir.display(), "Building site");

        let assets_copied = copy_assets(input_dir, output_dir, &self.config.assets)?;
        tracing::info!(count = assets_copied, "Copied assets");

        let pages_rendered = PageRenderer::new(
            &shell,
            &self.config.site.title,
            &self.config.site.stylesheet,
        )
        .render_all(&self.config.manifest, input_dir, output_dir)?;
        tracing::info!(count = pages_rendered, "Rendered pages");

        let diagrams = render_diagrams(
            self.config.manifest.diagrams(),
            input_dir,
            output_dir,
            self.runner.as_ref(),
        )?;
        tracing::info!(
            count = diagrams.rendered,
            skipped = diagrams.skipped.len(),
            "Rendered diagrams"
        );

        Ok(BuildReport {
            assets_copied,
            pages_rendered,
            diagrams_rendered: diagrams.rendered,
            diagrams_skipped: diagrams.skipped,
        })
    }

    fn load_shell(&self) -> Result<Cow<'static, str>, BuildError> {
        match &self.config.shell_path {
            Some(path) => fs::read_to_string(path)
                .map(Cow::Owned)
                .map_err(BuildError::io(path)),
            None => Ok(Cow::Borrowed(DEFAULT_SHELL)),
        }
    }
}
