//! `folio build` command implementation.

use std::path::PathBuf;

use clap::Args;
use folio_config::Config;
use folio_site::{BuildReport, BuildRequest, StaticSiteBuilder};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Directory holding `folio.toml`, page templates, diagrams and assets.
    input_dir: PathBuf,

    /// Directory the site is written to. Created if missing.
    output_dir: PathBuf,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<BuildReport, CliError> {
        let output = Output::new();

        let request = BuildRequest::new(self.input_dir, self.output_dir);
        request.validate()?;
        let config = Config::load(&request.input_dir)?;

        output.info(&format!("Source: {}", request.input_dir.display()));
        output.info(&format!("Output: {}", request.output_dir.display()));

        let report = StaticSiteBuilder::new(config).build(&request)?;

        output.build_summary(&report, &request.output_dir);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_site::BuildError;
    use pretty_assertions::assert_eq;

    fn args(input_dir: &std::path::Path, output_dir: &std::path::Path) -> BuildArgs {
        BuildArgs {
            input_dir: input_dir.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
        }
    }

    #[test]
    fn test_execute_builds_site() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        std::fs::write(input.path().join("index.html"), "<p>home</p>").unwrap();
        std::fs::write(
            input.path().join("folio.toml"),
            "[site]\ntitle = \"Course\"\n\n[[pages]]\nsource = \"index.html\"\ntitle = \"Home\"\n",
        )
        .unwrap();

        let report = args(input.path(), output.path()).execute().unwrap();

        assert_eq!(report.pages_rendered, 1);
        let html = std::fs::read_to_string(output.path().join("index.html")).unwrap();
        assert!(html.contains("<title>Home - Course</title>"));
        assert!(!output.path().join("folio.toml").exists());
    }

    #[test]
    fn test_execute_rejects_same_directory() {
        let input = tempfile::tempdir().unwrap();
        std::fs::write(input.path().join("style.css"), "p {}").unwrap();

        let err = args(input.path(), input.path()).execute().unwrap_err();

        assert!(matches!(err, CliError::Build(BuildError::SameDirectory(_))));
        assert_eq!(
            std::fs::read_to_string(input.path().join("style.css")).unwrap(),
            "p {}"
        );
    }

    #[test]
    fn test_execute_rejects_missing_input() {
        let root = tempfile::tempdir().unwrap();

        let err = args(&root.path().join("missing"), &root.path().join("out"))
            .execute()
            .unwrap_err();

        assert!(matches!(err, CliError::Build(BuildError::NotFound(_))));
        assert!(err.to_string().contains("doesn't exist"));
    }

    #[test]
    fn test_execute_requires_manifest() {
        let input = tempfile::tempdir().unwrap();
        let root = tempfile::tempdir().unwrap();

        let err = args(input.path(), &root.path().join("out"))
            .execute()
            .unwrap_err();

        assert!(matches!(err, CliError::Config(_)));
        assert!(!root.path().join("out").exists());
    }
}
