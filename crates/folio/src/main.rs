//! folio CLI - static site builder.
//!
//! Provides commands for:
//! - `build`: Render a site from an input directory into an output directory

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::BuildArgs;
use output::Output;

/// folio - Static site builder.
#[derive(Parser)]
#[command(name = "folio", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the site from INPUT_DIR into OUTPUT_DIR.
    Build(BuildArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // RUST_LOG controls verbosity, defaulting to warnings only. Logs go to
    // stderr alongside the other diagnostics.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Build(args) => args.execute().map(|_| ()),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_build_takes_two_positionals() {
        assert!(Cli::try_parse_from(["folio", "build", "src", "site"]).is_ok());
        assert!(Cli::try_parse_from(["folio", "build", "src"]).is_err());
        assert!(Cli::try_parse_from(["folio", "build", "src", "site", "extra"]).is_err());
        assert!(Cli::try_parse_from(["folio", "build", "--force", "src", "site"]).is_err());
    }
}
