//! Passthrough asset copying.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use folio_config::{AssetsConfig, DIAGRAM_EXTENSIONS, TEMPLATE_EXTENSIONS};

use crate::error::BuildError;

/// How the top-level files of the input directory are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssetKind {
    /// Page fragment, rendered by the page phase.
    Template,
    /// Graph description, rendered by the diagram phase.
    Diagram,
    /// Copied verbatim.
    Passthrough,
    /// Left alone.
    Inert,
}

fn classify(path: &Path, assets: &AssetsConfig) -> AssetKind {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return AssetKind::Inert;
    };
    let matches = |list: &[&str]| list.iter().any(|e| e.eq_ignore_ascii_case(ext));

    if matches(TEMPLATE_EXTENSIONS) {
        AssetKind::Template
    } else if matches(DIAGRAM_EXTENSIONS) {
        AssetKind::Diagram
    } else if assets.is_passthrough(ext) {
        AssetKind::Passthrough
    } else {
        AssetKind::Inert
    }
}

/// Copy passthrough files from the top level of `input_dir` into `output_dir`.
///
/// Subdirectories are not visited. Returns the number of files copied.
pub(crate) fn copy_assets(
    input_dir: &Path,
    output_dir: &Path,
    assets: &AssetsConfig,
) -> Result<usize, BuildError> {
    let entries = fs::read_dir(input_dir).map_err(BuildError::io(input_dir))?;
    let mut files: Vec<_> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();
    files.sort();

    let mut copied = 0;
    for src in files {
        match classify(&src, assets) {
            AssetKind::Passthrough => {
                let Some(name) = src.file_name() else {
                    continue;
                };
                let dest = output_dir.join(name);
                copy_preserving_mtime(&src, &dest).map_err(BuildError::io(&dest))?;
                tracing::debug!(path = %src.display(), "Copied asset");
                copied += 1;
            }
            AssetKind::Template | AssetKind::Diagram => {}
            AssetKind::Inert => {
                tracing::trace!(path = %src.display(), "Ignoring file");
            }
        }
    }

    Ok(copied)
}

/// Copy file contents and permissions, then carry over the modification time.
fn copy_preserving_mtime(src: &Path, dest: &Path) -> io::Result<()> {
    fs::copy(src, dest)?;

    // Best effort: a read-only copy can't be reopened for writing.
    let restore = || -> io::Result<()> {
        let modified = fs::metadata(src)?.modified()?;
        File::options().write(true).open(dest)?.set_modified(modified)
    };
    if let Err(e) = restore() {
        tracing::debug!(path = %dest.display(), error = %e, "Failed to preserve modification time");
    }
    Ok(())
}
