//! Colored terminal output on stderr.

use std::path::Path;

use console::{Style, Term};
use folio_site::BuildReport;

/// Terminal output formatter.
pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
        }
    }

    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        self.styled(&self.red, msg);
    }

    /// Print skipped diagrams (yellow) followed by a summary line (green).
    pub(crate) fn build_summary(&self, report: &BuildReport, output_dir: &Path) {
        for skipped in &report.diagrams_skipped {
            self.styled(
                &self.yellow,
                &format!("Skipped diagram {skipped}: unsupported layout engine"),
            );
        }
        self.styled(
            &self.green,
            &format!(
                "Built {} pages, {} diagrams and {} assets into {}",
                report.pages_rendered,
                report.diagrams_rendered,
                report.assets_copied,
                output_dir.display()
            ),
        );
    }

    fn styled(&self, style: &Style, msg: &str) {
        let _ = self.term.write_line(&style.apply_to(msg).to_string());
    }
}
