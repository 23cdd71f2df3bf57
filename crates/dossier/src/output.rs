//! Terminal output for build runs.

use console::{Style, Term};
use dossier_render::RenderReport;

/// Writes run progress and per-target summaries to stderr.
pub(crate) struct Output {
    term: Term,
    ok: Style,
    warn: Style,
    fail: Style,
    heading: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            ok: Style::new().green(),
            warn: Style::new().yellow(),
            fail: Style::new().red(),
            heading: Style::new().cyan().bold(),
        }
    }

    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    pub(crate) fn error(&self, msg: &str) {
        self.styled(&self.fail, msg);
    }

    pub(crate) fn highlight(&self, msg: &str) {
        self.styled(&self.heading, msg);
    }

    /// Print one block per target and return how many failed.
    pub(crate) fn summary(&self, reports: &[RenderReport]) -> usize {
        reports
            .iter()
            .filter(|report| !self.report(report))
            .count()
    }

    /// Print one target's outcome. Returns whether it succeeded.
    fn report(&self, report: &RenderReport) -> bool {
        let target = format!("{} ({})", report.output_path.display(), report.backend);
        let written = report.documents_written.len();
        if report.is_success() {
            self.styled(&self.ok, &format!("Wrote {written} documents to {target}"));
            return true;
        }

        if let Some(err) = &report.error {
            self.error(&format!("Failed {target} at {}: {err}", report.state));
        } else {
            self.styled(
                &self.warn,
                &format!("Wrote {written} documents to {target} with errors"),
            );
        }
        for failure in &report.failures {
            self.error(&format!("  {}: {}", failure.path, failure.error));
        }
        if report.job_failures > 0 {
            self.styled(
                &self.warn,
                &format!("  {} render jobs failed", report.job_failures),
            );
        }
        false
    }

    fn styled(&self, style: &Style, msg: &str) {
        let _ = self.term.write_line(&style.apply_to(msg).to_string());
    }
}
