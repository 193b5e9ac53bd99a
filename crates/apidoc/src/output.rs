//! Build progress and outcome reporting on stderr.

use std::fmt::Display;
use std::path::Path;

use apidoc_render::PageError;
use console::{Style, Term};

/// Reports a build to the terminal.
pub(crate) struct Report {
    term: Term,
    done: Style,
    failed: Style,
}

impl Report {
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            done: Style::new().green(),
            failed: Style::new().red(),
        }
    }

    /// Announce the snapshot being rendered and where pages go.
    pub(crate) fn start(&self, snapshot: &Path, dir: &Path) {
        self.line(&format!("{} -> {}", snapshot.display(), dir.display()));
    }

    pub(crate) fn page_failed(&self, error: &PageError) {
        self.line(&self.failed.apply_to(failure_line(error)).to_string());
    }

    /// Print the closing page tally, green when nothing failed.
    pub(crate) fn finished(&self, written: usize, failed: usize, dir: &Path) {
        let text = summary_line(written, failed, dir);
        let style = if failed == 0 { &self.done } else { &self.failed };
        self.line(&style.apply_to(text).to_string());
    }

    pub(crate) fn fatal(&self, error: &impl Display) {
        self.line(&self.failed.apply_to(format!("error: {error}")).to_string());
    }

    fn line(&self, text: &str) {
        let _ = self.term.write_line(text);
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

fn failure_line(error: &PageError) -> String {
    format!("  failed {}: {}", error.page, error.kind)
}

fn summary_line(written: usize, failed: usize, dir: &Path) -> String {
    let written = format!("Wrote {} to {}", plural(written, "page"), dir.display());
    if failed == 0 {
        written
    } else {
        format!("{written}, {} failed", plural(failed, "page"))
    }
}

#[cfg(test)]
mod tests {
    use apidoc_render::{MarkupError, PageErrorKind};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_summary_counts_pages() {
        let dir = Path::new("site");

        assert_eq!(summary_line(1, 0, dir), "Wrote 1 page to site");
        assert_eq!(summary_line(12, 0, dir), "Wrote 12 pages to site");
        assert_eq!(
            summary_line(3, 1, dir),
            "Wrote 3 pages to site, 1 page failed"
        );
    }

    #[test]
    fn test_failure_line_names_page() {
        let error = PageError {
            page: "a.b.Bad".to_owned(),
            kind: PageErrorKind::Markup(MarkupError::UnexpectedClose {
                close: "i".to_owned(),
            }),
        };

        assert_eq!(
            failure_line(&error),
            "  failed a.b.Bad: </i> has no matching open element"
        );
    }
}
