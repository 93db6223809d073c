//! Status lines on stderr.
//!
//! Rendered documents and repaired sources go to stdout, so everything the
//! user should read about a run is written here instead.

use std::fmt::Display;
use std::path::Path;

use console::{Style, Term};

pub(crate) struct Output {
    term: Term,
    done: Style,
    warn: Style,
    fail: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            done: Style::new().green(),
            warn: Style::new().yellow(),
            fail: Style::new().red().bold(),
        }
    }

    /// Report the file a document was rendered to.
    pub(crate) fn rendered(&self, path: &Path) {
        self.line(&self.done, format_args!("Rendered to {}", path.display()));
    }

    /// Report diagram warnings collected during a render.
    pub(crate) fn diagram_warnings(&self, warnings: &[String]) {
        for warning in warnings {
            self.line(&self.warn, format_args!("Warning: {warning}"));
        }
    }

    pub(crate) fn failed(&self, err: &dyn Display) {
        self.line(&self.fail, format_args!("Error: {err}"));
    }

    fn line(&self, style: &Style, msg: impl Display) {
        let _ = self.term.write_line(&style.apply_to(msg).to_string());
    }
}
