//! Classify command implementation.

use std::path::PathBuf;

use clap::Args;
use mdv_diagrams::classify_dialect;

use super::{read_input, write_output};
use crate::error::CliError;

/// Arguments for the classify command.
#[derive(Args)]
pub(crate) struct ClassifyArgs {
    /// Mermaid source file (stdin when omitted or `-`).
    input: Option<PathBuf>,
}

impl ClassifyArgs {
    /// Print `sequence` or `flow` for the input source.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let source = read_input(self.input.as_deref())?;
        write_output(None, classify_dialect(&source).as_str())
    }
}
