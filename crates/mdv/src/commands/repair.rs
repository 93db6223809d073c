//! Repair command implementation.

use std::path::PathBuf;

use clap::Args;
use mdv_config::{CliSettings, Config};
use mdv_diagrams::{DiagramDialect, classify_dialect, repair_diagram_source};

use super::{DialectArg, read_input, repair_options, write_output};
use crate::error::CliError;

/// Arguments for the repair command.
#[derive(Args)]
pub(crate) struct RepairArgs {
    /// Mermaid source file (stdin when omitted or `-`).
    input: Option<PathBuf>,

    /// Write the repaired source to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Dialect to repair as (detected from the source by default).
    #[arg(long, value_enum)]
    dialect: Option<DialectArg>,

    /// Exit with an error if the source would change, without writing it.
    #[arg(long)]
    check: bool,

    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl RepairArgs {
    /// Execute the repair command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or I/O fails, or if `--check`
    /// finds a source that needs repair.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        // Repair is the point of this command, so the config toggle does not apply.
        let cli_settings = CliSettings {
            repair_enabled: Some(true),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let source = read_input(self.input.as_deref())?;

        let dialect = self
            .dialect
            .map_or_else(|| classify_dialect(&source), DiagramDialect::from);
        let repaired = repair_diagram_source(dialect, &source, &repair_options(&config));

        if self.check {
            if repaired != source {
                return Err(CliError::NeedsRepair(dialect));
            }
            return Ok(());
        }

        write_output(self.output.as_deref(), &repaired)
    }
}
