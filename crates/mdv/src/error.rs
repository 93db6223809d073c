//! CLI error types.

use std::io;
use std::path::PathBuf;

use mdv_config::ConfigError;
use mdv_diagrams::DiagramDialect;

/// Failure of a CLI command. Printed once by `main` before exiting with 1.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot read {}: {source}", path.display())]
    ReadInput { path: PathBuf, source: io::Error },

    #[error("cannot read stdin: {0}")]
    ReadStdin(#[source] io::Error),

    #[error("cannot write {}: {source}", path.display())]
    WriteOutput { path: PathBuf, source: io::Error },

    #[error("cannot write stdout: {0}")]
    WriteStdout(#[source] io::Error),

    #[error("PlantUML encoder unavailable (plantuml.encoding = \"none\")")]
    EncoderUnavailable,

    #[error("{} diagram needs repair", .0.as_str())]
    NeedsRepair(DiagramDialect),
}
