//! Encode command implementation.

use std::path::PathBuf;

use clap::Args;
use mdv_config::{CliSettings, Config};
use mdv_diagrams::{encode_plantuml_source, plantuml_url};

use super::{EncodingArg, FormatArg, diagram_format, read_input, source_encoder, write_output};
use crate::error::CliError;

/// Arguments for the encode command.
#[derive(Args)]
pub(crate) struct EncodeArgs {
    /// `PlantUML` source file (stdin when omitted or `-`).
    input: Option<PathBuf>,

    /// Print the full image URL instead of the encoded path segment.
    #[arg(long)]
    url: bool,

    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// `PlantUML` server URL (overrides config).
    #[arg(long, env = "MDV_PLANTUML_SERVER")]
    plantuml_server: Option<String>,

    /// `PlantUML` image format (overrides config).
    #[arg(long, value_enum)]
    plantuml_format: Option<FormatArg>,

    /// `PlantUML` source encoding (overrides config).
    #[arg(long, value_enum)]
    plantuml_encoding: Option<EncodingArg>,
}

impl EncodeArgs {
    /// Execute the encode command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or I/O fails, or if no
    /// encoder is available.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            plantuml_server_url: self.plantuml_server,
            plantuml_format: self.plantuml_format.map(Into::into),
            plantuml_encoding: self.plantuml_encoding.map(Into::into),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let source = read_input(self.input.as_deref())?;

        let encoder = source_encoder(config.plantuml.encoding);
        let encoded = encode_plantuml_source(&source, encoder.as_deref())
            .ok_or(CliError::EncoderUnavailable)?;

        if self.url {
            let url = plantuml_url(
                &config.plantuml.server_url,
                diagram_format(config.plantuml.format),
                &encoded,
            );
            return write_output(None, &url);
        }
        write_output(None, &encoded)
    }
}
