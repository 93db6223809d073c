//! CLI command implementations.
//!
//! Every command reads its input from a file argument, or from stdin when the
//! argument is omitted or `-`.

pub(crate) mod classify;
pub(crate) mod encode;
pub(crate) mod render;
pub(crate) mod repair;

use std::io::{Read, Write};
use std::path::Path;

use clap::ValueEnum;
use mdv_config::{Config, EncodingKind, ImageFormat};
use mdv_diagrams::{
    DeflateEncoder, DiagramDialect, DiagramFormat, HexEncoder, RepairOptions, ReservedWordSet,
    SourceEncoder,
};

use crate::error::CliError;

pub(crate) use classify::ClassifyArgs;
pub(crate) use encode::EncodeArgs;
pub(crate) use render::RenderArgs;
pub(crate) use repair::RepairArgs;

/// `PlantUML` image format flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum FormatArg {
    Svg,
    Png,
}

impl From<FormatArg> for ImageFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Svg => Self::Svg,
            FormatArg::Png => Self::Png,
        }
    }
}

/// `PlantUML` encoding flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum EncodingArg {
    Deflate,
    Hex,
    None,
}

impl From<EncodingArg> for EncodingKind {
    fn from(arg: EncodingArg) -> Self {
        match arg {
            EncodingArg::Deflate => Self::Deflate,
            EncodingArg::Hex => Self::Hex,
            EncodingArg::None => Self::None,
        }
    }
}

/// Mermaid dialect flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum DialectArg {
    Sequence,
    Flow,
}

impl From<DialectArg> for DiagramDialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Sequence => Self::Sequence,
            DialectArg::Flow => Self::Flow,
        }
    }
}

/// Read the whole input from `path`, or stdin for `None` and `-`.
pub(crate) fn read_input(path: Option<&Path>) -> Result<String, CliError> {
    match path {
        Some(path) if path != Path::new("-") => {
            std::fs::read_to_string(path).map_err(|source| CliError::ReadInput {
                path: path.to_path_buf(),
                source,
            })
        }
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .lock()
                .read_to_string(&mut buffer)
                .map_err(CliError::ReadStdin)?;
            Ok(buffer)
        }
    }
}

/// Write `content` to `path`, or stdout when no path is given.
pub(crate) fn write_output(path: Option<&Path>, content: &str) -> Result<(), CliError> {
    if let Some(path) = path {
        return std::fs::write(path, content).map_err(|source| CliError::WriteOutput {
            path: path.to_path_buf(),
            source,
        });
    }
    let mut stdout = std::io::stdout().lock();
    let newline: &[u8] = if content.ends_with('\n') { b"" } else { b"\n" };
    stdout
        .write_all(content.as_bytes())
        .and_then(|()| stdout.write_all(newline))
        .and_then(|()| stdout.flush())
        .map_err(CliError::WriteStdout)
}

/// Repair options for the loaded configuration.
pub(crate) fn repair_options(config: &Config) -> RepairOptions {
    if !config.mermaid.repair {
        return RepairOptions::disabled();
    }
    let reserved = ReservedWordSet::default().with_extra(&config.mermaid.extra_reserved_words);
    RepairOptions::default().with_reserved_words(reserved)
}

/// Encoder selected by the configured encoding.
pub(crate) fn source_encoder(kind: EncodingKind) -> Option<Box<dyn SourceEncoder>> {
    match kind {
        EncodingKind::Deflate => Some(Box::new(DeflateEncoder)),
        EncodingKind::Hex => Some(Box::new(HexEncoder)),
        EncodingKind::None => None,
    }
}

pub(crate) fn diagram_format(format: ImageFormat) -> DiagramFormat {
    match format {
        ImageFormat::Svg => DiagramFormat::Svg,
        ImageFormat::Png => DiagramFormat::Png,
    }
}
