//! `PlantUML` source encoding.
//!
//! `PlantUML` servers take the diagram source in the URL path. This module
//! normalizes the source (adding `@startuml`/`@enduml` when absent) and
//! encodes it with one of the server's transport encodings:
//! - [`DeflateEncoder`]: raw DEFLATE followed by `PlantUML`'s base64 variant
//! - [`HexEncoder`]: uncompressed `~h` hex form

use std::io::Write;

use base64::Engine;
use base64::alphabet::Alphabet;
use base64::engine::{GeneralPurpose, general_purpose};
use flate2::Compression;
use flate2::write::DeflateEncoder as RawDeflate;

use crate::consts::{END_MARKER, START_MARKER, START_PREFIX};
use crate::language::DiagramFormat;

/// `PlantUML`'s base64 alphabet: digits, upper, lower, `-`, `_`.
const PLANTUML_ALPHABET: Alphabet =
    match Alphabet::new("0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz-_") {
        Ok(alphabet) => alphabet,
        Err(_) => panic!("invalid PlantUML alphabet"),
    };

const PLANTUML_BASE64: GeneralPurpose =
    GeneralPurpose::new(&PLANTUML_ALPHABET, general_purpose::NO_PAD);

/// Error from a source encoder.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("Failed to compress diagram source: {0}")]
    Compress(#[from] std::io::Error),
}

/// Transport encoding for diagram sources.
pub trait SourceEncoder: Send + Sync {
    /// Encode a complete `PlantUML` document.
    fn encode(&self, source: &str) -> Result<String, EncodeError>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// Raw DEFLATE plus `PlantUML` base64, the server's default URL encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeflateEncoder;

impl SourceEncoder for DeflateEncoder {
    fn encode(&self, source: &str) -> Result<String, EncodeError> {
        let mut deflater = RawDeflate::new(Vec::new(), Compression::best());
        deflater.write_all(source.as_bytes())?;
        let mut compressed = deflater.finish()?;

        // The server decodes whole 3-byte groups; zero padding keeps the last
        // group complete instead of emitting a short one.
        let remainder = compressed.len() % 3;
        if remainder != 0 {
            compressed.resize(compressed.len() + 3 - remainder, 0);
        }

        Ok(PLANTUML_BASE64.encode(compressed))
    }

    fn name(&self) -> &'static str {
        "deflate"
    }
}

/// Uncompressed hex encoding (`~h` prefix).
#[derive(Debug, Clone, Copy, Default)]
pub struct HexEncoder;

impl SourceEncoder for HexEncoder {
    fn encode(&self, source: &str) -> Result<String, EncodeError> {
        Ok(format!("~h{}", hex::encode(source.as_bytes())))
    }

    fn name(&self) -> &'static str {
        "hex"
    }
}

/// Trim the source and wrap it in `@startuml`/`@enduml` unless it already
/// has a start marker.
#[must_use]
pub fn ensure_markers(source: &str) -> String {
    let trimmed = source.trim();
    let has_start = trimmed
        .lines()
        .any(|line| line.trim_start().starts_with(START_PREFIX));

    if has_start {
        trimmed.to_owned()
    } else {
        format!("{START_MARKER}\n{trimmed}\n{END_MARKER}")
    }
}

/// Encode a `PlantUML` source for a server URL.
///
/// Returns `None` when no encoder is available or encoding fails; callers
/// render a degraded placeholder in that case.
#[must_use]
pub fn encode_plantuml_source(source: &str, encoder: Option<&dyn SourceEncoder>) -> Option<String> {
    let Some(encoder) = encoder else {
        tracing::debug!("No PlantUML encoder configured");
        return None;
    };

    let document = ensure_markers(source);
    match encoder.encode(&document) {
        Ok(encoded) => {
            tracing::debug!(
                encoder = encoder.name(),
                source_len = document.len(),
                encoded_len = encoded.len(),
                "Encoded PlantUML source"
            );
            Some(encoded)
        }
        Err(e) => {
            tracing::warn!(encoder = encoder.name(), error = %e, "Failed to encode PlantUML source");
            None
        }
    }
}

/// Image URL for an encoded source: `{server}/{format}/{encoded}`.
#[must_use]
pub fn plantuml_url(server_url: &str, format: DiagramFormat, encoded: &str) -> String {
    format!(
        "{}/{}/{encoded}",
        server_url.trim_end_matches('/'),
        format.as_str()
    )
}
