//! Mermaid and `PlantUML` source repair for mdv.
//!
//! This crate prepares diagram code blocks before a third-party renderer sees
//! them:
//! - [`classify_dialect`] tells sequence diagrams from flow/graph diagrams
//! - [`repair_diagram_source`] rewrites labels, messages and identifiers that
//!   Mermaid would reject
//! - [`encode_plantuml_source`] produces the `PlantUML` server URL encoding
//! - [`DiagramProcessor`] is the renderer's fence handler and emits the
//!   placeholder containers the page draws into
//!
//! # Example
//!
//! ```
//! use mdv_diagrams::{DiagramDialect, RepairOptions, classify_dialect, repair_diagram_source};
//!
//! let source = "sequenceDiagram\n  participant end as End\n  A->>end: call(x)";
//! let dialect = classify_dialect(source);
//! assert_eq!(dialect, DiagramDialect::Sequence);
//!
//! let repaired = repair_diagram_source(dialect, source, &RepairOptions::default());
//! assert_eq!(
//!     repaired,
//!     "sequenceDiagram\n  participant end_ as End\n  A->>end_: \"call(x)\""
//! );
//! ```

mod consts;
mod dialect;
mod language;
mod placeholder;
mod plantuml;
mod processor;
mod repair;

pub use consts::{DEFAULT_PLANTUML_SERVER, DEFAULT_RESERVED_WORDS};
pub use dialect::{DiagramDialect, classify_dialect};
pub use language::{DiagramBlock, DiagramFormat, DiagramLanguage};
pub use placeholder::{RenderPlaceholder, next_render_pass, placeholder_id};
pub use plantuml::{
    DeflateEncoder, EncodeError, HexEncoder, SourceEncoder, encode_plantuml_source,
    ensure_markers, plantuml_url,
};
pub use processor::DiagramProcessor;
pub use repair::{RepairOptions, ReservedWordSet, repair_diagram_source, repair_mermaid_source};
