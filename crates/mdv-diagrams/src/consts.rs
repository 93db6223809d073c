//! Internal constants for diagram processing.

/// Public `PlantUML` server used when none is configured.
pub const DEFAULT_PLANTUML_SERVER: &str = "https://www.plantuml.com/plantuml";

/// Marker opening a `PlantUML` document.
pub(crate) const START_MARKER: &str = "@startuml";

/// Marker closing a `PlantUML` document.
pub(crate) const END_MARKER: &str = "@enduml";

/// Prefix shared by every `PlantUML` start marker (`@startuml`, `@startmindmap`, ...).
pub(crate) const START_PREFIX: &str = "@start";

/// Line that switches a Mermaid source into the sequence dialect.
pub(crate) const SEQUENCE_HEADER: &str = "sequenceDiagram";

/// Sequence-dialect keywords that collide with participant identifiers.
pub const DEFAULT_RESERVED_WORDS: &[&str] = &[
    "break",
    "end",
    "loop",
    "alt",
    "else",
    "opt",
    "par",
    "and",
    "critical",
    "option",
    "section",
    "rect",
    "note",
    "activate",
    "deactivate",
];

/// Mermaid diagram headers the flow repair pass must leave alone.
pub(crate) const NON_FLOW_HEADERS: &[&str] = &[
    "classDiagram",
    "classDiagram-v2",
    "stateDiagram",
    "stateDiagram-v2",
    "erDiagram",
    "gantt",
    "pie",
    "journey",
    "gitGraph",
    "requirementDiagram",
    "C4Context",
    "C4Container",
    "C4Component",
    "C4Dynamic",
    "C4Deployment",
    "mindmap",
    "sankey-beta",
    "xychart-beta",
    "quadrantChart",
    "timeline",
    "packet-beta",
    "block-beta",
    "architecture-beta",
];
