//! Mermaid sub-dialect detection.
//!
//! Only two dialects matter for repair: sequence diagrams, which have their
//! own identifier and message rules, and everything else, which is treated as
//! flow/graph syntax.

use crate::consts::{NON_FLOW_HEADERS, SEQUENCE_HEADER};

/// Mermaid sub-dialect that selects the repair pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagramDialect {
    Sequence,
    Flow,
}

impl DiagramDialect {
    /// Parse a dialect name (`sequence` or `flow`).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sequence" => Some(Self::Sequence),
            "flow" => Some(Self::Flow),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sequence => "sequence",
            Self::Flow => "flow",
        }
    }
}

/// Determine the dialect of a Mermaid source.
///
/// A source is [`DiagramDialect::Sequence`] when any line, trimmed of
/// surrounding whitespace, is exactly `sequenceDiagram`. Everything else is
/// [`DiagramDialect::Flow`].
#[must_use]
pub fn classify_dialect(source: &str) -> DiagramDialect {
    if source.lines().any(|line| line.trim() == SEQUENCE_HEADER) {
        DiagramDialect::Sequence
    } else {
        DiagramDialect::Flow
    }
}

/// First line that carries diagram syntax.
///
/// Skips blank lines, `%%` comments and directives, and a leading `---`
/// front matter block.
fn first_significant_line(source: &str) -> Option<&str> {
    let mut lines = source.lines().map(str::trim).peekable();

    if lines.peek() == Some(&"---") {
        lines.next();
        for line in lines.by_ref() {
            if line == "---" {
                break;
            }
        }
    }

    lines.find(|line| !line.is_empty() && !line.starts_with("%%"))
}

/// Whether the source declares a Mermaid diagram type with non-flow syntax.
pub(crate) fn has_non_flow_header(source: &str) -> bool {
    first_significant_line(source)
        .and_then(|line| line.split_whitespace().next())
        .is_some_and(|keyword| NON_FLOW_HEADERS.contains(&keyword))
}
