//! Diagram types for supported fence languages.

/// Supported diagram languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramLanguage {
    Mermaid,
    PlantUml,
}

impl DiagramLanguage {
    /// Parse language from code fence info string.
    ///
    /// Returns None if the language is not a supported diagram type.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mermaid" => Some(Self::Mermaid),
            "plantuml" | "puml" => Some(Self::PlantUml),
            _ => None,
        }
    }

    /// Placeholder kind used in DOM ids and CSS classes.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mermaid => "mermaid",
            Self::PlantUml => "plantuml",
        }
    }
}

/// Image format requested from the `PlantUML` server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagramFormat {
    /// Vector image (default).
    #[default]
    Svg,
    /// Raster image.
    Png,
}

impl DiagramFormat {
    /// Parse format from attribute value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "svg" => Some(Self::Svg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    /// Return format as string representation (also the server path segment).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
        }
    }
}

/// One fenced diagram block of a single render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramBlock {
    /// Source text as written in the fence.
    pub source: String,
    /// Declared fence language.
    pub language: DiagramLanguage,
    /// Placeholder DOM id, unique across render passes.
    pub id: String,
}
