//! Mermaid source repair passes.
//!
//! Authors often write Mermaid sources that the Mermaid parser rejects:
//! labels with parentheses or slashes, multi-line node text, or sequence
//! participants named after keywords such as `end`. The passes in this module
//! rewrite those fragments into the quoted forms Mermaid accepts.
//!
//! Every pass is a pure `&str -> String` function:
//! - fragments no rule matches are copied byte-for-byte
//! - already quoted text is never wrapped again, so repairing twice is the
//!   same as repairing once

mod flow;
mod sequence;

use crate::consts::DEFAULT_RESERVED_WORDS;
use crate::dialect::{DiagramDialect, classify_dialect};

/// Sequence-dialect keywords that cannot be used as participant identifiers.
///
/// Membership is ASCII case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedWordSet {
    words: Vec<String>,
}

impl ReservedWordSet {
    /// Empty set; no identifier is treated as reserved.
    #[must_use]
    pub fn empty() -> Self {
        Self { words: Vec::new() }
    }

    /// Add words on top of the current set.
    #[must_use]
    pub fn with_extra<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for word in words {
            let word = word.into();
            if !self.contains(&word) {
                self.words.push(word);
            }
        }
        self
    }

    /// Whether `word` is reserved, ignoring ASCII case.
    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w.eq_ignore_ascii_case(word))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for ReservedWordSet {
    fn default() -> Self {
        Self::empty().with_extra(DEFAULT_RESERVED_WORDS.iter().copied())
    }
}

/// Options for the repair passes.
///
/// Passed explicitly to every repair call; there is no global repair state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairOptions {
    /// Whether repair runs at all. Disabled repair returns sources unchanged.
    pub enabled: bool,
    /// Reserved words for participant renaming.
    pub reserved_words: ReservedWordSet,
}

impl RepairOptions {
    /// Options that leave every source untouched.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Replace the reserved word set.
    #[must_use]
    pub fn with_reserved_words(mut self, reserved_words: ReservedWordSet) -> Self {
        self.reserved_words = reserved_words;
        self
    }
}

impl Default for RepairOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            reserved_words: ReservedWordSet::default(),
        }
    }
}

/// Repair a Mermaid source written in the given dialect.
#[must_use]
pub fn repair_diagram_source(
    dialect: DiagramDialect,
    source: &str,
    options: &RepairOptions,
) -> String {
    if !options.enabled {
        return source.to_owned();
    }

    let repaired = match dialect {
        DiagramDialect::Sequence => sequence::repair_sequence(source, &options.reserved_words),
        DiagramDialect::Flow => flow::repair_flow(source),
    };

    if repaired != source {
        tracing::debug!(
            dialect = dialect.as_str(),
            before = source.len(),
            after = repaired.len(),
            "Repaired diagram source"
        );
    }
    repaired
}

/// Classify a Mermaid source and repair it with the matching pass.
#[must_use]
pub fn repair_mermaid_source(source: &str, options: &RepairOptions) -> String {
    repair_diagram_source(classify_dialect(source), source, options)
}
