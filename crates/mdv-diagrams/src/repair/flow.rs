//! Flowchart and graph repair.
//!
//! Labels are found in one scan over the original source and rewritten in a
//! second step, so a subgraph header is never seen again by the node rules
//! and no rule ever matches text another rule produced.

use std::ops::Range;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::dialect::has_non_flow_header;

/// Identifiers followed by `(` that are styling syntax rather than nodes.
const STYLE_KEYWORDS: &[&str] = &["fill", "stroke", "color", "class", "click"];

/// Characters that make a square-bracket label unparseable.
const SQUARE_TRIGGERS: &[char] = &['(', ')', '/', ':', '&', '\n'];

/// Characters that make a round-bracket label unparseable.
const ROUND_TRIGGERS: &[char] = &['/', ':', '&', '[', ']', '\n'];

/// Single left-to-right scanner over comments, strings and labels.
///
/// Comments, `|edge text|` and quoted strings are matched only so that their
/// contents are skipped. A quoted string never spans a `|`, so an unbalanced
/// quote inside edge text cannot hide the labels after it.
static SCANNER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"%%[^\n]*"#,
        r#"|\|[^|\n]*\|"#,
        r#"|"[^"\n|]*""#,
        r#"|\bsubgraph[ \t]+(?P<sg_id>\w+)\[(?P<sg_label>"[^"]*"|[^\]]*)\]"#,
        r#"|(?P<sq_id>\w+)\[(?P<sq_label>"[^"]*"|[^\[\]]*)\]"#,
        r#"|(?P<rd_id>\w+)\((?P<rd_label>"[^"]*"|[^()]*)\)"#,
    ))
    .unwrap()
});

static LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\r?\n\s*").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LabelKind {
    Subgraph,
    Square,
    Round,
}

/// Byte range of a label's text, without its brackets.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LabelSpan {
    kind: LabelKind,
    range: Range<usize>,
}

pub(crate) fn repair_flow(source: &str) -> String {
    if has_non_flow_header(source) {
        return source.to_owned();
    }

    let mut result = String::with_capacity(source.len() + 16);
    let mut last = 0;
    for span in label_spans(source) {
        let label = &source[span.range.clone()];
        if let Some(rewritten) = rewrite_label(span.kind, label) {
            result.push_str(&source[last..span.range.start]);
            result.push_str(&rewritten);
            last = span.range.end;
        }
    }
    result.push_str(&source[last..]);
    result
}

/// Phase one: tag every label in the source, in order.
fn label_spans(source: &str) -> Vec<LabelSpan> {
    SCANNER
        .captures_iter(source)
        .filter_map(|caps| classify_match(&caps))
        .collect()
}

fn classify_match(caps: &Captures<'_>) -> Option<LabelSpan> {
    let (kind, label) = if let Some(label) = caps.name("sg_label") {
        (LabelKind::Subgraph, label)
    } else if let Some(label) = caps.name("sq_label") {
        (LabelKind::Square, label)
    } else if let Some(label) = caps.name("rd_label") {
        let id = caps.name("rd_id").map_or("", |m| m.as_str());
        if STYLE_KEYWORDS.contains(&id) {
            return None;
        }
        (LabelKind::Round, label)
    } else {
        // Comment, edge text or quoted string
        return None;
    };

    Some(LabelSpan {
        kind,
        range: label.range(),
    })
}

fn is_fully_quoted(label: &str) -> bool {
    let trimmed = label.trim();
    trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"')
}

/// Labels that are really part of a compound shape such as `[(db)]`, `[/in/]`
/// or `([stadium])`.
///
/// A bracket pair only counts as a shape when it encloses the whole label:
/// `[(x) and (y)]` is text that happens to start and end with parentheses.
fn is_shape_delimited(kind: LabelKind, label: &str) -> bool {
    let first = label.chars().next();
    let last = label.chars().next_back();
    let inner = || label.get(1..label.len() - 1).unwrap_or_default();
    match kind {
        LabelKind::Square => {
            (first == Some('(') && last == Some(')') && !inner().contains(['(', ')']))
                || (matches!(first, Some('/' | '\\')) && matches!(last, Some('/' | '\\')))
        }
        LabelKind::Round => first == Some('[') && last == Some(']') && !inner().contains(['[', ']']),
        LabelKind::Subgraph => false,
    }
}

/// Phase two: quoted replacement for a label, or `None` to keep it as written.
fn rewrite_label(kind: LabelKind, label: &str) -> Option<String> {
    if is_fully_quoted(label) || is_shape_delimited(kind, label) {
        return None;
    }

    let needs_quotes = match kind {
        LabelKind::Subgraph => true,
        LabelKind::Square => label.contains(SQUARE_TRIGGERS),
        LabelKind::Round => label.contains(ROUND_TRIGGERS),
    };
    if !needs_quotes {
        return None;
    }

    let text = LINE_BREAK.replace_all(label.trim(), "<br>");
    Some(format!("\"{}\"", text.replace('"', "#quot;")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_square_label_with_parens() {
        assert_eq!(
            repair_flow("graph TD\n  A[Start (here)] --> B[End]"),
            "graph TD\n  A[\"Start (here)\"] --> B[End]"
        );
    }

    #[test]
    fn test_square_label_multiline() {
        assert_eq!(
            repair_flow("graph TD\n  A[Line1\n    Line2]"),
            "graph TD\n  A[\"Line1<br>Line2\"]"
        );
    }

    #[test]
    fn test_square_label_inner_quotes() {
        assert_eq!(
            repair_flow("graph LR\n  A[say \"hi\" / bye]"),
            "graph LR\n  A[\"say #quot;hi#quot; / bye\"]"
        );
    }

    #[test]
    fn test_round_label_triggers() {
        assert_eq!(
            repair_flow("graph TD\n  A(http://x) --> B(plain)"),
            "graph TD\n  A(\"http://x\") --> B(plain)"
        );
    }

    #[test]
    fn test_round_label_style_keywords_skipped() {
        let source = "graph TD\n  A --> B\n  click(a/b)\n  fill(x:y)";
        assert_eq!(repair_flow(source), source);
    }

    #[test]
    fn test_subgraph_always_quoted() {
        assert_eq!(
            repair_flow("graph TD\n  subgraph S[Title]\n    A\n  end"),
            "graph TD\n  subgraph S[\"Title\"]\n    A\n  end"
        );
    }

    #[test]
    fn test_subgraph_and_node_each_wrapped_once() {
        assert_eq!(
            repair_flow("graph TD\nsubgraph S[My (Group)]\n  A(My/Node)\nend"),
            "graph TD\nsubgraph S[\"My (Group)\"]\n  A(\"My/Node\")\nend"
        );
    }

    #[test]
    fn test_already_quoted_untouched() {
        let source = "graph TD\n  subgraph S[\"Group (1)\"]\n  A[\"x (y)\"] --> B(\"a/b\")\n  end";
        assert_eq!(repair_flow(source), source);
    }

    #[test]
    fn test_no_triggers_is_byte_identical() {
        let source = "flowchart LR\r\n  A[Start] --> B(Middle)\r\n  B --> C{Decide}\r\n";
        assert_eq!(repair_flow(source), source);
    }

    #[test]
    fn test_shape_delimiters_untouched() {
        let source = "graph TD\n  A[(Database)] --> B[/Input/]\n  B --> C([Stadium])\n  C --> D[[Sub]]\n  D --> E((Circle))";
        assert_eq!(repair_flow(source), source);
    }

    #[test]
    fn test_parenthesized_words_are_not_a_cylinder() {
        assert_eq!(
            repair_flow("graph TD\n  A[(x) and (y)] --> B([a] or [b])\n  C[(db)]"),
            "graph TD\n  A[\"(x) and (y)\"] --> B(\"[a] or [b]\")\n  C[(db)]"
        );
    }

    #[test]
    fn test_unbalanced_quote_in_edge_text() {
        assert_eq!(
            repair_flow("graph TD\n  A -->|\"a| B[x/y] --> C[\"q\"]"),
            "graph TD\n  A -->|\"a| B[\"x/y\"] --> C[\"q\"]"
        );
    }

    #[test]
    fn test_edge_text_skipped() {
        let source = "graph TD\n  A -->|B(x/y)| C";
        assert_eq!(repair_flow(source), source);
    }

    #[test]
    fn test_comments_and_edge_strings_skipped() {
        let source = "graph TD\n  %% A[not (a) node]\n  A -- \"B(x/y)\" --> C";
        assert_eq!(repair_flow(source), source);
    }

    #[test]
    fn test_non_flow_header_passthrough() {
        let source = "classDiagram\n  class A{\n    +run(a: int)\n  }\n  A : +list[a/b]";
        assert_eq!(repair_flow(source), source);
    }

    #[test]
    fn test_unicode_labels() {
        assert_eq!(
            repair_flow("graph TD\n  节点[开始 (一)]"),
            "graph TD\n  节点[\"开始 (一)\"]"
        );
    }

    #[test]
    fn test_label_spans_disambiguate_subgraph() {
        let source = "subgraph S[My (Group)]\n  A(My/Node)";
        let spans = label_spans(source);
        assert_eq!(
            spans,
            vec![
                LabelSpan {
                    kind: LabelKind::Subgraph,
                    range: 11..21,
                },
                LabelSpan {
                    kind: LabelKind::Round,
                    range: 27..34,
                },
            ]
        );
    }

    #[test]
    fn test_idempotent() {
        let source = "graph TD\n  subgraph S[A\n  B]\n  X[a:b] --> Y(c&d)\n  end";
        let once = repair_flow(source);
        assert_eq!(repair_flow(&once), once);
    }
}
