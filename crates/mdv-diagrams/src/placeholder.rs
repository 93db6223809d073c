//! HTML containers emitted in place of diagram code blocks.
//!
//! Diagrams are drawn in the page after the HTML is inserted. Each container
//! carries an id of the form `{kind}-{pass}-{index}`; the pass number comes
//! from a process-wide counter so containers from an earlier render never
//! share an id with the current one.

use std::sync::atomic::{AtomicU64, Ordering};

use mdv_renderer::escape_html;

use crate::language::DiagramLanguage;

/// Inline image handlers. They run even when the image settles before any
/// page script is attached; the page turns `plantuml-failed` into an error block.
const IMG_ONLOAD: &str = "this.parentNode.classList.remove('plantuml-loading')";
const IMG_ONERROR: &str = "this.parentNode.classList.remove('plantuml-loading');this.parentNode.classList.add('plantuml-failed')";

static RENDER_PASS: AtomicU64 = AtomicU64::new(0);

/// Reserve the next render pass number (starts at 1).
pub fn next_render_pass() -> u64 {
    RENDER_PASS.fetch_add(1, Ordering::Relaxed) + 1
}

/// DOM id for the diagram at `index` within render pass `pass`.
#[must_use]
pub fn placeholder_id(language: DiagramLanguage, pass: u64, index: usize) -> String {
    format!("{}-{pass}-{index}", language.as_str())
}

/// Container emitted in place of a diagram code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderPlaceholder {
    /// Repaired Mermaid source, drawn by Mermaid in the page.
    Mermaid { id: String, source: String },
    /// `PlantUML` image served from an encoded URL.
    PlantUml {
        id: String,
        source: String,
        image_url: String,
    },
    /// `PlantUML` block that could not be encoded.
    EncoderUnavailable { id: String, source: String },
}

impl RenderPlaceholder {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Mermaid { id, .. }
            | Self::PlantUml { id, .. }
            | Self::EncoderUnavailable { id, .. } => id,
        }
    }

    /// Render the container as HTML.
    ///
    /// Diagram sources are entity-escaped; Mermaid decodes entities before
    /// parsing, and `PlantUML` sources travel in an attribute.
    #[must_use]
    pub fn to_html(&self) -> String {
        match self {
            Self::Mermaid { id, source } => {
                format!(
                    r#"<div class="mermaid" id="{}">{}</div>"#,
                    escape_html(id),
                    escape_html(source)
                )
            }
            Self::PlantUml {
                id,
                source,
                image_url,
            } => {
                format!(
                    r#"<div class="plantuml plantuml-loading" id="{}" data-plantuml-code="{}"><img class="plantuml-diagram" src="{}" alt="PlantUML Diagram" onload="{IMG_ONLOAD}" onerror="{IMG_ONERROR}"></div>"#,
                    escape_html(id),
                    escape_html(source),
                    escape_html(image_url)
                )
            }
            Self::EncoderUnavailable { id, source } => {
                let source = escape_html(source);
                let mut html = String::with_capacity(source.len() * 2 + 256);
                html.push_str(r#"<div class="plantuml plantuml-error" id=""#);
                html.push_str(&escape_html(id));
                html.push_str(r#"" data-plantuml-code=""#);
                html.push_str(&source);
                html.push_str(r#""><p class="diagram-error-message">PlantUML encoder unavailable</p>"#);
                html.push_str("<details><summary>Source</summary><pre><code>");
                html.push_str(&source);
                html.push_str("</code></pre></details></div>");
                html
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_pass_is_monotonic() {
        let first = next_render_pass();
        let second = next_render_pass();
        assert!(first >= 1);
        assert!(second > first);
    }

    #[test]
    fn test_placeholder_id() {
        assert_eq!(placeholder_id(DiagramLanguage::Mermaid, 3, 0), "mermaid-3-0");
        assert_eq!(placeholder_id(DiagramLanguage::PlantUml, 7, 12), "plantuml-7-12");
    }

    #[test]
    fn test_mermaid_html_escapes_source() {
        let placeholder = RenderPlaceholder::Mermaid {
            id: "mermaid-1-0".to_owned(),
            source: "graph TD\n  A[\"a & b\"] --> B".to_owned(),
        };
        assert_eq!(
            placeholder.to_html(),
            "<div class=\"mermaid\" id=\"mermaid-1-0\">graph TD\n  A[&quot;a &amp; b&quot;] --&gt; B</div>"
        );
        assert_eq!(placeholder.id(), "mermaid-1-0");
    }

    #[test]
    fn test_plantuml_html() {
        let placeholder = RenderPlaceholder::PlantUml {
            id: "plantuml-1-2".to_owned(),
            source: "A -> B".to_owned(),
            image_url: "https://www.plantuml.com/plantuml/svg/abc".to_owned(),
        };
        assert_eq!(
            placeholder.to_html(),
            format!(
                r#"<div class="plantuml plantuml-loading" id="plantuml-1-2" data-plantuml-code="A -&gt; B"><img class="plantuml-diagram" src="https://www.plantuml.com/plantuml/svg/abc" alt="PlantUML Diagram" onload="{IMG_ONLOAD}" onerror="{IMG_ONERROR}"></div>"#
            )
        );
    }

    #[test]
    fn test_plantuml_failure_is_marked_inline() {
        let html = RenderPlaceholder::PlantUml {
            id: "plantuml-1-0".to_owned(),
            source: "A -> B".to_owned(),
            image_url: "http://127.0.0.1:9/svg/x".to_owned(),
        }
        .to_html();

        // Handlers live on the element itself, not in a script attached later.
        assert!(html.contains(r#"onerror="this.parentNode.classList.remove('plantuml-loading');this.parentNode.classList.add('plantuml-failed')""#));
        assert!(!IMG_ONERROR.contains('"'));
        assert!(!IMG_ONLOAD.contains('"'));
    }

    #[test]
    fn test_encoder_unavailable_html() {
        let placeholder = RenderPlaceholder::EncoderUnavailable {
            id: "plantuml-1-0".to_owned(),
            source: "A -> B".to_owned(),
        };
        let html = placeholder.to_html();
        assert!(html.starts_with(r#"<div class="plantuml plantuml-error" id="plantuml-1-0""#));
        assert!(html.contains("PlantUML encoder unavailable"));
        assert!(html.contains("<pre><code>A -&gt; B</code></pre>"));
        assert_eq!(placeholder.id(), "plantuml-1-0");
    }
}
