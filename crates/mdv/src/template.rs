//! Standalone HTML page for rendered documents.
//!
//! The page loads Mermaid and highlight.js from a CDN. After load it draws
//! every `.mermaid` container and highlights code blocks. A `PlantUML` image
//! that fails to load, before or after the page script runs, is swapped for
//! an error block showing its source.

use std::fmt::Write;

use mdv_renderer::{TocEntry, escape_html};

const MERMAID_SCRIPT: &str = "https://cdn.jsdelivr.net/npm/mermaid@10/dist/mermaid.min.js";
const HIGHLIGHT_SCRIPT: &str =
    "https://cdn.jsdelivr.net/gh/highlightjs/cdn-release@11/build/highlight.min.js";
const HIGHLIGHT_STYLE: &str =
    "https://cdn.jsdelivr.net/gh/highlightjs/cdn-release@11/build/styles/github.min.css";

const PAGE_STYLE: &str = "\
body { max-width: 960px; margin: 0 auto; padding: 2rem 1rem; font-family: system-ui, sans-serif; line-height: 1.6; }
nav.toc { border-left: 3px solid #ddd; padding-left: 1rem; margin-bottom: 2rem; }
nav.toc ul { list-style: none; padding-left: 0; }
.mermaid, .plantuml { margin: 1rem 0; text-align: center; }
.plantuml img { max-width: 100%; }
.plantuml-loading { min-height: 3rem; background: #f6f8fa; }
.plantuml-error { text-align: left; border: 1px solid #e5a0a0; background: #fff5f5; padding: 0.75rem; }
.diagram-error-message { color: #b42318; margin: 0 0 0.5rem; }
";

const PAGE_SCRIPT: &str = r#"
function showPlantumlFailure(container) {
  if (!container || !container.parentNode) {
    return;
  }
  var error = document.createElement('div');
  error.className = 'plantuml plantuml-error';
  error.id = container.id;
  var message = document.createElement('p');
  message.className = 'diagram-error-message';
  message.textContent = 'PlantUML render failed';
  var details = document.createElement('details');
  var summary = document.createElement('summary');
  summary.textContent = 'Source';
  var pre = document.createElement('pre');
  var code = document.createElement('code');
  code.textContent = container.getAttribute('data-plantuml-code') || '';
  pre.appendChild(code);
  details.appendChild(summary);
  details.appendChild(pre);
  error.appendChild(message);
  error.appendChild(details);
  container.replaceWith(error);
}

document.addEventListener('error', function (event) {
  var target = event.target;
  if (target.classList && target.classList.contains('plantuml-diagram')) {
    showPlantumlFailure(target.closest('.plantuml'));
  }
}, true);

document.querySelectorAll('.plantuml-failed').forEach(showPlantumlFailure);

document.addEventListener('DOMContentLoaded', function () {
  document.querySelectorAll('pre code').forEach(function (block) {
    if (!block.closest('.plantuml-error')) {
      hljs.highlightElement(block);
    }
  });

  mermaid.initialize({
    startOnLoad: false,
    theme: 'default',
    securityLevel: 'loose',
    flowchart: { useMaxWidth: true, htmlLabels: true, curve: 'basis' },
    sequence: { useMaxWidth: true, wrap: true }
  });
  mermaid.run({ nodes: document.querySelectorAll('.mermaid') });
});
"#;

/// Data needed to render a standalone page.
pub(crate) struct PageData<'a> {
    pub(crate) title: &'a str,
    pub(crate) content: &'a str,
    pub(crate) toc: &'a [TocEntry],
}

/// Render a complete standalone HTML page.
pub(crate) fn render_page(page: &PageData<'_>) -> String {
    let mut html = String::with_capacity(page.content.len() + 4096);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(html, "<title>{}</title>", escape_html(page.title));
    let _ = writeln!(html, "<link rel=\"stylesheet\" href=\"{HIGHLIGHT_STYLE}\">");
    let _ = writeln!(html, "<style>\n{PAGE_STYLE}</style>");
    let _ = writeln!(html, "<script src=\"{MERMAID_SCRIPT}\"></script>");
    let _ = writeln!(html, "<script src=\"{HIGHLIGHT_SCRIPT}\"></script>");
    html.push_str("</head>\n<body>\n");

    render_toc(&mut html, page.toc);

    html.push_str("<article class=\"markdown-body\">\n");
    html.push_str(page.content);
    if !page.content.ends_with('\n') {
        html.push('\n');
    }
    html.push_str("</article>\n");

    let _ = writeln!(html, "<script>{PAGE_SCRIPT}</script>");
    html.push_str("</body>\n</html>\n");
    html
}

fn render_toc(html: &mut String, toc: &[TocEntry]) {
    if toc.is_empty() {
        return;
    }

    html.push_str("<nav class=\"toc\">\n<ul>\n");
    for entry in toc {
        let indent = usize::from(entry.level.saturating_sub(2));
        let _ = writeln!(
            html,
            "<li style=\"margin-left: {}rem\"><a href=\"#{}\">{}</a></li>",
            indent,
            escape_html(&entry.id),
            escape_html(&entry.title)
        );
    }
    html.push_str("</ul>\n</nav>\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toc_entry(level: u8, title: &str, id: &str) -> TocEntry {
        TocEntry {
            level,
            title: title.to_owned(),
            id: id.to_owned(),
        }
    }

    #[test]
    fn test_render_page_escapes_title() {
        let html = render_page(&PageData {
            title: "Tom & Jerry <3",
            content: "<p>hi</p>",
            toc: &[],
        });

        assert!(html.contains("<title>Tom &amp; Jerry &lt;3</title>"));
        assert!(html.contains("<article class=\"markdown-body\">\n<p>hi</p>\n</article>"));
        assert!(!html.contains("<nav class=\"toc\">"));
    }

    #[test]
    fn test_render_page_loads_diagram_scripts() {
        let html = render_page(&PageData {
            title: "Doc",
            content: "",
            toc: &[],
        });

        assert!(html.contains(MERMAID_SCRIPT));
        assert!(html.contains(HIGHLIGHT_SCRIPT));
        assert!(html.contains("securityLevel: 'loose'"));
        assert!(html.contains("mermaid.run({ nodes: document.querySelectorAll('.mermaid') })"));
        assert!(html.contains("hljs.highlightElement(block)"));
        assert!(html.contains("PlantUML render failed"));
        assert!(html.ends_with("</html>\n"));
    }

    #[test]
    fn test_render_page_handles_early_plantuml_failures() {
        let html = render_page(&PageData {
            title: "Doc",
            content: r#"<div class="plantuml plantuml-failed" id="plantuml-1-0"></div>"#,
            toc: &[],
        });

        let article = html.find("<article").unwrap();
        let script = html.find(PAGE_SCRIPT).unwrap();
        assert!(article < script);
        assert!(PAGE_SCRIPT.contains("document.querySelectorAll('.plantuml-failed').forEach(showPlantumlFailure)"));
        assert!(PAGE_SCRIPT.contains("document.addEventListener('error', function (event) {"));
        assert!(PAGE_STYLE.contains(".plantuml-loading"));
    }

    #[test]
    fn test_render_toc_links() {
        let toc = [
            toc_entry(2, "Setup", "setup"),
            toc_entry(3, "A & B", "a-b"),
        ];
        let html = render_page(&PageData {
            title: "Doc",
            content: "",
            toc: &toc,
        });

        assert!(html.contains("<li style=\"margin-left: 0rem\"><a href=\"#setup\">Setup</a></li>"));
        assert!(html.contains("<li style=\"margin-left: 1rem\"><a href=\"#a-b\">A &amp; B</a></li>"));
    }
}
