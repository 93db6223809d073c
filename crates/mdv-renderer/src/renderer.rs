//! Markdown to HTML rendering.

use pulldown_cmark::{Options, Parser};

use crate::fence::FenceHandler;
use crate::heading::{HeadingCollector, TocEntry};
use crate::html::HtmlWriter;

/// Markdown features toggled per render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Tables, strikethrough and task lists.
    pub gfm: bool,
    /// Render soft line breaks as `<br>`.
    pub breaks: bool,
    /// Report the first H1 as the document title instead of a TOC entry.
    pub extract_title: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            gfm: true,
            breaks: false,
            extract_title: false,
        }
    }
}

impl RenderOptions {
    fn parser_options(self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM
        } else {
            Options::empty()
        }
    }
}

/// Result of rendering markdown.
#[derive(Clone, Debug)]
pub struct RenderResult {
    /// Rendered HTML content.
    pub html: String,
    /// First H1 heading, when title extraction is on.
    pub title: Option<String>,
    /// Table of contents entries.
    pub toc: Vec<TocEntry>,
    /// Warnings reported by the fence handler.
    pub warnings: Vec<String>,
}

/// Markdown renderer producing HTML fragments.
///
/// Fenced code blocks go to the registered [`FenceHandler`] first; blocks it
/// declines become `<pre><code class="hljs language-…">` for highlighting in
/// the page.
pub struct MarkdownRenderer {
    options: RenderOptions,
    fences: Option<Box<dyn FenceHandler>>,
}

impl MarkdownRenderer {
    #[must_use]
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            fences: None,
        }
    }

    /// Register the handler offered every fenced code block.
    #[must_use]
    pub fn with_fence_handler<H: FenceHandler + 'static>(mut self, handler: H) -> Self {
        self.fences = Some(Box::new(handler));
        self
    }

    /// Render `markdown` to an HTML fragment.
    pub fn render(&mut self, markdown: &str) -> RenderResult {
        let parser = Parser::new_ext(markdown, self.options.parser_options());
        let headings = HeadingCollector::new(self.options.extract_title);

        let mut writer = HtmlWriter::new(headings, self.fences.as_deref_mut(), self.options.breaks);
        for event in parser {
            writer.event(event);
        }
        let (html, headings) = writer.into_parts();
        let (title, toc) = headings.finish();

        let warnings = self
            .fences
            .as_mut()
            .map(|fences| fences.take_warnings())
            .unwrap_or_default();

        RenderResult {
            html,
            title,
            toc,
            warnings,
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fence::Fence;
    use pretty_assertions::assert_eq;

    fn render_html(markdown: &str) -> RenderResult {
        MarkdownRenderer::default().render(markdown)
    }

    #[test]
    fn test_paragraph() {
        assert_eq!(render_html("Tom & Jerry").html, "<p>Tom &amp; Jerry</p>");
    }

    #[test]
    fn test_heading_anchor_and_toc() {
        let result = render_html("## Section *Title*");
        assert_eq!(
            result.html,
            r#"<h2 id="section-title">Section <em>Title</em></h2>"#
        );
        assert_eq!(
            result.toc,
            vec![TocEntry {
                level: 2,
                title: "Section Title".to_owned(),
                id: "section-title".to_owned(),
            }]
        );
    }

    #[test]
    fn test_title_extraction() {
        let mut renderer = MarkdownRenderer::new(RenderOptions {
            extract_title: true,
            ..RenderOptions::default()
        });
        let result = renderer.render("# My Title\n\nSome content\n\n## Section");

        assert_eq!(result.title.as_deref(), Some("My Title"));
        assert!(result.html.starts_with(r#"<h1 id="my-title">My Title</h1>"#));
        assert_eq!(result.toc.len(), 1);
        assert_eq!(result.toc[0].level, 2);
    }

    #[test]
    fn test_heading_with_inline_code() {
        let result = render_html("## Install `npm`");
        assert_eq!(result.html, r#"<h2 id="install-npm">Install <code>npm</code></h2>"#);
        assert_eq!(result.toc[0].title, "Install npm");
    }

    #[test]
    fn test_code_blocks_are_highlight_ready() {
        let result = render_html("```rust\nfn main() {}\n```\n\n```\n<b>\n```\n\n    indented\n");
        assert_eq!(
            result.html,
            concat!(
                r#"<pre><code class="hljs language-rust">fn main() {}"#,
                "\n</code></pre>",
                r#"<pre><code class="hljs language-plaintext">&lt;b&gt;"#,
                "\n</code></pre>",
                r#"<pre><code class="hljs language-plaintext">indented"#,
                "\n</code></pre>"
            )
        );
    }

    #[test]
    fn test_blockquote_and_rule() {
        assert_eq!(
            render_html("> Note\n\n---").html,
            "<blockquote><p>Note</p></blockquote><hr>"
        );
    }

    #[test]
    fn test_table_alignment() {
        let result = render_html("| A | B |\n|:--|--:|\n| 1 | 2 |");
        assert_eq!(
            result.html,
            concat!(
                r#"<table><thead><tr><th style="text-align:left">A</th><th style="text-align:right">B</th></tr></thead>"#,
                r#"<tbody><tr><td style="text-align:left">1</td><td style="text-align:right">2</td></tr></tbody></table>"#
            )
        );
    }

    #[test]
    fn test_link_and_image() {
        let result = render_html(r#"[Link](https://example.com "Home") ![An *alt*](img.png)"#);
        assert_eq!(
            result.html,
            r#"<p><a href="https://example.com" title="Home">Link</a> <img src="img.png" alt="An alt" loading="lazy"></p>"#
        );
    }

    #[test]
    fn test_lists() {
        assert_eq!(
            render_html("- Item 1\n- Item 2").html,
            "<ul><li>Item 1</li><li>Item 2</li></ul>"
        );
        assert!(render_html("3. Third\n4. Fourth").html.starts_with(r#"<ol start="3">"#));
    }

    #[test]
    fn test_task_list() {
        let result = render_html("- [ ] Open\n- [x] Done");
        assert_eq!(
            result.html,
            r#"<ul><li><input type="checkbox" disabled> Open</li><li><input type="checkbox" checked disabled> Done</li></ul>"#
        );
    }

    #[test]
    fn test_soft_breaks() {
        assert_eq!(render_html("one\ntwo").html, "<p>one\ntwo</p>");

        let mut renderer = MarkdownRenderer::new(RenderOptions {
            breaks: true,
            ..RenderOptions::default()
        });
        assert_eq!(renderer.render("one\ntwo").html, "<p>one<br>two</p>");
    }

    #[test]
    fn test_gfm_disabled() {
        let mut renderer = MarkdownRenderer::new(RenderOptions {
            gfm: false,
            ..RenderOptions::default()
        });
        let result = renderer.render("| A | B |\n|---|---|\n| 1 | 2 |\n\n~~gone~~");
        assert!(!result.html.contains("<table>"));
        assert!(!result.html.contains("<s>"));
    }

    struct Boxes {
        warnings: Vec<String>,
    }

    impl FenceHandler for Boxes {
        fn render_fence(&mut self, fence: &Fence<'_>) -> Option<String> {
            if fence.language != "box" {
                return None;
            }
            if let Some(color) = fence.attrs.get("color") {
                self.warnings.push(format!("box {}: color {color}", fence.index));
            }
            Some(format!(r#"<div id="box-{}">{}</div>"#, fence.index, fence.source.trim()))
        }

        fn take_warnings(&mut self) -> Vec<String> {
            std::mem::take(&mut self.warnings)
        }
    }

    fn boxes() -> MarkdownRenderer {
        MarkdownRenderer::default().with_fence_handler(Boxes {
            warnings: Vec::new(),
        })
    }

    #[test]
    fn test_fence_handler_claims_block() {
        let result = boxes().render("```box color=red\nA\n```");
        assert_eq!(result.html, r#"<div id="box-0">A</div>"#);
        assert_eq!(result.warnings, vec!["box 0: color red".to_owned()]);
    }

    #[test]
    fn test_fence_handler_declines_block() {
        let result = boxes().render("```rust\nx\n```");
        assert_eq!(
            result.html,
            "<pre><code class=\"hljs language-rust\">x\n</code></pre>"
        );
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_fence_index_counts_every_code_block() {
        let result = boxes().render("```box\nA\n```\n\n```rust\nx\n```\n\n```box\nB\n```");
        assert!(result.html.starts_with(r#"<div id="box-0">A</div>"#));
        assert!(result.html.ends_with(r#"<div id="box-2">B</div>"#));
    }

    #[test]
    fn test_warnings_do_not_leak_between_renders() {
        let mut renderer = boxes();
        assert_eq!(renderer.render("```box color=red\nA\n```").warnings.len(), 1);
        assert!(renderer.render("```box\nA\n```").warnings.is_empty());
    }
}
