//! Event-to-HTML writer.

use std::fmt::Write;

use pulldown_cmark::{Alignment, CodeBlockKind, Event, Tag, TagEnd};

use crate::fence::{Fence, FenceHandler, parse_info_string};
use crate::heading::HeadingCollector;

/// Language class for fences without an info string.
const PLAIN_LANGUAGE: &str = "plaintext";

/// Escape text for HTML element content and attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + text.len() / 8);
    for c in text.chars() {
        let entity = match c {
            '&' => "&amp;",
            '<' => "&lt;",
            '>' => "&gt;",
            '"' => "&quot;",
            '\'' => "&#x27;",
            _ => {
                escaped.push(c);
                continue;
            }
        };
        escaped.push_str(entity);
    }
    escaped
}

/// Text that is being collected instead of written straight to the output.
enum Capture {
    Nothing,
    Code { info: String, source: String },
    ImageAlt { src: String, title: String, alt: String },
}

/// Column alignments and position inside the current table.
#[derive(Default)]
struct TableCursor {
    alignments: Vec<Alignment>,
    column: usize,
    in_head: bool,
}

impl TableCursor {
    fn cell_tag(&self) -> &'static str {
        if self.in_head { "th" } else { "td" }
    }

    fn cell_style(&self) -> &'static str {
        match self.alignments.get(self.column) {
            Some(Alignment::Left) => r#" style="text-align:left""#,
            Some(Alignment::Center) => r#" style="text-align:center""#,
            Some(Alignment::Right) => r#" style="text-align:right""#,
            Some(Alignment::None) | None => "",
        }
    }
}

/// Writes one document. Created per render call.
pub(crate) struct HtmlWriter<'h> {
    out: String,
    capture: Capture,
    table: TableCursor,
    pub(crate) headings: HeadingCollector,
    fences: Option<&'h mut (dyn FenceHandler + 'static)>,
    code_blocks: usize,
    breaks: bool,
}

impl<'h> HtmlWriter<'h> {
    pub(crate) fn new(
        headings: HeadingCollector,
        fences: Option<&'h mut (dyn FenceHandler + 'static)>,
        breaks: bool,
    ) -> Self {
        Self {
            out: String::with_capacity(4096),
            capture: Capture::Nothing,
            table: TableCursor::default(),
            headings,
            fences,
            code_blocks: 0,
            breaks,
        }
    }

    pub(crate) fn into_parts(self) -> (String, HeadingCollector) {
        (self.out, self.headings)
    }

    pub(crate) fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                self.inline(&code, &format!("<code>{}</code>", escape_html(&code)));
            }
            Event::Html(html) | Event::InlineHtml(html) => self.inline("", &html),
            Event::SoftBreak => {
                let html = if self.headings.is_open() {
                    " "
                } else if self.breaks {
                    "<br>"
                } else {
                    "\n"
                };
                self.inline(" ", html);
            }
            Event::HardBreak => self.inline(" ", "<br>"),
            Event::Rule => self.out.push_str("<hr>"),
            Event::TaskListMarker(true) => {
                self.out.push_str(r#"<input type="checkbox" checked disabled> "#);
            }
            Event::TaskListMarker(false) => {
                self.out.push_str(r#"<input type="checkbox" disabled> "#);
            }
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {}
        }
    }

    /// Route inline content: plain `text` feeds heading anchors and image alt
    /// text, `html` goes to the heading buffer or the output.
    fn inline(&mut self, text: &str, html: &str) {
        match &mut self.capture {
            Capture::Code { source, .. } => source.push_str(text),
            Capture::ImageAlt { alt, .. } => alt.push_str(text),
            Capture::Nothing if self.headings.is_open() => self.headings.push(text, html),
            Capture::Nothing => self.out.push_str(html),
        }
    }

    fn text(&mut self, text: &str) {
        if let Capture::Code { source, .. } = &mut self.capture {
            source.push_str(text);
        } else {
            self.inline(text, &escape_html(text));
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.out.push_str("<p>"),
            Tag::Heading { level, .. } => self.headings.open(level as u8),
            Tag::BlockQuote(_) => self.out.push_str("<blockquote>"),
            Tag::CodeBlock(kind) => {
                let info = match kind {
                    CodeBlockKind::Fenced(info) => info.into_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                self.capture = Capture::Code {
                    info,
                    source: String::new(),
                };
            }
            Tag::List(Some(1)) => self.out.push_str("<ol>"),
            Tag::List(Some(start)) => {
                let _ = write!(self.out, r#"<ol start="{start}">"#);
            }
            Tag::List(None) => self.out.push_str("<ul>"),
            Tag::Item => self.out.push_str("<li>"),
            Tag::Table(alignments) => {
                self.table = TableCursor {
                    alignments,
                    ..TableCursor::default()
                };
                self.out.push_str("<table>");
            }
            Tag::TableHead => {
                self.table.in_head = true;
                self.table.column = 0;
                self.out.push_str("<thead><tr>");
            }
            Tag::TableRow => {
                self.table.column = 0;
                self.out.push_str("<tr>");
            }
            Tag::TableCell => {
                let _ = write!(self.out, "<{}{}>", self.table.cell_tag(), self.table.cell_style());
            }
            Tag::Emphasis => self.inline("", "<em>"),
            Tag::Strong => self.inline("", "<strong>"),
            Tag::Strikethrough => self.inline("", "<s>"),
            Tag::Link {
                dest_url, title, ..
            } => {
                let html = if title.is_empty() {
                    format!(r#"<a href="{}">"#, escape_html(&dest_url))
                } else {
                    format!(
                        r#"<a href="{}" title="{}">"#,
                        escape_html(&dest_url),
                        escape_html(&title)
                    )
                };
                self.inline("", &html);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                self.capture = Capture::ImageAlt {
                    src: dest_url.into_string(),
                    title: title.into_string(),
                    alt: String::new(),
                };
            }
            Tag::FootnoteDefinition(_)
            | Tag::HtmlBlock
            | Tag::MetadataBlock(_)
            | Tag::DefinitionList
            | Tag::DefinitionListTitle
            | Tag::DefinitionListDefinition
            | Tag::Superscript
            | Tag::Subscript => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.out.push_str("</p>"),
            TagEnd::Heading(_) => {
                if let Some(heading) = self.headings.close() {
                    let _ = write!(
                        self.out,
                        r#"<h{level} id="{id}">{html}</h{level}>"#,
                        level = heading.level,
                        id = heading.id,
                        html = heading.html
                    );
                }
            }
            TagEnd::BlockQuote(_) => self.out.push_str("</blockquote>"),
            TagEnd::CodeBlock => {
                if let Capture::Code { info, source } =
                    std::mem::replace(&mut self.capture, Capture::Nothing)
                {
                    self.code_block(&info, &source);
                }
            }
            TagEnd::List(true) => self.out.push_str("</ol>"),
            TagEnd::List(false) => self.out.push_str("</ul>"),
            TagEnd::Item => self.out.push_str("</li>"),
            TagEnd::Table => self.out.push_str("</tbody></table>"),
            TagEnd::TableHead => {
                self.table.in_head = false;
                self.out.push_str("</tr></thead><tbody>");
            }
            TagEnd::TableRow => self.out.push_str("</tr>"),
            TagEnd::TableCell => {
                let _ = write!(self.out, "</{}>", self.table.cell_tag());
                self.table.column += 1;
            }
            TagEnd::Emphasis => self.inline("", "</em>"),
            TagEnd::Strong => self.inline("", "</strong>"),
            TagEnd::Strikethrough => self.inline("", "</s>"),
            TagEnd::Link => self.inline("", "</a>"),
            TagEnd::Image => {
                if let Capture::ImageAlt { src, title, alt } =
                    std::mem::replace(&mut self.capture, Capture::Nothing)
                {
                    let title = if title.is_empty() {
                        String::new()
                    } else {
                        format!(r#" title="{}""#, escape_html(&title))
                    };
                    let html = format!(
                        r#"<img src="{}"{title} alt="{}" loading="lazy">"#,
                        escape_html(&src),
                        escape_html(&alt)
                    );
                    self.inline(&alt, &html);
                }
            }
            TagEnd::FootnoteDefinition
            | TagEnd::HtmlBlock
            | TagEnd::MetadataBlock(_)
            | TagEnd::DefinitionList
            | TagEnd::DefinitionListTitle
            | TagEnd::DefinitionListDefinition
            | TagEnd::Superscript
            | TagEnd::Subscript => {}
        }
    }

    /// Offer a finished fence to the handler, else write a highlight-ready block.
    fn code_block(&mut self, info: &str, source: &str) {
        let index = self.code_blocks;
        self.code_blocks += 1;

        let (language, attrs) = parse_info_string(info);
        if !language.is_empty()
            && let Some(fences) = self.fences.as_deref_mut()
        {
            let fence = Fence {
                language,
                attrs: &attrs,
                source,
                index,
            };
            if let Some(html) = fences.render_fence(&fence) {
                self.out.push_str(&html);
                return;
            }
        }

        let language = if language.is_empty() { PLAIN_LANGUAGE } else { language };
        let _ = write!(
            self.out,
            r#"<pre><code class="hljs language-{}">{}</code></pre>"#,
            escape_html(language),
            escape_html(source)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html(r#""quoted""#), "&quot;quoted&quot;");
        assert_eq!(escape_html("it's"), "it&#x27;s");
        assert_eq!(escape_html("图表"), "图表");
    }

    #[test]
    fn test_table_cursor_styles() {
        let mut table = TableCursor {
            alignments: vec![Alignment::Left, Alignment::Center, Alignment::None],
            in_head: true,
            ..TableCursor::default()
        };
        assert_eq!(table.cell_tag(), "th");
        assert_eq!(table.cell_style(), r#" style="text-align:left""#);

        table.column = 1;
        assert_eq!(table.cell_style(), r#" style="text-align:center""#);

        table.column = 5;
        table.in_head = false;
        assert_eq!(table.cell_tag(), "td");
        assert_eq!(table.cell_style(), "");
    }
}
