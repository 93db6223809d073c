//! Heading anchors, table of contents and document title.

use std::collections::HashMap;

/// Table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TocEntry {
    /// Heading level (1-6).
    pub level: u8,
    /// Heading text without markup.
    pub title: String,
    /// Anchor id of the rendered heading.
    pub id: String,
}

/// A heading whose content has not been closed yet.
struct OpenHeading {
    level: u8,
    text: String,
    html: String,
}

/// A finished heading, ready to be written.
pub(crate) struct ClosedHeading {
    pub(crate) level: u8,
    pub(crate) id: String,
    pub(crate) html: String,
}

/// Collects headings while the document is written.
///
/// Inline content of an open heading is buffered so the anchor id can be
/// derived from its plain text before the opening tag is emitted.
#[derive(Default)]
pub(crate) struct HeadingCollector {
    extract_title: bool,
    open: Option<OpenHeading>,
    title: Option<String>,
    toc: Vec<TocEntry>,
    anchors: HashMap<String, usize>,
}

impl HeadingCollector {
    pub(crate) fn new(extract_title: bool) -> Self {
        Self {
            extract_title,
            ..Self::default()
        }
    }

    pub(crate) fn open(&mut self, level: u8) {
        self.open = Some(OpenHeading {
            level,
            text: String::new(),
            html: String::new(),
        });
    }

    pub(crate) fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Append to the open heading: `text` feeds the anchor and TOC, `html` the output.
    pub(crate) fn push(&mut self, text: &str, html: &str) {
        if let Some(heading) = &mut self.open {
            heading.text.push_str(text);
            heading.html.push_str(html);
        }
    }

    /// Close the open heading. The first H1 becomes the title when extraction
    /// is on; every other heading lands in the TOC.
    pub(crate) fn close(&mut self) -> Option<ClosedHeading> {
        let OpenHeading { level, text, html } = self.open.take()?;
        let text = text.trim();
        let id = self.unique_anchor(text);

        if self.extract_title && level == 1 && self.title.is_none() {
            self.title = Some(text.to_owned());
        } else {
            self.toc.push(TocEntry {
                level,
                title: text.to_owned(),
                id: id.clone(),
            });
        }

        Some(ClosedHeading {
            level,
            id,
            html: html.trim().to_owned(),
        })
    }

    fn unique_anchor(&mut self, text: &str) -> String {
        let slug = slugify(text);
        let seen = self.anchors.entry(slug.clone()).or_default();
        *seen += 1;
        match *seen {
            1 => slug,
            n => format!("{slug}-{}", n - 1),
        }
    }

    pub(crate) fn finish(self) -> (Option<String>, Vec<TocEntry>) {
        (self.title, self.toc)
    }
}

/// Convert heading text to an anchor slug.
///
/// Words are split on whitespace, `-` and `_`, stripped of punctuation,
/// lowercased and joined with `-`. Non-ASCII letters are kept.
#[must_use]
pub fn slugify(text: &str) -> String {
    text.split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric())
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
