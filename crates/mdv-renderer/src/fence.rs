//! Hook for fenced code blocks that need custom HTML.
//!
//! The renderer knows nothing about diagrams; the `mdv-diagrams` crate
//! registers a [`FenceHandler`] that claims `mermaid` and `plantuml` fences.

use std::collections::HashMap;

/// A fenced code block as seen by a [`FenceHandler`].
#[derive(Debug, Clone, Copy)]
pub struct Fence<'a> {
    /// First word of the info string (`mermaid` in "```mermaid").
    pub language: &'a str,
    /// `key=value` pairs following the language.
    pub attrs: &'a HashMap<String, String>,
    /// Block content, including its trailing newline.
    pub source: &'a str,
    /// Zero-based position among all code blocks of the document.
    pub index: usize,
}

/// Replaces selected fenced code blocks with custom HTML.
///
/// # Example
///
/// ```
/// use mdv_renderer::{Fence, FenceHandler, MarkdownRenderer, RenderOptions};
///
/// struct Shout;
///
/// impl FenceHandler for Shout {
///     fn render_fence(&mut self, fence: &Fence<'_>) -> Option<String> {
///         (fence.language == "shout").then(|| format!("<p>{}</p>", fence.source.trim().to_uppercase()))
///     }
/// }
///
/// let mut renderer = MarkdownRenderer::new(RenderOptions::default()).with_fence_handler(Shout);
/// assert_eq!(renderer.render("```shout\nhi\n```").html, "<p>HI</p>");
/// ```
pub trait FenceHandler {
    /// HTML replacing `fence`, or `None` to render it as a plain code block.
    fn render_fence(&mut self, fence: &Fence<'_>) -> Option<String>;

    /// Drain the warnings collected so far.
    fn take_warnings(&mut self) -> Vec<String> {
        Vec::new()
    }
}

/// Split a fence info string into its language and `key=value` attributes.
///
/// Quotes around values are dropped; bare words after the language are ignored.
pub(crate) fn parse_info_string(info: &str) -> (&str, HashMap<String, String>) {
    let mut words = info.split_whitespace();
    let language = words.next().unwrap_or_default();
    let attrs = words
        .filter_map(|word| word.split_once('='))
        .map(|(key, value)| (key.to_owned(), value.trim_matches(['"', '\'']).to_owned()))
        .collect();
    (language, attrs)
}
