//! Markdown to HTML rendering for mdv.
//!
//! [`MarkdownRenderer`] walks `pulldown-cmark` events and writes an HTML
//! fragment with heading anchors, a table of contents and highlight-ready code
//! blocks. Fenced blocks are first offered to a [`FenceHandler`]; the
//! `mdv-diagrams` crate uses that hook for Mermaid and `PlantUML`.
//!
//! # Example
//!
//! ```
//! use mdv_renderer::{MarkdownRenderer, RenderOptions};
//!
//! let options = RenderOptions {
//!     extract_title: true,
//!     ..RenderOptions::default()
//! };
//! let result = MarkdownRenderer::new(options).render("# Hello\n\n**Bold** text");
//! assert_eq!(result.title.as_deref(), Some("Hello"));
//! assert!(result.html.ends_with("<p><strong>Bold</strong> text</p>"));
//! ```

mod fence;
mod heading;
mod html;
mod renderer;

pub use fence::{Fence, FenceHandler};
pub use heading::{TocEntry, slugify};
pub use html::escape_html;
pub use renderer::{MarkdownRenderer, RenderOptions, RenderResult};
