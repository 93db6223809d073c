//! Fence handler for diagram languages.
//!
//! [`DiagramProcessor`] claims Mermaid and `PlantUML` fences during rendering
//! and replaces them with placeholder containers.

use std::collections::HashMap;

use mdv_renderer::{Fence, FenceHandler};

use crate::consts::DEFAULT_PLANTUML_SERVER;
use crate::dialect::classify_dialect;
use crate::language::{DiagramBlock, DiagramFormat, DiagramLanguage};
use crate::placeholder::{RenderPlaceholder, next_render_pass, placeholder_id};
use crate::plantuml::{DeflateEncoder, SourceEncoder, encode_plantuml_source, plantuml_url};
use crate::repair::{RepairOptions, repair_diagram_source};

/// Configuration for diagram processing (immutable after setup).
struct ProcessorConfig {
    repair: RepairOptions,
    /// `PlantUML` server the image URLs point at.
    server_url: String,
    /// Format used when a fence has no valid `format` attribute.
    format: DiagramFormat,
    /// `None` renders the "encoder unavailable" state.
    encoder: Option<Box<dyn SourceEncoder>>,
}

/// Fence handler for Mermaid and `PlantUML` blocks.
///
/// Each processor is one render pass: construct a fresh processor per render
/// so placeholder ids never repeat across renders.
///
/// # Example
///
/// ```
/// use mdv_diagrams::DiagramProcessor;
/// use mdv_renderer::MarkdownRenderer;
///
/// let markdown = "```mermaid\ngraph TD\n  A[Start (here)] --> B\n```";
/// let mut renderer = MarkdownRenderer::default()
///     .with_fence_handler(DiagramProcessor::new().with_render_pass(1));
///
/// let result = renderer.render(markdown);
/// assert!(result.html.starts_with(r#"<div class="mermaid" id="mermaid-1-0">"#));
/// assert!(result.html.contains("A[&quot;Start (here)&quot;]"));
/// ```
pub struct DiagramProcessor {
    config: ProcessorConfig,
    pass: u64,
    warnings: Vec<String>,
}

impl DiagramProcessor {
    /// Create a processor with default repair options, the public `PlantUML`
    /// server and the deflate encoder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: ProcessorConfig {
                repair: RepairOptions::default(),
                server_url: DEFAULT_PLANTUML_SERVER.to_owned(),
                format: DiagramFormat::default(),
                encoder: Some(Box::new(DeflateEncoder)),
            },
            pass: next_render_pass(),
            warnings: Vec::new(),
        }
    }

    #[must_use]
    pub fn repair_options(mut self, options: RepairOptions) -> Self {
        self.config.repair = options;
        self
    }

    #[must_use]
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.config.server_url = url.into();
        self
    }

    /// Set the default `PlantUML` image format.
    #[must_use]
    pub fn format(mut self, format: DiagramFormat) -> Self {
        self.config.format = format;
        self
    }

    /// Set the `PlantUML` encoder. `None` renders the "encoder unavailable" state.
    #[must_use]
    pub fn encoder(mut self, encoder: Option<Box<dyn SourceEncoder>>) -> Self {
        self.config.encoder = encoder;
        self
    }

    /// Pin the render pass number used in placeholder ids.
    #[must_use]
    pub fn with_render_pass(mut self, pass: u64) -> Self {
        self.pass = pass;
        self
    }

    #[must_use]
    pub fn render_pass(&self) -> u64 {
        self.pass
    }

    /// Build the placeholder for one diagram block.
    pub fn placeholder(
        &mut self,
        block: &DiagramBlock,
        attrs: &HashMap<String, String>,
        index: usize,
    ) -> RenderPlaceholder {
        match block.language {
            DiagramLanguage::Mermaid => self.mermaid(block, attrs, index),
            DiagramLanguage::PlantUml => self.plantuml(block, attrs, index),
        }
    }

    fn mermaid(
        &mut self,
        block: &DiagramBlock,
        attrs: &HashMap<String, String>,
        index: usize,
    ) -> RenderPlaceholder {
        for key in attrs.keys() {
            self.warnings.push(format!(
                "diagram {index}: unknown attribute '{key}' ignored (mermaid takes no attributes)"
            ));
        }

        let dialect = classify_dialect(&block.source);
        let repaired = repair_diagram_source(dialect, &block.source, &self.config.repair);
        tracing::debug!(
            id = %block.id,
            dialect = dialect.as_str(),
            repaired = repaired != block.source,
            "Mermaid diagram"
        );

        RenderPlaceholder::Mermaid {
            id: block.id.clone(),
            source: repaired,
        }
    }

    fn plantuml(
        &mut self,
        block: &DiagramBlock,
        attrs: &HashMap<String, String>,
        index: usize,
    ) -> RenderPlaceholder {
        let default_format = self.config.format;
        let format = attrs.get("format").map_or(default_format, |value| {
            DiagramFormat::parse(value).unwrap_or_else(|| {
                self.warnings.push(format!(
                    "diagram {index}: unknown format value '{value}', using default '{}' (valid: svg, png)",
                    default_format.as_str()
                ));
                default_format
            })
        });

        for key in attrs.keys().filter(|k| *k != "format") {
            self.warnings.push(format!(
                "diagram {index}: unknown attribute '{key}' ignored (valid: format)"
            ));
        }

        let encoder = self.config.encoder.as_deref();
        tracing::debug!(
            id = %block.id,
            format = format.as_str(),
            encoder = encoder.map_or("none", |e| e.name()),
            "PlantUML diagram"
        );

        match encode_plantuml_source(&block.source, encoder) {
            Some(encoded) => RenderPlaceholder::PlantUml {
                id: block.id.clone(),
                source: block.source.clone(),
                image_url: plantuml_url(&self.config.server_url, format, &encoded),
            },
            None => {
                tracing::warn!(index, "PlantUML encoder unavailable, rendering source only");
                self.warnings.push(format!(
                    "diagram {index}: PlantUML encoder unavailable, diagram not rendered"
                ));
                RenderPlaceholder::EncoderUnavailable {
                    id: block.id.clone(),
                    source: block.source.clone(),
                }
            }
        }
    }
}

impl Default for DiagramProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl FenceHandler for DiagramProcessor {
    fn render_fence(&mut self, fence: &Fence<'_>) -> Option<String> {
        let language = DiagramLanguage::parse(fence.language)?;
        let block = DiagramBlock {
            source: fence.source.to_owned(),
            language,
            id: placeholder_id(language, self.pass, fence.index),
        };
        Some(self.placeholder(&block, fence.attrs, fence.index).to_html())
    }

    fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }
}
