//! Render command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use mdv_config::{CliSettings, Config};
use mdv_diagrams::DiagramProcessor;
use mdv_renderer::{MarkdownRenderer, RenderOptions, RenderResult};

use super::{
    EncodingArg, FormatArg, diagram_format, read_input, repair_options, source_encoder,
    write_output,
};
use crate::error::CliError;
use crate::output::Output;
use crate::template::{PageData, render_page};

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file to render (stdin when omitted or `-`).
    input: Option<PathBuf>,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Wrap the rendered HTML in a standalone page.
    #[arg(long)]
    standalone: bool,

    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// `PlantUML` server URL (overrides config).
    #[arg(long, env = "MDV_PLANTUML_SERVER")]
    plantuml_server: Option<String>,

    /// `PlantUML` image format (overrides config).
    #[arg(long, value_enum)]
    plantuml_format: Option<FormatArg>,

    /// `PlantUML` source encoding (overrides config).
    #[arg(long, value_enum)]
    plantuml_encoding: Option<EncodingArg>,

    /// Leave Mermaid sources unrepaired.
    #[arg(long)]
    no_repair: bool,

    /// Keep soft line breaks as plain newlines.
    #[arg(long)]
    no_breaks: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading fails or the input/output
    /// files cannot be accessed.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            plantuml_server_url: self.plantuml_server,
            plantuml_format: self.plantuml_format.map(Into::into),
            plantuml_encoding: self.plantuml_encoding.map(Into::into),
            repair_enabled: self.no_repair.then_some(false),
            breaks: self.no_breaks.then_some(false),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let markdown = read_input(self.input.as_deref())?;
        let result = render_document(&markdown, &config);

        output.diagram_warnings(&result.warnings);

        let html = if self.standalone {
            let title = result
                .title
                .clone()
                .unwrap_or_else(|| fallback_title(self.input.as_deref()));
            render_page(&PageData {
                title: &title,
                content: &result.html,
                toc: &result.toc,
            })
        } else {
            result.html
        };

        write_output(self.output.as_deref(), &html)?;
        if let Some(path) = &self.output {
            output.rendered(path);
        }

        Ok(())
    }
}

/// Render `markdown` with a fresh diagram processor built from `config`.
pub(crate) fn render_document(markdown: &str, config: &Config) -> RenderResult {
    let processor = DiagramProcessor::new()
        .repair_options(repair_options(config))
        .server_url(&config.plantuml.server_url)
        .format(diagram_format(config.plantuml.format))
        .encoder(source_encoder(config.plantuml.encoding));

    let mut renderer = MarkdownRenderer::new(RenderOptions {
        gfm: config.markdown.gfm,
        breaks: config.markdown.breaks,
        extract_title: config.markdown.extract_title,
    })
    .with_fence_handler(processor);

    tracing::info!(
        bytes = markdown.len(),
        repair = config.mermaid.repair,
        "Rendering markdown"
    );
    renderer.render(markdown)
}

/// Page title when the document has no H1: the file stem, or a generic name for stdin.
fn fallback_title(input: Option<&Path>) -> String {
    input
        .filter(|path| *path != Path::new("-"))
        .and_then(Path::file_stem)
        .map_or_else(|| "Untitled".to_owned(), |stem| stem.to_string_lossy().into_owned())
}
