//! mdv CLI - Markdown viewer with diagram source repair.
//!
//! Provides commands for:
//! - `render`: Render markdown to HTML with Mermaid and `PlantUML` placeholders
//! - `repair`: Repair a Mermaid diagram source
//! - `classify`: Print the Mermaid dialect of a diagram source
//! - `encode`: Encode a `PlantUML` source for the image server

mod commands;
mod error;
mod output;
mod template;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ClassifyArgs, EncodeArgs, RenderArgs, RepairArgs};
use output::Output;

/// mdv - Markdown viewer with Mermaid and `PlantUML` support.
#[derive(Parser)]
#[command(name = "mdv", version, about)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a markdown document to HTML.
    Render(RenderArgs),
    /// Repair a Mermaid diagram source.
    Repair(RepairArgs),
    /// Print the Mermaid dialect of a diagram source.
    Classify(ClassifyArgs),
    /// Encode a `PlantUML` source for the image server.
    Encode(EncodeArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(&output),
        Commands::Repair(args) => args.execute(),
        Commands::Classify(args) => args.execute(),
        Commands::Encode(args) => args.execute(),
    };

    if let Err(err) = result {
        output.failed(&err);
        std::process::exit(1);
    }
}
