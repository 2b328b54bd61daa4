//! rwhl CLI - Code block highlighter.
//!
//! Provides commands for:
//! - `render`: Render a markdown file with highlighted code blocks
//! - `code`: Highlight a single code block
//! - `themes`: List the configured themes
//! - `languages`: List the languages the engine can highlight

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CodeArgs, LanguagesArgs, RenderArgs, ThemesArgs};
use output::Output;

/// rwhl - Code block highlighter.
#[derive(Parser)]
#[command(name = "rwhl", version, about)]
struct Cli {
    /// Enable verbose output (engine construction and directive warnings).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render markdown to HTML with highlighted code blocks.
    Render(RenderArgs),
    /// Highlight a single code block.
    Code(CodeArgs),
    /// List configured themes.
    Themes(ThemesArgs),
    /// List highlightable languages.
    Languages(LanguagesArgs),
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

    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    let result = rt.block_on(async {
        match cli.command {
            Commands::Render(args) => args.execute().await,
            Commands::Code(args) => args.execute().await,
            Commands::Themes(args) => args.execute().await,
            Commands::Languages(args) => args.execute().await,
        }
    });

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
