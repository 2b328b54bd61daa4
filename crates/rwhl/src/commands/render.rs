//! `rwhl render` command implementation.

use std::path::PathBuf;

use clap::Args;
use rw_highlight_markdown::MarkdownRenderer;

use super::{HighlightArgs, build_highlighter, read_input};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file to render (`-` for stdin).
    input: PathBuf,

    /// Output file (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Disable GitHub Flavored Markdown extensions.
    #[arg(long)]
    no_gfm: bool,

    #[command(flatten)]
    highlight: HighlightArgs,
}

impl RenderArgs {
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.highlight.load_config(self.no_gfm.then_some(false))?;
        let markdown = read_input(Some(&self.input))?;

        let highlighter = build_highlighter(&config);
        let result = MarkdownRenderer::new(&highlighter)
            .with_gfm(config.markdown.gfm)
            .render(&markdown)
            .await?;

        output.note(&format!("Highlighted {} code block(s)", result.code_blocks));
        output.emit(self.output.as_deref(), &result.html)?;
        Ok(())
    }
}
