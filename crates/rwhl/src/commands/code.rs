//! `rwhl code` command implementation.

use std::path::PathBuf;

use clap::Args;
use rw_highlight::{DirectiveConfig, render_html};

use super::{HighlightArgs, build_highlighter, read_input};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the code command.
#[derive(Args)]
pub(crate) struct CodeArgs {
    /// Source file to highlight (default: stdin).
    input: Option<PathBuf>,

    /// Language of the code (default: plain text).
    #[arg(short, long)]
    lang: Option<String>,

    /// Directive string, e.g. "highlight=1 hide=0".
    #[arg(short, long, default_value = "")]
    meta: String,

    /// Render only this line, without block chrome.
    #[arg(long)]
    inline: Option<usize>,

    /// Output file (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    highlight: HighlightArgs,
}

impl CodeArgs {
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let config = self.highlight.load_config(None)?;
        let input = read_input(self.input.as_deref())?;
        let text = input.strip_suffix('\n').unwrap_or(&input);

        let mut directive = DirectiveConfig::parse(&self.meta);
        if let Some(line) = self.inline {
            directive = directive.with_inline(line);
        }

        let roots = build_highlighter(&config)
            .highlight(text, self.lang.as_deref(), &directive)
            .await?;

        Output::new().emit(self.output.as_deref(), &render_html(&roots))?;
        Ok(())
    }
}
