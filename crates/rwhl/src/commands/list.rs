//! `rwhl themes` and `rwhl languages` command implementations.

use clap::Args;

use super::{HighlightArgs, build_highlighter};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the themes command.
#[derive(Args)]
pub(crate) struct ThemesArgs {
    #[command(flatten)]
    highlight: HighlightArgs,
}

impl ThemesArgs {
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let config = self.highlight.load_config(None)?;
        let themes = build_highlighter(&config).themes().await?;

        let listing: String = themes
            .iter()
            .map(|theme| {
                format!(
                    "{}\tfg {}\tbg {}\n",
                    theme.name, theme.foreground, theme.background
                )
            })
            .collect();
        Output::new().emit(None, &listing)?;
        Ok(())
    }
}

/// Arguments for the languages command.
#[derive(Args)]
pub(crate) struct LanguagesArgs {
    #[command(flatten)]
    highlight: HighlightArgs,
}

impl LanguagesArgs {
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.highlight.load_config(None)?;
        let languages = build_highlighter(&config).loaded_languages().await?;

        output.note(&format!("{} language names", languages.len()));
        output.emit(None, &languages.join("\n"))?;
        Ok(())
    }
}
