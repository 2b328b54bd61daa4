//! CLI command implementations.

mod code;
mod list;
mod render;

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Args;
use rw_highlight::Highlighter;
use rw_highlight_config::{CliSettings, Config};
use rw_highlight_syntect::SyntectFactory;

use crate::error::CliError;

pub(crate) use code::CodeArgs;
pub(crate) use list::{LanguagesArgs, ThemesArgs};
pub(crate) use render::RenderArgs;

/// Options shared by every command that builds a highlighter.
#[derive(Args)]
pub(crate) struct HighlightArgs {
    /// Path to configuration file (default: auto-discover rw-highlight.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Theme to render, repeatable (overrides config).
    #[arg(long = "theme")]
    themes: Vec<String>,

    /// Directory with extra .tmTheme files (overrides config).
    #[arg(long)]
    theme_dir: Option<PathBuf>,
}

impl HighlightArgs {
    /// Load configuration with these arguments applied.
    fn load_config(&self, gfm: Option<bool>) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            themes: (!self.themes.is_empty()).then(|| self.themes.clone()),
            theme_dir: self.theme_dir.clone(),
            gfm,
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }
}

/// Build a syntect-backed highlighter for `config`.
fn build_highlighter(config: &Config) -> Highlighter<SyntectFactory> {
    let mut factory = SyntectFactory::new();
    if let Some(dir) = &config.highlight.theme_dir {
        factory = factory.with_theme_dir(dir);
    }
    Highlighter::with_config(factory, config.highlighter_config())
}

/// Read `path`, or stdin when it is absent or `-`.
fn read_input(path: Option<&Path>) -> Result<String, CliError> {
    match path {
        Some(path) if path != Path::new("-") => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut input = String::new();
            std::io::stdin().lock().read_to_string(&mut input)?;
            Ok(input)
        }
    }
}
