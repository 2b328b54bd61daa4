//! CLI error types.

use rw_highlight::HighlightError;
use rw_highlight_config::ConfigError;
use rw_highlight_markdown::RenderError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Highlight(#[from] HighlightError),

    #[error("{0}")]
    Render(#[from] RenderError),
}
