//! Error types.

use std::error::Error as StdError;

/// Highlighting error.
///
/// Only engine-level failures surface here. Malformed directives and unknown
/// languages are logged and handled in place.
#[derive(Debug, thiserror::Error)]
pub enum HighlightError {
    /// Engine could not be constructed.
    #[error("Failed to create highlighting engine: {0}")]
    Engine(#[from] EngineError),
    /// Configured theme is not available in the engine.
    #[error("Unknown theme: {0}")]
    UnknownTheme(String),
    /// Engine failed while tokenizing a block.
    #[error("Failed to tokenize {language} code block: {message}")]
    Tokenize {
        /// Language of the block.
        language: String,
        /// Engine error message.
        message: String,
    },
}

/// Engine construction failure.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct EngineError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl EngineError {
    /// Create an error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create an error wrapping an underlying cause.
    pub fn with_source(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
