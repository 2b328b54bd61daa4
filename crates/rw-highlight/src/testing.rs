//! In-memory engine for tests.
//!
//! [`StaticEngine`] tokenizes by splitting lines on spaces and marks a few
//! keywords, which is enough to exercise every formatting path without a real
//! grammar.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::engine::{EngineFactory, HighlighterConfig, TokenEngine};
use crate::error::{EngineError, HighlightError};
use crate::tokens::{FontStyle, Fragment, Line, SubToken, ThemeInfo};

/// Keywords rendered bold with [`KEYWORD_COLOR`].
pub const KEYWORDS: [&str; 3] = ["fn", "let", "pub"];

/// Color of [`KEYWORDS`].
pub const KEYWORD_COLOR: &str = "#d73a49";

/// Deterministic engine with fixed themes and languages.
#[derive(Clone, Debug)]
pub struct StaticEngine {
    themes: Vec<ThemeInfo>,
    languages: Vec<String>,
}

impl Default for StaticEngine {
    fn default() -> Self {
        Self {
            themes: vec![
                ThemeInfo {
                    name: "light".to_owned(),
                    foreground: "#24292e".to_owned(),
                    background: "#ffffff".to_owned(),
                },
                ThemeInfo {
                    name: "dark".to_owned(),
                    foreground: "#e1e4e8".to_owned(),
                    background: "#24292e".to_owned(),
                },
            ],
            languages: vec!["rust".to_owned(), "toml".to_owned()],
        }
    }
}

impl StaticEngine {
    fn tokenize_line(line: &str, language: &str) -> Line {
        let mut fragments = Vec::new();
        for (i, word) in line.split(' ').enumerate() {
            if i > 0 {
                fragments.push(Self::fragment(" ", None, FontStyle::NONE, language, None));
            }
            if word.is_empty() {
                continue;
            }
            if KEYWORDS.contains(&word) {
                fragments.push(Self::fragment(
                    word,
                    Some(KEYWORD_COLOR),
                    FontStyle::BOLD,
                    language,
                    Some("keyword.other"),
                ));
            } else {
                fragments.push(Self::fragment(word, None, FontStyle::NONE, language, None));
            }
        }
        fragments
    }

    fn fragment(
        content: &str,
        color: Option<&str>,
        font_style: FontStyle,
        language: &str,
        scope: Option<&str>,
    ) -> Fragment {
        let mut scopes = vec![format!("source.{language}")];
        scopes.extend(scope.map(str::to_owned));
        Fragment {
            content: content.to_owned(),
            color: color.map(str::to_owned),
            font_style,
            explanation: vec![SubToken {
                content: content.to_owned(),
                scopes,
            }],
        }
    }
}

impl TokenEngine for StaticEngine {
    fn loaded_languages(&self) -> Vec<String> {
        self.languages.clone()
    }

    fn theme(&self, name: &str) -> Result<ThemeInfo, HighlightError> {
        self.themes
            .iter()
            .find(|t| t.name == name)
            .cloned()
            .ok_or_else(|| HighlightError::UnknownTheme(name.to_owned()))
    }

    fn tokenize(
        &self,
        text: &str,
        language: &str,
        theme: &str,
    ) -> Result<Vec<Line>, HighlightError> {
        self.theme(theme)?;
        Ok(text
            .split('\n')
            .map(|line| Self::tokenize_line(line, language))
            .collect())
    }
}

/// Factory for [`StaticEngine`] that counts constructions.
///
/// Construction fails when the configuration names a theme the engine lacks.
#[derive(Debug, Default)]
pub struct StaticFactory {
    engine: StaticEngine,
    builds: Arc<AtomicUsize>,
}

impl StaticFactory {
    /// Factory producing the default [`StaticEngine`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared counter incremented on every successful construction.
    #[must_use]
    pub fn build_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.builds)
    }
}

impl EngineFactory for StaticFactory {
    type Engine = StaticEngine;

    async fn create(&self, config: &HighlighterConfig) -> Result<StaticEngine, EngineError> {
        for name in &config.themes {
            if self.engine.theme(name).is_err() {
                return Err(EngineError::new(format!("Unknown theme `{name}`")));
            }
        }
        self.builds.fetch_add(1, Ordering::SeqCst);
        Ok(self.engine.clone())
    }
}
