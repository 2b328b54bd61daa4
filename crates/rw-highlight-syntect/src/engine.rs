//! [`TokenEngine`] implementation over `syntect` syntax and theme sets.

use std::path::PathBuf;

use rw_highlight::{
    EngineError, EngineFactory, FontStyle, Fragment, HighlightError, HighlighterConfig, Line,
    SubToken, ThemeInfo, TokenEngine,
};
use syntect::highlighting::{self, Color, Highlighter, Theme, ThemeSet};
use syntect::parsing::{ParseState, ScopeStack, SyntaxSet};

const FALLBACK_FOREGROUND: &str = "#000000";
const FALLBACK_BACKGROUND: &str = "#ffffff";

/// Format a syntect color as `#rrggbb`, or `#rrggbbaa` when not opaque.
fn hex(color: Color) -> String {
    if color.a == 0xff {
        format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
    } else {
        format!("#{:02x}{:02x}{:02x}{:02x}", color.r, color.g, color.b, color.a)
    }
}

fn font_style(style: highlighting::FontStyle) -> FontStyle {
    let mut bits = FontStyle::NONE;
    if style.contains(highlighting::FontStyle::ITALIC) {
        bits |= FontStyle::ITALIC;
    }
    if style.contains(highlighting::FontStyle::BOLD) {
        bits |= FontStyle::BOLD;
    }
    if style.contains(highlighting::FontStyle::UNDERLINE) {
        bits |= FontStyle::UNDERLINE;
    }
    bits
}

/// Tokenizing engine backed by syntect.
///
/// Holds only the themes named in its configuration.
pub struct SyntectEngine {
    syntaxes: SyntaxSet,
    themes: Vec<(String, Theme)>,
}

impl SyntectEngine {
    /// Build an engine from loaded sets, keeping only `theme_names`.
    ///
    /// # Errors
    ///
    /// Fails when a configured theme is not in `theme_set`.
    pub fn new(
        syntaxes: SyntaxSet,
        mut theme_set: ThemeSet,
        theme_names: &[String],
    ) -> Result<Self, EngineError> {
        let mut themes = Vec::with_capacity(theme_names.len());
        for name in theme_names {
            let theme = theme_set.themes.remove(name).ok_or_else(|| {
                let mut available: Vec<&str> =
                    theme_set.themes.keys().map(String::as_str).collect();
                available.sort_unstable();
                EngineError::new(format!(
                    "Unknown theme `{name}` (available: {})",
                    available.join(", ")
                ))
            })?;
            themes.push((name.clone(), theme));
        }
        Ok(Self { syntaxes, themes })
    }

    fn lookup_theme(&self, name: &str) -> Result<&Theme, HighlightError> {
        self.themes
            .iter()
            .find(|(theme_name, _)| theme_name == name)
            .map(|(_, theme)| theme)
            .ok_or_else(|| HighlightError::UnknownTheme(name.to_owned()))
    }

    fn tokenize_error(language: &str, message: String) -> HighlightError {
        HighlightError::Tokenize {
            language: language.to_owned(),
            message,
        }
    }
}

impl TokenEngine for SyntectEngine {
    fn loaded_languages(&self) -> Vec<String> {
        let mut languages = Vec::new();
        for syntax in self.syntaxes.syntaxes() {
            languages.push(syntax.name.to_lowercase());
            languages.extend(syntax.file_extensions.iter().cloned());
        }
        languages
    }

    fn has_language(&self, language: &str) -> bool {
        self.syntaxes.find_syntax_by_token(language).is_some()
    }

    fn theme(&self, name: &str) -> Result<ThemeInfo, HighlightError> {
        let theme = self.lookup_theme(name)?;
        Ok(ThemeInfo {
            name: name.to_owned(),
            foreground: theme
                .settings
                .foreground
                .map_or_else(|| FALLBACK_FOREGROUND.to_owned(), hex),
            background: theme
                .settings
                .background
                .map_or_else(|| FALLBACK_BACKGROUND.to_owned(), hex),
        })
    }

    fn tokenize(
        &self,
        text: &str,
        language: &str,
        theme: &str,
    ) -> Result<Vec<Line>, HighlightError> {
        let syntax = self
            .syntaxes
            .find_syntax_by_token(language)
            .ok_or_else(|| Self::tokenize_error(language, "no syntax definition".to_owned()))?;
        let highlighter = Highlighter::new(self.lookup_theme(theme)?);

        let mut parse_state = ParseState::new(syntax);
        let mut stack = ScopeStack::new();
        let mut lines = Vec::new();

        for raw in text.split('\n') {
            let content = raw.strip_suffix('\r').unwrap_or(raw);
            // Newline-aware syntaxes expect every line to end with `\n`.
            let ops = parse_state
                .parse_line(&format!("{content}\n"), &self.syntaxes)
                .map_err(|e| Self::tokenize_error(language, e.to_string()))?;

            let mut fragments: Line = Vec::new();
            let mut pos = 0;
            for (index, op) in ops {
                let index = index.min(content.len());
                if index > pos {
                    push_fragment(&mut fragments, &content[pos..index], &stack, &highlighter);
                    pos = index;
                }
                stack
                    .apply(&op)
                    .map_err(|e| Self::tokenize_error(language, format!("{e:?}")))?;
            }
            if pos < content.len() {
                push_fragment(&mut fragments, &content[pos..], &stack, &highlighter);
            }
            lines.push(fragments);
        }

        Ok(lines)
    }
}

/// Append a styled fragment, merging it into the previous one when the style matches.
fn push_fragment(line: &mut Line, text: &str, stack: &ScopeStack, highlighter: &Highlighter<'_>) {
    let style = highlighter.style_for_stack(stack.as_slice());
    let color = Some(hex(style.foreground));
    let font_style = font_style(style.font_style);
    let sub_token = SubToken {
        content: text.to_owned(),
        scopes: stack.as_slice().iter().map(|scope| scope.build_string()).collect(),
    };

    if let Some(last) = line.last_mut()
        && last.color == color
        && last.font_style == font_style
    {
        last.content.push_str(text);
        last.explanation.push(sub_token);
        return;
    }

    line.push(Fragment {
        content: text.to_owned(),
        color,
        font_style,
        explanation: vec![sub_token],
    });
}

/// Builds [`SyntectEngine`]s from syntect's bundled syntaxes and themes.
///
/// Loading runs on the blocking thread pool.
#[derive(Debug, Default, Clone)]
pub struct SyntectFactory {
    theme_dirs: Vec<PathBuf>,
}

impl SyntectFactory {
    /// Factory using only the bundled themes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Also load `.tmTheme` files from `dir`. Themes are keyed by file stem.
    #[must_use]
    pub fn with_theme_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.theme_dirs.push(dir.into());
        self
    }

    fn load(
        theme_dirs: &[PathBuf],
        config: &HighlighterConfig,
    ) -> Result<SyntectEngine, EngineError> {
        let syntaxes = SyntaxSet::load_defaults_newlines();
        let mut theme_set = ThemeSet::load_defaults();
        for dir in theme_dirs {
            theme_set.add_from_folder(dir).map_err(|e| {
                let message = format!("Failed to load themes from {}", dir.display());
                EngineError::with_source(message, e)
            })?;
        }
        SyntectEngine::new(syntaxes, theme_set, &config.themes)
    }
}

impl EngineFactory for SyntectFactory {
    type Engine = SyntectEngine;

    async fn create(&self, config: &HighlighterConfig) -> Result<SyntectEngine, EngineError> {
        let theme_dirs = self.theme_dirs.clone();
        let config = config.clone();
        let engine = tokio::task::spawn_blocking(move || Self::load(&theme_dirs, &config))
            .await
            .map_err(|e| EngineError::with_source("Engine construction task failed", e))??;
        tracing::debug!(
            syntaxes = engine.syntaxes.syntaxes().len(),
            themes = engine.themes.len(),
            "Loaded syntect engine"
        );
        Ok(engine)
    }
}
