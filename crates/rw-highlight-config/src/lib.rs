//! Configuration management for rw-highlight.
//!
//! Parses `rw-highlight.toml` with serde and discovers it in the current
//! directory or its parents. [`CliSettings`] override file values after load.
//!
//! ## Environment Variable Expansion
//!
//! `highlight.themes` entries and `highlight.theme_dir` support `${VAR}` and
//! `${VAR:-default}`.

mod expand;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use rw_highlight::{DEFAULT_THEMES, HighlighterConfig};
use serde::Deserialize;

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "rw-highlight.toml";

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the theme list.
    pub themes: Option<Vec<String>>,
    /// Override the extra theme directory.
    pub theme_dir: Option<PathBuf>,
    /// Override GitHub-flavored markdown extensions.
    pub gfm: Option<bool>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Highlighting configuration.
    pub highlight: HighlightConfig,
    /// Markdown rendering configuration.
    pub markdown: MarkdownConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// `[highlight]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Theme identifiers, one rendered root per theme.
    pub themes: Vec<String>,
    /// Directory with extra `.tmTheme` files.
    pub theme_dir: Option<PathBuf>,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            themes: DEFAULT_THEMES.iter().map(|&t| t.to_owned()).collect(),
            theme_dir: None,
        }
    }
}

/// `[markdown]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// Enable tables, strikethrough and task lists.
    pub gfm: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self { gfm: true }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`highlight.theme_dir`").
        field: String,
        /// Error message (e.g., "${`THEME_DIR`} not set").
        message: String,
    },
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `rw-highlight.toml` in the current directory and parents, falling
    /// back to defaults.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let discovered = match config_path {
            Some(path) if !path.exists() => return Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => Some(path.to_path_buf()),
            None => std::env::current_dir()
                .ok()
                .and_then(|cwd| Self::discover_from(&cwd)),
        };

        let mut config = match discovered {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::default(),
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Search for the config file in `start` and its parents.
    pub fn discover_from(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILENAME))
            .find(|candidate| candidate.is_file())
    }

    /// Engine configuration for the configured themes.
    #[must_use]
    pub fn highlighter_config(&self) -> HighlighterConfig {
        HighlighterConfig::with_themes(self.highlight.themes.iter().cloned())
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` when the theme list is empty or
    /// holds empty or duplicate names.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let themes = &self.highlight.themes;
        if themes.is_empty() {
            return Err(ConfigError::Validation(
                "highlight.themes must name at least one theme".to_owned(),
            ));
        }

        let mut seen = HashSet::new();
        for theme in themes {
            if theme.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "highlight.themes cannot contain empty names".to_owned(),
                ));
            }
            if !seen.insert(theme.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "highlight.themes lists `{theme}` more than once"
                )));
            }
        }

        Ok(())
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(themes) = &settings.themes {
            self.highlight.themes.clone_from(themes);
        }
        if let Some(theme_dir) = &settings.theme_dir {
            self.highlight.theme_dir = Some(theme_dir.clone());
        }
        if let Some(gfm) = settings.gfm {
            self.markdown.gfm = gfm;
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;
        Ok(config)
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        for theme in &mut self.highlight.themes {
            *theme = expand::expand_env(theme, "highlight.themes")?;
        }
        if let Some(dir) = &self.highlight.theme_dir {
            let expanded = expand::expand_env(&dir.to_string_lossy(), "highlight.theme_dir")?;
            self.highlight.theme_dir = Some(PathBuf::from(expanded));
        }
        Ok(())
    }

    /// Resolve a relative `theme_dir` against the config file's directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        if let Some(dir) = &self.highlight.theme_dir
            && dir.is_relative()
        {
            self.highlight.theme_dir = Some(config_dir.join(dir));
        }
    }
}
