//! Tokenizing engine seam and the memoized engine instance.
//!
//! The engine is whatever turns source text into styled fragments. It is
//! expensive to build, so [`EngineCache`] builds it lazily, once per
//! configuration value, and rebuilds only when the configuration changes.

use std::future::Future;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::{EngineError, HighlightError};
use crate::tokens::{Line, ThemeInfo};

/// Themes used when no configuration is supplied: one light, one dark.
pub const DEFAULT_THEMES: [&str; 2] = ["InspiredGitHub", "base16-ocean.dark"];

/// Engine configuration.
///
/// Compared by value: two configurations with the same themes share one engine.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HighlighterConfig {
    /// Theme identifiers, in output order. Each produces one root per block.
    pub themes: Vec<String>,
}

impl Default for HighlighterConfig {
    fn default() -> Self {
        Self {
            themes: DEFAULT_THEMES.iter().map(|&t| t.to_owned()).collect(),
        }
    }
}

impl HighlighterConfig {
    /// Configuration with the given themes.
    #[must_use]
    pub fn with_themes<I, S>(themes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            themes: themes.into_iter().map(Into::into).collect(),
        }
    }

    /// Stable hash of the configuration value, for logging.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

/// Tokenizing engine.
///
/// All methods are read-only, so one instance serves concurrent callers.
pub trait TokenEngine: Send + Sync {
    /// Names of languages the engine can tokenize.
    fn loaded_languages(&self) -> Vec<String>;

    /// Whether `language` is one of [`loaded_languages`](Self::loaded_languages).
    fn has_language(&self, language: &str) -> bool {
        self.loaded_languages().iter().any(|l| l == language)
    }

    /// Look up theme metadata by identifier.
    fn theme(&self, name: &str) -> Result<ThemeInfo, HighlightError>;

    /// Tokenize `text` into lines of fragments.
    ///
    /// Lines are split on `\n`; a trailing newline yields a trailing empty line.
    fn tokenize(
        &self,
        text: &str,
        language: &str,
        theme: &str,
    ) -> Result<Vec<Line>, HighlightError>;
}

/// Asynchronous engine constructor.
pub trait EngineFactory: Send + Sync {
    /// Engine produced by this factory.
    type Engine: TokenEngine + 'static;

    /// Build an engine for `config`.
    fn create(
        &self,
        config: &HighlighterConfig,
    ) -> impl Future<Output = Result<Self::Engine, EngineError>> + Send;
}

/// Engine instance paired with the configuration it was built for.
pub struct CachedEngine<E> {
    /// Shared engine.
    pub engine: Arc<E>,
    /// Configuration snapshot.
    pub config: HighlighterConfig,
}

impl<E: TokenEngine> CachedEngine<E> {
    /// Theme metadata for every configured theme, in configuration order.
    pub fn themes(&self) -> Result<Vec<ThemeInfo>, HighlightError> {
        self.config
            .themes
            .iter()
            .map(|name| self.engine.theme(name))
            .collect()
    }
}

struct CacheState<E> {
    config: HighlighterConfig,
    engine: Option<Arc<E>>,
}

/// Lazily built engine, memoized per configuration.
pub struct EngineCache<F: EngineFactory> {
    factory: F,
    state: Mutex<CacheState<F::Engine>>,
}

impl<F: EngineFactory> EngineCache<F> {
    /// Create an empty cache. Nothing is built until [`engine`](Self::engine).
    pub fn new(factory: F, config: HighlighterConfig) -> Self {
        Self {
            factory,
            state: Mutex::new(CacheState {
                config,
                engine: None,
            }),
        }
    }

    /// Replace the configuration.
    ///
    /// A value-equal configuration keeps the cached engine; anything else
    /// drops it so the next [`engine`](Self::engine) call rebuilds.
    pub async fn set_config(&self, config: HighlighterConfig) {
        let mut state = self.state.lock().await;
        if state.config == config {
            return;
        }
        tracing::debug!(
            previous = state.config.fingerprint(),
            next = config.fingerprint(),
            "Highlighter configuration changed, dropping engine"
        );
        state.config = config;
        state.engine = None;
    }

    /// Drop the cached engine without changing the configuration.
    pub async fn invalidate(&self) {
        self.state.lock().await.engine = None;
    }

    /// Current configuration.
    pub async fn config(&self) -> HighlighterConfig {
        self.state.lock().await.config.clone()
    }

    /// Whether an engine is currently built.
    pub async fn is_built(&self) -> bool {
        self.state.lock().await.engine.is_some()
    }

    /// Get the engine, building it on first use.
    ///
    /// Concurrent callers wait for a single construction.
    pub async fn engine(&self) -> Result<CachedEngine<F::Engine>, EngineError> {
        let mut state = self.state.lock().await;

        if let Some(engine) = &state.engine {
            return Ok(CachedEngine {
                engine: Arc::clone(engine),
                config: state.config.clone(),
            });
        }

        tracing::info!(
            themes = ?state.config.themes,
            fingerprint = state.config.fingerprint(),
            "Building highlighting engine"
        );
        let engine = Arc::new(self.factory.create(&state.config).await?);
        state.engine = Some(Arc::clone(&engine));

        Ok(CachedEngine {
            engine,
            config: state.config.clone(),
        })
    }
}
