//! Highlighting entry point.

use crate::engine::{EngineCache, EngineFactory, HighlighterConfig, TokenEngine};
use crate::error::HighlightError;
use crate::format::{format_tokens, null_format};
use crate::meta::DirectiveConfig;
use crate::node::Element;
use crate::tokens::{ThemeInfo, ThemedTokens};

/// Language tag used by document collaborators for blocks without a language.
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// Code block highlighter.
///
/// Owns a lazily built engine. Instances are independent, so differently
/// configured highlighters can coexist.
///
/// # Example
///
/// ```ignore
/// use rw_highlight::{DirectiveConfig, Highlighter};
/// use rw_highlight_syntect::SyntectFactory;
///
/// let highlighter = Highlighter::new(SyntectFactory::default());
/// let roots = highlighter
///     .highlight("fn main() {}", Some("rust"), &DirectiveConfig::parse("highlight=0"))
///     .await?;
/// ```
pub struct Highlighter<F: EngineFactory> {
    cache: EngineCache<F>,
}

impl<F: EngineFactory> Highlighter<F> {
    /// Create a highlighter with the default light/dark theme pair.
    pub fn new(factory: F) -> Self {
        Self::with_config(factory, HighlighterConfig::default())
    }

    /// Create a highlighter with an explicit configuration.
    pub fn with_config(factory: F, config: HighlighterConfig) -> Self {
        Self {
            cache: EngineCache::new(factory, config),
        }
    }

    /// Replace the configuration, dropping the engine if it changed.
    pub async fn set_config(&self, config: HighlighterConfig) {
        self.cache.set_config(config).await;
    }

    /// Current configuration.
    pub async fn config(&self) -> HighlighterConfig {
        self.cache.config().await
    }

    /// Highlight a code block.
    ///
    /// Returns one root per configured theme. A missing, empty or
    /// [`UNKNOWN_LANGUAGE`] tag, or a language the engine does not know,
    /// renders the text verbatim (see [`null_format`]).
    ///
    /// # Errors
    ///
    /// Fails only when the engine cannot be built or used.
    pub async fn highlight(
        &self,
        text: &str,
        language: Option<&str>,
        directive: &DirectiveConfig,
    ) -> Result<Vec<Element>, HighlightError> {
        let cached = self.cache.engine().await?;
        let themes = cached.themes()?;

        let language = language.filter(|lang| !lang.is_empty() && *lang != UNKNOWN_LANGUAGE);
        let Some(language) = language else {
            return Ok(null_format(text, &themes, directive));
        };

        if !cached.engine.has_language(language) {
            tracing::warn!(language, "Language definition not found, rendering as plain text");
            return Ok(null_format(text, &themes, directive));
        }

        let blocks = cached
            .config
            .themes
            .iter()
            .zip(themes)
            .map(|(name, theme)| {
                let lines = cached.engine.tokenize(text, language, name)?;
                Ok(ThemedTokens { theme, lines })
            })
            .collect::<Result<Vec<_>, HighlightError>>()?;

        Ok(format_tokens(&blocks, directive))
    }

    /// Parse `raw_directive` and highlight a code block.
    pub async fn highlight_str(
        &self,
        text: &str,
        language: Option<&str>,
        raw_directive: &str,
    ) -> Result<Vec<Element>, HighlightError> {
        let directive = DirectiveConfig::parse(raw_directive);
        self.highlight(text, language, &directive).await
    }

    /// Metadata of the configured themes.
    pub async fn themes(&self) -> Result<Vec<ThemeInfo>, HighlightError> {
        self.cache.engine().await?.themes()
    }

    /// Languages the engine can tokenize, sorted.
    pub async fn loaded_languages(&self) -> Result<Vec<String>, HighlightError> {
        let mut languages = self.cache.engine().await?.engine.loaded_languages();
        languages.sort();
        languages.dedup();
        Ok(languages)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::format::SCOPE_ATTRIBUTE;
    use crate::meta::TreeMutator;
    use crate::node::{AttributeValue, Node};
    use crate::testing::{KEYWORD_COLOR, StaticFactory};

    fn highlighter() -> Highlighter<StaticFactory> {
        Highlighter::with_config(
            StaticFactory::new(),
            HighlighterConfig::with_themes(["light", "dark"]),
        )
    }

    fn lines(root: &Element) -> Vec<String> {
        root.find("code")
            .unwrap()
            .child_elements()
            .map(Element::text_content)
            .collect()
    }

    #[tokio::test]
    async fn test_highlight_block() {
        let roots = highlighter()
            .highlight_str("fn main\nlet x\nend", Some("rust"), "highlight=1")
            .await
            .unwrap();

        assert_eq!(roots.len(), 2);
        assert!(roots[0].has_class("light"));
        assert!(roots[1].has_class("dark"));
        assert_eq!(
            roots[1].attribute("style"),
            Some(&AttributeValue::from("background-color: #24292e"))
        );
        assert_eq!(lines(&roots[0]), vec!["fn main\n", "let x\n", "end\n"]);

        let keyword = roots[0].find("span").unwrap();
        assert_eq!(
            keyword.attribute("style"),
            Some(&AttributeValue::Text(format!(
                "color: {KEYWORD_COLOR}; font-weight: bold"
            )))
        );
        assert!(keyword.attribute(SCOPE_ATTRIBUTE).is_none());
    }

    #[tokio::test]
    async fn test_highlight_hide() {
        let roots = highlighter()
            .highlight_str("a\nb\nc", Some("rust"), "hide=0")
            .await
            .unwrap();
        assert_eq!(lines(&roots[0]), vec!["b\n", "c\n"]);
    }

    #[tokio::test]
    async fn test_highlight_inline() {
        let directive = DirectiveConfig::parse("hide=1").with_inline(1);
        let roots = highlighter()
            .highlight("a\nb\nc", Some("rust"), &directive)
            .await
            .unwrap();
        let root = &roots[0];
        assert_eq!(root.tag, "div");
        assert_eq!(root.child_elements().count(), 1);
        assert_eq!(root.text_content(), "b\n");
    }

    #[tokio::test]
    async fn test_preserve_scopes() {
        let roots = highlighter()
            .highlight_str("fn", Some("rust"), "preserve-scopes")
            .await
            .unwrap();
        let span = roots[0].find("span").unwrap();
        assert_eq!(
            span.attribute(SCOPE_ATTRIBUTE),
            Some(&AttributeValue::from("keyword.other"))
        );
    }

    #[tokio::test]
    async fn test_no_language_reflects_text() {
        let text = "a\nb <c>";
        for language in [None, Some(""), Some(UNKNOWN_LANGUAGE)] {
            let roots = highlighter()
                .highlight_str(text, language, "hide=0 highlight=1")
                .await
                .unwrap();
            assert_eq!(roots.len(), 2);
            let code = roots[0].find("code").unwrap();
            assert_eq!(code.children, vec![Node::text(text)]);
            assert_eq!(
                code.attribute("style"),
                Some(&AttributeValue::from("color: #24292e"))
            );
        }
    }

    #[tokio::test]
    async fn test_unloaded_language_falls_back() {
        let roots = highlighter()
            .highlight_str("print(1)", Some("python"), "")
            .await
            .unwrap();
        let code = roots[0].find("code").unwrap();
        assert_eq!(code.children, vec![Node::text("print(1)")]);
        assert!(roots[0].find("span").is_none());
    }

    #[tokio::test]
    async fn test_unloaded_language_skips_postprocess() {
        let directive = DirectiveConfig::default().with_postprocess(|| -> TreeMutator {
            Box::new(|root: &mut Element| root.set_attribute("data-post", true))
        });
        let roots = highlighter()
            .highlight("x", Some("python"), &directive)
            .await
            .unwrap();
        assert!(roots[0].attribute("data-post").is_none());
    }

    #[tokio::test]
    async fn test_engine_failure_propagates() {
        let highlighter = Highlighter::with_config(
            StaticFactory::new(),
            HighlighterConfig::with_themes(["nope"]),
        );
        let err = highlighter
            .highlight_str("fn", Some("rust"), "")
            .await
            .unwrap_err();
        assert!(matches!(err, HighlightError::Engine(_)));
    }

    #[tokio::test]
    async fn test_engine_failure_propagates_without_language() {
        let highlighter = Highlighter::with_config(
            StaticFactory::new(),
            HighlighterConfig::with_themes(["nope"]),
        );
        assert!(highlighter.highlight_str("x", None, "").await.is_err());
    }

    #[tokio::test]
    async fn test_engine_reused_across_calls() {
        let factory = StaticFactory::new();
        let builds = factory.build_counter();
        let highlighter =
            Highlighter::with_config(factory, HighlighterConfig::with_themes(["light"]));

        highlighter.highlight_str("a", Some("rust"), "").await.unwrap();
        highlighter.highlight_str("b", None, "").await.unwrap();
        highlighter
            .set_config(HighlighterConfig::with_themes(["light"]))
            .await;
        highlighter.highlight_str("c", Some("toml"), "").await.unwrap();
        assert_eq!(builds.load(Ordering::SeqCst), 1);

        highlighter
            .set_config(HighlighterConfig::with_themes(["dark"]))
            .await;
        let roots = highlighter.highlight_str("d", Some("rust"), "").await.unwrap();
        assert_eq!(builds.load(Ordering::SeqCst), 2);
        assert_eq!(roots.len(), 1);
        assert!(roots[0].has_class("dark"));
    }

    #[tokio::test]
    async fn test_config_follows_set_config() {
        let highlighter = highlighter();
        assert_eq!(
            highlighter.config().await,
            HighlighterConfig::with_themes(["light", "dark"])
        );

        highlighter
            .set_config(HighlighterConfig::with_themes(["dark"]))
            .await;
        assert_eq!(highlighter.config().await.themes, vec!["dark"]);
    }

    #[tokio::test]
    async fn test_postprocess_edits_nested_elements() {
        let directive = DirectiveConfig::default().with_postprocess(|| -> TreeMutator {
            Box::new(|root: &mut Element| {
                for container in root.children.iter_mut().filter_map(Node::as_element_mut) {
                    container.set_attribute("data-wrapped", true);
                }
            })
        });
        let roots = highlighter()
            .highlight("fn", Some("rust"), &directive)
            .await
            .unwrap();

        for root in &roots {
            let container = root.find("div").unwrap();
            assert!(container.has_class("code-container"));
            assert_eq!(
                container.attribute("data-wrapped"),
                Some(&AttributeValue::Flag(true))
            );
        }
    }

    #[tokio::test]
    async fn test_themes_and_languages() {
        let highlighter = highlighter();
        let names: Vec<String> = highlighter
            .themes()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["light", "dark"]);
        assert_eq!(
            highlighter.loaded_languages().await.unwrap(),
            vec!["rust", "toml"]
        );
    }
}
