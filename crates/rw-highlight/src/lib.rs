//! Directive-aware syntax highlighting for fenced code blocks.
//!
//! This crate renders a code block into theme-aware markup. It is a pipeline
//! stage: the document processor hands it block text, a language tag and the
//! block's directive string, and splices the returned forest back into its
//! own tree.
//!
//! # Architecture
//!
//! - [`meta`]: directive string parsing into [`DirectiveConfig`]
//! - line selection predicates ([`DirectiveConfig::is_visible`],
//!   [`DirectiveConfig::is_highlighted`])
//! - [`format`]: token matrix to markup, plus the no-language path
//! - [`engine`]: tokenizing engine traits and the memoized [`EngineCache`]
//! - [`Highlighter`]: entry point tying the pieces together
//! - [`html`]: serialization of the markup tree
//!
//! The engine itself is pluggable; `rw-highlight-syntect` provides a
//! `syntect`-backed one.
//!
//! # Directives
//!
//! | Token | Effect |
//! |-------|--------|
//! | `highlight=1,3-5` | add `highlight-line` to lines 1, 3, 4, 5 |
//! | `show=[0,1]` | emit only lines 0 and 1 |
//! | `hide=2` | omit line 2 |
//! | `preserve-scopes` | keep `data-scope` on every span |
//! | `data-file="main.rs"` | copy the attribute onto the block root |
//!
//! Line numbers are zero-based.

pub mod engine;
mod error;
pub mod format;
mod highlighter;
pub mod html;
mod lines;
pub mod meta;
mod node;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;
mod tokens;

pub use engine::{
    CachedEngine, DEFAULT_THEMES, EngineCache, EngineFactory, HighlighterConfig, TokenEngine,
};
pub use error::{EngineError, HighlightError};
pub use highlighter::{Highlighter, UNKNOWN_LANGUAGE};
pub use html::{escape_html, render_html};
pub use lines::LineSet;
pub use meta::{DirectiveConfig, PostProcess, TreeMutator};
pub use node::{AttributeValue, Element, Node};
pub use tokens::{FontStyle, Fragment, Line, SubToken, ThemeInfo, ThemedTokens};
