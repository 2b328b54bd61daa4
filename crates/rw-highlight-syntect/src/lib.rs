//! `syntect`-backed tokenizing engine for `rw-highlight`.
//!
//! Uses syntect's bundled grammars and themes. Extra `.tmTheme` files can be
//! loaded with [`SyntectFactory::with_theme_dir`].
//!
//! ```ignore
//! use rw_highlight::Highlighter;
//! use rw_highlight_syntect::SyntectFactory;
//!
//! let highlighter = Highlighter::new(SyntectFactory::new());
//! ```

mod engine;

pub use engine::{SyntectEngine, SyntectFactory};
