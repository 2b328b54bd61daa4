//! Markdown rendering with highlighted fenced code blocks.
//!
//! Parses markdown with pulldown-cmark, hands each code block to a
//! [`Highlighter`](rw_highlight::Highlighter) and splices the serialized
//! markup back into the event stream.
//!
//! The fence info string is split on its first whitespace: the first word is
//! the language and the rest is the directive string.
//!
//! ````markdown
//! ```rust highlight=1 data-file="main.rs"
//! fn main() {
//!     println!("hello");
//! }
//! ```
//! ````
//!
//! Fences without a language and indented code blocks render as plain text.

mod fence;
mod renderer;

pub use renderer::{MarkdownRenderer, RenderError, RenderResult, render_markdown};
