//! Code block directive parsing.
//!
//! A fenced code block can carry a directive string after its language tag:
//!
//! ```text
//! ```rust highlight=1,3-5 hide=0 data-file="main.rs" preserve-scopes
//! ```
//!
//! [`DirectiveConfig::parse`] turns that string into a [`DirectiveConfig`].
//! Parsing never fails: unrecognized tokens are logged and skipped.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::lines::LineSet;
use crate::node::{AttributeValue, Element};

static DATA_ATTRIBUTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^data-[A-Za-z0-9]*$").unwrap());

/// Mutator obtained from a [`PostProcess`] step.
///
/// Receives exclusive access to one rendered root for the duration of the call.
pub type TreeMutator = Box<dyn FnMut(&mut Element) + Send>;

/// Post-processing step applied to rendered code block roots.
///
/// [`mutator`](Self::mutator) is called once per formatting call; the returned
/// mutator is then applied to every root produced by that call.
///
/// Any `Fn() -> TreeMutator` closure implements this trait.
pub trait PostProcess: Send + Sync {
    /// Create the mutator for one formatting call.
    fn mutator(&self) -> TreeMutator;
}

impl<F> PostProcess for F
where
    F: Fn() -> TreeMutator + Send + Sync,
{
    fn mutator(&self) -> TreeMutator {
        self()
    }
}

/// Parsed code block directives.
///
/// Line indices are zero-based and never validated against the block's line
/// count: an index past the end simply never matches.
#[derive(Clone, Default)]
pub struct DirectiveConfig {
    /// Lines to omit (`hide=`).
    pub hidden_lines: LineSet,
    /// When set, only these lines are emitted (`show=`).
    pub shown_lines: Option<LineSet>,
    /// Lines marked with the `highlight-line` class (`highlight=`).
    pub highlighted_lines: LineSet,
    /// Keep `data-scope` attributes in the output (`preserve-scopes`).
    pub preserve_scopes: bool,
    /// Inline layout on the given line. `None` renders a full block.
    pub inline: Option<usize>,
    /// Extra attributes for the block root (`data-*`).
    pub custom_attributes: BTreeMap<String, AttributeValue>,
    /// Post-processing steps, in application order.
    pub postprocess: Vec<Arc<dyn PostProcess>>,
}

impl fmt::Debug for DirectiveConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectiveConfig")
            .field("hidden_lines", &self.hidden_lines)
            .field("shown_lines", &self.shown_lines)
            .field("highlighted_lines", &self.highlighted_lines)
            .field("preserve_scopes", &self.preserve_scopes)
            .field("inline", &self.inline)
            .field("custom_attributes", &self.custom_attributes)
            .field("postprocess", &self.postprocess.len())
            .finish()
    }
}

impl DirectiveConfig {
    /// Parse a directive string.
    ///
    /// # Example
    ///
    /// ```
    /// use rw_highlight::DirectiveConfig;
    ///
    /// let config = DirectiveConfig::parse("highlight=3,4-6,10 hide=[0]");
    /// assert_eq!(config.highlighted_lines.ranges(), &[3..=6, 10..=10]);
    /// assert!(config.hidden_lines.contains(0));
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut config = Self::default();

        for token in raw.split_whitespace() {
            if token == "preserve-scopes" {
                config.preserve_scopes = true;
                continue;
            }

            let Some((key, value)) = token.split_once('=') else {
                if DATA_ATTRIBUTE_RE.is_match(token) {
                    config
                        .custom_attributes
                        .insert(token.to_owned(), AttributeValue::Flag(true));
                } else {
                    tracing::warn!(token, "Unhandled code block directive");
                }
                continue;
            };

            match key {
                "highlight" => config.highlighted_lines = parse_line_list(value),
                "show" => config.shown_lines = Some(parse_line_list(value)),
                "hide" => config.hidden_lines = parse_line_list(value),
                _ if DATA_ATTRIBUTE_RE.is_match(key) => {
                    config
                        .custom_attributes
                        .insert(key.to_owned(), AttributeValue::Text(unquote(value).to_owned()));
                }
                _ => tracing::warn!(key, value, "Unhandled code block directive"),
            }
        }

        config
    }

    /// Render inline on `line` instead of as a block.
    #[must_use]
    pub fn with_inline(mut self, line: usize) -> Self {
        self.inline = Some(line);
        self
    }

    /// Keep or strip `data-scope` attributes.
    #[must_use]
    pub fn with_preserve_scopes(mut self, preserve: bool) -> Self {
        self.preserve_scopes = preserve;
        self
    }

    /// Append a post-processing step.
    #[must_use]
    pub fn with_postprocess(mut self, step: impl PostProcess + 'static) -> Self {
        self.postprocess.push(Arc::new(step));
        self
    }
}

/// Strip one layer of matching single or double quotes.
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

/// Parse a line list: `3`, `[3]`, `3,4`, `[3,4-6,10]`, `6-3`.
///
/// Ranges are inclusive in either direction. Malformed parts contribute nothing.
fn parse_line_list(text: &str) -> LineSet {
    let text = text
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(text);

    let mut lines = LineSet::new();
    for part in text.split(',').filter(|part| !part.is_empty()) {
        if part.contains('-') {
            match parse_range(part) {
                Some((start, end)) => lines.insert_range(start, end),
                None => tracing::warn!(part, "Malformed line range in code block directive"),
            }
        } else {
            match part.parse::<usize>() {
                Ok(line) => lines.insert(line),
                Err(_) => tracing::warn!(part, "Malformed line number in code block directive"),
            }
        }
    }
    lines
}

/// Parse `A-B` into its two endpoints. Anything but exactly two numbers is rejected.
fn parse_range(part: &str) -> Option<(usize, usize)> {
    let mut bounds = part.split('-');
    let start = bounds.next()?.parse().ok()?;
    let end = bounds.next()?.parse().ok()?;
    if bounds.next().is_some() {
        return None;
    }
    Some((start, end))
}
