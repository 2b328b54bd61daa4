//! Token matrix types exchanged with the tokenizing engine.

use std::ops::{BitOr, BitOrAssign};

/// Font style bits of a [`Fragment`]. Bits combine freely.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FontStyle(u8);

impl FontStyle {
    /// No styling.
    pub const NONE: Self = Self(0);
    /// `font-style: italic`.
    pub const ITALIC: Self = Self(1);
    /// `font-weight: bold`.
    pub const BOLD: Self = Self(1 << 1);
    /// `text-decoration: underline`.
    pub const UNDERLINE: Self = Self(1 << 2);

    /// Whether every bit of `other` is set.
    #[must_use]
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether no bit is set.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for FontStyle {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for FontStyle {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Grammar attribution for part of a [`Fragment`].
///
/// A fragment can merge several grammar tokens that share a style; each one
/// keeps its own scope stack here.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubToken {
    /// Text covered by this sub-token.
    pub content: String,
    /// Scope names, outermost first (`source.rust`, ..., `keyword.other.fn`).
    pub scopes: Vec<String>,
}

impl SubToken {
    /// Deepest scope name, or `""` without scope data.
    #[must_use]
    pub fn deepest_scope(&self) -> &str {
        self.scopes.last().map_or("", String::as_str)
    }
}

/// Smallest unit of styled text in a tokenized line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fragment {
    /// Text content.
    pub content: String,
    /// Foreground color (`#rrggbb`). `None` uses the theme foreground.
    pub color: Option<String>,
    /// Font style bits.
    pub font_style: FontStyle,
    /// Grammar attribution, empty when the engine does not report it.
    pub explanation: Vec<SubToken>,
}

impl Fragment {
    /// Unstyled fragment without scope data.
    #[must_use]
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    /// Comma-joined deepest scope of each sub-token, `None` without sub-tokens.
    #[must_use]
    pub fn scope_attribute(&self) -> Option<String> {
        if self.explanation.is_empty() {
            return None;
        }
        let scopes: Vec<&str> = self.explanation.iter().map(SubToken::deepest_scope).collect();
        Some(scopes.join(","))
    }
}

/// One tokenized line.
pub type Line = Vec<Fragment>;

/// Theme metadata reported by the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThemeInfo {
    /// Theme identifier, used as a class on every root.
    pub name: String,
    /// Default foreground color.
    pub foreground: String,
    /// Background color.
    pub background: String,
}

/// Token matrix of a code block for one theme.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThemedTokens {
    /// Theme the block was tokenized with.
    pub theme: ThemeInfo,
    /// Lines of fragments.
    pub lines: Vec<Line>,
}
