//! Per-line selection predicates.

use std::ops::RangeInclusive;

use crate::meta::DirectiveConfig;

/// Set of zero-based line indices.
///
/// Stored as sorted, disjoint inclusive ranges. Size and lookup cost depend on
/// the number of ranges, never on the number of lines they cover.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineSet {
    ranges: Vec<RangeInclusive<usize>>,
}

impl LineSet {
    /// Empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one line.
    pub fn insert(&mut self, line: usize) {
        self.insert_range(line, line);
    }

    /// Add every line between `a` and `b`, inclusive, in either order.
    pub fn insert_range(&mut self, a: usize, b: usize) {
        self.ranges.push(a.min(b)..=a.max(b));
        self.ranges.sort_by_key(|range| *range.start());

        let mut merged: Vec<RangeInclusive<usize>> = Vec::with_capacity(self.ranges.len());
        for range in self.ranges.drain(..) {
            if let Some(last) = merged.last_mut()
                && *range.start() <= last.end().saturating_add(1)
            {
                if range.end() > last.end() {
                    *last = *last.start()..=*range.end();
                }
                continue;
            }
            merged.push(range);
        }
        self.ranges = merged;
    }

    #[must_use]
    pub fn contains(&self, line: usize) -> bool {
        let index = self.ranges.partition_point(|range| *range.end() < line);
        self.ranges.get(index).is_some_and(|range| range.contains(&line))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Disjoint ranges in ascending order.
    #[must_use]
    pub fn ranges(&self) -> &[RangeInclusive<usize>] {
        &self.ranges
    }
}

impl FromIterator<usize> for LineSet {
    fn from_iter<I: IntoIterator<Item = usize>>(lines: I) -> Self {
        let mut set = Self::new();
        for line in lines {
            set.insert(line);
        }
        set
    }
}

impl DirectiveConfig {
    /// Whether line `index` is emitted in block layout.
    ///
    /// A line is visible when it is in `shown_lines` (or no `show=` was given)
    /// and not in `hidden_lines`.
    #[must_use]
    pub fn is_visible(&self, index: usize) -> bool {
        self.shown_lines
            .as_ref()
            .is_none_or(|shown| shown.contains(index))
            && !self.hidden_lines.contains(index)
    }

    /// Whether line `index` carries the highlight marker.
    #[must_use]
    pub fn is_highlighted(&self, index: usize) -> bool {
        self.highlighted_lines.contains(index)
    }
}
