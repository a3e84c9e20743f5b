//! Categorized text: single-source slots, located blocks, and aggregations.

use std::ops::{Index, IndexMut, Range};

use serde::{Deserialize, Serialize};

use crate::category::Category;

/// Text split into exactly three category slots.
///
/// Slots may be empty. The slot order always matches [`Category::ALL`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizedContent {
    pub added: String,
    pub changed: String,
    pub fixed: String,
}

impl CategorizedContent {
    /// Create content with all three slots empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if every slot is empty.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.changed.is_empty() && self.fixed.is_empty()
    }

    /// The slot for `category`.
    pub fn get(&self, category: Category) -> &str {
        &self[category]
    }

    /// The three slots in canonical order.
    pub fn into_array(self) -> [String; 3] {
        [self.added, self.changed, self.fixed]
    }

    /// Iterate `(category, text)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &str)> {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

impl Index<Category> for CategorizedContent {
    type Output = String;

    fn index(&self, category: Category) -> &String {
        match category {
            Category::Added => &self.added,
            Category::Changed => &self.changed,
            Category::Fixed => &self.fixed,
        }
    }
}

impl IndexMut<Category> for CategorizedContent {
    fn index_mut(&mut self, category: Category) -> &mut String {
        match category {
            Category::Added => &mut self.added,
            Category::Changed => &mut self.changed,
            Category::Fixed => &mut self.fixed,
        }
    }
}

/// A category chunk located inside its source text.
///
/// `text` is always equal to `source[span]`: normalization only trims the
/// chunk, so the normalized text stays a contiguous slice of the source.
/// For an empty chunk the span is empty and sits at `heading_end`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryBlock {
    /// The category named by the heading.
    pub category: Category,
    /// Normalized chunk text.
    pub text: String,
    /// Byte range of `text` in the source.
    pub span: Range<usize>,
    /// Byte offset just past the heading line (after its newline, if any).
    pub heading_end: usize,
}

impl CategoryBlock {
    /// Shift all offsets by `base`, used when the source was a sub-slice.
    pub fn offset_by(mut self, base: usize) -> Self {
        self.span = (self.span.start + base)..(self.span.end + base);
        self.heading_end += base;
        self
    }
}

/// Entries gathered across fragments, one sequence per category.
///
/// Sequences keep the fragment enumeration order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedChangelog {
    pub added: Vec<String>,
    pub changed: Vec<String>,
    pub fixed: Vec<String>,
}

impl AggregatedChangelog {
    /// Create an empty aggregation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no category has any entry.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.changed.is_empty() && self.fixed.is_empty()
    }

    /// The entries for `category`.
    pub fn entries(&self, category: Category) -> &[String] {
        match category {
            Category::Added => &self.added,
            Category::Changed => &self.changed,
            Category::Fixed => &self.fixed,
        }
    }

    /// Number of entries for `category`.
    pub fn len(&self, category: Category) -> usize {
        self.entries(category).len()
    }

    /// Total number of entries across all categories.
    pub fn total(&self) -> usize {
        self.added.len() + self.changed.len() + self.fixed.len()
    }

    /// Append one entry to `category`.
    pub fn push(&mut self, category: Category, entry: impl Into<String>) {
        let entries = match category {
            Category::Added => &mut self.added,
            Category::Changed => &mut self.changed,
            Category::Fixed => &mut self.fixed,
        };
        entries.push(entry.into());
    }

    /// Entries of `category` concatenated with no separator.
    pub fn joined(&self, category: Category) -> String {
        self.entries(category).concat()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_content() {
        let c = CategorizedContent::new();
        assert!(c.is_empty());
        assert_eq!(c.into_array(), [String::new(), String::new(), String::new()]);
    }

    #[test]
    fn index_by_category() {
        let mut c = CategorizedContent::new();
        c[Category::Fixed].push_str("- bug\n");
        assert_eq!(c.fixed, "- bug\n");
        assert_eq!(c.get(Category::Fixed), "- bug\n");
        assert!(!c.is_empty());
    }

    #[test]
    fn iter_is_canonical() {
        let c = CategorizedContent {
            added: "a".into(),
            changed: "c".into(),
            fixed: "f".into(),
        };
        let got: Vec<_> = c.iter().collect();
        assert_eq!(
            got,
            vec![(Category::Added, "a"), (Category::Changed, "c"), (Category::Fixed, "f")]
        );
    }

    #[test]
    fn block_offset_shifts_span_and_heading() {
        let block = CategoryBlock {
            category: Category::Added,
            text: "- x\n".into(),
            span: 10..14,
            heading_end: 10,
        };
        let moved = block.offset_by(5);
        assert_eq!(moved.span, 15..19);
        assert_eq!(moved.heading_end, 15);
    }

    #[test]
    fn aggregation_push_and_join() {
        let mut agg = AggregatedChangelog::new();
        assert!(agg.is_empty());
        agg.push(Category::Added, "- X\n");
        agg.push(Category::Added, "- Y\n");
        agg.push(Category::Fixed, "- Z\n");
        assert!(!agg.is_empty());
        assert_eq!(agg.len(Category::Added), 2);
        assert_eq!(agg.len(Category::Changed), 0);
        assert_eq!(agg.total(), 3);
        assert_eq!(agg.joined(Category::Added), "- X\n- Y\n");
        assert_eq!(agg.joined(Category::Changed), "");
    }
}
