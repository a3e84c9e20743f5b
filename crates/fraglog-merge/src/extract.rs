//! Latest version section extraction.
//!
//! A version section starts at a heading such as `## [1.4.0] - 2024-05-01`
//! and runs until the next version heading or the end of the document. The
//! first section in the document is the latest one; only it is ever edited.

use std::ops::Range;
use std::sync::LazyLock;

use fraglog_parse::category_blocks;
use fraglog_types::{CategorizedContent, Category, CategoryBlock, DOCUMENT_GRANULARITY};
use regex::Regex;
use tracing::debug;

use crate::error::{MergeError, MergeResult};

/// A whole version heading line, newline included. Group 1 is the version.
static VERSION_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^##[ \t]+\[(\d+\.\d+\.\d+[^\]\r\n]*)\][^\n]*\n?")
        .expect("version heading pattern is valid")
});

/// Byte-level layout of the latest version section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LatestSection {
    /// Version text between the heading brackets.
    pub version: String,
    /// The heading line, including its newline.
    pub heading: Range<usize>,
    /// Everything after the heading up to the next version heading or EOF.
    pub body: Range<usize>,
    /// First block of each category, indexed by [`Category::index`].
    pub blocks: [Option<CategoryBlock>; 3],
    /// Current content of each category.
    pub existing: CategorizedContent,
}

impl LatestSection {
    /// The located block for `category`, if the section has that heading.
    pub fn block(&self, category: Category) -> Option<&CategoryBlock> {
        self.blocks[category.index()].as_ref()
    }

    /// The version heading line.
    pub fn heading_block<'d>(&self, document: &'d str) -> &'d str {
        &document[self.heading.clone()]
    }

    /// The latest section's text, without its heading.
    pub fn section_text<'d>(&self, document: &'d str) -> &'d str {
        &document[self.body.clone()]
    }

    /// Text before the latest section's heading.
    pub fn preamble<'d>(&self, document: &'d str) -> &'d str {
        &document[..self.heading.start]
    }

    /// Text after the latest section (older versions).
    pub fn remainder<'d>(&self, document: &'d str) -> &'d str {
        &document[self.body.end..]
    }
}

/// Locate the first version section of `document` and its category blocks.
///
/// # Errors
///
/// [`MergeError::NoVersionSection`] if no version heading exists.
pub fn extract_latest_section(document: &str) -> MergeResult<LatestSection> {
    let captures = VERSION_HEADING
        .captures(document)
        .ok_or(MergeError::NoVersionSection)?;
    let whole = captures.get(0).ok_or(MergeError::NoVersionSection)?;
    let version = captures
        .get(1)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    let heading = whole.start()..whole.end();
    let body_end = VERSION_HEADING
        .find_at(document, heading.end)
        .map(|m| m.start())
        .unwrap_or(document.len());
    let body = heading.end..body_end;

    let mut blocks: [Option<CategoryBlock>; 3] = [None, None, None];
    for block in category_blocks(&document[body.clone()], DOCUMENT_GRANULARITY) {
        let slot = &mut blocks[block.category.index()];
        if slot.is_some() {
            debug!(category = %block.category, "ignoring repeated category heading in latest section");
            continue;
        }
        *slot = Some(block.offset_by(body.start));
    }

    let mut existing = CategorizedContent::new();
    for block in blocks.iter().flatten() {
        existing[block.category] = block.text.clone();
    }

    debug!(%version, start = heading.start, end = body.end, "located latest section");

    Ok(LatestSection {
        version,
        heading,
        body,
        blocks,
        existing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "\
# Changelog

All notable changes to this project will be documented in this file.

## [1.1.0] - 2024-03-01
### Added
- old feature

### Changed

### Fixed
- old fix

## [1.0.0] - 2024-01-01
### Added
- initial release
";

    #[test]
    fn finds_first_version_section() {
        let s = extract_latest_section(DOC).unwrap();
        assert_eq!(s.version, "1.1.0");
        assert_eq!(s.heading_block(DOC), "## [1.1.0] - 2024-03-01\n");
        assert!(s.section_text(DOC).starts_with("### Added\n- old feature\n"));
        assert!(s.section_text(DOC).ends_with("- old fix\n\n"));
        assert!(s.remainder(DOC).starts_with("## [1.0.0]"));
        assert!(s.preamble(DOC).starts_with("# Changelog\n"));
    }

    #[test]
    fn reads_existing_blocks() {
        let s = extract_latest_section(DOC).unwrap();
        assert_eq!(s.existing.added, "- old feature\n");
        assert_eq!(s.existing.changed, "");
        assert_eq!(s.existing.fixed, "- old fix\n");

        let added = s.block(Category::Added).unwrap();
        assert_eq!(&DOC[added.span.clone()], "- old feature\n");
        let changed = s.block(Category::Changed).unwrap();
        assert!(changed.span.is_empty());
        assert!(DOC[..changed.heading_end].ends_with("### Changed\n"));
    }

    #[test]
    fn older_sections_are_not_read() {
        let s = extract_latest_section(DOC).unwrap();
        assert!(!s.existing.added.contains("initial release"));
    }

    #[test]
    fn no_version_heading_is_an_error() {
        let err = extract_latest_section("# Changelog\n\n## Unreleased\n### Added\n").unwrap_err();
        assert_eq!(err, MergeError::NoVersionSection);
        assert_eq!(extract_latest_section("").unwrap_err(), MergeError::NoVersionSection);
    }

    #[test]
    fn heading_must_start_a_line() {
        let err = extract_latest_section("see ## [1.0.0] above\n").unwrap_err();
        assert_eq!(err, MergeError::NoVersionSection);
    }

    #[test]
    fn prerelease_versions_match() {
        let doc = "## [2.0.0-rc.1]\n### Fixed\n- a\n";
        let s = extract_latest_section(doc).unwrap();
        assert_eq!(s.version, "2.0.0-rc.1");
        assert_eq!(s.existing.fixed, "- a\n");
    }

    #[test]
    fn multi_digit_versions_match() {
        let s = extract_latest_section("## [10.22.333]\n").unwrap();
        assert_eq!(s.version, "10.22.333");
        assert_eq!(s.body, 15..15);
    }

    #[test]
    fn missing_categories_are_none() {
        let doc = "## [0.1.0]\n### Fixed\n- f\n";
        let s = extract_latest_section(doc).unwrap();
        assert!(s.block(Category::Added).is_none());
        assert!(s.block(Category::Changed).is_none());
        assert!(s.block(Category::Fixed).is_some());
    }

    #[test]
    fn heading_without_trailing_newline() {
        let doc = "## [0.1.0]";
        let s = extract_latest_section(doc).unwrap();
        assert_eq!(s.heading, 0..doc.len());
        assert!(s.section_text(doc).is_empty());
    }

    #[test]
    fn repeated_category_uses_first() {
        let doc = "## [0.1.0]\n### Added\n- one\n### Added\n- two\n";
        let s = extract_latest_section(doc).unwrap();
        assert_eq!(s.existing.added, "- one\n");
    }
}
