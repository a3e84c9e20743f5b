//! What a dry run would do to the changelog.
//!
//! A dry run computes the merged document and shows it as hunks against the
//! file on disk, three lines of context each, via `similar`'s line diff.

use std::fmt::Write as _;

use serde::Serialize;
use similar::{ChangeTag, TextDiff};

/// Hunks between the changelog on disk and the merge result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChangePreview {
    pub hunks: Vec<DiffHunk>,
    /// Line count of the changelog as it is now.
    pub old_lines: usize,
    /// Line count after the merge.
    pub new_lines: usize,
}

impl ChangePreview {
    /// No hunks: the merge would leave the changelog byte-for-byte unchanged.
    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    /// Lines the merge would insert, typically the new entries.
    pub fn additions(&self) -> usize {
        self.count(|line| matches!(line, DiffLine::Added(_)))
    }

    /// Lines the merge would drop or replace.
    pub fn deletions(&self) -> usize {
        self.count(|line| matches!(line, DiffLine::Removed(_)))
    }

    fn count(&self, pred: impl Fn(&DiffLine) -> bool) -> usize {
        self.hunks
            .iter()
            .flat_map(|hunk| &hunk.lines)
            .filter(|line| pred(line))
            .count()
    }

    /// Render as unified diff text (without file headers).
    pub fn to_unified(&self) -> String {
        let mut out = String::new();
        for hunk in &self.hunks {
            let _ = writeln!(
                out,
                "@@ -{},{} +{},{} @@",
                hunk.old_start, hunk.old_count, hunk.new_start, hunk.new_count
            );
            for line in &hunk.lines {
                let (prefix, text) = match line {
                    DiffLine::Context(t) => (' ', t),
                    DiffLine::Added(t) => ('+', t),
                    DiffLine::Removed(t) => ('-', t),
                };
                let _ = writeln!(out, "{prefix}{text}");
            }
        }
        out
    }
}

/// One `@@` block of the preview. Positions are 1-based line numbers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiffHunk {
    pub old_start: usize,
    pub old_count: usize,
    pub new_start: usize,
    pub new_count: usize,
    pub lines: Vec<DiffLine>,
}

/// A preview line, without its trailing newline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum DiffLine {
    /// Unchanged line shown for orientation.
    Context(String),
    /// Line the merge inserts.
    Added(String),
    /// Line the merge removes.
    Removed(String),
}

/// Preview rewriting the changelog `old` into `new`.
pub fn preview(old: &str, new: &str) -> ChangePreview {
    let old_lines = old.lines().count();
    let new_lines = new.lines().count();

    if old == new {
        return ChangePreview {
            hunks: Vec::new(),
            old_lines,
            new_lines,
        };
    }

    let text_diff = TextDiff::from_lines(old, new);
    let mut hunks = Vec::new();

    for group in text_diff.grouped_ops(3) {
        let (old_start, new_start) = match group.first() {
            Some(op) => (op.old_range().start + 1, op.new_range().start + 1),
            None => continue,
        };
        let mut lines = Vec::new();
        let mut old_count = 0usize;
        let mut new_count = 0usize;

        for op in &group {
            for change in text_diff.iter_changes(op) {
                let text = change.value().trim_end_matches(['\n', '\r']).to_string();
                match change.tag() {
                    ChangeTag::Equal => {
                        lines.push(DiffLine::Context(text));
                        old_count += 1;
                        new_count += 1;
                    }
                    ChangeTag::Delete => {
                        lines.push(DiffLine::Removed(text));
                        old_count += 1;
                    }
                    ChangeTag::Insert => {
                        lines.push(DiffLine::Added(text));
                        new_count += 1;
                    }
                }
            }
        }

        hunks.push(DiffHunk {
            old_start,
            old_count,
            new_start,
            new_count,
            lines,
        });
    }

    ChangePreview {
        hunks,
        old_lines,
        new_lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_documents_have_no_hunks() {
        let doc = "## [1.0.0]\n### Added\n- a\n";
        let p = preview(doc, doc);
        assert!(p.is_empty());
        assert_eq!(p.additions(), 0);
        assert_eq!(p.deletions(), 0);
        assert_eq!(p.to_unified(), "");
    }

    #[test]
    fn appended_entry_is_one_addition() {
        let old = "## [1.0.0]\n### Added\n- a\n\n### Fixed\n";
        let new = "## [1.0.0]\n### Added\n- a\n- b\n\n### Fixed\n";
        let p = preview(old, new);
        assert_eq!(p.additions(), 1);
        assert_eq!(p.deletions(), 0);
        assert_eq!(p.hunks.len(), 1);
        assert!(p.hunks[0].lines.contains(&DiffLine::Added("- b".into())));
    }

    #[test]
    fn hunk_positions_are_one_based() {
        let old = "# Changelog\n\n## [2.0.0]\n### Fixed\n- a\n";
        let new = "# Changelog\n\n## [2.0.0]\n### Fixed\n- a\n- b\n";
        let p = preview(old, new);
        let hunk = &p.hunks[0];
        assert_eq!((hunk.old_start, hunk.old_count), (3, 3));
        assert_eq!((hunk.new_start, hunk.new_count), (3, 4));
        assert_eq!(hunk.lines.first(), Some(&DiffLine::Context("## [2.0.0]".into())));
        assert_eq!(hunk.lines.last(), Some(&DiffLine::Added("- b".into())));
    }

    #[test]
    fn unified_rendering() {
        let p = preview("a\nb\n", "a\nb\nc\n");
        let text = p.to_unified();
        assert!(text.starts_with("@@ -1,2 +1,3 @@\n"));
        assert!(text.contains(" a\n b\n+c\n"));
    }

    #[test]
    fn line_counts() {
        let p = preview("x\ny\n", "x\n");
        assert_eq!(p.old_lines, 2);
        assert_eq!(p.new_lines, 1);
        assert_eq!(p.deletions(), 1);
    }
}
