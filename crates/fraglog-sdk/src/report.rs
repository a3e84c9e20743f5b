//! Serializable results of SDK operations.

use std::collections::BTreeMap;

use fraglog_merge::ChangePreview;
use fraglog_types::{AggregatedChangelog, Category, CategorizedContent};
use serde::Serialize;

/// How a generation run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerateStatus {
    /// Every fragment was empty; nothing was touched.
    NoChanges,
    /// The merge was computed and previewed only.
    DryRun,
    /// The changelog was written and the fragments consumed.
    Written,
}

/// A fragment left out of a run because its header could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SkippedFragment {
    pub id: String,
    pub reason: String,
}

/// Summary of one [`crate::Generator::run`].
#[derive(Clone, Debug, Serialize)]
pub struct GenerateReport {
    pub status: GenerateStatus,
    /// Version of the section that received the entries.
    pub version: Option<String>,
    /// Fragments that were read and aggregated, in enumeration order.
    pub fragments: Vec<String>,
    pub skipped: Vec<SkippedFragment>,
    /// Number of aggregated entries per category label.
    pub entries: BTreeMap<String, usize>,
    /// Diff of the changelog, only for dry runs.
    pub preview: Option<ChangePreview>,
    /// Run history lines, as flushed (or as they would have been).
    pub history: Vec<String>,
    /// Output of the version-control commands.
    pub vcs_output: Vec<String>,
    pub pushed: bool,
}

impl GenerateReport {
    pub(crate) fn new(status: GenerateStatus) -> Self {
        Self {
            status,
            version: None,
            fragments: Vec::new(),
            skipped: Vec::new(),
            entries: BTreeMap::new(),
            preview: None,
            history: Vec::new(),
            vcs_output: Vec::new(),
            pushed: false,
        }
    }

    pub(crate) fn count_entries(&mut self, aggregated: &AggregatedChangelog) {
        for category in Category::ALL {
            self.entries
                .insert(category.label().to_string(), aggregated.len(category));
        }
    }

    /// Total aggregated entries across categories.
    pub fn total_entries(&self) -> usize {
        self.entries.values().sum()
    }
}

/// A pending fragment as shown by `list` and `check`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PendingFragment {
    pub id: String,
    pub author: Option<String>,
    /// Bullet count per category label.
    pub entries: BTreeMap<String, usize>,
    /// Parse failure, if any.
    pub error: Option<String>,
}

impl PendingFragment {
    pub(crate) fn parsed(id: String, author: Option<String>, content: &CategorizedContent) -> Self {
        let entries = content
            .iter()
            .map(|(category, text)| (category.label().to_string(), count_bullets(text)))
            .collect();
        Self {
            id,
            author,
            entries,
            error: None,
        }
    }

    pub(crate) fn malformed(id: String, reason: String) -> Self {
        Self {
            id,
            author: None,
            entries: BTreeMap::new(),
            error: Some(reason),
        }
    }

    pub fn is_malformed(&self) -> bool {
        self.error.is_some()
    }

    /// `true` when the fragment contributes nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.values().all(|n| *n == 0)
    }
}

/// Number of list items in a category slot.
///
/// Text that has no list markers but is not blank counts as one entry.
fn count_bullets(text: &str) -> usize {
    let bullets = text
        .lines()
        .filter(|line| {
            let line = line.trim_start();
            ["- ", "* ", "+ "].iter().any(|m| line.starts_with(m))
        })
        .count();
    if bullets == 0 && !text.trim().is_empty() {
        1
    } else {
        bullets
    }
}

/// Result of validating fragments and the changelog without changing them.
#[derive(Clone, Debug, Serialize)]
pub struct CheckReport {
    pub fragments: Vec<PendingFragment>,
    /// Latest version found in the changelog.
    pub version: Option<String>,
    pub problems: Vec<String>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.problems.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bullets_are_counted() {
        assert_eq!(count_bullets(""), 0);
        assert_eq!(count_bullets("- a\n- b\n"), 2);
        assert_eq!(count_bullets("* a\n  continued\n+ b\n"), 2);
        assert_eq!(count_bullets("Some prose.\n"), 1);
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&GenerateStatus::NoChanges).unwrap();
        assert_eq!(json, "\"no_changes\"");
    }

    #[test]
    fn report_totals() {
        let mut aggregated = AggregatedChangelog::new();
        aggregated.push(Category::Added, "- a\n");
        aggregated.push(Category::Fixed, "- b\n");
        aggregated.push(Category::Fixed, "- c\n");

        let mut report = GenerateReport::new(GenerateStatus::DryRun);
        report.count_entries(&aggregated);
        assert_eq!(report.entries["Fixed"], 2);
        assert_eq!(report.entries["Changed"], 0);
        assert_eq!(report.total_entries(), 3);
    }
}
