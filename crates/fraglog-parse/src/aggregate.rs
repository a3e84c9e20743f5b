//! Collect categorized entries across fragments.

use fraglog_types::{AggregatedChangelog, Fragment, FRAGMENT_GRANULARITY};
use tracing::debug;

use crate::split::split_by_category;

/// Incremental aggregation over fragments in enumeration order.
///
/// Only non-empty slots are recorded, each terminated by a newline so that
/// entries can be concatenated. No deduplication, no sorting.
#[derive(Debug, Default)]
pub struct Aggregator {
    changelog: AggregatedChangelog,
    fragments: usize,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split `fragment`'s body and append its non-empty slots.
    pub fn push(&mut self, fragment: &Fragment) {
        let content = split_by_category(&fragment.body, FRAGMENT_GRANULARITY);
        for (category, text) in content.iter() {
            if text.is_empty() {
                continue;
            }
            debug!(fragment = %fragment.id, %category, "collected entry");
            let mut entry = text.to_string();
            if !entry.ends_with('\n') {
                entry.push('\n');
            }
            self.changelog.push(category, entry);
        }
        self.fragments += 1;
    }

    /// Number of fragments pushed so far.
    pub fn fragment_count(&self) -> usize {
        self.fragments
    }

    pub fn finish(self) -> AggregatedChangelog {
        self.changelog
    }
}

/// Aggregate a whole fragment set at once.
pub fn aggregate<'a>(fragments: impl IntoIterator<Item = &'a Fragment>) -> AggregatedChangelog {
    let mut aggregator = Aggregator::new();
    for fragment in fragments {
        aggregator.push(fragment);
    }
    aggregator.finish()
}
