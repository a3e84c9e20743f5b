//! Span-based section merge.
//!
//! New entries for a category are appended after the category's existing
//! entries. Each edit targets the byte span recorded by
//! [`extract_latest_section`], so identical text elsewhere in the document
//! (an older release with the same bullet, say) is never touched.
//!
//! Entry lines that would read as structure once inside the changelog (a
//! `## ` or `### ` line, say) are escaped with a backslash, so every entry
//! stays inside the block it was merged into.

use std::borrow::Cow;
use std::ops::Range;

use fraglog_types::{AggregatedChangelog, Category, DOCUMENT_GRANULARITY, HEADING_MARKER};
use serde::Serialize;
use tracing::debug;

use crate::error::MergeResult;
use crate::extract::{extract_latest_section, LatestSection};

/// Result of merging an aggregation into a document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MergeOutcome {
    /// The rewritten document.
    pub document: String,
    /// Version of the section that received the entries.
    pub version: String,
    /// `false` when the aggregation was empty and `document` is the input.
    pub modified: bool,
    /// Entries merged into each category.
    pub added: usize,
    pub changed: usize,
    pub fixed: usize,
}

struct Edit {
    range: Range<usize>,
    text: String,
    seq: usize,
}

/// Rewrite `document` with `aggregated` appended to the latest section.
///
/// `section` must have been extracted from this exact `document`.
///
/// - a category with no new entries is not touched
/// - an existing block becomes `existing + entries`, with heading-like
///   entry lines escaped (see [`escape_headings`])
/// - an empty block is filled right after its heading line
/// - a category whose heading is missing gets a new `### <Category>` block
///   after the section's last non-blank line, in canonical order
///
/// An empty aggregation returns `document` unchanged.
pub fn merge_and_rewrite(
    document: &str,
    section: &LatestSection,
    aggregated: &AggregatedChangelog,
) -> String {
    let mut edits = Vec::new();
    let mut missing = Vec::new();

    for (seq, category) in Category::ALL.into_iter().enumerate() {
        let entries: String = aggregated
            .entries(category)
            .iter()
            .map(|entry| escape_headings(entry))
            .collect();
        if entries.is_empty() {
            continue;
        }

        match section.block(category) {
            Some(block) if block.text.is_empty() => {
                let mut text = String::new();
                if !document[..block.heading_end].ends_with('\n') {
                    text.push('\n');
                }
                text.push_str(&entries);
                edits.push(Edit {
                    range: block.heading_end..block.heading_end,
                    text,
                    seq,
                });
            }
            Some(block) => {
                let mut text = block.text.clone();
                if !text.ends_with('\n') {
                    text.push('\n');
                }
                text.push_str(&entries);
                edits.push(Edit {
                    range: block.span.clone(),
                    text,
                    seq,
                });
            }
            None => missing.push((category, entries)),
        }
    }

    if !missing.is_empty() {
        let at = content_end(document, section);
        let before = &document[..at];
        let mut text = String::new();
        if at > section.body.start {
            text.push_str(if before.ends_with('\n') { "\n" } else { "\n\n" });
        } else if !before.is_empty() && !before.ends_with('\n') {
            text.push('\n');
        }

        let blocks: Vec<String> = missing
            .iter()
            .map(|(category, entries)| {
                let mut block = format!("### {category}\n{entries}");
                if !block.ends_with('\n') {
                    block.push('\n');
                }
                block
            })
            .collect();
        text.push_str(&blocks.join("\n"));
        // Keep a blank line before a version heading that directly followed.
        if section.body.is_empty() && at < document.len() {
            text.push('\n');
        }

        debug!(count = missing.len(), at, "adding missing category headings");
        edits.push(Edit {
            range: at..at,
            text,
            seq: Category::ALL.len(),
        });
    }

    // Apply from the end so earlier offsets stay valid.
    edits.sort_by(|a, b| {
        b.range
            .start
            .cmp(&a.range.start)
            .then(b.seq.cmp(&a.seq))
    });

    let mut out = document.to_string();
    for edit in edits {
        out.replace_range(edit.range, &edit.text);
    }
    out
}

/// Escape entry lines that the changelog would read as headings.
///
/// A line of one to three `#` followed by whitespace (or nothing) would
/// close the category block or open a new one. Such lines get a leading
/// `\`, which renders as the literal text. Lines inside fenced code are
/// left alone.
pub fn escape_headings(entry: &str) -> Cow<'_, str> {
    let mut out = String::new();
    let mut copied = 0usize;
    let mut offset = 0usize;
    let mut in_fence = false;
    let mut escaped = false;

    for line in entry.split_inclusive('\n') {
        let start = offset;
        offset += line.len();

        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence || !is_structural(line) {
            continue;
        }
        out.push_str(&entry[copied..start]);
        out.push('\\');
        copied = start;
        escaped = true;
    }

    if !escaped {
        return Cow::Borrowed(entry);
    }
    out.push_str(&entry[copied..]);
    debug!("escaped heading-like lines in merged entries");
    Cow::Owned(out)
}

fn is_structural(line: &str) -> bool {
    let line = line.trim_end_matches(['\n', '\r']);
    let depth = line.chars().take_while(|c| *c == HEADING_MARKER).count();
    let rest = &line[depth..];
    (1..=DOCUMENT_GRANULARITY).contains(&depth) && (rest.is_empty() || rest.starts_with([' ', '\t']))
}

/// End offset of the last non-blank line of the section body, or the body
/// start if the body is blank.
fn content_end(document: &str, section: &LatestSection) -> usize {
    let mut end = section.body.start;
    let mut offset = section.body.start;
    for line in document[section.body.clone()].split_inclusive('\n') {
        offset += line.len();
        if !line.trim().is_empty() {
            end = offset;
        }
    }
    end
}

/// Extract the latest section of `document` and merge `aggregated` into it.
///
/// # Errors
///
/// [`crate::MergeError::NoVersionSection`] if the document has no version
/// heading. Nothing is computed past that point.
pub fn merge_into_document(
    document: &str,
    aggregated: &AggregatedChangelog,
) -> MergeResult<MergeOutcome> {
    let section = extract_latest_section(document)?;
    let merged = merge_and_rewrite(document, &section, aggregated);
    let modified = merged != document;

    debug!(
        version = %section.version,
        added = aggregated.len(Category::Added),
        changed = aggregated.len(Category::Changed),
        fixed = aggregated.len(Category::Fixed),
        modified,
        "merged aggregation into latest section"
    );

    Ok(MergeOutcome {
        document: merged,
        version: section.version,
        modified,
        added: aggregated.len(Category::Added),
        changed: aggregated.len(Category::Changed),
        fixed: aggregated.len(Category::Fixed),
    })
}
