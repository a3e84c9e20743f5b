//! Category splitting.
//!
//! Cuts text into chunks at markdown headings of a fixed depth (the marker
//! granularity): `# Added` in fragment bodies, `### Added` in changelog
//! sections. Each chunk is tagged with the category named by its own
//! heading, so a fragment that lists its headings out of order, or adds
//! headings of its own, never has content filed under the wrong category.
//!
//! Line rules for granularity `n`:
//!
//! - exactly `n` `#` then whitespace or end of line: category heading
//! - fewer than `n` `#` then whitespace: a higher-level heading, closes the
//!   current chunk
//! - more than `n` `#`: ordinary content
//! - anything inside a fenced code block: ordinary content
//!
//! Text before the first category heading is discarded.

use std::ops::Range;

use fraglog_types::{CategorizedContent, Category, CategoryBlock, HEADING_MARKER};
use tracing::debug;

/// What a chunk's heading named.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HeadingKind {
    Category(Category),
    /// A heading at the split depth whose label is not a category.
    Unknown(String),
}

/// One heading-delimited chunk after normalization.
///
/// `text == source[span]`. Empty chunks have an empty span at `heading_end`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    pub kind: HeadingKind,
    pub text: String,
    pub span: Range<usize>,
    pub heading_end: usize,
}

enum LineKind<'a> {
    Heading(&'a str),
    Boundary,
    Content,
}

fn classify(line: &str, granularity: usize) -> LineKind<'_> {
    let line = line.trim_end_matches(['\n', '\r']);
    let depth = line.chars().take_while(|c| *c == HEADING_MARKER).count();
    if depth == 0 {
        return LineKind::Content;
    }
    let rest = &line[depth..];
    if !(rest.is_empty() || rest.starts_with([' ', '\t'])) {
        return LineKind::Content;
    }
    if depth == granularity {
        LineKind::Heading(rest.trim())
    } else if depth < granularity {
        LineKind::Boundary
    } else {
        LineKind::Content
    }
}

fn is_fence(line: &str) -> bool {
    let line = line.trim_start();
    line.starts_with("```") || line.starts_with("~~~")
}

/// Trim a raw chunk body to its content lines.
///
/// Leading blank lines are dropped. Trailing blank lines are dropped too,
/// which leaves exactly the newline of the last content line. A blank-only
/// body yields an empty range at `range.start`.
fn normalize(text: &str, range: Range<usize>) -> Range<usize> {
    let mut first = None;
    let mut last_end = range.start;
    let mut offset = range.start;

    for line in text[range.clone()].split_inclusive('\n') {
        if !line.trim().is_empty() {
            first.get_or_insert(offset);
            last_end = offset + line.len();
        }
        offset += line.len();
    }

    match first {
        Some(start) => start..last_end,
        None => range.start..range.start,
    }
}

/// Split `text` into tagged, normalized chunks at headings of depth `granularity`.
pub fn split_chunks(text: &str, granularity: usize) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut open: Option<(HeadingKind, usize)> = None;
    let mut in_fence = false;
    let mut offset = 0usize;

    let close = |open: Option<(HeadingKind, usize)>, end: usize, chunks: &mut Vec<Chunk>| {
        if let Some((kind, heading_end)) = open {
            let span = normalize(text, heading_end..end);
            chunks.push(Chunk {
                kind,
                text: text[span.clone()].to_string(),
                span,
                heading_end,
            });
        }
    };

    for line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();

        if is_fence(line) {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }

        match classify(line, granularity) {
            LineKind::Heading(label) => {
                close(open.take(), line_start, &mut chunks);
                let kind = match Category::from_label(label) {
                    Some(category) => HeadingKind::Category(category),
                    None => HeadingKind::Unknown(label.to_string()),
                };
                open = Some((kind, offset));
            }
            LineKind::Boundary => close(open.take(), line_start, &mut chunks),
            LineKind::Content => {}
        }
    }
    close(open.take(), text.len(), &mut chunks);

    chunks
}

/// Locate every category block in `text`, dropping unknown headings.
///
/// A category may appear more than once; every occurrence is returned in
/// source order.
pub fn category_blocks(text: &str, granularity: usize) -> Vec<CategoryBlock> {
    split_chunks(text, granularity)
        .into_iter()
        .filter_map(|chunk| match chunk.kind {
            HeadingKind::Category(category) => Some(CategoryBlock {
                category,
                text: chunk.text,
                span: chunk.span,
                heading_end: chunk.heading_end,
            }),
            HeadingKind::Unknown(label) => {
                debug!(%label, "dropping chunk under unknown heading");
                None
            }
        })
        .collect()
}

/// Split `text` into its three category slots.
///
/// Repeated headings of one category are concatenated in source order.
/// Text without category headings yields three empty slots.
pub fn split_by_category(text: &str, granularity: usize) -> CategorizedContent {
    let mut content = CategorizedContent::new();
    for block in category_blocks(text, granularity) {
        content[block.category].push_str(&block.text);
    }
    content
}
