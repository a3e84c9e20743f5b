//! Changelog merge engine for fraglog.
//!
//! Locates the latest version section of a changelog, reads its existing
//! Added/Changed/Fixed blocks, and splices aggregated fragment entries into
//! those blocks by byte span. Every byte outside the edited spans is left
//! untouched.
//!
//! # Key Types
//!
//! - [`LatestSection`] -- Spans of the newest version section and its category blocks
//! - [`MergeOutcome`] -- Rewritten document plus what changed
//! - [`ChangePreview`] / [`DiffHunk`] / [`DiffLine`] -- Line diff of a pending rewrite

pub mod error;
pub mod extract;
pub mod merge;
pub mod preview;

pub use error::{MergeError, MergeResult};
pub use extract::{extract_latest_section, LatestSection};
pub use merge::{escape_headings, merge_and_rewrite, merge_into_document, MergeOutcome};
pub use preview::{preview, ChangePreview, DiffHunk, DiffLine};
