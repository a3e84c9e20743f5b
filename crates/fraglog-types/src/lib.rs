//! Foundation types for fraglog.
//!
//! fraglog collects small per-change "fragment" files and merges their
//! categorized entries into the latest version section of a changelog.
//! This crate holds the data model shared by every other fraglog crate.
//!
//! # Key Types
//!
//! - [`Category`]: One of the three fixed change types (Added, Changed, Fixed)
//! - [`Fragment`]: A parsed fragment: metadata header plus body text
//! - [`CategorizedContent`]: Exactly three text slots, one per category
//! - [`CategoryBlock`]: A category chunk together with its byte span in the source
//! - [`AggregatedChangelog`]: Entries gathered across many fragments

pub mod category;
pub mod content;
pub mod error;
pub mod fragment;
pub mod template;

pub use category::{Category, DOCUMENT_GRANULARITY, FRAGMENT_GRANULARITY, HEADING_MARKER};
pub use content::{AggregatedChangelog, CategorizedContent, CategoryBlock};
pub use error::TypeError;
pub use fragment::{Fragment, Metadata, HEADER_MARKER};
pub use template::{fragment_template, AUTHOR_PLACEHOLDER};
