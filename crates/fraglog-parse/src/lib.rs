//! Fragment parsing for fraglog.
//!
//! Turns raw fragment text into structured data and gathers categorized
//! entries across many fragments. Everything here is a pure function over
//! text: no I/O, no shared state.
//!
//! # Key Items
//!
//! - [`parse_fragment`] / [`parse_named`] -- split the `---` metadata header from the body
//! - [`split_by_category`] / [`category_blocks`] -- cut text at category headings
//! - [`aggregate`] / [`Aggregator`] -- collect non-empty slots in enumeration order

pub mod aggregate;
pub mod error;
pub mod fragment;
pub mod split;

pub use aggregate::{aggregate, Aggregator};
pub use error::{ParseError, ParseResult};
pub use fragment::{parse_fragment, parse_named};
pub use split::{category_blocks, split_by_category, split_chunks, Chunk, HeadingKind};
