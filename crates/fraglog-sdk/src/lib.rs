//! High-level API for fraglog.
//!
//! Wires the parse, merge, store, and version-control crates into the
//! changelog generation pipeline. This is the main entry point for the CLI
//! and for applications embedding fraglog.

pub mod config;
pub mod error;
pub mod generator;
pub mod report;

pub use config::{FraglogConfig, MalformedPolicy};
pub use error::{SdkError, SdkResult};
pub use generator::{new_fragment, pending, Generator};
pub use report::{CheckReport, GenerateReport, GenerateStatus, PendingFragment, SkippedFragment};

// Re-export key types
pub use fraglog_merge::{ChangePreview, DiffLine};
pub use fraglog_types::{AggregatedChangelog, Category, Fragment};
