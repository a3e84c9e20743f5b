//! Error types for the merge crate.

/// Errors that can occur while merging into a changelog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MergeError {
    /// The document has no `## [x.y.z]` heading to merge into.
    #[error("no version section found in changelog (expected a heading like `## [1.0.0]`)")]
    NoVersionSection,
}

/// Convenience alias for merge results.
pub type MergeResult<T> = Result<T, MergeError>;
