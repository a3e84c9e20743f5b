use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown category: {0:?} (expected Added, Changed or Fixed)")]
    UnknownCategory(String),
}
