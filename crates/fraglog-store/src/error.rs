use std::path::PathBuf;

/// Errors from fragment, document, and history storage.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested file does not exist.
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A fragment identifier that is not a plain file name.
    #[error("invalid fragment id: {0:?}")]
    InvalidId(String),

    /// Could not find a free fragment name.
    #[error("could not allocate a unique fragment name after {0} attempts")]
    NameExhausted(usize),

    /// Directory enumeration failed.
    #[error("directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Atomic rename of a temporary file failed.
    #[error("could not persist file: {0}")]
    Persist(#[from] tempfile::PersistError),

    /// I/O error from the underlying filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
