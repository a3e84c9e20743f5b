//! Error types for the parse crate.

/// Errors that can occur while parsing a fragment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The `---` header block is missing or one of its lines is not `key: value`.
    #[error("malformed fragment: {reason}")]
    MalformedFragment { reason: String },
}

impl ParseError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedFragment {
            reason: reason.into(),
        }
    }
}

/// Convenience alias for parse results.
pub type ParseResult<T> = Result<T, ParseError>;
