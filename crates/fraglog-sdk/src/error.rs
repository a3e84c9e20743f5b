use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("fragment {id}: {source}")]
    Fragment {
        id: String,
        #[source]
        source: fraglog_parse::ParseError,
    },

    #[error("merge error: {0}")]
    Merge(#[from] fraglog_merge::MergeError),

    #[error("store error: {0}")]
    Store(#[from] fraglog_store::StoreError),

    #[error("version control error: {0}")]
    Vcs(#[from] fraglog_vcs::VcsError),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type SdkResult<T> = Result<T, SdkError>;
