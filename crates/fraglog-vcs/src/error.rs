use thiserror::Error;

#[derive(Debug, Error)]
pub enum VcsError {
    #[error("no {0} provided for the commit identity")]
    MissingIdentity(&'static str),

    #[error("no commit message provided")]
    EmptyMessage,

    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },
}

pub type VcsResult<T> = Result<T, VcsError>;
