//! Error types for bumpr-git.

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during git operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Repository has no working directory.
    #[error("cannot run in a bare repository")]
    BareRepository,

    /// Branch not found locally or on origin.
    #[error("branch not found: {0}")]
    BranchNotFound(String),

    /// Remote not found.
    #[error("remote not found: {0}")]
    RemoteNotFound(String),

    /// Remote URL does not look like `<host>/<owner>/<repo>`.
    #[error("invalid remote URL: {0}")]
    InvalidRemoteUrl(String),

    /// A `git` subprocess failed.
    #[error(transparent)]
    Process(#[from] bumpr_core::Error),

    /// Underlying git2 error.
    #[error("git error: {0}")]
    Git2(#[from] git2::Error),
}
