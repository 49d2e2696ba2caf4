//! Error types for bumpr-hub.

use std::path::PathBuf;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while installing or running `hub`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No pinned `hub` build exists for this machine.
    #[error("no hub release available for {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    /// Downloading the release archive failed.
    #[error("failed to download hub: {0}")]
    Download(#[from] reqwest::Error),

    /// The release archive did not contain the expected binary.
    #[error("hub binary not found in release archive at {0}")]
    MissingBinary(PathBuf),

    /// `hub` printed something we could not interpret.
    #[error("unexpected output from hub: {0}")]
    UnexpectedOutput(String),

    /// A `hub` subprocess failed.
    #[error(transparent)]
    Process(#[from] bumpr_core::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
