//! Error types for bumpr-core.

use std::path::PathBuf;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in bumpr-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// One or more required configuration values are absent.
    #[error("missing required environment: {}", .0.join(", "))]
    MissingConfig(Vec<String>),

    /// A configuration value is present but unusable.
    #[error("invalid value for {key}: {reason}")]
    InvalidConfig {
        /// The offending setting.
        key: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Invalid branch name.
    #[error("invalid branch name '{name}': {reason}")]
    InvalidBranchName {
        /// The invalid name.
        name: String,
        /// Why the name is invalid.
        reason: String,
    },

    /// No package.json in the working directory.
    #[error("no package.json found in {0}")]
    ManifestNotFound(PathBuf),

    /// An external command exited unsuccessfully.
    #[error("command failed ({}): {command}", exit_label(.code))]
    CommandFailed {
        /// The echoed command line.
        command: String,
        /// Exit code, `None` when killed by a signal.
        code: Option<i32>,
    },

    /// An external command could not be started.
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        /// Program that failed to launch.
        program: String,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error.
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Process exit code to report for this error.
    ///
    /// External command failures propagate the command's own code; everything
    /// else (configuration problems included) maps to 1.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::CommandFailed {
                code: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}

fn exit_label(code: &Option<i32>) -> String {
    code.map_or_else(|| "killed by signal".to_string(), |c| format!("exit {c}"))
}
