//! Credentials handed to `hub`.

use std::process::Command;

use secrecy::{ExposeSecret, SecretString};

/// Token and host `hub` authenticates against.
#[derive(Debug)]
pub struct Auth {
    token: SecretString,
    host: String,
}

impl Auth {
    /// Create credentials for a hosting server.
    pub fn new(token: SecretString, host: impl Into<String>) -> Self {
        Self {
            token,
            host: host.into(),
        }
    }

    /// Pass the credentials to a `hub` invocation through its environment.
    pub(crate) fn apply(&self, cmd: &mut Command) {
        cmd.env("GITHUB_TOKEN", self.token.expose_secret())
            .env("GITHUB_HOST", &self.host);
    }
}
