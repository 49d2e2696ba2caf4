//! # bumpr-hub
//!
//! GitHub integration for bumpr, driven through the `hub` command-line
//! helper: pull request lookup and creation, branch sync, and on-demand
//! installation of a pinned `hub` release.
//!
//! # Security
//!
//! The token is held as a `SecretString` and handed to `hub` only through
//! its environment, never on the command line.

mod auth;
mod error;
mod hub;
mod install;
mod traits;
mod types;

pub use auth::Auth;
pub use error::{Error, Result};
pub use hub::HubCli;
pub use install::{DEFAULT_RELEASE_URL, HUB_VERSION, Installer};
// Re-export SecretString for constructing Auth
pub use secrecy::SecretString;
pub use traits::HostingOps;
pub use types::{CreatePullRequest, PullRequest};
