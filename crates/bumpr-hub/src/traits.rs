//! Trait abstractions for hosting operations.
//!
//! This module defines the `HostingOps` trait which abstracts the hosting
//! provider, enabling dependency injection and testability.

use crate::{CreatePullRequest, PullRequest, Result};

/// Trait for hosting provider operations.
///
/// Unlike an HTTP API client these calls are synchronous: each one blocks on
/// a `hub` subprocess.
#[allow(clippy::missing_errors_doc)]
pub trait HostingOps {
    /// Find an open pull request whose head is `branch`.
    ///
    /// Returns `None` if no open PR exists for the branch.
    fn find_pr_for_branch(&self, branch: &str) -> Result<Option<PullRequest>>;

    /// Create a pull request.
    fn create_pr(&self, pr: &CreatePullRequest) -> Result<PullRequest>;

    /// Fast-forward local branches to their upstream.
    fn sync(&self) -> Result<()>;
}
