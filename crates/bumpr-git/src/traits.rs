//! Trait abstractions for git operations.
//!
//! This module defines the `GitOps` trait which abstracts git operations,
//! enabling dependency injection and testability.

use std::path::Path;

use git2::Oid;

use crate::Result;

/// Trait for git repository operations.
///
/// Note: git operations are synchronous since git2 is a synchronous
/// library and pushes block on the `git` subprocess.
#[allow(clippy::missing_errors_doc)]
pub trait GitOps {
    // === Repository Info ===

    /// Get the working directory path.
    fn workdir(&self) -> Option<&Path>;

    // === Remote Configuration ===

    /// Point a remote at a new URL.
    fn set_remote_url(&self, remote: &str, url: &str) -> Result<()>;

    // === Branch Operations ===

    /// Checkout a branch, creating it from `origin/<branch>` if only the
    /// remote-tracking branch exists.
    fn checkout(&self, branch: &str) -> Result<()>;

    /// Create a branch at HEAD and switch to it.
    fn create_and_checkout(&self, branch: &str) -> Result<()>;

    // === Working Directory ===

    /// Paths among `paths` whose working-tree content differs from the
    /// index. Untracked files are not reported.
    fn changed_files(&self, paths: &[&str]) -> Result<Vec<String>>;

    /// Set the repository-local commit identity.
    fn configure_identity(&self, name: &str, email: &str) -> Result<()>;

    /// Stage modifications and deletions of tracked files only.
    fn stage_tracked(&self) -> Result<()>;

    /// Create a commit on HEAD from the index.
    fn commit(&self, message: &str) -> Result<Oid>;

    // === Remote Operations ===

    /// Push a branch to origin.
    fn push(&self, branch: &str, force: bool) -> Result<()>;
}
