//! # bumpr-git
//!
//! Git operations for bumpr. Local operations (checkout, branching, diff,
//! staging, commits) use git2-rs; pushes shell out to `git` so the
//! credentials embedded in the remote URL are handled by git itself.

mod error;
mod repository;
mod traits;

pub use error::{Error, Result};
pub use git2::Oid;
pub use repository::Repository;
pub use traits::GitOps;
