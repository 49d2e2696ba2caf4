//! Trait abstractions for package manager operations.
//!
//! This module defines the `PackageManager` trait which abstracts the npm
//! tooling, enabling dependency injection and testability.

use crate::Result;
use crate::config::{AuditLevel, UpdateStrategy};

/// Result of running the project's test suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestOutcome {
    Passed,
    Failed {
        /// Exit code of the test command, `None` when killed by a signal.
        code: Option<i32>,
    },
}

/// Trait for package manager operations.
///
/// All commands run in the project root. Methods returning `Result<()>` fail
/// with [`crate::Error::CommandFailed`] when the underlying tool exits
/// non-zero.
#[allow(clippy::missing_errors_doc)]
pub trait PackageManager {
    /// Bump manifest versions using the given strategy.
    fn update_dependencies(&self, strategy: UpdateStrategy) -> Result<()>;

    /// Install dependencies, regenerating the lockfile.
    fn install(&self) -> Result<()>;

    /// Audit installed dependencies.
    ///
    /// Returns `true` when no vulnerability at or above `level` is reported.
    /// A failing audit is not an error.
    fn audit(&self, level: AuditLevel) -> Result<bool>;

    /// Apply automatic vulnerability fixes.
    fn audit_fix(&self) -> Result<()>;

    /// Run the project's build script, if it has one.
    fn build(&self) -> Result<()>;

    /// Run the project's tests. A failing suite is reported, not raised.
    fn test(&self) -> Result<TestOutcome>;
}
