//! # bumpr-core
//!
//! Core library for bumpr: run configuration, the npm manifest, feature
//! branch naming, and execution of external tools with command echoing.

pub mod branch_name;
pub mod config;
pub mod error;
pub mod manifest;
pub mod npm;
pub mod process;
pub mod traits;

pub use branch_name::BranchName;
pub use config::{
    AuditLevel, Config, EnvSettings, Identity, PublishTarget, RemoteRepo, Settings, TestPolicy,
    UpdateStrategy,
};
pub use error::{Error, Result};
pub use manifest::Manifest;
pub use npm::Npm;
pub use traits::{PackageManager, TestOutcome};
