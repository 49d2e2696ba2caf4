//! Run configuration.
//!
//! Everything the pipeline needs is assembled here once, before any git or
//! network operation: environment variables, the optional `.bumpr.toml`
//! settings file, the npm manifest and the origin remote. The resulting
//! [`Config`] is immutable for the rest of the run.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::branch_name::{BranchName, suffix_from_package};
use crate::error::{Error, Result};
use crate::manifest::Manifest;

/// Settings file looked up in the repository root.
pub const SETTINGS_FILE: &str = ".bumpr.toml";

/// Hosting server used when `GITHUB_HOST` is unset.
pub const DEFAULT_HOST: &str = "github.com";

/// Integration branch used when nothing else is configured.
pub const DEFAULT_BRANCH: &str = "master";

/// Commit message for dependency updates.
pub const DEFAULT_COMMIT_MESSAGE: &str = "chore(deps): update dependencies and apply audit fixes";

/// Title of the pull request opened for a feature branch.
pub const DEFAULT_PR_TITLE: &str = "Update dependencies and fix vulnerabilities";

/// Minimum severity passed to `npm audit --audit-level`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuditLevel {
    Low,
    Moderate,
    #[default]
    High,
    Critical,
}

impl AuditLevel {
    /// The value npm expects.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl FromStr for AuditLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "moderate" => Ok(Self::Moderate),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            other => Err(Error::InvalidConfig {
                key: "AUDIT_LEVEL".into(),
                reason: format!("'{other}' is not one of low, moderate, high, critical"),
            }),
        }
    }
}

impl fmt::Display for AuditLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How manifest versions get bumped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStrategy {
    /// Delete the lockfile and rewrite ranges with `npm-check-updates`.
    CheckUpdates,
    /// Let the Angular CLI update everything (`ng update --all --force`).
    AngularUpdate,
}

/// Where the resulting commit goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishTarget {
    /// Commit on the default branch and push it directly.
    DefaultBranch,
    /// Commit on a feature branch and open a pull request.
    PullRequest {
        /// The feature branch.
        branch: BranchName,
    },
}

/// What a failing test run means for the commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TestPolicy {
    /// Log the failure and commit anyway.
    #[default]
    Tolerate,
    /// Abort before committing.
    Require,
}

/// Commit author identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

/// Owner and name of a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRepo {
    pub owner: String,
    pub name: String,
}

/// Optional settings loaded from `.bumpr.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub default_branch: Option<String>,
    pub audit_level: Option<String>,
    pub tools_dir: Option<PathBuf>,
    pub commit_message: Option<String>,
    pub pr_title: Option<String>,
}

impl Settings {
    /// Load settings from a TOML file, returning defaults if it is absent.
    ///
    /// # Errors
    /// Returns error if file can't be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

/// Raw values read from the process environment.
///
/// Construction validates that the credential and identity are present.
#[derive(Debug)]
pub struct EnvSettings {
    token: SecretString,
    identity: Identity,
    org: Option<String>,
    repo: Option<String>,
    host: Option<String>,
    default_branch: Option<String>,
    audit_level: Option<String>,
    tools_dir: Option<PathBuf>,
    update_master: bool,
    upgrade_angular: bool,
    only_fix_vulnerabilities: bool,
    require_passing_tests: bool,
}

impl EnvSettings {
    /// Read settings through `lookup` (normally `std::env::var`).
    ///
    /// Empty values are treated as unset. Flags are enabled only by the
    /// exact string `true`.
    ///
    /// # Errors
    /// Returns [`Error::MissingConfig`] naming every missing required
    /// variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let flag = |key: &str| lookup(key).is_some_and(|v| v == "true");

        let token = get("GITHUB_TOKEN").or_else(|| get("GH_TOKEN"));
        let email = get("GITHUB_EMAIL");
        let name = get("GITHUB_NAME");

        let mut missing = Vec::new();
        if token.is_none() {
            missing.push("GITHUB_TOKEN (or GH_TOKEN)".to_string());
        }
        if email.is_none() {
            missing.push("GITHUB_EMAIL".to_string());
        }
        if name.is_none() {
            missing.push("GITHUB_NAME".to_string());
        }

        let (Some(token), Some(email), Some(name)) = (token, email, name) else {
            return Err(Error::MissingConfig(missing));
        };

        Ok(Self {
            token: SecretString::from(token),
            identity: Identity { name, email },
            org: get("GITHUB_ORG"),
            repo: get("GITHUB_REPO"),
            host: get("GITHUB_HOST"),
            default_branch: get("DEFAULT_BRANCH"),
            audit_level: get("AUDIT_LEVEL"),
            tools_dir: get("BUMPR_TOOLS_DIR").map(PathBuf::from),
            update_master: flag("UPDATE_MASTER"),
            upgrade_angular: flag("UPGRADE_ANGULAR"),
            only_fix_vulnerabilities: flag("ONLY_FIX_VULNERABILITIES"),
            require_passing_tests: flag("REQUIRE_PASSING_TESTS"),
        })
    }

    /// Read settings from the real process environment.
    ///
    /// # Errors
    /// See [`EnvSettings::from_lookup`].
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

/// Fully resolved configuration for one run.
#[derive(Debug)]
pub struct Config {
    pub token: SecretString,
    pub identity: Identity,
    pub host: String,
    pub org: String,
    pub repo: String,
    pub default_branch: String,
    pub update: UpdateStrategy,
    pub publish: PublishTarget,
    /// `Some` when the vulnerability gate is enabled.
    pub audit_gate: Option<AuditLevel>,
    pub test_policy: TestPolicy,
    pub tools_dir: PathBuf,
    pub commit_message: String,
    pub pr_title: String,
}

impl Config {
    /// Combine all configuration sources and compute defaults.
    ///
    /// Precedence is environment, then settings file, then built-in
    /// defaults. `suffix` is the optional command-line branch suffix.
    ///
    /// # Errors
    /// Returns [`Error::MissingConfig`] when the organization or repository
    /// cannot be determined, or [`Error::InvalidConfig`] /
    /// [`Error::InvalidBranchName`] for unusable values.
    pub fn resolve(
        env: EnvSettings,
        settings: Settings,
        manifest: &Manifest,
        origin: Option<&RemoteRepo>,
        suffix: Option<&str>,
    ) -> Result<Self> {
        let org = env
            .org
            .or_else(|| origin.map(|o| o.owner.clone()))
            .ok_or_else(|| Error::MissingConfig(vec!["GITHUB_ORG".into()]))?;

        let repo = env
            .repo
            .or_else(|| manifest.unscoped_name().map(String::from))
            .or_else(|| origin.map(|o| o.name.clone()))
            .ok_or_else(|| Error::MissingConfig(vec!["GITHUB_REPO".into()]))?;

        let default_branch = env
            .default_branch
            .or(settings.default_branch)
            .unwrap_or_else(|| DEFAULT_BRANCH.to_string());
        BranchName::new(default_branch.as_str())?;

        let publish = if env.update_master {
            PublishTarget::DefaultBranch
        } else {
            let suffix = suffix
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .or_else(|| manifest.name.as_deref().map(suffix_from_package))
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| repo.clone());
            PublishTarget::PullRequest {
                branch: BranchName::for_update(&suffix)?,
            }
        };

        let audit_gate = if env.only_fix_vulnerabilities {
            Some(
                env.audit_level
                    .or(settings.audit_level)
                    .map(|level| level.parse::<AuditLevel>())
                    .transpose()?
                    .unwrap_or_default(),
            )
        } else {
            None
        };

        let update = if env.upgrade_angular {
            UpdateStrategy::AngularUpdate
        } else {
            UpdateStrategy::CheckUpdates
        };

        let test_policy = if env.require_passing_tests {
            TestPolicy::Require
        } else {
            TestPolicy::Tolerate
        };

        Ok(Self {
            token: env.token,
            identity: env.identity,
            host: env.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            org,
            repo,
            default_branch,
            update,
            publish,
            audit_gate,
            test_policy,
            tools_dir: env
                .tools_dir
                .or(settings.tools_dir)
                .unwrap_or_else(|| std::env::temp_dir().join("bumpr-tools")),
            commit_message: settings
                .commit_message
                .unwrap_or_else(|| DEFAULT_COMMIT_MESSAGE.to_string()),
            pr_title: settings
                .pr_title
                .unwrap_or_else(|| DEFAULT_PR_TITLE.to_string()),
        })
    }

    /// Branch the commit is made on.
    #[must_use]
    pub fn working_branch(&self) -> &str {
        match &self.publish {
            PublishTarget::DefaultBranch => &self.default_branch,
            PublishTarget::PullRequest { branch } => branch.as_str(),
        }
    }

    /// Remote URL without credentials, safe to log.
    #[must_use]
    pub fn remote_url(&self) -> String {
        format!("https://{}/{}/{}.git", self.host, self.org, self.repo)
    }

    /// Remote URL carrying the token.
    #[must_use]
    pub fn authenticated_remote_url(&self) -> SecretString {
        SecretString::from(format!(
            "https://{}@{}/{}/{}.git",
            self.token.expose_secret(),
            self.host,
            self.org,
            self.repo
        ))
    }
}
