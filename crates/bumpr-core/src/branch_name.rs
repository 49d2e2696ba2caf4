//! Feature branch naming.
//!
//! The feature branch is built from a user-supplied or manifest-derived
//! suffix and later passed as an argument to `git` and `hub`, so it is
//! validated against git's ref rules and rejects shell metacharacters.

use std::fmt;

use crate::error::{Error, Result};

/// Prefix shared by every branch this tool creates.
pub const UPDATE_BRANCH_PREFIX: &str = "update-dependencies-";

/// A validated git branch name.
///
/// # Examples
///
/// ```
/// use bumpr_core::BranchName;
///
/// let name = BranchName::for_update("web-app").unwrap();
/// assert_eq!(name.as_str(), "update-dependencies-web-app");
///
/// assert!(BranchName::new("../etc/passwd").is_err());
/// assert!(BranchName::new("name;rm -rf").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BranchName(String);

impl BranchName {
    /// Create a new validated branch name.
    ///
    /// # Errors
    /// Returns [`Error::InvalidBranchName`] if the name violates git's
    /// branch naming rules or contains dangerous characters.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate(&name)?;
        Ok(Self(name))
    }

    /// Name of the feature branch for a given suffix.
    ///
    /// # Errors
    /// Returns [`Error::InvalidBranchName`] if the suffix produces an
    /// invalid name.
    pub fn for_update(suffix: &str) -> Result<Self> {
        Self::new(format!("{UPDATE_BRANCH_PREFIX}{suffix}"))
    }

    /// Get the branch name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Turn an npm package name into something usable inside a branch name.
///
/// `@acme/web-app` becomes `acme-web-app`.
#[must_use]
pub fn suffix_from_package(name: &str) -> String {
    name.trim()
        .trim_start_matches('@')
        .replace('/', "-")
}

fn invalid(name: &str, reason: impl Into<String>) -> Error {
    Error::InvalidBranchName {
        name: name.to_string(),
        reason: reason.into(),
    }
}

fn validate(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(invalid(name, "branch name cannot be empty"));
    }
    if name == "@" {
        return Err(invalid(name, "branch name cannot be '@'"));
    }
    if name.starts_with('.') || name.ends_with('.') {
        return Err(invalid(name, "branch name cannot start or end with '.'"));
    }
    #[allow(clippy::case_sensitive_file_extension_comparisons)]
    if name.ends_with(".lock") {
        return Err(invalid(name, "branch name cannot end with '.lock'"));
    }
    if name.starts_with('/') || name.ends_with('/') {
        return Err(invalid(name, "branch name cannot start or end with '/'"));
    }

    for pattern in ["..", "//", "@{", "/."] {
        if name.contains(pattern) {
            return Err(invalid(name, format!("branch name cannot contain '{pattern}'")));
        }
    }

    for c in name.chars() {
        if c.is_ascii_control() {
            return Err(invalid(name, "branch name cannot contain control characters"));
        }
        if matches!(c, ' ' | '~' | '^' | ':' | '?' | '*' | '[') {
            return Err(invalid(name, format!("branch name cannot contain '{c}'")));
        }
        if matches!(
            c,
            '$' | ';' | '|' | '&' | '>' | '<' | '`' | '\\' | '"' | '\'' | '(' | ')' | '{' | '}'
                | '!'
        ) {
            return Err(invalid(
                name,
                format!("branch name cannot contain shell metacharacter '{c}'"),
            ));
        }
    }

    Ok(())
}
