//! The npm manifest (`package.json`) and its lockfile.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// File name of the dependency manifest.
pub const MANIFEST_FILE: &str = "package.json";

/// File name of the lockfile paired with the manifest.
pub const LOCKFILE: &str = "package-lock.json";

/// The two files whose changes decide whether there is anything to propose.
pub const TRACKED_FILES: [&str; 2] = [MANIFEST_FILE, LOCKFILE];

/// The subset of `package.json` this tool reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    /// Package name, possibly scoped (`@org/name`).
    #[serde(default)]
    pub name: Option<String>,
}

impl Manifest {
    /// Load `package.json` from a project directory.
    ///
    /// # Errors
    /// Returns [`Error::ManifestNotFound`] if the file does not exist, or a
    /// parse error if it is not valid JSON.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let path = dir.join(MANIFEST_FILE);
        if !path.exists() {
            return Err(Error::ManifestNotFound(dir.to_path_buf()));
        }

        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Package name without its npm scope (`@org/web` → `web`).
    #[must_use]
    pub fn unscoped_name(&self) -> Option<&str> {
        let name = self.name.as_deref()?.trim();
        let bare = name.rsplit('/').next().unwrap_or(name);
        (!bare.is_empty()).then_some(bare)
    }
}
