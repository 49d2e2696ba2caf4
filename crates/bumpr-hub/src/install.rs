//! On-demand installation of the `hub` helper.

use std::fs;
use std::io::{Read, Write};
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Pinned `hub` release.
pub const HUB_VERSION: &str = "2.14.2";

/// Where `hub` release archives are published.
pub const DEFAULT_RELEASE_URL: &str = "https://github.com/github/hub/releases/download";

/// Ensures a `hub` binary is available, downloading it if necessary.
pub struct Installer {
    client: Client,
    tools_dir: PathBuf,
    release_url: String,
    version: String,
}

impl Installer {
    /// Create an installer that places `hub` in `tools_dir`.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(tools_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::with_release_url(tools_dir, DEFAULT_RELEASE_URL)
    }

    /// Create an installer downloading from a custom release mirror.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn with_release_url(
        tools_dir: impl Into<PathBuf>,
        release_url: impl Into<String>,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("bumpr"));
        let client = Client::builder().default_headers(headers).build()?;
        let release_url: String = release_url.into();

        Ok(Self {
            client,
            tools_dir: tools_dir.into(),
            release_url: release_url.trim_end_matches('/').to_string(),
            version: HUB_VERSION.to_string(),
        })
    }

    /// Path `hub` is installed to when it is not on `PATH`.
    #[must_use]
    pub fn installed_path(&self) -> PathBuf {
        self.tools_dir.join("hub")
    }

    /// Return a usable `hub`, installing the pinned release if none exists.
    ///
    /// Nothing is written when `hub` is already on `PATH` or in the tools
    /// directory.
    ///
    /// # Errors
    /// Returns error if the download or unpacking fails, or the platform has
    /// no release.
    pub async fn ensure(&self) -> Result<PathBuf> {
        if let Ok(path) = which::which("hub") {
            debug!(path = %path.display(), "hub found on PATH");
            return Ok(path);
        }

        let installed = self.installed_path();
        if installed.is_file() {
            debug!(path = %installed.display(), "hub already installed");
            return Ok(installed);
        }

        self.install().await
    }

    /// Download and unpack the pinned release into the tools directory.
    ///
    /// # Errors
    /// See [`Installer::ensure`].
    pub async fn install(&self) -> Result<PathBuf> {
        let archive_name = archive_name(&self.version)?;
        let url = format!(
            "{}/v{}/{archive_name}.tgz",
            self.release_url, self.version
        );
        info!("installing hub {} from {url}", self.version);

        let bytes = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let binary = extract_binary(&bytes, &archive_name)?;

        // Stage next to the target so the final rename is atomic
        tokio::fs::create_dir_all(&self.tools_dir).await?;
        let mut staged = NamedTempFile::new_in(&self.tools_dir)?;
        staged.write_all(&binary)?;
        staged.as_file().sync_all()?;
        make_executable(staged.path())?;

        let target = self.installed_path();
        staged.persist(&target).map_err(|e| e.error)?;

        info!(path = %target.display(), "installed hub");
        Ok(target)
    }
}

/// Read `<archive_name>/bin/hub` out of a gzipped release tarball.
fn extract_binary(tgz: &[u8], archive_name: &str) -> Result<Vec<u8>> {
    let wanted = Path::new(archive_name).join("bin").join("hub");
    let mut archive = tar::Archive::new(GzDecoder::new(tgz));

    for entry in archive.entries()? {
        let mut entry = entry?;
        let path: PathBuf = entry
            .path()?
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect();
        if path == wanted && entry.header().entry_type().is_file() {
            let mut binary = Vec::new();
            entry.read_to_end(&mut binary)?;
            return Ok(binary);
        }
    }

    Err(Error::MissingBinary(wanted))
}

/// Release archive base name for this machine, e.g. `hub-linux-amd64-2.14.2`.
fn archive_name(version: &str) -> Result<String> {
    let (os, arch) = platform(std::env::consts::OS, std::env::consts::ARCH)?;
    Ok(format!("hub-{os}-{arch}-{version}"))
}

/// Map Rust's OS/arch names onto hub's release naming.
fn platform(os: &str, arch: &str) -> Result<(&'static str, &'static str)> {
    let unsupported = || Error::UnsupportedPlatform {
        os: os.to_string(),
        arch: arch.to_string(),
    };

    match os {
        "linux" => {
            let arch = match arch {
                "x86_64" => "amd64",
                "x86" => "386",
                "aarch64" => "arm64",
                "arm" => "arm",
                _ => return Err(unsupported()),
            };
            Ok(("linux", arch))
        }
        // Only an amd64 build is published for macOS; Apple silicon runs it
        // under Rosetta.
        "macos" => Ok(("darwin", "amd64")),
        "freebsd" => match arch {
            "x86_64" => Ok(("freebsd", "amd64")),
            "x86" => Ok(("freebsd", "386")),
            _ => Err(unsupported()),
        },
        _ => Err(unsupported()),
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
