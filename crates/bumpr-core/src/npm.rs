//! npm-backed [`PackageManager`].

use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Command;

use tracing::info;

use crate::config::{AuditLevel, UpdateStrategy};
use crate::error::Result;
use crate::manifest::LOCKFILE;
use crate::process;
use crate::traits::{PackageManager, TestOutcome};

/// Runs `npm` and `npx` in a project directory.
#[derive(Debug, Clone)]
pub struct Npm {
    dir: PathBuf,
    npm: OsString,
    npx: OsString,
}

impl Npm {
    /// Use the `npm` and `npx` found on `PATH`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_programs(dir, "npm", "npx")
    }

    /// Use specific `npm` and `npx` executables.
    pub fn with_programs(
        dir: impl Into<PathBuf>,
        npm: impl Into<OsString>,
        npx: impl Into<OsString>,
    ) -> Self {
        Self {
            dir: dir.into(),
            npm: npm.into(),
            npx: npx.into(),
        }
    }

    fn npm<const N: usize>(&self, args: [&str; N]) -> Command {
        let mut cmd = Command::new(&self.npm);
        cmd.args(args).current_dir(&self.dir);
        cmd
    }

    fn npx<const N: usize>(&self, args: [&str; N]) -> Command {
        let mut cmd = Command::new(&self.npx);
        cmd.args(args).current_dir(&self.dir);
        cmd
    }

    fn remove_lockfile(&self) -> Result<()> {
        info!(target: "bumpr::cmd", "+ rm -f {LOCKFILE}");
        match fs::remove_file(self.dir.join(LOCKFILE)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

impl PackageManager for Npm {
    fn update_dependencies(&self, strategy: UpdateStrategy) -> Result<()> {
        match strategy {
            UpdateStrategy::CheckUpdates => {
                // npm-check-updates picks up .ncurc.* from the working directory
                self.remove_lockfile()?;
                process::run(&mut self.npx(["--yes", "npm-check-updates", "-u"]))
            }
            UpdateStrategy::AngularUpdate => {
                process::run(&mut self.npx(["ng", "update", "--all", "--force"]))
            }
        }
    }

    fn install(&self) -> Result<()> {
        process::run(&mut self.npm(["install"]))
    }

    fn audit(&self, level: AuditLevel) -> Result<bool> {
        let flag = format!("--audit-level={level}");
        let status = process::status(&mut self.npm(["audit", flag.as_str()]))?;
        Ok(status.success())
    }

    fn audit_fix(&self) -> Result<()> {
        process::run(&mut self.npm(["audit", "fix"]))
    }

    fn build(&self) -> Result<()> {
        process::run(&mut self.npm(["run", "build", "--if-present"]))
    }

    fn test(&self) -> Result<TestOutcome> {
        let status = process::status(&mut self.npm(["test"]))?;
        if status.success() {
            Ok(TestOutcome::Passed)
        } else {
            Ok(TestOutcome::Failed {
                code: status.code(),
            })
        }
    }
}
