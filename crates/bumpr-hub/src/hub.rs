//! `hub`-backed [`HostingOps`].

use std::path::PathBuf;
use std::process::Command;

use bumpr_core::process;

use crate::auth::Auth;
use crate::error::{Error, Result};
use crate::traits::HostingOps;
use crate::types::{CreatePullRequest, PullRequest};

/// Runs `hub` commands in a repository.
#[derive(Debug)]
pub struct HubCli {
    program: PathBuf,
    dir: PathBuf,
    auth: Auth,
}

impl HubCli {
    /// Create a client for the `hub` binary at `program`, operating on the
    /// repository in `dir`.
    pub fn new(program: impl Into<PathBuf>, dir: impl Into<PathBuf>, auth: Auth) -> Self {
        Self {
            program: program.into(),
            dir: dir.into(),
            auth,
        }
    }

    fn command<const N: usize>(&self, args: [&str; N]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(args).current_dir(&self.dir);
        self.auth.apply(&mut cmd);
        cmd
    }
}

impl HostingOps for HubCli {
    fn find_pr_for_branch(&self, branch: &str) -> Result<Option<PullRequest>> {
        let stdout = process::output(&mut self.command([
            "pr", "list", "--state", "open", "-h", branch, "-f", "%I %U%n",
        ]))?;

        stdout
            .lines()
            .find(|line| !line.trim().is_empty())
            .map(parse_pr_line)
            .transpose()
    }

    fn create_pr(&self, pr: &CreatePullRequest) -> Result<PullRequest> {
        let stdout = process::output(&mut self.command([
            "pull-request",
            "-b",
            pr.base.as_str(),
            "-h",
            pr.head.as_str(),
            "-m",
            pr.title.as_str(),
        ]))?;

        let url = stdout
            .lines()
            .map(str::trim)
            .rfind(|line| line.starts_with("http"))
            .ok_or_else(|| Error::UnexpectedOutput(stdout.trim().to_string()))?;
        parse_pr_url(url)
    }

    fn sync(&self) -> Result<()> {
        process::run(&mut self.command(["sync"]))?;
        Ok(())
    }
}

/// Parse a `%I %U` line from `hub pr list`.
fn parse_pr_line(line: &str) -> Result<PullRequest> {
    let unexpected = || Error::UnexpectedOutput(line.to_string());
    let (number, url) = line.trim().split_once(' ').ok_or_else(unexpected)?;

    Ok(PullRequest {
        number: number.parse().map_err(|_| unexpected())?,
        html_url: url.trim().to_string(),
    })
}

/// Parse the URL printed by `hub pull-request`.
fn parse_pr_url(url: &str) -> Result<PullRequest> {
    let number = url
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| Error::UnexpectedOutput(url.to_string()))?;

    Ok(PullRequest {
        number,
        html_url: url.to_string(),
    })
}
