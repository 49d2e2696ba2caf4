//! `bumpr` run - Update dependencies and publish the result.

use anyhow::{Context, Result};
use bumpr_core::config::SETTINGS_FILE;
use bumpr_core::{Config, EnvSettings, Manifest, Npm, Settings};
use bumpr_git::{GitOps, Repository};
use bumpr_hub::{Auth, HubCli, Installer};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use super::Cli;
use crate::output;
use crate::services::{Outcome, PipelineService};

/// Run the full update.
pub fn run(cli: &Cli) -> Result<()> {
    // Validate the environment before touching the repository
    let env = EnvSettings::from_env()?;

    let repo = Repository::open(&cli.directory).context("Not inside a git repository")?;
    let workdir = repo
        .workdir()
        .context("Cannot run in bare repository")?
        .to_path_buf();

    let manifest = Manifest::load(&workdir)?;
    let settings = Settings::load(workdir.join(SETTINGS_FILE))?;
    let origin = repo
        .origin_url()
        .ok()
        .and_then(|url| Repository::parse_remote_url(&url).ok());

    let config = Config::resolve(
        env,
        settings,
        &manifest,
        origin.as_ref(),
        cli.branch_suffix.as_deref(),
    )?;
    debug!(
        repo = %config.remote_url(),
        branch = config.working_branch(),
        "resolved configuration"
    );

    let installer = Installer::new(&config.tools_dir)?;
    let rt = tokio::runtime::Runtime::new()?;
    let hub_path = rt
        .block_on(installer.ensure())
        .context("Failed to set up the hub CLI")?;

    let auth = Auth::new(
        SecretString::from(config.token.expose_secret().to_owned()),
        &config.host,
    );
    let hub = HubCli::new(hub_path, &workdir, auth);
    let npm = Npm::new(&workdir);

    let outcome = PipelineService::new(&repo, &hub, &npm, &config).run()?;
    report(&outcome);

    Ok(())
}

fn report(outcome: &Outcome) {
    match outcome {
        Outcome::PullRequestExists { number, url } => {
            output::info(&format!("Pull request #{number} is already open, nothing to do"));
            output::essential(url);
        }
        Outcome::NoVulnerabilities => {
            output::success("No vulnerabilities found, nothing to do");
        }
        Outcome::NothingChanged => {
            output::success("Dependencies are up to date, nothing to commit");
        }
        Outcome::PushedToDefault { branch } => {
            output::success(&format!("Pushed dependency updates to {branch}"));
        }
        Outcome::PullRequestOpened {
            branch,
            number,
            url,
        } => {
            output::success(&format!("Opened pull request #{number} from {branch}"));
            output::essential(url);
        }
    }
}
