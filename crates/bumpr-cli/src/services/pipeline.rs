//! The update pipeline.
//!
//! A run is an ordered list of [`Stage`]s executed against injected git,
//! hosting and package manager implementations. Each stage either lets the
//! run continue or finishes it with an [`Outcome`]; the first error aborts
//! the run with no rollback.

use std::fmt;

use anyhow::{Context, Result, bail};
use bumpr_core::manifest::TRACKED_FILES;
use bumpr_core::{AuditLevel, Config, PackageManager, PublishTarget, TestOutcome, TestPolicy};
use bumpr_git::GitOps;
use bumpr_hub::{CreatePullRequest, HostingOps};
use secrecy::ExposeSecret;
use tracing::{info, warn};

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A pull request for the feature branch is already open.
    PullRequestExists { number: u64, url: String },
    /// The audit found nothing at or above the configured level.
    NoVulnerabilities,
    /// Neither the manifest nor the lockfile changed.
    NothingChanged,
    /// The commit was pushed straight to the default branch.
    PushedToDefault { branch: String },
    /// A pull request was opened for the feature branch.
    PullRequestOpened {
        branch: String,
        number: u64,
        url: String,
    },
}

/// One step of the pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    PrepareRemote,
    SelectBranch,
    UpdateDependencies,
    Install,
    /// Present only when the gate is enabled, with its threshold.
    VulnerabilityGate(AuditLevel),
    AuditFix,
    DetectChanges,
    Build,
    Test,
    Commit,
    Publish,
}

impl Stage {
    const fn name(self) -> &'static str {
        match self {
            Self::PrepareRemote => "prepare remote",
            Self::SelectBranch => "select branch",
            Self::UpdateDependencies => "update dependencies",
            Self::Install => "install",
            Self::VulnerabilityGate(_) => "vulnerability gate",
            Self::AuditFix => "audit fix",
            Self::DetectChanges => "detect changes",
            Self::Build => "build",
            Self::Test => "test",
            Self::Commit => "commit",
            Self::Publish => "publish",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether the driver should run the next stage.
#[derive(Debug)]
enum Flow {
    Continue,
    Finish(Outcome),
}

/// Service running the update pipeline with injected dependencies.
pub struct PipelineService<'a, G, H, P>
where
    G: GitOps,
    H: HostingOps,
    P: PackageManager,
{
    git: &'a G,
    hosting: &'a H,
    packages: &'a P,
    config: &'a Config,
}

impl<'a, G, H, P> PipelineService<'a, G, H, P>
where
    G: GitOps,
    H: HostingOps,
    P: PackageManager,
{
    /// Create a new pipeline service.
    pub const fn new(git: &'a G, hosting: &'a H, packages: &'a P, config: &'a Config) -> Self {
        Self {
            git,
            hosting,
            packages,
            config,
        }
    }

    /// Stages this configuration runs, in order.
    pub fn stages(&self) -> Vec<Stage> {
        let mut stages = vec![
            Stage::PrepareRemote,
            Stage::SelectBranch,
            Stage::UpdateDependencies,
            Stage::Install,
        ];
        stages.extend(self.config.audit_gate.map(Stage::VulnerabilityGate));
        stages.extend([
            Stage::AuditFix,
            Stage::DetectChanges,
            Stage::Build,
            Stage::Test,
            Stage::Commit,
            Stage::Publish,
        ]);
        stages
    }

    /// Run every stage until one finishes the run.
    ///
    /// # Errors
    /// Returns the first stage failure, with the stage named in the context.
    pub fn run(&self) -> Result<Outcome> {
        for stage in self.stages() {
            info!("==> {stage}");
            match self
                .run_stage(stage)
                .with_context(|| format!("{stage} failed"))?
            {
                Flow::Continue => {}
                Flow::Finish(outcome) => return Ok(outcome),
            }
        }

        bail!("pipeline ended without publishing")
    }

    fn run_stage(&self, stage: Stage) -> Result<Flow> {
        match stage {
            Stage::PrepareRemote => self.prepare_remote(),
            Stage::SelectBranch => self.select_branch(),
            Stage::UpdateDependencies => {
                self.packages.update_dependencies(self.config.update)?;
                Ok(Flow::Continue)
            }
            Stage::Install => {
                self.packages.install()?;
                Ok(Flow::Continue)
            }
            Stage::VulnerabilityGate(level) => self.vulnerability_gate(level),
            Stage::AuditFix => {
                self.packages.audit_fix()?;
                Ok(Flow::Continue)
            }
            Stage::DetectChanges => self.detect_changes(),
            Stage::Build => {
                self.packages.build()?;
                Ok(Flow::Continue)
            }
            Stage::Test => self.test(),
            Stage::Commit => self.commit(),
            Stage::Publish => self.publish(),
        }
    }

    fn prepare_remote(&self) -> Result<Flow> {
        info!("+ git remote set-url origin {}", self.config.remote_url());
        let url = self.config.authenticated_remote_url();
        self.git.set_remote_url("origin", url.expose_secret())?;
        Ok(Flow::Continue)
    }

    fn select_branch(&self) -> Result<Flow> {
        let default_branch = &self.config.default_branch;

        match &self.config.publish {
            PublishTarget::DefaultBranch => {
                self.git.checkout(default_branch)?;
                self.hosting.sync()?;
            }
            PublishTarget::PullRequest { branch } => {
                if let Some(pr) = self.hosting.find_pr_for_branch(branch.as_str())? {
                    info!(number = pr.number, "pull request already open for {branch}");
                    return Ok(Flow::Finish(Outcome::PullRequestExists {
                        number: pr.number,
                        url: pr.html_url,
                    }));
                }

                self.git.checkout(default_branch)?;
                self.hosting.sync()?;
                self.git.create_and_checkout(branch.as_str())?;
            }
        }

        Ok(Flow::Continue)
    }

    fn vulnerability_gate(&self, level: AuditLevel) -> Result<Flow> {
        if self.packages.audit(level)? {
            info!("no vulnerabilities at or above {level}");
            return Ok(Flow::Finish(Outcome::NoVulnerabilities));
        }

        Ok(Flow::Continue)
    }

    fn detect_changes(&self) -> Result<Flow> {
        let changed = self.git.changed_files(&TRACKED_FILES)?;
        if changed.is_empty() {
            info!("manifest and lockfile unchanged");
            return Ok(Flow::Finish(Outcome::NothingChanged));
        }

        info!("changed: {}", changed.join(", "));
        Ok(Flow::Continue)
    }

    fn test(&self) -> Result<Flow> {
        match (self.packages.test()?, self.config.test_policy) {
            (TestOutcome::Passed, _) => {}
            (TestOutcome::Failed { code }, TestPolicy::Tolerate) => {
                warn!(?code, "tests failed; committing anyway");
            }
            (TestOutcome::Failed { code }, TestPolicy::Require) => {
                return Err(bumpr_core::Error::CommandFailed {
                    command: "npm test".into(),
                    code,
                }
                .into());
            }
        }

        Ok(Flow::Continue)
    }

    fn commit(&self) -> Result<Flow> {
        let identity = &self.config.identity;
        self.git.configure_identity(&identity.name, &identity.email)?;
        self.git.stage_tracked()?;
        let oid = self.git.commit(&self.config.commit_message)?;

        info!(%oid, "committed on {}", self.config.working_branch());
        Ok(Flow::Continue)
    }

    fn publish(&self) -> Result<Flow> {
        match &self.config.publish {
            PublishTarget::DefaultBranch => {
                let branch = self.config.default_branch.clone();
                self.git.push(&branch, false)?;
                Ok(Flow::Finish(Outcome::PushedToDefault { branch }))
            }
            PublishTarget::PullRequest { branch } => {
                self.git.push(branch.as_str(), true)?;
                let pr = self.hosting.create_pr(&CreatePullRequest {
                    title: self.config.pr_title.clone(),
                    head: branch.to_string(),
                    base: self.config.default_branch.clone(),
                })?;

                Ok(Flow::Finish(Outcome::PullRequestOpened {
                    branch: branch.to_string(),
                    number: pr.number,
                    url: pr.html_url,
                }))
            }
        }
    }
}
