//! Mock implementations for testing services.
//!
//! These mocks implement the traits from bumpr-git, bumpr-hub and
//! bumpr-core and append every call to a shared [`Journal`], so tests can
//! assert on the order of operations across all three.

#![allow(clippy::unwrap_used)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use bumpr_core::{
    AuditLevel, Config, EnvSettings, Manifest, PackageManager, RemoteRepo, Settings, TestOutcome,
    UpdateStrategy,
};
use bumpr_core::Result as CoreResult;
use bumpr_git::{GitOps, Oid, Result as GitResult};
use bumpr_hub::{CreatePullRequest, HostingOps, PullRequest, Result as HubResult};

/// Shared, ordered record of calls made on the mocks.
#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<String>>>);

impl Journal {
    pub fn record(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.0.borrow().iter().any(|e| e == entry)
    }

    pub fn count_prefix(&self, prefix: &str) -> usize {
        self.0.borrow().iter().filter(|e| e.starts_with(prefix)).count()
    }
}

/// Build a config from environment pairs on top of valid credentials.
pub fn config(pairs: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = [
        ("GITHUB_TOKEN", "ghp_test"),
        ("GITHUB_EMAIL", "bot@example.com"),
        ("GITHUB_NAME", "Update Bot"),
    ]
    .into_iter()
    .chain(pairs.iter().copied())
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    vars.retain(|_, v| !v.is_empty());

    let env = EnvSettings::from_lookup(|key| vars.get(key).cloned()).unwrap();
    let manifest = Manifest {
        name: Some("storefront".into()),
    };
    let origin = RemoteRepo {
        owner: "acme".into(),
        name: "storefront".into(),
    };
    Config::resolve(env, Settings::default(), &manifest, Some(&origin), None).unwrap()
}

/// Mock implementation of `GitOps`.
pub struct MockGitOps {
    journal: Journal,
    pub head: RefCell<String>,
    pub changed: RefCell<Vec<String>>,
    pub push_fails: RefCell<bool>,
}

impl MockGitOps {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            head: RefCell::new("master".to_string()),
            changed: RefCell::new(vec!["package.json".into(), "package-lock.json".into()]),
            push_fails: RefCell::new(false),
        }
    }

    pub fn with_changes(self, changed: &[&str]) -> Self {
        *self.changed.borrow_mut() = changed.iter().map(ToString::to_string).collect();
        self
    }

    pub fn with_push_failure(self) -> Self {
        *self.push_fails.borrow_mut() = true;
        self
    }
}

impl GitOps for MockGitOps {
    fn workdir(&self) -> Option<&Path> {
        None
    }

    fn set_remote_url(&self, remote: &str, url: &str) -> GitResult<()> {
        self.journal.record(format!("git remote set-url {remote} {url}"));
        Ok(())
    }

    fn checkout(&self, branch: &str) -> GitResult<()> {
        self.journal.record(format!("git checkout {branch}"));
        *self.head.borrow_mut() = branch.to_string();
        Ok(())
    }

    fn create_and_checkout(&self, branch: &str) -> GitResult<()> {
        self.journal.record(format!("git checkout -b {branch}"));
        *self.head.borrow_mut() = branch.to_string();
        Ok(())
    }

    fn changed_files(&self, paths: &[&str]) -> GitResult<Vec<String>> {
        self.journal.record(format!("git diff {}", paths.join(" ")));
        Ok(self.changed.borrow().clone())
    }

    fn configure_identity(&self, name: &str, email: &str) -> GitResult<()> {
        self.journal.record(format!("git config {name} <{email}>"));
        Ok(())
    }

    fn stage_tracked(&self) -> GitResult<()> {
        self.journal.record("git add -u");
        Ok(())
    }

    fn commit(&self, message: &str) -> GitResult<Oid> {
        self.journal.record(format!(
            "git commit on {}: {message}",
            self.head.borrow()
        ));
        Ok(Oid::zero())
    }

    fn push(&self, branch: &str, force: bool) -> GitResult<()> {
        let flag = if force { " --force" } else { "" };
        self.journal.record(format!("git push{flag} origin {branch}"));
        if *self.push_fails.borrow() {
            return Err(bumpr_core::Error::CommandFailed {
                command: format!("git push{flag} origin {branch}"),
                code: Some(1),
            }
            .into());
        }
        Ok(())
    }
}

/// Mock implementation of `HostingOps`.
pub struct MockHosting {
    journal: Journal,
    pub existing_pr: RefCell<Option<PullRequest>>,
}

impl MockHosting {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            existing_pr: RefCell::new(None),
        }
    }

    pub fn with_existing_pr(self, number: u64) -> Self {
        *self.existing_pr.borrow_mut() = Some(PullRequest {
            number,
            html_url: format!("https://github.com/acme/storefront/pull/{number}"),
        });
        self
    }
}

impl HostingOps for MockHosting {
    fn find_pr_for_branch(&self, branch: &str) -> HubResult<Option<PullRequest>> {
        self.journal.record(format!("hub pr list -h {branch}"));
        Ok(self.existing_pr.borrow().clone())
    }

    fn create_pr(&self, pr: &CreatePullRequest) -> HubResult<PullRequest> {
        self.journal.record(format!(
            "hub pull-request -b {} -h {} -m {}",
            pr.base, pr.head, pr.title
        ));
        Ok(PullRequest {
            number: 101,
            html_url: "https://github.com/acme/storefront/pull/101".into(),
        })
    }

    fn sync(&self) -> HubResult<()> {
        self.journal.record("hub sync");
        Ok(())
    }
}

/// Mock implementation of `PackageManager`.
pub struct MockPackageManager {
    journal: Journal,
    pub audit_clean: RefCell<bool>,
    pub test_outcome: RefCell<TestOutcome>,
    pub failing_step: RefCell<Option<(&'static str, i32)>>,
}

impl MockPackageManager {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            audit_clean: RefCell::new(false),
            test_outcome: RefCell::new(TestOutcome::Passed),
            failing_step: RefCell::new(None),
        }
    }

    pub fn with_clean_audit(self) -> Self {
        *self.audit_clean.borrow_mut() = true;
        self
    }

    pub fn with_test_outcome(self, outcome: TestOutcome) -> Self {
        *self.test_outcome.borrow_mut() = outcome;
        self
    }

    /// Make the step whose journal entry is `step` exit with `code`.
    pub fn with_failure(self, step: &'static str, code: i32) -> Self {
        *self.failing_step.borrow_mut() = Some((step, code));
        self
    }

    fn step(&self, entry: &str) -> CoreResult<()> {
        self.journal.record(entry);
        match *self.failing_step.borrow() {
            Some((step, code)) if step == entry => Err(bumpr_core::Error::CommandFailed {
                command: entry.to_string(),
                code: Some(code),
            }),
            _ => Ok(()),
        }
    }
}

impl PackageManager for MockPackageManager {
    fn update_dependencies(&self, strategy: UpdateStrategy) -> CoreResult<()> {
        match strategy {
            UpdateStrategy::CheckUpdates => self.step("npx npm-check-updates -u"),
            UpdateStrategy::AngularUpdate => self.step("npx ng update --all --force"),
        }
    }

    fn install(&self) -> CoreResult<()> {
        self.step("npm install")
    }

    fn audit(&self, level: AuditLevel) -> CoreResult<bool> {
        self.journal.record(format!("npm audit --audit-level={level}"));
        Ok(*self.audit_clean.borrow())
    }

    fn audit_fix(&self) -> CoreResult<()> {
        self.step("npm audit fix")
    }

    fn build(&self) -> CoreResult<()> {
        self.step("npm run build --if-present")
    }

    fn test(&self) -> CoreResult<TestOutcome> {
        self.journal.record("npm test");
        Ok(*self.test_outcome.borrow())
    }
}
