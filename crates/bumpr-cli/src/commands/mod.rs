//! CLI definition and command implementations.

use std::path::PathBuf;

use clap::Parser;

pub mod run;

/// Update npm dependencies, apply audit fixes, and publish the result.
///
/// Credentials and behavior flags are read from the environment:
/// `GITHUB_TOKEN` (or `GH_TOKEN`), `GITHUB_EMAIL` and `GITHUB_NAME` are
/// required; `UPDATE_MASTER`, `UPGRADE_ANGULAR`, `ONLY_FIX_VULNERABILITIES`
/// and `REQUIRE_PASSING_TESTS` are enabled by the value `true`.
#[derive(Parser, Debug)]
#[command(name = "bumpr")]
#[command(author, version, about, long_about)]
pub struct Cli {
    /// Suffix for the `update-dependencies-<suffix>` branch.
    ///
    /// Defaults to the package name from package.json.
    pub branch_suffix: Option<String>,

    /// Run in this project directory instead of the current one.
    #[arg(short = 'C', long = "directory", default_value = ".")]
    pub directory: PathBuf,

    /// Show debug output, including every command run.
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors and the pull request URL.
    #[arg(short, long)]
    pub quiet: bool,
}

/// Process exit status for a failed run.
///
/// A failed external command exits with that command's status; anything
/// else exits with 1.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| {
            if let Some(e) = cause.downcast_ref::<bumpr_core::Error>() {
                return Some(e.exit_code());
            }
            if let Some(bumpr_git::Error::Process(e)) = cause.downcast_ref::<bumpr_git::Error>() {
                return Some(e.exit_code());
            }
            if let Some(bumpr_hub::Error::Process(e)) = cause.downcast_ref::<bumpr_hub::Error>() {
                return Some(e.exit_code());
            }
            None
        })
        .unwrap_or(1)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn failed(code: Option<i32>) -> bumpr_core::Error {
        bumpr_core::Error::CommandFailed {
            command: "npm install".into(),
            code,
        }
    }

    #[test]
    fn test_exit_code_from_core_error() {
        let err = anyhow::Error::from(failed(Some(42))).context("install failed");
        assert_eq!(exit_code(&err), 42);
    }

    #[test]
    fn test_exit_code_through_git_error() {
        let err = anyhow::Error::from(bumpr_git::Error::from(failed(Some(128))));
        assert_eq!(exit_code(&err), 128);
    }

    #[test]
    fn test_exit_code_through_hub_error() {
        let err = anyhow::Error::from(bumpr_hub::Error::from(failed(Some(5))))
            .context("select branch failed");
        assert_eq!(exit_code(&err), 5);
    }

    #[test]
    fn test_exit_code_defaults_to_one() {
        assert_eq!(exit_code(&anyhow::anyhow!("boom")), 1);
        assert_eq!(exit_code(&failed(None).into()), 1);
        let missing = bumpr_core::Error::MissingConfig(vec!["GITHUB_NAME".into()]);
        assert_eq!(exit_code(&missing.into()), 1);
    }

    #[test]
    fn test_cli_parses_suffix_and_flags() {
        let cli = Cli::try_parse_from(["bumpr", "-v", "-C", "web", "storefront"]).unwrap();
        assert_eq!(cli.branch_suffix.as_deref(), Some("storefront"));
        assert_eq!(cli.directory, PathBuf::from("web"));
        assert!(cli.verbose);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_cli_rejects_verbose_with_quiet() {
        assert!(Cli::try_parse_from(["bumpr", "-v", "-q"]).is_err());
    }
}
