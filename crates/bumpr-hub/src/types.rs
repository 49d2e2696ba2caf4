//! Pull request types.

/// A pull request as reported by `hub`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    /// PR number.
    pub number: u64,

    /// PR URL.
    pub html_url: String,
}

/// Request to create a pull request.
#[derive(Debug, Clone)]
pub struct CreatePullRequest {
    /// PR title.
    pub title: String,

    /// Head branch name.
    pub head: String,

    /// Base branch name.
    pub base: String,
}
