//! GitHub Event Types & Payloads
//!
//! The subset of GitHub webhook events the bot renders, and typed views of
//! the payload fields each formatter reads. Anything GitHub may omit or send
//! as `null` is an `Option`.

use serde::Deserialize;

/// Event names carried in the `X-GitHub-Event` header that produce cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GitHubEvent {
    /// Commits pushed to a branch or tag.
    Push,
    /// Pull request activity.
    PullRequest,
    /// Issue activity.
    Issues,
    /// Release activity.
    Release,
    /// A branch or tag was created.
    Create,
}

impl GitHubEvent {
    /// Parse a header value (e.g., `"pull_request"`). Unknown events are `None`.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "push" => Some(Self::Push),
            "pull_request" => Some(Self::PullRequest),
            "issues" => Some(Self::Issues),
            "release" => Some(Self::Release),
            "create" => Some(Self::Create),
            _ => None,
        }
    }

    /// Header form of the event name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::PullRequest => "pull_request",
            Self::Issues => "issues",
            Self::Release => "release",
            Self::Create => "create",
        }
    }
}

impl std::fmt::Display for GitHubEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Repository the event happened in. Present on every supported event.
#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub name: String,
    pub html_url: String,
}

/// GitHub account reference (`user` on issues and pull requests).
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub login: String,
}

/// Git identity (`pusher`, commit `author`).
#[derive(Debug, Clone, Deserialize)]
pub struct GitActor {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Commit {
    pub id: String,
    pub url: String,
    pub message: String,
    pub author: GitActor,
}

/// `push` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct PushEvent {
    /// Full ref, e.g. `refs/heads/main`.
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub repository: Repository,
    pub pusher: GitActor,
    #[serde(default)]
    pub commits: Vec<Commit>,
}

/// Branch endpoint of a pull request (`head` / `base`).
#[derive(Debug, Clone, Deserialize)]
pub struct BranchRef {
    #[serde(rename = "ref")]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub title: String,
    pub html_url: String,
    pub user: User,
    pub head: BranchRef,
    pub base: BranchRef,
    #[serde(default)]
    pub merged: Option<bool>,
    #[serde(default)]
    pub body: Option<String>,
}

/// `pull_request` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestEvent {
    pub action: String,
    pub pull_request: PullRequest,
    pub repository: Repository,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub title: String,
    pub html_url: String,
    pub user: User,
    #[serde(default)]
    pub body: Option<String>,
}

/// `issues` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct IssuesEvent {
    pub action: String,
    pub issue: Issue,
    pub repository: Repository,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub tag_name: String,
    pub html_url: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

impl Release {
    /// Display name, falling back to the tag when the release is unnamed.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.tag_name)
    }
}

/// `release` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseEvent {
    pub action: String,
    pub release: Release,
    pub repository: Repository,
}

/// Kind of ref announced by a `create` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefType {
    Branch,
    Tag,
}

impl RefType {
    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "branch" => Some(Self::Branch),
            "tag" => Some(Self::Tag),
            _ => None,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Branch => "branch",
            Self::Tag => "tag",
        }
    }
}

/// `create` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEvent {
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub ref_type: RefType,
    pub repository: Repository,
}
