//! Typed Gitee webhook events.
//!
//! Gitee sends `null` for many absent string and object fields, so every
//! scalar field here decodes `null` and "missing" to the type's default. The
//! top-level objects an event is meaningless without (the comment of a note,
//! the issue of an issue event, ...) stay `Option` and are checked by
//! [`crate::GiteeEvent::validate`].
//!
//! Accessors return `""` rather than `Option<&str>` so handler code reads
//! like the events it is reacting to; after validation the required parts are
//! guaranteed to be present anyway.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

/// Comment `action` value Gitee sends when a comment is created.
const ACTION_COMMENT: &str = "comment";

/// `noteable_type` of a comment made on a pull request.
const NOTEABLE_PULL_REQUEST: &str = "PullRequest";

/// `noteable_type` of a comment made on an issue.
const NOTEABLE_ISSUE: &str = "Issue";

/// Issue / pull request state: open.
pub const STATE_OPEN: &str = "open";

/// Issue / pull request state: closed.
pub const STATE_CLOSED: &str = "closed";

/// Decodes `null` as `T::default()`.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// ---------------------------------------------------------------------------
// Shared hook objects
// ---------------------------------------------------------------------------

/// A Gitee account as embedded in hook payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Login name (the `@` handle).
    #[serde(default, deserialize_with = "nullable")]
    pub login: String,

    /// Display name.
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
}

/// A label attached to an issue or pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Label name.
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
}

/// The repository an event belongs to (Gitee's `ProjectHook`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Owning organisation or user path segment.
    #[serde(default, deserialize_with = "nullable")]
    pub namespace: String,

    /// Repository path segment.
    #[serde(default, deserialize_with = "nullable")]
    pub path: String,

    /// `"namespace/path"`.
    #[serde(default, deserialize_with = "nullable")]
    pub full_name: String,

    /// Web URL of the repository.
    #[serde(default, deserialize_with = "nullable")]
    pub html_url: String,
}

impl Repository {
    /// Returns `(org, repo)`.
    pub fn org_repo(&self) -> (&str, &str) {
        (&self.namespace, &self.path)
    }
}

/// A comment as carried by a note event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Comment id.
    #[serde(default, deserialize_with = "nullable")]
    pub id: u64,

    /// Markdown body.
    #[serde(default, deserialize_with = "nullable")]
    pub body: String,

    /// Web URL of the comment.
    #[serde(default, deserialize_with = "nullable")]
    pub html_url: String,

    /// Author of the comment.
    #[serde(default, deserialize_with = "nullable")]
    pub user: User,
}

/// An issue as carried by issue and note events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueHook {
    /// Gitee issue numbers are alphanumeric (e.g. `"I4ABCD"`).
    #[serde(default, deserialize_with = "nullable")]
    pub number: String,

    #[serde(default, deserialize_with = "nullable")]
    pub title: String,

    /// `"open"`, `"progressing"`, `"closed"`, ...
    #[serde(default, deserialize_with = "nullable")]
    pub state: String,

    #[serde(default, deserialize_with = "nullable")]
    pub html_url: String,

    /// Author of the issue.
    #[serde(default, deserialize_with = "nullable")]
    pub user: User,

    #[serde(default, deserialize_with = "nullable")]
    pub labels: Vec<Label>,
}

impl IssueHook {
    /// Returns `true` if the issue is open.
    pub fn is_open(&self) -> bool {
        self.state == STATE_OPEN
    }

    /// Returns `true` if the issue is closed.
    pub fn is_closed(&self) -> bool {
        self.state == STATE_CLOSED
    }

    /// Returns the set of label names.
    pub fn label_names(&self) -> BTreeSet<&str> {
        self.labels.iter().map(|l| l.name.as_str()).collect()
    }
}

/// One side (head or base) of a pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchHook {
    /// Branch name.
    #[serde(rename = "ref", default, deserialize_with = "nullable")]
    pub git_ref: String,

    /// Commit SHA the branch points at.
    #[serde(default, deserialize_with = "nullable")]
    pub sha: String,
}

/// A pull request as carried by pull request and note events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestHook {
    #[serde(default, deserialize_with = "nullable")]
    pub number: u64,

    #[serde(default, deserialize_with = "nullable")]
    pub title: String,

    #[serde(default, deserialize_with = "nullable")]
    pub state: String,

    #[serde(default, deserialize_with = "nullable")]
    pub html_url: String,

    /// Author of the pull request.
    #[serde(default, deserialize_with = "nullable")]
    pub user: User,

    /// Source branch. Required by validation.
    #[serde(default)]
    pub head: Option<BranchHook>,

    /// Target branch. Required by validation.
    #[serde(default)]
    pub base: Option<BranchHook>,

    #[serde(default, deserialize_with = "nullable")]
    pub labels: Vec<Label>,
}

impl PullRequestHook {
    /// Returns `true` if the pull request is open.
    pub fn is_open(&self) -> bool {
        self.state == STATE_OPEN
    }

    /// Returns the set of label names.
    pub fn label_names(&self) -> BTreeSet<&str> {
        self.labels.iter().map(|l| l.name.as_str()).collect()
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// A comment was created, edited, or deleted on an issue, pull request, or commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteEvent {
    #[serde(default)]
    pub action: Option<String>,

    /// `"Issue"`, `"PullRequest"`, or `"Commit"`.
    #[serde(default)]
    pub noteable_type: Option<String>,

    #[serde(default)]
    pub comment: Option<Comment>,

    /// Present when the comment was made on an issue.
    #[serde(default)]
    pub issue: Option<IssueHook>,

    /// Present when the comment was made on a pull request.
    #[serde(default)]
    pub pull_request: Option<PullRequestHook>,

    #[serde(default)]
    pub repository: Option<Repository>,
}

impl NoteEvent {
    /// Returns the action (e.g. `"comment"`).
    pub fn action(&self) -> &str {
        self.action.as_deref().unwrap_or_default()
    }

    /// Returns `true` if this event announces a newly created comment.
    pub fn is_creating_comment(&self) -> bool {
        self.action() == ACTION_COMMENT
    }

    /// Returns `true` if the comment was made on a pull request.
    pub fn is_pull_request(&self) -> bool {
        self.noteable_type.as_deref() == Some(NOTEABLE_PULL_REQUEST)
    }

    /// Returns `true` if the comment was made on an issue.
    pub fn is_issue(&self) -> bool {
        self.noteable_type.as_deref() == Some(NOTEABLE_ISSUE)
    }

    /// Returns the login of the comment's author.
    pub fn commenter(&self) -> &str {
        self.comment.as_ref().map_or("", |c| c.user.login.as_str())
    }

    /// Returns the comment's markdown body.
    pub fn comment_body(&self) -> &str {
        self.comment.as_ref().map_or("", |c| c.body.as_str())
    }

    /// Returns the comment's web URL.
    pub fn comment_url(&self) -> &str {
        self.comment.as_ref().map_or("", |c| c.html_url.as_str())
    }

    /// Returns `(org, repo)`.
    pub fn org_repo(&self) -> (&str, &str) {
        self.repository.as_ref().map_or(("", ""), Repository::org_repo)
    }

    /// Formats a reply addressed to the commenter that quotes the original
    /// comment inside a collapsed `<details>` block.
    pub fn reply_with_reference(&self, reply: &str) -> String {
        let quoted = format!(">{}", self.comment_body()).replace('\n', "\n>");
        format!(
            "\n@{} , {}\n\n<details>\n\n\nIn response to [this]({}):\n\n{}\n\n\n</details>\n",
            self.commenter(),
            reply,
            self.comment_url(),
            quoted,
        )
    }
}

/// An issue was opened, updated, or changed state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueEvent {
    #[serde(default)]
    pub action: Option<String>,

    #[serde(default)]
    pub issue: Option<IssueHook>,

    #[serde(default)]
    pub repository: Option<Repository>,
}

impl IssueEvent {
    /// Returns the action (e.g. `"open"`, `"state_change"`).
    pub fn action(&self) -> &str {
        self.action.as_deref().unwrap_or_default()
    }

    /// Returns the login of the issue's author.
    pub fn issue_author(&self) -> &str {
        self.issue.as_ref().map_or("", |i| i.user.login.as_str())
    }

    /// Returns the issue number.
    pub fn issue_number(&self) -> &str {
        self.issue.as_ref().map_or("", |i| i.number.as_str())
    }

    /// Returns the issue's web URL.
    pub fn issue_url(&self) -> &str {
        self.issue.as_ref().map_or("", |i| i.html_url.as_str())
    }

    /// Returns `(org, repo)`.
    pub fn org_repo(&self) -> (&str, &str) {
        self.repository.as_ref().map_or(("", ""), Repository::org_repo)
    }
}

/// A pull request was opened, updated, merged, or closed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestEvent {
    /// Coarse action: `"open"`, `"update"`, `"merge"`, `"close"`, ...
    #[serde(default)]
    pub action: Option<String>,

    /// Finer-grained description, e.g. `"source_branch_changed"`.
    #[serde(default)]
    pub action_desc: Option<String>,

    #[serde(default)]
    pub pull_request: Option<PullRequestHook>,

    #[serde(default)]
    pub repository: Option<Repository>,
}

impl PullRequestEvent {
    /// Returns the coarse action.
    pub fn action(&self) -> &str {
        self.action.as_deref().unwrap_or_default()
    }

    /// Returns the action description, falling back to the coarse action
    /// when Gitee did not send one.
    pub fn action_desc(&self) -> &str {
        match self.action_desc.as_deref() {
            Some(desc) if !desc.is_empty() => desc,
            _ => self.action(),
        }
    }

    /// Returns the pull request number, or `0` if absent.
    pub fn pr_number(&self) -> u64 {
        self.pull_request.as_ref().map_or(0, |pr| pr.number)
    }

    /// Returns the login of the pull request's author.
    pub fn pr_author(&self) -> &str {
        self.pull_request
            .as_ref()
            .map_or("", |pr| pr.user.login.as_str())
    }

    /// Returns the pull request's web URL.
    pub fn pr_url(&self) -> &str {
        self.pull_request
            .as_ref()
            .map_or("", |pr| pr.html_url.as_str())
    }

    /// Returns `(org, repo)`.
    pub fn org_repo(&self) -> (&str, &str) {
        self.repository.as_ref().map_or(("", ""), Repository::org_repo)
    }
}

/// Commits were pushed to a branch or tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushEvent {
    /// Full ref, e.g. `"refs/heads/master"`.
    #[serde(rename = "ref", default)]
    pub git_ref: Option<String>,

    /// SHA before the push.
    #[serde(default)]
    pub before: Option<String>,

    /// SHA after the push.
    #[serde(default)]
    pub after: Option<String>,

    #[serde(default)]
    pub repository: Option<Repository>,
}

impl PushEvent {
    /// Returns the pushed ref.
    pub fn git_ref(&self) -> &str {
        self.git_ref.as_deref().unwrap_or_default()
    }

    /// Returns the SHA the ref points at after the push.
    pub fn head(&self) -> &str {
        self.after.as_deref().unwrap_or_default()
    }

    /// Returns `(org, repo)`.
    pub fn org_repo(&self) -> (&str, &str) {
        self.repository.as_ref().map_or(("", ""), Repository::org_repo)
    }
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
