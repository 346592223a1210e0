use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ApiLabel, ApiMilestone, ApiRepo, ApiUser, is_blank};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiPullRequest {
    pub id: Option<u64>,
    pub node_id: Option<String>,
    pub number: Option<u64>,
    pub state: Option<String>,
    pub locked: Option<bool>,
    pub title: Option<String>,
    pub user: Option<ApiUser>,
    pub body: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub labels: Vec<ApiLabel>,
    pub milestone: Option<ApiMilestone>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub merged_at: Option<DateTime<Utc>>,
    pub merge_commit_sha: Option<String>,
    pub assignee: Option<ApiUser>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub assignees: Vec<ApiUser>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub requested_reviewers: Vec<ApiUser>,
    pub head: Option<ApiPullRequestBranch>,
    pub base: Option<ApiPullRequestBranch>,
    pub draft: Option<bool>,
    pub merged: Option<bool>,
    pub mergeable: Option<bool>,
    pub mergeable_state: Option<String>,
    pub merged_by: Option<ApiUser>,
    pub comments: Option<u32>,
    pub review_comments: Option<u32>,
    pub commits: Option<u32>,
    pub additions: Option<u32>,
    pub deletions: Option<u32>,
    pub changed_files: Option<u32>,
    pub html_url: Option<String>,
    pub diff_url: Option<String>,
    pub patch_url: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiPullRequestBranch {
    pub label: Option<String>,
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,
    pub sha: Option<String>,
    pub user: Option<ApiUser>,
    pub repo: Option<ApiRepo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiReview {
    pub id: Option<u64>,
    pub node_id: Option<String>,
    pub user: Option<ApiUser>,
    pub body: Option<String>,
    pub state: Option<String>,
    pub html_url: Option<String>,
    pub pull_request_url: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub commit_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiReviewComment {
    pub id: Option<u64>,
    pub node_id: Option<String>,
    pub url: Option<String>,
    pub pull_request_review_id: Option<u64>,
    pub diff_hunk: Option<String>,
    pub path: Option<String>,
    pub position: Option<u32>,
    pub original_position: Option<u32>,
    pub line: Option<u32>,
    pub side: Option<String>,
    pub in_reply_to_id: Option<u64>,
    pub commit_id: Option<String>,
    pub original_commit_id: Option<String>,
    pub user: Option<ApiUser>,
    pub body: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiPullRequestFile {
    pub sha: Option<String>,
    pub filename: Option<String>,
    pub status: Option<String>,
    pub additions: Option<u32>,
    pub deletions: Option<u32>,
    pub changes: Option<u32>,
    pub blob_url: Option<String>,
    pub raw_url: Option<String>,
    pub contents_url: Option<String>,
    pub patch: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePullRequest {
    pub title: String,
    pub head: String,
    pub base: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintainer_can_modify: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<bool>,
}

impl CreatePullRequest {
    pub fn new(title: impl Into<String>, head: impl Into<String>, base: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            head: head.into(),
            base: base.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePullRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintainer_can_modify: Option<bool>,
}

/// Body of a merge call. Blank fields are left out so GitHub applies its
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeOptions {
    #[serde(skip_serializing_if = "is_blank")]
    pub commit_title: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub commit_message: Option<String>,
    /// `merge`, `squash` or `rebase`.
    #[serde(skip_serializing_if = "is_blank")]
    pub merge_method: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateReview {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// `APPROVE`, `REQUEST_CHANGES` or `COMMENT`; omitted leaves the review pending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<ReviewCommentDraft>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewCommentDraft {
    pub path: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_side: Option<String>,
}
