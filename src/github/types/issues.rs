use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ApiUser;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiIssue {
    pub id: Option<u64>,
    pub node_id: Option<String>,
    pub number: Option<u64>,
    pub title: Option<String>,
    pub user: Option<ApiUser>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub labels: Vec<ApiLabel>,
    pub state: Option<String>,
    pub locked: Option<bool>,
    pub assignee: Option<ApiUser>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub assignees: Vec<ApiUser>,
    pub milestone: Option<ApiMilestone>,
    pub comments: Option<u32>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub body: Option<String>,
    pub html_url: Option<String>,
    pub url: Option<String>,
    pub repository_url: Option<String>,
    /// Set when the issue is actually a pull request.
    pub pull_request: Option<ApiIssuePullRequest>,
}

impl ApiIssue {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiLabel {
    pub id: Option<u64>,
    pub node_id: Option<String>,
    pub url: Option<String>,
    pub name: Option<String>,
    pub color: Option<String>,
    pub default: Option<bool>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMilestone {
    pub id: Option<u64>,
    pub node_id: Option<String>,
    pub number: Option<u64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub creator: Option<ApiUser>,
    pub open_issues: Option<u32>,
    pub closed_issues: Option<u32>,
    pub state: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub due_on: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiIssueComment {
    pub id: Option<u64>,
    pub node_id: Option<String>,
    pub url: Option<String>,
    pub html_url: Option<String>,
    pub body: Option<String>,
    pub user: Option<ApiUser>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiIssuePullRequest {
    pub url: Option<String>,
    pub html_url: Option<String>,
    pub diff_url: Option<String>,
    pub patch_url: Option<String>,
    pub merged_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateIssue {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

impl CreateIssue {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Partial update; only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateIssue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateComment {
    pub body: String,
}

impl CreateComment {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}
