use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ApiIssuePullRequest, ApiLabel, ApiRepo, ApiUser};

/// One page of hits from a `/search/*` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults<T> {
    pub total_count: Option<u64>,
    pub incomplete_results: Option<bool>,
    #[serde(
        default = "Vec::new",
        deserialize_with = "super::null_as_default",
        bound(deserialize = "T: Deserialize<'de>")
    )]
    pub items: Vec<T>,
}

impl<T> Default for SearchResults<T> {
    fn default() -> Self {
        Self {
            total_count: None,
            incomplete_results: None,
            items: Vec::new(),
        }
    }
}

pub type RepositorySearchResults = SearchResults<ApiRepo>;
pub type CodeSearchResults = SearchResults<ApiCodeItem>;
pub type IssueSearchResults = SearchResults<ApiIssueItem>;
pub type UserSearchResults = SearchResults<ApiUser>;
pub type CommitSearchResults = SearchResults<ApiCommitItem>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiCodeItem {
    pub name: Option<String>,
    pub path: Option<String>,
    pub sha: Option<String>,
    pub url: Option<String>,
    pub git_url: Option<String>,
    pub html_url: Option<String>,
    pub repository: Option<ApiRepo>,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiIssueItem {
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
    pub comments: Option<u32>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub body: Option<String>,
    pub score: Option<f64>,
    pub html_url: Option<String>,
    pub pull_request: Option<ApiIssuePullRequest>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiCommitItem {
    pub sha: Option<String>,
    pub url: Option<String>,
    pub html_url: Option<String>,
    pub comments_url: Option<String>,
    pub commit: Option<ApiCommitDetail>,
    pub author: Option<ApiUser>,
    pub committer: Option<ApiUser>,
    pub repository: Option<ApiRepo>,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiCommitDetail {
    pub author: Option<ApiGitUser>,
    pub committer: Option<ApiGitUser>,
    pub message: Option<String>,
    pub comment_count: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiGitUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub date: Option<DateTime<Utc>>,
}
