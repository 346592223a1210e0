use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ApiUser;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiGist {
    pub id: Option<String>,
    pub node_id: Option<String>,
    pub url: Option<String>,
    pub forks_url: Option<String>,
    pub commits_url: Option<String>,
    pub git_pull_url: Option<String>,
    pub git_push_url: Option<String>,
    pub html_url: Option<String>,
    /// Keyed by file name.
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub files: BTreeMap<String, ApiGistFile>,
    pub public: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub comments: Option<u32>,
    pub user: Option<ApiUser>,
    pub comments_url: Option<String>,
    pub owner: Option<ApiUser>,
    pub truncated: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiGistFile {
    pub filename: Option<String>,
    #[serde(rename = "type")]
    pub mime_type: Option<String>,
    pub language: Option<String>,
    pub raw_url: Option<String>,
    pub size: Option<u64>,
    pub truncated: Option<bool>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiGistComment {
    pub id: Option<u64>,
    pub node_id: Option<String>,
    pub url: Option<String>,
    pub body: Option<String>,
    pub user: Option<ApiUser>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiGistCommit {
    pub url: Option<String>,
    pub version: Option<String>,
    pub user: Option<ApiUser>,
    pub change_status: Option<ApiGistChangeStatus>,
    pub committed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiGistChangeStatus {
    pub deletions: Option<u32>,
    pub additions: Option<u32>,
    pub total: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateGist {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub public: bool,
    pub files: BTreeMap<String, GistFileContent>,
}

impl CreateGist {
    pub fn with_file(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.insert(
            name.into(),
            GistFileContent {
                content: content.into(),
            },
        );
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GistFileContent {
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateGist {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// A `None` entry is sent as `null`, which deletes that file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<BTreeMap<String, Option<GistFileUpdate>>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GistFileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// New name for the file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateGistComment {
    pub body: String,
}

impl CreateGistComment {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}
