use chrono::{DateTime, Utc};

use super::dispatch::{ApiRequest, Dispatcher};
use super::query::{ListOptions, build_query_string, format_since, pagination_query, with_query};
use super::response::ApiResponse;
use super::types::{
    ApiIssue, ApiIssueComment, ApiLabel, ApiMilestone, CreateComment, CreateIssue, UpdateIssue,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListIssuesOptions {
    /// `open`, `closed` or `all`.
    pub state: Option<String>,
    /// Comma separated label names.
    pub labels: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
    pub since: Option<DateTime<Utc>>,
    pub pagination: ListOptions,
}

/// Filters for the authenticated user's issues across repositories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListMyIssuesOptions {
    /// `assigned`, `created`, `mentioned`, `subscribed`, `repos` or `all`.
    pub filter: Option<String>,
    pub issues: ListIssuesOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListCommentsOptions {
    pub since: Option<DateTime<Utc>>,
    pub pagination: ListOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListMilestonesOptions {
    pub state: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
    pub pagination: ListOptions,
}

#[derive(Debug, Clone)]
pub struct Issues {
    dispatcher: Dispatcher,
}

impl Issues {
    pub(crate) fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub async fn list_for_repo(
        &self,
        owner: &str,
        repo: &str,
        options: &ListIssuesOptions,
    ) -> ApiResponse<Vec<ApiIssue>> {
        let query = issue_filter_query(None, options);
        let path = with_query(format!("/repos/{}/{}/issues", owner, repo), &query);
        self.dispatcher.send(ApiRequest::get(path)).await
    }

    pub async fn list_mine(&self, options: &ListMyIssuesOptions) -> ApiResponse<Vec<ApiIssue>> {
        let query = issue_filter_query(options.filter.clone(), &options.issues);
        let path = with_query("/issues".to_string(), &query);
        self.dispatcher.send(ApiRequest::get(path)).await
    }

    pub async fn get(&self, owner: &str, repo: &str, issue_number: u64) -> ApiResponse<ApiIssue> {
        let path = format!("/repos/{}/{}/issues/{}", owner, repo, issue_number);
        self.dispatcher.send(ApiRequest::get(path)).await
    }

    pub async fn create(
        &self,
        owner: &str,
        repo: &str,
        issue: &CreateIssue,
    ) -> ApiResponse<ApiIssue> {
        let path = format!("/repos/{}/{}/issues", owner, repo);
        self.dispatcher.send_json(ApiRequest::post(path), issue).await
    }

    pub async fn update(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
        update: &UpdateIssue,
    ) -> ApiResponse<ApiIssue> {
        let path = format!("/repos/{}/{}/issues/{}", owner, repo, issue_number);
        self.dispatcher.send_json(ApiRequest::patch(path), update).await
    }

    pub async fn lock(&self, owner: &str, repo: &str, issue_number: u64) -> ApiResponse<String> {
        let path = format!("/repos/{}/{}/issues/{}/lock", owner, repo, issue_number);
        self.dispatcher.send_text(ApiRequest::put(path)).await
    }

    pub async fn unlock(&self, owner: &str, repo: &str, issue_number: u64) -> ApiResponse<String> {
        let path = format!("/repos/{}/{}/issues/{}/lock", owner, repo, issue_number);
        self.dispatcher.send_text(ApiRequest::delete(path)).await
    }

    pub async fn list_comments(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
        options: &ListCommentsOptions,
    ) -> ApiResponse<Vec<ApiIssueComment>> {
        let query = pagination_query(
            options.since.as_ref().map(format_since),
            Some(options.pagination.per_page),
            Some(options.pagination.page),
        );
        let path = with_query(
            format!("/repos/{}/{}/issues/{}/comments", owner, repo, issue_number),
            &query,
        );
        self.dispatcher.send(ApiRequest::get(path)).await
    }

    pub async fn create_comment(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
        comment: &CreateComment,
    ) -> ApiResponse<ApiIssueComment> {
        let path = format!("/repos/{}/{}/issues/{}/comments", owner, repo, issue_number);
        self.dispatcher.send_json(ApiRequest::post(path), comment).await
    }

    pub async fn update_comment(
        &self,
        owner: &str,
        repo: &str,
        comment_id: u64,
        comment: &CreateComment,
    ) -> ApiResponse<ApiIssueComment> {
        let path = format!("/repos/{}/{}/issues/comments/{}", owner, repo, comment_id);
        self.dispatcher.send_json(ApiRequest::patch(path), comment).await
    }

    pub async fn delete_comment(
        &self,
        owner: &str,
        repo: &str,
        comment_id: u64,
    ) -> ApiResponse<String> {
        let path = format!("/repos/{}/{}/issues/comments/{}", owner, repo, comment_id);
        self.dispatcher.send_text(ApiRequest::delete(path)).await
    }

    pub async fn list_labels(
        &self,
        owner: &str,
        repo: &str,
        page: ListOptions,
    ) -> ApiResponse<Vec<ApiLabel>> {
        let path = with_query(
            format!("/repos/{}/{}/labels", owner, repo),
            &page.query_string(),
        );
        self.dispatcher.send(ApiRequest::get(path)).await
    }

    pub async fn list_milestones(
        &self,
        owner: &str,
        repo: &str,
        options: &ListMilestonesOptions,
    ) -> ApiResponse<Vec<ApiMilestone>> {
        let query = build_query_string(&[
            ("state", options.state.clone()),
            ("sort", options.sort.clone()),
            ("direction", options.direction.clone()),
            ("per_page", Some(options.pagination.per_page.to_string())),
            ("page", Some(options.pagination.page.to_string())),
        ]);
        let path = with_query(format!("/repos/{}/{}/milestones", owner, repo), &query);
        self.dispatcher.send(ApiRequest::get(path)).await
    }

    pub async fn get_milestone(
        &self,
        owner: &str,
        repo: &str,
        milestone_number: u64,
    ) -> ApiResponse<ApiMilestone> {
        let path = format!("/repos/{}/{}/milestones/{}", owner, repo, milestone_number);
        self.dispatcher.send(ApiRequest::get(path)).await
    }
}

fn issue_filter_query(filter: Option<String>, options: &ListIssuesOptions) -> String {
    build_query_string(&[
        ("filter", filter),
        ("state", options.state.clone()),
        ("labels", options.labels.clone()),
        ("sort", options.sort.clone()),
        ("direction", options.direction.clone()),
        ("since", options.since.as_ref().map(format_since)),
        ("per_page", Some(options.pagination.per_page.to_string())),
        ("page", Some(options.pagination.page.to_string())),
    ])
}
