use chrono::{DateTime, Utc};

use super::dispatch::{ApiRequest, Dispatcher};
use super::query::{ListOptions, build_query_string, format_since, with_query};
use super::response::ApiResponse;
use super::types::{
    ApiPullRequest, ApiPullRequestFile, ApiReview, ApiReviewComment, CreatePullRequest,
    CreateReview, MergeOptions, ReviewCommentDraft, UpdatePullRequest,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPullRequestsOptions {
    pub state: Option<String>,
    /// `user:ref-name` or `organization:ref-name`.
    pub head: Option<String>,
    pub base: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
    pub pagination: ListOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListReviewCommentsOptions {
    pub sort: Option<String>,
    pub direction: Option<String>,
    pub since: Option<DateTime<Utc>>,
    pub pagination: ListOptions,
}

#[derive(Debug, Clone)]
pub struct PullRequests {
    dispatcher: Dispatcher,
}

impl PullRequests {
    pub(crate) fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub async fn list(
        &self,
        owner: &str,
        repo: &str,
        options: &ListPullRequestsOptions,
    ) -> ApiResponse<Vec<ApiPullRequest>> {
        let query = build_query_string(&[
            ("state", options.state.clone()),
            ("head", options.head.clone()),
            ("base", options.base.clone()),
            ("sort", options.sort.clone()),
            ("direction", options.direction.clone()),
            ("per_page", Some(options.pagination.per_page.to_string())),
            ("page", Some(options.pagination.page.to_string())),
        ]);
        let path = with_query(format!("/repos/{}/{}/pulls", owner, repo), &query);
        self.dispatcher.send(ApiRequest::get(path)).await
    }

    pub async fn get(&self, owner: &str, repo: &str, number: u64) -> ApiResponse<ApiPullRequest> {
        self.dispatcher
            .send(ApiRequest::get(pull_path(owner, repo, number)))
            .await
    }

    pub async fn create(
        &self,
        owner: &str,
        repo: &str,
        pull: &CreatePullRequest,
    ) -> ApiResponse<ApiPullRequest> {
        let path = format!("/repos/{}/{}/pulls", owner, repo);
        self.dispatcher.send_json(ApiRequest::post(path), pull).await
    }

    pub async fn update(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        update: &UpdatePullRequest,
    ) -> ApiResponse<ApiPullRequest> {
        self.dispatcher
            .send_json(ApiRequest::patch(pull_path(owner, repo, number)), update)
            .await
    }

    pub async fn list_files(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        page: ListOptions,
    ) -> ApiResponse<Vec<ApiPullRequestFile>> {
        let path = with_query(
            format!("{}/files", pull_path(owner, repo, number)),
            &page.query_string(),
        );
        self.dispatcher.send(ApiRequest::get(path)).await
    }

    /// 204 means merged, 404 means not merged. Use [`ApiResponse::presence`].
    pub async fn is_merged(&self, owner: &str, repo: &str, number: u64) -> ApiResponse<String> {
        let path = format!("{}/merge", pull_path(owner, repo, number));
        self.dispatcher.send_text(ApiRequest::get(path)).await
    }

    pub async fn merge(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        options: &MergeOptions,
    ) -> ApiResponse<String> {
        let path = format!("{}/merge", pull_path(owner, repo, number));
        self.dispatcher
            .send_json_text(ApiRequest::put(path), options)
            .await
    }

    pub async fn list_reviews(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        page: ListOptions,
    ) -> ApiResponse<Vec<ApiReview>> {
        let path = with_query(
            format!("{}/reviews", pull_path(owner, repo, number)),
            &page.query_string(),
        );
        self.dispatcher.send(ApiRequest::get(path)).await
    }

    pub async fn get_review(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        review_id: u64,
    ) -> ApiResponse<ApiReview> {
        let path = format!("{}/reviews/{}", pull_path(owner, repo, number), review_id);
        self.dispatcher.send(ApiRequest::get(path)).await
    }

    pub async fn create_review(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        review: &CreateReview,
    ) -> ApiResponse<ApiReview> {
        let path = format!("{}/reviews", pull_path(owner, repo, number));
        self.dispatcher.send_json(ApiRequest::post(path), review).await
    }

    pub async fn list_review_comments(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        options: &ListReviewCommentsOptions,
    ) -> ApiResponse<Vec<ApiReviewComment>> {
        let query = build_query_string(&[
            ("sort", options.sort.clone()),
            ("direction", options.direction.clone()),
            ("since", options.since.as_ref().map(format_since)),
            ("per_page", Some(options.pagination.per_page.to_string())),
            ("page", Some(options.pagination.page.to_string())),
        ]);
        let path = with_query(format!("{}/comments", pull_path(owner, repo, number)), &query);
        self.dispatcher.send(ApiRequest::get(path)).await
    }

    pub async fn get_review_comment(
        &self,
        owner: &str,
        repo: &str,
        comment_id: u64,
    ) -> ApiResponse<ApiReviewComment> {
        let path = format!("/repos/{}/{}/pulls/comments/{}", owner, repo, comment_id);
        self.dispatcher.send(ApiRequest::get(path)).await
    }

    pub async fn create_review_comment(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        comment: &ReviewCommentDraft,
    ) -> ApiResponse<ApiReviewComment> {
        let path = format!("{}/comments", pull_path(owner, repo, number));
        self.dispatcher.send_json(ApiRequest::post(path), comment).await
    }

    pub async fn delete_review_comment(
        &self,
        owner: &str,
        repo: &str,
        comment_id: u64,
    ) -> ApiResponse<String> {
        let path = format!("/repos/{}/{}/pulls/comments/{}", owner, repo, comment_id);
        self.dispatcher.send_text(ApiRequest::delete(path)).await
    }
}

fn pull_path(owner: &str, repo: &str, number: u64) -> String {
    format!("/repos/{}/{}/pulls/{}", owner, repo, number)
}
