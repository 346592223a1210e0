use chrono::{DateTime, Utc};

use super::dispatch::{ApiRequest, Dispatcher};
use super::query::{ListOptions, format_since, pagination_query, with_query};
use super::response::ApiResponse;
use super::types::{
    ApiGist, ApiGistComment, ApiGistCommit, CreateGist, CreateGistComment, UpdateGist,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListGistsOptions {
    /// Only gists updated at or after this time.
    pub since: Option<DateTime<Utc>>,
    pub pagination: ListOptions,
}

impl ListGistsOptions {
    fn query_string(&self) -> String {
        pagination_query(
            self.since.as_ref().map(format_since),
            Some(self.pagination.per_page),
            Some(self.pagination.page),
        )
    }
}

#[derive(Debug, Clone)]
pub struct Gists {
    dispatcher: Dispatcher,
}

impl Gists {
    pub(crate) fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub async fn list_mine(&self, options: &ListGistsOptions) -> ApiResponse<Vec<ApiGist>> {
        self.list_at("/gists", options).await
    }

    pub async fn list_public(&self, options: &ListGistsOptions) -> ApiResponse<Vec<ApiGist>> {
        self.list_at("/gists/public", options).await
    }

    pub async fn list_starred(&self, options: &ListGistsOptions) -> ApiResponse<Vec<ApiGist>> {
        self.list_at("/gists/starred", options).await
    }

    pub async fn list_for_user(
        &self,
        username: &str,
        options: &ListGistsOptions,
    ) -> ApiResponse<Vec<ApiGist>> {
        self.list_at(&format!("/users/{}/gists", username), options)
            .await
    }

    pub async fn get(&self, gist_id: &str) -> ApiResponse<ApiGist> {
        let path = format!("/gists/{}", gist_id);
        self.dispatcher.send(ApiRequest::get(path)).await
    }

    pub async fn create(&self, gist: &CreateGist) -> ApiResponse<ApiGist> {
        self.dispatcher
            .send_json(ApiRequest::post("/gists"), gist)
            .await
    }

    pub async fn update(&self, gist_id: &str, update: &UpdateGist) -> ApiResponse<ApiGist> {
        let path = format!("/gists/{}", gist_id);
        self.dispatcher.send_json(ApiRequest::patch(path), update).await
    }

    pub async fn delete(&self, gist_id: &str) -> ApiResponse<String> {
        let path = format!("/gists/{}", gist_id);
        self.dispatcher.send_text(ApiRequest::delete(path)).await
    }

    pub async fn list_commits(
        &self,
        gist_id: &str,
        page: ListOptions,
    ) -> ApiResponse<Vec<ApiGistCommit>> {
        let path = with_query(format!("/gists/{}/commits", gist_id), &page.query_string());
        self.dispatcher.send(ApiRequest::get(path)).await
    }

    pub async fn fork(&self, gist_id: &str) -> ApiResponse<ApiGist> {
        let path = format!("/gists/{}/forks", gist_id);
        self.dispatcher.send(ApiRequest::post(path)).await
    }

    pub async fn list_forks(&self, gist_id: &str, page: ListOptions) -> ApiResponse<Vec<ApiGist>> {
        let path = with_query(format!("/gists/{}/forks", gist_id), &page.query_string());
        self.dispatcher.send(ApiRequest::get(path)).await
    }

    pub async fn star(&self, gist_id: &str) -> ApiResponse<String> {
        let path = format!("/gists/{}/star", gist_id);
        self.dispatcher.send_text(ApiRequest::put(path)).await
    }

    pub async fn unstar(&self, gist_id: &str) -> ApiResponse<String> {
        let path = format!("/gists/{}/star", gist_id);
        self.dispatcher.send_text(ApiRequest::delete(path)).await
    }

    /// 204 when starred, 404 when not.
    pub async fn is_starred(&self, gist_id: &str) -> ApiResponse<String> {
        let path = format!("/gists/{}/star", gist_id);
        self.dispatcher.send_text(ApiRequest::get(path)).await
    }

    pub async fn list_comments(
        &self,
        gist_id: &str,
        page: ListOptions,
    ) -> ApiResponse<Vec<ApiGistComment>> {
        let path = with_query(format!("/gists/{}/comments", gist_id), &page.query_string());
        self.dispatcher.send(ApiRequest::get(path)).await
    }

    pub async fn get_comment(&self, gist_id: &str, comment_id: u64) -> ApiResponse<ApiGistComment> {
        let path = format!("/gists/{}/comments/{}", gist_id, comment_id);
        self.dispatcher.send(ApiRequest::get(path)).await
    }

    pub async fn create_comment(
        &self,
        gist_id: &str,
        comment: &CreateGistComment,
    ) -> ApiResponse<ApiGistComment> {
        let path = format!("/gists/{}/comments", gist_id);
        self.dispatcher.send_json(ApiRequest::post(path), comment).await
    }

    pub async fn update_comment(
        &self,
        gist_id: &str,
        comment_id: u64,
        comment: &CreateGistComment,
    ) -> ApiResponse<ApiGistComment> {
        let path = format!("/gists/{}/comments/{}", gist_id, comment_id);
        self.dispatcher.send_json(ApiRequest::patch(path), comment).await
    }

    pub async fn delete_comment(&self, gist_id: &str, comment_id: u64) -> ApiResponse<String> {
        let path = format!("/gists/{}/comments/{}", gist_id, comment_id);
        self.dispatcher.send_text(ApiRequest::delete(path)).await
    }

    async fn list_at(&self, path: &str, options: &ListGistsOptions) -> ApiResponse<Vec<ApiGist>> {
        let path = with_query(path.to_string(), &options.query_string());
        self.dispatcher.send(ApiRequest::get(path)).await
    }
}
