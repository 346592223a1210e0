use serde::de::DeserializeOwned;

use super::dispatch::{ApiRequest, Dispatcher};
use super::query::{ListOptions, build_query_string, with_query};
use super::response::ApiResponse;
use super::types::{
    CodeSearchResults, CommitSearchResults, IssueSearchResults, RepositorySearchResults,
    SearchResults, UserSearchResults,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Endpoint specific, e.g. `stars` for repositories. Best match when unset.
    pub sort: Option<String>,
    /// `asc` or `desc`; ignored by GitHub without `sort`.
    pub order: Option<String>,
    pub pagination: ListOptions,
}

#[derive(Debug, Clone)]
pub struct Search {
    dispatcher: Dispatcher,
}

impl Search {
    pub(crate) fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub async fn repositories(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> ApiResponse<RepositorySearchResults> {
        self.search("repositories", query, options).await
    }

    pub async fn code(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> ApiResponse<CodeSearchResults> {
        self.search("code", query, options).await
    }

    /// Issues and pull requests share one index.
    pub async fn issues(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> ApiResponse<IssueSearchResults> {
        self.search("issues", query, options).await
    }

    pub async fn users(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> ApiResponse<UserSearchResults> {
        self.search("users", query, options).await
    }

    pub async fn commits(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> ApiResponse<CommitSearchResults> {
        self.search("commits", query, options).await
    }

    async fn search<T>(
        &self,
        kind: &str,
        query: &str,
        options: &SearchOptions,
    ) -> ApiResponse<SearchResults<T>>
    where
        T: DeserializeOwned,
    {
        let query = build_query_string(&[
            ("q", Some(query.to_string())),
            ("sort", options.sort.clone()),
            ("order", options.order.clone()),
            ("per_page", Some(options.pagination.per_page.to_string())),
            ("page", Some(options.pagination.page.to_string())),
        ]);
        let path = with_query(format!("/search/{}", kind), &query);
        self.dispatcher.send(ApiRequest::get(path)).await
    }
}
