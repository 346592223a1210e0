use super::dispatch::{ApiRequest, Dispatcher};
use super::query::{ListOptions, build_query_string, with_query};
use super::response::ApiResponse;
use super::types::{
    ApiBranch, ApiContent, ApiContributor, ApiRelease, ApiRepo, ApiTag, CreateRepository,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListUserReposOptions {
    /// `all`, `owner` or `member`.
    pub repo_type: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
    pub pagination: ListOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListMyReposOptions {
    pub visibility: Option<String>,
    pub affiliation: Option<String>,
    pub repo_type: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
    pub pagination: ListOptions,
}

#[derive(Debug, Clone)]
pub struct Repositories {
    dispatcher: Dispatcher,
}

impl Repositories {
    pub(crate) fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub async fn get(&self, owner: &str, repo: &str) -> ApiResponse<ApiRepo> {
        let path = format!("/repos/{}/{}", owner, repo);
        self.dispatcher.send(ApiRequest::get(path)).await
    }

    pub async fn list_for_user(
        &self,
        username: &str,
        options: &ListUserReposOptions,
    ) -> ApiResponse<Vec<ApiRepo>> {
        let query = build_query_string(&[
            ("type", options.repo_type.clone()),
            ("sort", options.sort.clone()),
            ("direction", options.direction.clone()),
            ("per_page", Some(options.pagination.per_page.to_string())),
            ("page", Some(options.pagination.page.to_string())),
        ]);
        let path = with_query(format!("/users/{}/repos", username), &query);
        self.dispatcher.send(ApiRequest::get(path)).await
    }

    /// Repositories the authenticated user can access.
    pub async fn list_mine(&self, options: &ListMyReposOptions) -> ApiResponse<Vec<ApiRepo>> {
        let query = build_query_string(&[
            ("visibility", options.visibility.clone()),
            ("affiliation", options.affiliation.clone()),
            ("type", options.repo_type.clone()),
            ("sort", options.sort.clone()),
            ("direction", options.direction.clone()),
            ("per_page", Some(options.pagination.per_page.to_string())),
            ("page", Some(options.pagination.page.to_string())),
        ]);
        let path = with_query("/user/repos".to_string(), &query);
        self.dispatcher.send(ApiRequest::get(path)).await
    }

    pub async fn create(&self, repository: &CreateRepository) -> ApiResponse<ApiRepo> {
        self.dispatcher
            .send_json(ApiRequest::post("/user/repos"), repository)
            .await
    }

    pub async fn delete(&self, owner: &str, repo: &str) -> ApiResponse<String> {
        let path = format!("/repos/{}/{}", owner, repo);
        self.dispatcher.send_text(ApiRequest::delete(path)).await
    }

    pub async fn list_branches(
        &self,
        owner: &str,
        repo: &str,
        page: ListOptions,
    ) -> ApiResponse<Vec<ApiBranch>> {
        let path = with_query(
            format!("/repos/{}/{}/branches", owner, repo),
            &page.query_string(),
        );
        self.dispatcher.send(ApiRequest::get(path)).await
    }

    pub async fn get_branch(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> ApiResponse<ApiBranch> {
        let path = format!("/repos/{}/{}/branches/{}", owner, repo, branch);
        self.dispatcher.send(ApiRequest::get(path)).await
    }

    pub async fn list_tags(
        &self,
        owner: &str,
        repo: &str,
        page: ListOptions,
    ) -> ApiResponse<Vec<ApiTag>> {
        let path = with_query(
            format!("/repos/{}/{}/tags", owner, repo),
            &page.query_string(),
        );
        self.dispatcher.send(ApiRequest::get(path)).await
    }

    pub async fn list_releases(
        &self,
        owner: &str,
        repo: &str,
        page: ListOptions,
    ) -> ApiResponse<Vec<ApiRelease>> {
        let path = with_query(
            format!("/repos/{}/{}/releases", owner, repo),
            &page.query_string(),
        );
        self.dispatcher.send(ApiRequest::get(path)).await
    }

    pub async fn get_latest_release(&self, owner: &str, repo: &str) -> ApiResponse<ApiRelease> {
        let path = format!("/repos/{}/{}/releases/latest", owner, repo);
        self.dispatcher.send(ApiRequest::get(path)).await
    }

    pub async fn list_contributors(
        &self,
        owner: &str,
        repo: &str,
        page: ListOptions,
    ) -> ApiResponse<Vec<ApiContributor>> {
        let path = with_query(
            format!("/repos/{}/{}/contributors", owner, repo),
            &page.query_string(),
        );
        self.dispatcher.send(ApiRequest::get(path)).await
    }

    /// Fetches a single file. `reference` is a branch, tag or commit; `None`
    /// means the default branch.
    pub async fn get_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        reference: Option<&str>,
    ) -> ApiResponse<ApiContent> {
        let request = ApiRequest::get(contents_path(owner, repo, path, reference));
        self.dispatcher.send(request).await
    }

    /// Lists a directory; an empty `path` lists the repository root.
    pub async fn list_contents(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        reference: Option<&str>,
    ) -> ApiResponse<Vec<ApiContent>> {
        let request = ApiRequest::get(contents_path(owner, repo, path, reference));
        self.dispatcher.send(request).await
    }
}

fn contents_path(owner: &str, repo: &str, path: &str, reference: Option<&str>) -> String {
    let query = build_query_string(&[("ref", reference.map(ToString::to_string))]);
    with_query(
        format!("/repos/{}/{}/contents/{}", owner, repo, path),
        &query,
    )
}
