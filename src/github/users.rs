use super::dispatch::{ApiRequest, Dispatcher};
use super::query::{DEFAULT_PER_PAGE, ListOptions, build_query_string, with_query};
use super::response::ApiResponse;
use super::types::{ApiEmail, ApiGpgKey, ApiSshKey, ApiUser, CreateSshKey};

/// `/users` pages by user id rather than page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListUsersOptions {
    /// Only users with an id greater than this.
    pub since: Option<u64>,
    pub per_page: u32,
}

impl Default for ListUsersOptions {
    fn default() -> Self {
        Self {
            since: None,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Users {
    dispatcher: Dispatcher,
}

impl Users {
    pub(crate) fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub async fn get_authenticated(&self) -> ApiResponse<ApiUser> {
        self.dispatcher.send(ApiRequest::get("/user")).await
    }

    pub async fn get(&self, username: &str) -> ApiResponse<ApiUser> {
        let path = format!("/users/{}", username);
        self.dispatcher.send(ApiRequest::get(path)).await
    }

    pub async fn list(&self, options: ListUsersOptions) -> ApiResponse<Vec<ApiUser>> {
        let query = build_query_string(&[
            ("since", options.since.map(|since| since.to_string())),
            ("per_page", Some(options.per_page.to_string())),
        ]);
        let path = with_query("/users".to_string(), &query);
        self.dispatcher.send(ApiRequest::get(path)).await
    }

    pub async fn list_followers(
        &self,
        username: &str,
        page: ListOptions,
    ) -> ApiResponse<Vec<ApiUser>> {
        let path = with_query(format!("/users/{}/followers", username), &page.query_string());
        self.dispatcher.send(ApiRequest::get(path)).await
    }

    pub async fn list_following(
        &self,
        username: &str,
        page: ListOptions,
    ) -> ApiResponse<Vec<ApiUser>> {
        let path = with_query(format!("/users/{}/following", username), &page.query_string());
        self.dispatcher.send(ApiRequest::get(path)).await
    }

    /// 204 when `username` follows `target`, 404 otherwise.
    pub async fn check_following(&self, username: &str, target: &str) -> ApiResponse<String> {
        let path = format!("/users/{}/following/{}", username, target);
        self.dispatcher.send_text(ApiRequest::get(path)).await
    }

    pub async fn list_emails(&self, page: ListOptions) -> ApiResponse<Vec<ApiEmail>> {
        let path = with_query("/user/emails".to_string(), &page.query_string());
        self.dispatcher.send(ApiRequest::get(path)).await
    }

    pub async fn list_ssh_keys_for_user(
        &self,
        username: &str,
        page: ListOptions,
    ) -> ApiResponse<Vec<ApiSshKey>> {
        let path = with_query(format!("/users/{}/keys", username), &page.query_string());
        self.dispatcher.send(ApiRequest::get(path)).await
    }

    pub async fn list_my_ssh_keys(&self, page: ListOptions) -> ApiResponse<Vec<ApiSshKey>> {
        let path = with_query("/user/keys".to_string(), &page.query_string());
        self.dispatcher.send(ApiRequest::get(path)).await
    }

    pub async fn create_ssh_key(&self, key: &CreateSshKey) -> ApiResponse<ApiSshKey> {
        self.dispatcher
            .send_json(ApiRequest::post("/user/keys"), key)
            .await
    }

    pub async fn delete_ssh_key(&self, key_id: u64) -> ApiResponse<String> {
        let path = format!("/user/keys/{}", key_id);
        self.dispatcher.send_text(ApiRequest::delete(path)).await
    }

    pub async fn list_gpg_keys_for_user(
        &self,
        username: &str,
        page: ListOptions,
    ) -> ApiResponse<Vec<ApiGpgKey>> {
        let path = with_query(format!("/users/{}/gpg_keys", username), &page.query_string());
        self.dispatcher.send(ApiRequest::get(path)).await
    }

    pub async fn list_my_gpg_keys(&self, page: ListOptions) -> ApiResponse<Vec<ApiGpgKey>> {
        let path = with_query("/user/gpg_keys".to_string(), &page.query_string());
        self.dispatcher.send(ApiRequest::get(path)).await
    }
}
