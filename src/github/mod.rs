use std::sync::Arc;

use anyhow::{Context, Result, bail};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::ClientOptions;

mod dispatch;
mod gists;
mod issues;
mod pull_requests;
mod query;
mod rate_limit;
mod repos;
mod response;
mod search;
mod types;
mod users;

pub use dispatch::{ApiRequest, Dispatcher, RawResponse, ReqwestTransport, Transport};
pub use gists::{Gists, ListGistsOptions};
pub use issues::{
    Issues, ListCommentsOptions, ListIssuesOptions, ListMilestonesOptions, ListMyIssuesOptions,
};
pub use pull_requests::{ListPullRequestsOptions, ListReviewCommentsOptions, PullRequests};
pub use query::{ListOptions, build_query_string, format_since};
pub use rate_limit::RateLimit;
pub use repos::{ListMyReposOptions, ListUserReposOptions, Repositories};
pub use response::{ApiError, ApiResponse, Presence, is_success_status};
pub use search::{Search, SearchOptions};
pub use types::*;
pub use users::{ListUsersOptions, Users};

pub const API_VERSION: &str = "2022-11-28";
pub const API_MEDIA_TYPE: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";

/// Root handle. Cloning is cheap and every clone shares one connection pool.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    dispatcher: Dispatcher,
}

impl GitHubClient {
    pub fn new(options: &ClientOptions) -> Result<Self> {
        let base_url = parse_base_url(&options.base_url)?;
        let client = reqwest::Client::builder()
            .default_headers(default_headers(options)?)
            .timeout(options.timeout)
            .build()
            .context("Failed to build HTTP client")?;
        let transport = Arc::new(ReqwestTransport::new(client));
        Ok(Self {
            dispatcher: Dispatcher::new(base_url.as_str(), transport),
        })
    }

    pub fn anonymous() -> Result<Self> {
        Self::new(&ClientOptions::default())
    }

    /// Uses a caller-supplied transport. Standard headers are then the
    /// transport's responsibility.
    pub fn with_transport(base_url: &str, transport: Arc<dyn Transport>) -> Result<Self> {
        let base_url = parse_base_url(base_url)?;
        Ok(Self {
            dispatcher: Dispatcher::new(base_url.as_str(), transport),
        })
    }

    /// Returns a handle whose calls resolve to a status-0 transport error as
    /// soon as `token` is cancelled.
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            dispatcher: self.dispatcher.with_cancellation(token),
        }
    }

    pub fn base_url(&self) -> &str {
        self.dispatcher.base_url()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn repositories(&self) -> Repositories {
        Repositories::new(self.dispatcher.clone())
    }

    pub fn issues(&self) -> Issues {
        Issues::new(self.dispatcher.clone())
    }

    pub fn pulls(&self) -> PullRequests {
        PullRequests::new(self.dispatcher.clone())
    }

    pub fn users(&self) -> Users {
        Users::new(self.dispatcher.clone())
    }

    pub fn gists(&self) -> Gists {
        Gists::new(self.dispatcher.clone())
    }

    pub fn search(&self) -> Search {
        Search::new(self.dispatcher.clone())
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).with_context(|| format!("Invalid GitHub base URL {raw:?}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("GitHub base URL must use http or https, got {raw:?}");
    }
    if url.cannot_be_a_base() {
        bail!("GitHub base URL cannot be used as a base: {raw:?}");
    }
    Ok(url)
}

fn default_headers(options: &ClientOptions) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&options.user_agent)
            .with_context(|| format!("Invalid user agent {:?}", options.user_agent))?,
    );
    headers.insert(ACCEPT, HeaderValue::from_static(API_MEDIA_TYPE));
    headers.insert(API_VERSION_HEADER, HeaderValue::from_static(API_VERSION));

    if let Some(token) = options.token.as_deref().filter(|token| !token.is_empty()) {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
            .context("GitHub token contains characters not allowed in a header")?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}

#[cfg(test)]
mod tests;
