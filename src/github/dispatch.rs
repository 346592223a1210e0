use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::rate_limit::RateLimit;
use super::response::{ApiError, ApiResponse, STATUS_TRANSPORT_FAILURE, is_success_status};

const JSON_CONTENT_TYPE: &str = "application/json";

/// A request relative to the client's base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path plus optional query string, e.g. `/repos/o/r/issues?state=open`.
    pub path: String,
    /// JSON body text.
    pub body: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> serde_json::Result<Self> {
        self.body = Some(serde_json::to_string(body)?);
        Ok(self)
    }
}

/// What came back over the wire, before any interpretation.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: String,
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs the call. `Err` means no response was received.
    async fn execute(&self, url: &str, request: &ApiRequest) -> Result<RawResponse>;
}

/// Pooled HTTP transport; default headers and timeout live in the client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, url: &str, request: &ApiRequest) -> Result<RawResponse> {
        let mut builder = self.client.request(request.method.clone(), url);
        if let Some(body) = &request.body {
            builder = builder
                .header(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))
                .body(body.clone());
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await?;
        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

/// Sends requests and turns every outcome into an [`ApiResponse`].
#[derive(Clone)]
pub struct Dispatcher {
    base_url: Arc<str>,
    transport: Arc<dyn Transport>,
    cancel: Option<CancellationToken>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("base_url", &self.base_url)
            .field("cancellable", &self.cancel.is_some())
            .finish()
    }
}

impl Dispatcher {
    pub fn new(base_url: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: Arc::from(base_url.trim_end_matches('/')),
            transport,
            cancel: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            cancel: Some(token),
            ..self.clone()
        }
    }

    /// Decodes a 2xx body into `T`. An empty body decodes as JSON `null`, so
    /// `()` and `Option<_>` payloads work for 204 responses.
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> ApiResponse<T> {
        let raw = match self.execute(&request).await {
            Ok(raw) => raw,
            Err(message) => return ApiResponse::transport_failure(message),
        };
        let rate_limit = RateLimit::from_headers(&raw.headers);
        if !is_success_status(raw.status) {
            return ApiResponse::failure(raw.status, ApiError::Http(raw.body), rate_limit);
        }

        match decode_body::<T>(&raw.body) {
            Ok(data) => ApiResponse::success(raw.status, data, rate_limit),
            Err(err) => {
                warn!(
                    method = %request.method,
                    path = %request.path,
                    status = raw.status,
                    error = %err,
                    "GitHub response did not match the expected shape"
                );
                ApiResponse::failure(
                    STATUS_TRANSPORT_FAILURE,
                    ApiError::Decode {
                        status: raw.status,
                        message: err.to_string(),
                    },
                    rate_limit,
                )
            }
        }
    }

    /// Like [`Dispatcher::send`] but the payload is the body text itself.
    pub async fn send_text(&self, request: ApiRequest) -> ApiResponse<String> {
        let raw = match self.execute(&request).await {
            Ok(raw) => raw,
            Err(message) => return ApiResponse::transport_failure(message),
        };
        let rate_limit = RateLimit::from_headers(&raw.headers);
        if is_success_status(raw.status) {
            ApiResponse::success(raw.status, raw.body, rate_limit)
        } else {
            ApiResponse::failure(raw.status, ApiError::Http(raw.body), rate_limit)
        }
    }

    pub async fn send_json<B, T>(&self, request: ApiRequest, body: &B) -> ApiResponse<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        match request.json(body) {
            Ok(request) => self.send(request).await,
            Err(err) => ApiResponse::transport_failure(encode_failure(&err)),
        }
    }

    pub async fn send_json_text<B>(&self, request: ApiRequest, body: &B) -> ApiResponse<String>
    where
        B: Serialize + ?Sized,
    {
        match request.json(body) {
            Ok(request) => self.send_text(request).await,
            Err(err) => ApiResponse::transport_failure(encode_failure(&err)),
        }
    }

    async fn execute(&self, request: &ApiRequest) -> Result<RawResponse, String> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!(method = %request.method, path = %request.path, "sending GitHub request");

        let call = self.transport.execute(&url, request);
        let outcome = match &self.cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => Err(anyhow::anyhow!("request cancelled")),
                outcome = call => outcome,
            },
            None => call.await,
        };

        match outcome {
            Ok(raw) => {
                debug!(
                    method = %request.method,
                    path = %request.path,
                    status = raw.status,
                    "received GitHub response"
                );
                Ok(raw)
            }
            Err(err) => {
                let message = format!("{err:#}");
                warn!(
                    method = %request.method,
                    path = %request.path,
                    error = %message,
                    "GitHub request failed before a response arrived"
                );
                Err(message)
            }
        }
    }
}

fn decode_body<T: DeserializeOwned>(body: &str) -> serde_json::Result<T> {
    if body.trim().is_empty() {
        serde_json::from_str("null")
    } else {
        serde_json::from_str(body)
    }
}

fn encode_failure(err: &serde_json::Error) -> String {
    format!("failed to encode request body: {err}")
}

#[cfg(test)]
mod tests;
