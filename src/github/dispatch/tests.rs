use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use super::{ApiRequest, Dispatcher, RawResponse, Transport};
use crate::github::response::ApiError;

#[derive(Debug, Deserialize, PartialEq)]
struct Widget {
    name: String,
}

enum Reply {
    Response(u16, &'static str, HeaderMap),
    Fail(&'static str),
    Hang,
}

struct ScriptedTransport {
    reply: Reply,
    seen: Mutex<Vec<(String, ApiRequest)>>,
}

impl ScriptedTransport {
    fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            seen: Mutex::new(Vec::new()),
        })
    }

    fn seen(&self) -> Vec<(String, ApiRequest)> {
        self.seen.lock().expect("seen lock").clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, url: &str, request: &ApiRequest) -> Result<RawResponse> {
        self.seen
            .lock()
            .expect("seen lock")
            .push((url.to_string(), request.clone()));
        match &self.reply {
            Reply::Response(status, body, headers) => Ok(RawResponse {
                status: *status,
                headers: headers.clone(),
                body: body.to_string(),
            }),
            Reply::Fail(message) => Err(anyhow!(*message)),
            Reply::Hang => std::future::pending::<Result<RawResponse>>().await,
        }
    }
}

fn rate_limit_headers(remaining: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("x-ratelimit-limit", HeaderValue::from_static("60"));
    headers.insert("x-ratelimit-remaining", HeaderValue::from_static(remaining));
    headers.insert("x-ratelimit-reset", HeaderValue::from_static("1700000000"));
    headers
}

fn dispatcher(transport: Arc<ScriptedTransport>) -> Dispatcher {
    Dispatcher::new("https://api.example.test/", transport)
}

#[tokio::test]
async fn joins_base_url_and_path() {
    let transport =
        ScriptedTransport::new(Reply::Response(200, "{\"name\":\"a\"}", HeaderMap::new()));
    let dispatcher = dispatcher(transport.clone());

    let _ = dispatcher
        .send::<Widget>(ApiRequest::get("/widgets/1?page=2"))
        .await;

    let seen = transport.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, "https://api.example.test/widgets/1?page=2");
    assert_eq!(seen[0].1.method, Method::GET);
}

#[tokio::test]
async fn decodes_success_and_attaches_rate_limit() {
    let transport = ScriptedTransport::new(Reply::Response(
        200,
        "{\"name\":\"gear\",\"extra\":true}",
        rate_limit_headers("42"),
    ));

    let response = dispatcher(transport)
        .send::<Widget>(ApiRequest::get("/widgets/1"))
        .await;

    assert!(response.is_success());
    assert_eq!(
        response.data,
        Some(Widget {
            name: "gear".to_string()
        })
    );
    assert_eq!(response.error, None);
    assert_eq!(response.rate_limit.map(|limit| limit.remaining), Some(42));
}

#[tokio::test]
async fn http_error_keeps_raw_body() {
    let transport = ScriptedTransport::new(Reply::Response(
        422,
        "{\"message\":\"Validation Failed\"}",
        rate_limit_headers("10"),
    ));

    let response = dispatcher(transport)
        .send::<Widget>(ApiRequest::get("/widgets"))
        .await;

    assert_eq!(response.status, 422);
    assert_eq!(response.data, None);
    assert_eq!(
        response.error,
        Some(ApiError::Http("{\"message\":\"Validation Failed\"}".to_string()))
    );
    assert!(response.rate_limit.is_some());
}

#[tokio::test]
async fn transport_failure_is_status_zero_without_rate_limit() {
    let transport = ScriptedTransport::new(Reply::Fail("dns lookup failed"));

    let response = dispatcher(transport)
        .send::<Widget>(ApiRequest::get("/widgets"))
        .await;

    assert_eq!(response.status, 0);
    assert!(!response.is_success());
    assert_eq!(response.rate_limit, None);
    assert_eq!(response.error_message(), Some("dns lookup failed"));
}

#[tokio::test]
async fn decode_failure_is_distinct_from_transport_failure() {
    let transport =
        ScriptedTransport::new(Reply::Response(200, "[1, 2, 3]", rate_limit_headers("5")));

    let response = dispatcher(transport)
        .send::<Widget>(ApiRequest::get("/widgets/1"))
        .await;

    assert_eq!(response.status, 0);
    assert_eq!(response.data, None);
    assert!(matches!(
        response.error,
        Some(ApiError::Decode { status: 200, .. })
    ));
    assert_eq!(response.rate_limit.map(|limit| limit.remaining), Some(5));
}

#[tokio::test]
async fn empty_success_body_decodes_as_unit() {
    let transport = ScriptedTransport::new(Reply::Response(204, "", HeaderMap::new()));

    let response = dispatcher(transport)
        .send::<()>(ApiRequest::put("/widgets/1/lock"))
        .await;

    assert_eq!(response.status, 204);
    assert_eq!(response.data, Some(()));
}

#[tokio::test]
async fn send_text_returns_body_verbatim() {
    let transport = ScriptedTransport::new(Reply::Response(
        200,
        "{\"merged\":true,\"message\":\"Pull Request successfully merged\"}",
        HeaderMap::new(),
    ));

    let response = dispatcher(transport)
        .send_text(ApiRequest::put("/repos/o/r/pulls/1/merge"))
        .await;

    assert!(response.is_success());
    assert_eq!(
        response.data.as_deref(),
        Some("{\"merged\":true,\"message\":\"Pull Request successfully merged\"}")
    );
}

#[tokio::test]
async fn send_text_failure_has_no_payload() {
    let transport = ScriptedTransport::new(Reply::Response(404, "nope", HeaderMap::new()));

    let response = dispatcher(transport)
        .send_text(ApiRequest::get("/gists/1/star"))
        .await;

    assert_eq!(response.status, 404);
    assert_eq!(response.data, None);
    assert_eq!(response.error_message(), Some("nope"));
}

#[tokio::test]
async fn json_body_is_serialized() {
    let transport =
        ScriptedTransport::new(Reply::Response(201, "{\"name\":\"new\"}", HeaderMap::new()));
    let dispatcher = dispatcher(transport.clone());

    let response = dispatcher
        .send_json::<_, Widget>(
            ApiRequest::post("/widgets"),
            &serde_json::json!({"name": "new"}),
        )
        .await;

    assert_eq!(response.status, 201);
    let seen = transport.seen();
    assert_eq!(seen[0].1.method, Method::POST);
    assert_eq!(seen[0].1.body.as_deref(), Some("{\"name\":\"new\"}"));
}

#[tokio::test]
async fn cancellation_abandons_in_flight_call() {
    let transport = ScriptedTransport::new(Reply::Hang);
    let token = CancellationToken::new();
    let dispatcher = dispatcher(transport).with_cancellation(token.clone());

    let call = tokio::spawn(async move {
        dispatcher
            .send::<Widget>(ApiRequest::get("/widgets/slow"))
            .await
    });
    token.cancel();
    let response = call.await.expect("join dispatch task");

    assert_eq!(response.status, 0);
    assert_eq!(response.error_message(), Some("request cancelled"));
}

#[tokio::test]
async fn identical_replies_produce_identical_envelopes() {
    let transport = ScriptedTransport::new(Reply::Response(
        200,
        "{\"name\":\"gear\"}",
        rate_limit_headers("7"),
    ));
    let dispatcher = dispatcher(transport);

    let first = dispatcher.send::<Widget>(ApiRequest::get("/widgets/1")).await;
    let second = dispatcher.send::<Widget>(ApiRequest::get("/widgets/1")).await;

    assert_eq!(first, second);
}
