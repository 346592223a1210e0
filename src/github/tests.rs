use mockito::{Matcher, Server};
use pretty_assertions::assert_eq;
use serde_json::json;

use super::{
    ApiError, CreateIssue, GitHubClient, ListIssuesOptions, ListOptions, ListUserReposOptions,
    MergeOptions, Presence, SearchOptions,
};
use crate::config::ClientOptions;

fn client_for(server: &Server) -> GitHubClient {
    GitHubClient::new(&ClientOptions::default().with_base_url(server.url())).expect("client")
}

#[tokio::test]
async fn lists_user_repositories() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/users/octocat/repos")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("per_page".into(), "30".into()),
            Matcher::UrlEncoded("page".into(), "1".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"id": 1, "name": "one"}, {"id": 2, "name": "two"}]"#)
        .create_async()
        .await;

    let response = client_for(&server)
        .repositories()
        .list_for_user("octocat", &ListUserReposOptions::default())
        .await;

    mock.assert_async().await;
    assert!(response.is_success());
    assert_eq!(response.error, None);
    let repos = response.data.expect("repos");
    assert_eq!(repos.len(), 2);
    assert_eq!(repos[1].name.as_deref(), Some("two"));
}

#[tokio::test]
async fn not_found_keeps_raw_body() {
    let mut server = Server::new_async().await;
    let body = r#"{"message":"Not Found","documentation_url":"https://docs.github.com"}"#;
    server
        .mock("GET", "/repos/octocat/missing")
        .with_status(404)
        .with_body(body)
        .create_async()
        .await;

    let response = client_for(&server)
        .repositories()
        .get("octocat", "missing")
        .await;

    assert_eq!(response.status, 404);
    assert!(!response.is_success());
    assert_eq!(response.data, None);
    assert_eq!(response.error, Some(ApiError::Http(body.to_string())));
    assert_eq!(response.presence(), Presence::Absent);
}

#[tokio::test]
async fn no_content_check_reads_as_present() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/gists/aa5a315d61ae9438b18d/star")
        .with_status(204)
        .create_async()
        .await;

    let response = client_for(&server).gists().is_starred("aa5a315d61ae9438b18d").await;

    assert_eq!(response.status, 204);
    assert!(response.is_success());
    assert_eq!(response.data.as_deref(), Some(""));
    assert_eq!(response.presence(), Presence::Present);
}

#[tokio::test]
async fn unmerged_pull_request_reads_as_absent() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/repos/octocat/hello/pulls/5/merge")
        .with_status(404)
        .with_body(r#"{"message":"Not Found"}"#)
        .create_async()
        .await;

    let response = client_for(&server)
        .pulls()
        .is_merged("octocat", "hello", 5)
        .await;

    mock.assert_async().await;
    assert_eq!(response.status, 404);
    assert_eq!(response.data, None);
    assert_eq!(response.presence(), Presence::Absent);
}

#[tokio::test]
async fn followed_user_reads_as_present() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/users/octocat/following/hubot")
        .with_status(204)
        .create_async()
        .await;

    let response = client_for(&server)
        .users()
        .check_following("octocat", "hubot")
        .await;

    mock.assert_async().await;
    assert_eq!(response.status, 204);
    assert_eq!(response.presence(), Presence::Present);
}

#[tokio::test]
async fn check_with_unexpected_status_reports_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/users/octocat/following/hubot")
        .with_status(401)
        .with_body("Requires authentication")
        .create_async()
        .await;

    let response = client_for(&server)
        .users()
        .check_following("octocat", "hubot")
        .await;

    assert_eq!(
        response.presence(),
        Presence::Error {
            status: 401,
            message: "Requires authentication".to_string(),
        }
    );
}

#[tokio::test]
async fn exhausted_rate_limit_is_reported_on_failure() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/users/octocat")
        .with_status(403)
        .with_header("x-ratelimit-limit", "60")
        .with_header("x-ratelimit-remaining", "0")
        .with_header("x-ratelimit-reset", "1700000000")
        .with_body(r#"{"message":"API rate limit exceeded"}"#)
        .create_async()
        .await;

    let response = client_for(&server).users().get("octocat").await;

    assert_eq!(response.status, 403);
    let rate_limit = response.rate_limit.expect("rate limit");
    assert_eq!(rate_limit.limit, 60);
    assert_eq!(rate_limit.remaining, 0);
    assert!(rate_limit.is_exhausted());
    assert_eq!(rate_limit.reset.timestamp(), 1_700_000_000);
}

#[tokio::test]
async fn repeated_calls_yield_equal_envelopes() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/repos/octocat/hello/issues/7")
        .with_status(200)
        .with_header("x-ratelimit-limit", "5000")
        .with_header("x-ratelimit-remaining", "4999")
        .with_header("x-ratelimit-reset", "1700000000")
        .with_body(r#"{"number": 7, "title": "Bug"}"#)
        .expect(2)
        .create_async()
        .await;

    let issues = client_for(&server).issues();
    let first = issues.get("octocat", "hello", 7).await;
    let second = issues.get("octocat", "hello", 7).await;

    mock.assert_async().await;
    assert!(first.is_success());
    assert_eq!(first, second);
}

#[tokio::test]
async fn sends_standard_headers() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/user")
        .match_header("accept", "application/vnd.github+json")
        .match_header("user-agent", "gh-rest")
        .match_header("x-github-api-version", "2022-11-28")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body(r#"{"login": "octocat"}"#)
        .create_async()
        .await;

    let response = client_for(&server).users().get_authenticated().await;

    mock.assert_async().await;
    assert!(response.is_success());
}

#[tokio::test]
async fn bearer_token_is_sent_when_configured() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/user")
        .match_header("authorization", "Bearer ghp_secret")
        .with_status(200)
        .with_body(r#"{"login": "octocat"}"#)
        .create_async()
        .await;

    let options = ClientOptions::default()
        .with_base_url(server.url())
        .with_token("ghp_secret");
    let client = GitHubClient::new(&options).expect("client");
    let response = client.users().get_authenticated().await;

    mock.assert_async().await;
    assert_eq!(
        response.data.and_then(|user| user.login).as_deref(),
        Some("octocat")
    );
}

#[tokio::test]
async fn paged_list_sends_token_and_page_parameters() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/user/emails")
        .match_header("authorization", "Bearer ghp_secret")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("per_page".into(), "30".into()),
            Matcher::UrlEncoded("page".into(), "1".into()),
        ]))
        .with_status(200)
        .with_body(r#"[{"email": "octocat@github.com", "primary": true}]"#)
        .create_async()
        .await;

    let options = ClientOptions::default()
        .with_base_url(server.url())
        .with_token("ghp_secret");
    let client = GitHubClient::new(&options).expect("client");
    let response = client.users().list_emails(ListOptions::default()).await;

    mock.assert_async().await;
    assert_eq!(response.data.map(|emails| emails.len()), Some(1));
}

#[tokio::test]
async fn unreachable_host_is_a_transport_failure() {
    let options = ClientOptions::default().with_base_url("http://127.0.0.1:1");
    let client = GitHubClient::new(&options).expect("client");

    let response = client.users().get("octocat").await;

    assert_eq!(response.status, 0);
    assert_eq!(response.data, None);
    assert_eq!(response.rate_limit, None);
    assert!(matches!(response.error, Some(ApiError::Transport(_))));
}

#[tokio::test]
async fn malformed_success_body_is_a_decode_failure() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/repos/octocat/hello")
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let response = client_for(&server).repositories().get("octocat", "hello").await;

    assert_eq!(response.status, 0);
    assert!(matches!(
        response.error,
        Some(ApiError::Decode { status: 200, .. })
    ));
}

#[tokio::test]
async fn issue_filters_skip_unset_values() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/repos/octocat/hello/issues")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("state".into(), "open".into()),
            Matcher::UrlEncoded("labels".into(), "bug,help wanted".into()),
            Matcher::UrlEncoded("page".into(), "2".into()),
        ]))
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let options = ListIssuesOptions {
        state: Some("open".to_string()),
        labels: Some("bug,help wanted".to_string()),
        sort: Some(String::new()),
        pagination: ListOptions::page(2),
        ..ListIssuesOptions::default()
    };
    let response = client_for(&server)
        .issues()
        .list_for_repo("octocat", "hello", &options)
        .await;

    mock.assert_async().await;
    assert_eq!(response.data, Some(Vec::new()));
}

#[tokio::test]
async fn create_issue_posts_json_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/repos/octocat/hello/issues")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({"title": "Crash on start", "body": "trace"})))
        .with_status(201)
        .with_body(r#"{"number": 12, "title": "Crash on start"}"#)
        .create_async()
        .await;

    let issue = CreateIssue {
        body: Some("trace".to_string()),
        ..CreateIssue::new("Crash on start")
    };
    let response = client_for(&server)
        .issues()
        .create("octocat", "hello", &issue)
        .await;

    mock.assert_async().await;
    assert_eq!(response.status, 201);
    assert_eq!(response.data.and_then(|issue| issue.number), Some(12));
}

#[tokio::test]
async fn merge_sends_only_filled_options_and_returns_text() {
    let mut server = Server::new_async().await;
    let body = r#"{"sha":"6dcb09b","merged":true,"message":"Pull Request successfully merged"}"#;
    let mock = server
        .mock("PUT", "/repos/octocat/hello/pulls/3/merge")
        .match_body(Matcher::Json(json!({"merge_method": "squash"})))
        .with_status(200)
        .with_body(body)
        .create_async()
        .await;

    let options = MergeOptions {
        commit_title: Some(String::new()),
        merge_method: Some("squash".to_string()),
        ..MergeOptions::default()
    };
    let response = client_for(&server)
        .pulls()
        .merge("octocat", "hello", 3, &options)
        .await;

    mock.assert_async().await;
    assert_eq!(response.data.as_deref(), Some(body));
}

#[tokio::test]
async fn search_sends_query_and_decodes_items() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/search/repositories")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "language:rust stars:>100".into()),
            Matcher::UrlEncoded("sort".into(), "stars".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"{"total_count": 1, "incomplete_results": false, "items": [{"name": "ripgrep"}]}"#,
        )
        .create_async()
        .await;

    let options = SearchOptions {
        sort: Some("stars".to_string()),
        ..SearchOptions::default()
    };
    let response = client_for(&server)
        .search()
        .repositories("language:rust stars:>100", &options)
        .await;

    mock.assert_async().await;
    let results = response.data.expect("results");
    assert_eq!(results.total_count, Some(1));
    assert_eq!(results.items[0].name.as_deref(), Some("ripgrep"));
}

#[tokio::test]
async fn delete_returns_empty_text_on_no_content() {
    let mut server = Server::new_async().await;
    server
        .mock("DELETE", "/user/keys/42")
        .with_status(204)
        .create_async()
        .await;

    let response = client_for(&server).users().delete_ssh_key(42).await;

    assert_eq!(response.status, 204);
    assert_eq!(response.data.as_deref(), Some(""));
}

#[test]
fn rejects_invalid_base_urls() {
    for base_url in ["not a url", "ftp://example.com", "mailto:octocat@github.com"] {
        let options = ClientOptions::default().with_base_url(base_url);
        assert!(GitHubClient::new(&options).is_err(), "{base_url} accepted");
    }
}

#[test]
fn trailing_slash_in_base_url_is_ignored() {
    let options = ClientOptions::default().with_base_url("https://github.example.com/api/v3/");
    let client = GitHubClient::new(&options).expect("client");
    assert_eq!(client.base_url(), "https://github.example.com/api/v3");
}
