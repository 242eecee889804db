// src/checker/http.rs
// =============================================================================
// This module talks HTTP: it fetches pages for the crawler and probes
// discovered pages to see whether they are online.
//
// Key functionality:
// - One shared reqwest Client per run (connection pooling, fixed timeout)
// - A typed FetchError so callers can tell "server answered with 404"
//   apart from "we never got an answer"
// - Probing many URLs concurrently with a bounded pool
//
// A page is online only when it answers exactly HTTP 200.
// =============================================================================

use futures::stream::{self, StreamExt}; // StreamExt gives us .buffer_unordered()
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// User-Agent sent with every request
pub const USER_AGENT: &str = concat!("site-monitor/", env!("CARGO_PKG_VERSION"));

/// Why a fetch did not produce a usable page
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered, but not with 200
    #[error("HTTP {0}")]
    Status(u16),
    /// Timeout, DNS, TLS, connection refused, broken body...
    #[error("{}", describe_transport_error(.0))]
    Transport(#[from] reqwest::Error),
}

/// Liveness of a single page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageStatus {
    Online,
    Offline,
}

/// The outcome of probing one discovered page
///
/// Serializes as `{"url", "status", "code"?, "error"?}`; absent fields are
/// left out of the JSON entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    pub url: String,
    pub status: PageStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PageResult {
    pub fn is_online(&self) -> bool {
        self.status == PageStatus::Online
    }

    /// Builds the result for a URL from the outcome of its GET request
    fn from_outcome(url: &Url, outcome: Result<StatusCode, reqwest::Error>) -> Self {
        match outcome {
            Ok(code) => PageResult {
                url: url.to_string(),
                status: if code == StatusCode::OK {
                    PageStatus::Online
                } else {
                    PageStatus::Offline
                },
                code: Some(code.as_u16()),
                error: None,
            },
            Err(e) => PageResult {
                url: url.to_string(),
                status: PageStatus::Offline,
                code: None,
                error: Some(describe_transport_error(&e)),
            },
        }
    }
}

/// Builds the HTTP client shared by the crawler and the prober for one run
pub fn build_client(timeout: Duration) -> anyhow::Result<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// A fetched page: where it was finally served from, and its body
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL after following redirects; relative links resolve against this
    pub final_url: Url,
    pub body: String,
}

/// Fetches a page body, treating anything but HTTP 200 as a failure
pub async fn fetch_page(client: &Client, url: &Url) -> Result<FetchedPage, FetchError> {
    let response = client.get(url.clone()).send().await?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(FetchError::Status(status.as_u16()));
    }

    let final_url = response.url().clone();
    let body = response.text().await?;
    Ok(FetchedPage { final_url, body })
}

/// Issues one GET against `url` and classifies it online/offline
///
/// Never fails: transport errors become an offline result with `error` set.
pub async fn probe(client: &Client, url: &Url) -> PageResult {
    let outcome = client
        .get(url.clone())
        .send()
        .await
        .map(|response| response.status());

    let result = PageResult::from_outcome(url, outcome);
    debug!(url = %result.url, status = ?result.status, code = ?result.code, "probed page");
    result
}

/// Probes every URL with at most `concurrency` requests in flight
///
/// Returns only after every probe has finished. The order of the returned
/// vector follows completion, not input order.
pub async fn probe_all<I>(client: &Client, urls: I, concurrency: usize) -> Vec<PageResult>
where
    I: IntoIterator<Item = Url>,
{
    let futures = urls.into_iter().map(|url| async move { probe(client, &url).await });

    stream::iter(futures)
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await
}

// Turns a reqwest error into a short human-readable description.
// The category prefix makes the alert email easy to scan.
fn describe_transport_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("timed out: {}", error)
    } else if error.is_connect() {
        format!("connection failed: {}", error)
    } else {
        format!("request failed: {}", error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> Client {
        build_client(Duration::from_secs(2)).unwrap()
    }

    async fn server_with(route: &str, status: u16) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_string("<html></html>"))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_probe_200_is_online() {
        let server = server_with("/", 200).await;
        let url = Url::parse(&format!("{}/", server.uri())).unwrap();

        let result = probe(&client(), &url).await;
        assert_eq!(result.status, PageStatus::Online);
        assert_eq!(result.code, Some(200));
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn test_probe_404_is_offline_with_code() {
        let server = server_with("/missing", 404).await;
        let url = Url::parse(&format!("{}/missing", server.uri())).unwrap();

        let result = probe(&client(), &url).await;
        assert_eq!(result.status, PageStatus::Offline);
        assert_eq!(result.code, Some(404));
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn test_probe_other_2xx_is_offline() {
        let server = server_with("/empty", 204).await;
        let url = Url::parse(&format!("{}/empty", server.uri())).unwrap();

        let result = probe(&client(), &url).await;
        assert_eq!(result.status, PageStatus::Offline);
        assert_eq!(result.code, Some(204));
    }

    #[tokio::test]
    async fn test_probe_unreachable_host_has_error() {
        // Port 1 on loopback: nothing listens there, the connection is refused
        let url = Url::parse("http://127.0.0.1:1/").unwrap();

        let result = probe(&client(), &url).await;
        assert_eq!(result.status, PageStatus::Offline);
        assert!(result.code.is_none());
        assert!(result.error.is_some());
    }

    #[tokio::test]
    async fn test_probe_timeout_has_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;
        let url = Url::parse(&server.uri()).unwrap();
        let client = build_client(Duration::from_millis(200)).unwrap();

        let result = probe(&client, &url).await;
        assert_eq!(result.status, PageStatus::Offline);
        assert!(result.error.unwrap().starts_with("timed out"));
    }

    #[tokio::test]
    async fn test_fetch_page_rejects_non_200() {
        let server = server_with("/gone", 410).await;
        let url = Url::parse(&format!("{}/gone", server.uri())).unwrap();

        match fetch_page(&client(), &url).await {
            Err(FetchError::Status(code)) => assert_eq!(code, 410),
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_page_reports_url_after_redirect() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/docs"))
            .respond_with(ResponseTemplate::new(301).insert_header("location", "/docs/"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/docs/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("welcome"))
            .mount(&server)
            .await;
        let url = Url::parse(&format!("{}/docs", server.uri())).unwrap();

        let page = fetch_page(&client(), &url).await.unwrap();
        assert_eq!(page.final_url.path(), "/docs/");
        assert_eq!(page.body, "welcome");
    }

    #[tokio::test]
    async fn test_probe_all_returns_one_result_per_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/bad"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let urls = vec![
            Url::parse(&format!("{}/ok", server.uri())).unwrap(),
            Url::parse(&format!("{}/bad", server.uri())).unwrap(),
        ];
        let results = probe_all(&client(), urls, 4).await;

        assert_eq!(results.len(), 2);
        assert_eq!(results.iter().filter(|r| r.is_online()).count(), 1);
    }

    #[test]
    fn test_page_result_json_shape() {
        let online = PageResult {
            url: "https://example.com/".to_string(),
            status: PageStatus::Online,
            code: Some(200),
            error: None,
        };
        assert_eq!(
            serde_json::to_value(&online).unwrap(),
            serde_json::json!({"url": "https://example.com/", "status": "online", "code": 200})
        );

        let failed = PageResult {
            url: "https://example.com/x".to_string(),
            status: PageStatus::Offline,
            code: None,
            error: Some("connection failed".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            serde_json::json!({
                "url": "https://example.com/x",
                "status": "offline",
                "error": "connection failed"
            })
        );
    }
}
