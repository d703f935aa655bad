//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests made during a harvest:
//! - Building the HTTP client with the identifying user agent string
//! - Single GET requests under a per-request deadline
//! - Error classification into one human-readable `FetchError`
//!
//! There is no retry logic here. A caller that wants another attempt asks again.

use crate::config::UserAgentConfig;
use crate::FetchError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Accept header sent with every request
const ACCEPT_VALUE: &str = "text/html,application/xhtml+xml,application/xml;q=0.9";

/// Maximum redirect hops followed for a single request
const MAX_REDIRECTS: usize = 10;

/// Result of a completed HTTP exchange
///
/// Any status counts as completed; `ok` tells 2xx responses apart.
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// Response body decoded as text
    pub body: String,
    /// Content-Type header value (empty when absent)
    pub content_type: String,
    /// Final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status: u16,
    /// True for 2xx statuses
    pub ok: bool,
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use feed_harvest::config::UserAgentConfig;
/// use feed_harvest::harvest::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));

    Client::builder()
        .user_agent(config.header_value())
        .default_headers(headers)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL as text under a deadline
///
/// The deadline covers the whole exchange, body included. When it expires
/// the request future is dropped, which aborts the in-flight request.
///
/// # Errors
///
/// | Condition | Error |
/// |-----------|-------|
/// | URL does not parse | `FetchError::InvalidUrl` |
/// | Deadline exceeded | `FetchError::Timeout` |
/// | DNS, connection, TLS, redirect or body failure | `FetchError::Network` |
///
/// Non-2xx statuses are returned as `Ok` with `ok == false`.
pub async fn fetch_text(
    client: &Client,
    url: &str,
    timeout: Duration,
) -> Result<FetchResult, FetchError> {
    let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    match tokio::time::timeout(timeout, send_and_read(client, parsed)).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout {
            url: url.to_string(),
            timeout_ms: timeout.as_millis() as u64,
        }),
    }
}

async fn send_and_read(client: &Client, url: Url) -> Result<FetchResult, FetchError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| classify_error(&url, e))?;

    let status = response.status();
    let final_url = response.url().clone();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let body = response
        .text()
        .await
        .map_err(|e| classify_error(&url, e))?;

    Ok(FetchResult {
        body,
        content_type,
        final_url,
        status: status.as_u16(),
        ok: status.is_success(),
    })
}

/// Maps a reqwest error to a readable cause
fn classify_error(url: &Url, error: reqwest::Error) -> FetchError {
    let message = if error.is_timeout() {
        "request timeout".to_string()
    } else if error.is_connect() {
        "connection failed".to_string()
    } else if error.is_redirect() {
        "too many redirects".to_string()
    } else if error.is_body() || error.is_decode() {
        format!("failed to read response body: {}", error)
    } else {
        error.to_string()
    };

    FetchError::Network {
        url: url.to_string(),
        message,
    }
}
