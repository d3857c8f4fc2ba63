//! HTTP fetcher implementation
//!
//! This module handles all requests made against recipe sites:
//! - Building the HTTP client with a browser-like user agent
//! - HEAD probes used to discover sitemaps
//! - GET requests for sitemap documents and candidate pages
//! - Error classification
//!
//! Every request carries its own timeout so the run loop can never block on
//! one request for longer than that bound. Nothing here retries.

use reqwest::Client;
use std::time::Duration;

/// Timeout for sitemap existence probes
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout for candidate page fetches
pub const PAGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for sitemap document fetches
pub const SITEMAP_TIMEOUT: Duration = Duration::from_secs(15);

/// Some recipe sites refuse obvious bot user agents
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the document
    Success {
        /// Response body
        body: String,
    },

    /// The server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Builds the HTTP client used for site requests
///
/// # Example
///
/// ```no_run
/// use recipe_dredger::crawler::build_http_client;
///
/// let client = build_http_client().unwrap();
/// ```
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(PROBE_TIMEOUT)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL with a GET request bounded by `timeout`
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
/// * `timeout` - Upper bound for the whole request
///
/// # Returns
///
/// A FetchResult indicating success or the type of failure
pub async fn fetch_url(client: &Client, url: &str, timeout: Duration) -> FetchResult {
    let response = match client.get(url).timeout(timeout).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(&e),
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    match response.text().await {
        Ok(body) => FetchResult::Success { body },
        Err(e) => classify_error(&e),
    }
}

/// Checks that a URL exists with a HEAD request (no body is transferred)
///
/// Returns true only for a success status; any error is a plain `false`.
pub async fn probe_url(client: &Client, url: &str) -> bool {
    match client.head(url).timeout(PROBE_TIMEOUT).send().await {
        Ok(response) => response.status().is_success(),
        Err(e) => {
            tracing::trace!("Probe failed for {}: {}", url, e);
            false
        }
    }
}

fn classify_error(e: &reqwest::Error) -> FetchResult {
    let error = if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        "Connection refused".to_string()
    } else {
        e.to_string()
    };

    FetchResult::NetworkError { error }
}
