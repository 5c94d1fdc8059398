//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured user agent and redirect limit
//! - GET requests to fetch pages for crawling
//! - Error classification for page fetches

use crate::config::Config;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Result of fetching a page to crawl
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Page answered 2xx with a Content-Type that is not HTML
    ContentMismatch {
        /// Final URL after redirects
        final_url: String,
        /// The actual Content-Type received
        content_type: String,
    },

    /// Page answered with a non-2xx status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, redirect loop, etc.)
    NetworkError {
        /// Error description
        error: String,
        /// Whether the request ran past its timeout
        timed_out: bool,
    },
}

/// Builds an HTTP client with proper configuration
///
/// Timeouts are not set on the client: page fetches and link checks apply
/// their own per-request timeouts.
///
/// # Example
///
/// ```no_run
/// use linkwatch::config::Config;
/// use linkwatch::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.header_value())
        .redirect(Policy::limited(config.crawler.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page to crawl
///
/// # Request Flow
///
/// 1. Send GET request, following redirects up to the configured limit
/// 2. Non-2xx status → HttpError
/// 3. 2xx with a non-HTML Content-Type → ContentMismatch (body not read)
/// 4. Read the body → Success
///
/// A missing Content-Type header is treated as HTML. There are no retries.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
/// * `timeout` - Deadline for the whole request, body included
pub async fn fetch_page(client: &Client, url: &str, timeout: Duration) -> FetchResult {
    let response = match client.get(url).timeout(timeout).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(e),
    };

    let status = response.status();
    let final_url = response.url().to_string();

    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_ascii_lowercase());

    if let Some(content_type) = content_type {
        if !content_type.contains("html") {
            return FetchResult::ContentMismatch {
                final_url,
                content_type,
            };
        }
    }

    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            body,
        },
        Err(e) => classify_error(e),
    }
}

/// Classifies a reqwest error for a page fetch
fn classify_error(e: reqwest::Error) -> FetchResult {
    if e.is_timeout() {
        FetchResult::NetworkError {
            error: "Request timeout".to_string(),
            timed_out: true,
        }
    } else if e.is_connect() {
        FetchResult::NetworkError {
            error: format!("Connection failed: {}", e),
            timed_out: false,
        }
    } else if e.is_redirect() {
        FetchResult::NetworkError {
            error: format!("Redirect error: {}", e),
            timed_out: false,
        }
    } else {
        FetchResult::NetworkError {
            error: e.to_string(),
            timed_out: false,
        }
    }
}
