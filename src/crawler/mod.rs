//! Crawler module for page fetching and link checking
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching of pages to crawl
//! - HTML parsing and link target extraction
//! - Concurrent link verification
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod verifier;

pub use coordinator::{run_check, Coordinator};
pub use fetcher::{build_http_client, fetch_page, FetchResult};
pub use parser::{extract_links_simple, onclick_target, parse_html, ExtractedLink, LinkSource, ParsedPage};
pub use verifier::{verify, BatchSummary, CandidateLink, LinkVerifier, VerificationOutcome};

use crate::config::Config;
use crate::output::{CrawlReport, EventSink};
use crate::LinkwatchError;
use serde::Deserialize;
use std::sync::Arc;

/// Inbound request that starts a link check
///
/// ```
/// use linkwatch::crawler::CheckRequest;
///
/// let request: CheckRequest = serde_json::from_str(r#"{"start_url": "https://example.com/"}"#).unwrap();
/// assert_eq!(request.start_url, "https://example.com/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckRequest {
    pub start_url: String,
}

/// Handles a start-check request
///
/// The domain scope is derived from the authority of `start_url`. Events
/// stream to `sink` while the crawl runs; exactly one completion event is
/// sent once the frontier is exhausted.
pub async fn handle_start_check(
    request: CheckRequest,
    config: Config,
    sink: Arc<dyn EventSink>,
) -> Result<CrawlReport, LinkwatchError> {
    run_check(config, &request.start_url, sink).await
}
