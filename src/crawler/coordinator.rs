//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that ties everything together:
//! - Seeding the session frontier with the start URL
//! - Fetching pages one at a time in frontier order
//! - Extracting links and queueing the in-scope ones
//! - Verifying each page's links in a bounded concurrent batch
//! - Emitting the completion event

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, fetch_page, FetchResult};
use crate::crawler::parser::parse_html;
use crate::crawler::verifier::{CandidateLink, LinkVerifier};
use crate::output::{AuditLog, CrawlReport, EventSink};
use crate::state::CrawlSession;
use crate::url::Scope;
use crate::{LinkwatchError, UrlError};
use reqwest::Client;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Main crawler coordinator structure
///
/// Holds everything one crawl needs: configuration, HTTP client, event sink
/// and audit log. Nothing here is process-global; build one per check.
pub struct Coordinator {
    config: Arc<Config>,
    client: Client,
    verifier: LinkVerifier,
    sink: Arc<dyn EventSink>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `sink` - Where bad-link and completion events are pushed
    /// * `audit` - Where every link check is recorded
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(LinkwatchError)` - The HTTP client could not be built
    pub fn new(
        config: Config,
        sink: Arc<dyn EventSink>,
        audit: AuditLog,
    ) -> Result<Self, LinkwatchError> {
        let client = build_http_client(&config)?;

        let verifier = LinkVerifier::new(
            client.clone(),
            Duration::from_secs(config.crawler.link_timeout_secs),
            config.crawler.max_concurrent_checks,
            Arc::clone(&sink),
            Arc::new(audit),
        );

        Ok(Self {
            config: Arc::new(config),
            client,
            verifier,
            sink,
        })
    }

    /// Creates a coordinator that appends to the configured audit log file
    pub fn with_audit_file(
        config: Config,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, LinkwatchError> {
        let audit = AuditLog::open(Path::new(&config.output.audit_log_path))?;
        Self::new(config, sink, audit)
    }

    /// Crawls the site behind `start_url` and checks every link found
    ///
    /// Pages are fetched strictly one after another in frontier order. The
    /// links of a page are all verified before the next page is fetched.
    /// Page fetch failures are logged and skipped; they never end the crawl.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - The frontier was exhausted and the completion event sent
    /// * `Err(LinkwatchError)` - The start URL is unusable; no events were sent
    pub async fn run(&self, start_url: &str) -> Result<CrawlReport, LinkwatchError> {
        let start = Url::parse(start_url.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
        let scope = Scope::from_start_url(start.as_str(), self.config.crawler.scope_match)?;
        let mut session = CrawlSession::new(start.as_str(), scope);

        tracing::info!(
            "Starting link check at {} (scope token: {})",
            session.start_url(),
            session.scope().token()
        );

        let started = Instant::now();
        let mut report = CrawlReport::default();

        while let Some(page_url) = session.next_page() {
            self.crawl_page(&mut session, &page_url, &mut report).await;
        }

        report.elapsed = started.elapsed();
        self.sink.report_complete(&report.completion_message());

        tracing::info!(
            "Link check complete: {} pages, {} links checked, {} bad, in {:.2}s",
            report.pages_crawled,
            report.links_checked,
            report.bad_links,
            report.elapsed.as_secs_f64()
        );

        Ok(report)
    }

    /// Fetches one page, queues its in-scope links and verifies all of them
    async fn crawl_page(
        &self,
        session: &mut CrawlSession,
        page_url: &str,
        report: &mut CrawlReport,
    ) {
        let timeout = Duration::from_secs(self.config.crawler.page_timeout_secs);

        let (final_url, body) = match fetch_page(&self.client, page_url, timeout).await {
            FetchResult::Success {
                final_url,
                status_code,
                body,
            } => {
                tracing::debug!("Fetched {} (HTTP {}, {} bytes)", final_url, status_code, body.len());
                (final_url, body)
            }

            FetchResult::ContentMismatch {
                final_url,
                content_type,
            } => {
                tracing::debug!("Not parsing {} ({})", page_url, content_type);
                self.mark_fetched(session, page_url, &final_url, report);
                return;
            }

            FetchResult::HttpError { status_code } => {
                tracing::warn!("Failed to retrieve {}: HTTP {}", page_url, status_code);
                report.pages_discarded += 1;
                return;
            }

            FetchResult::NetworkError { error, timed_out } => {
                if timed_out {
                    tracing::warn!("Timed out retrieving {} after {}s", page_url, timeout.as_secs());
                } else {
                    tracing::warn!("Failed to retrieve {}: {}", page_url, error);
                }
                report.pages_discarded += 1;
                return;
            }
        };

        self.mark_fetched(session, page_url, &final_url, report);

        // Relative links resolve against where the page actually ended up
        let base = match Url::parse(&final_url).or_else(|_| Url::parse(page_url)) {
            Ok(base) => base,
            Err(e) => {
                tracing::warn!("Cannot resolve links on {}: {}", page_url, e);
                return;
            }
        };

        let parsed = parse_html(&body, &base);
        tracing::debug!(
            "Parsed {} ({}): {} links",
            page_url,
            parsed.title.as_deref().unwrap_or("untitled"),
            parsed.links.len()
        );

        let mut candidates = Vec::with_capacity(parsed.links.len());
        for link in parsed.links {
            if session.offer(&link.url) {
                tracing::debug!("Queued {} ({:?})", link.url, link.source);
            }
            candidates.push(CandidateLink {
                url: link.url,
                page_url: page_url.to_string(),
            });
        }

        let batch = self.verifier.check_links(candidates).await;
        report.links_checked += batch.checked;
        report.bad_links += batch.bad;

        tracing::debug!(
            "Finished {}: {} checked, {} bad, {} pages waiting",
            page_url,
            batch.checked,
            batch.bad,
            session.frontier_len()
        );
    }

    /// Marks a fetched page (and its redirect target) as visited
    fn mark_fetched(
        &self,
        session: &mut CrawlSession,
        page_url: &str,
        final_url: &str,
        report: &mut CrawlReport,
    ) {
        if session.mark_visited(page_url) {
            report.pages_crawled += 1;
        }
        if final_url != page_url {
            session.mark_visited(final_url);
        }
    }
}

/// Runs a complete link check with an audit log file from the configuration
///
/// # Example
///
/// ```no_run
/// use linkwatch::config::Config;
/// use linkwatch::crawler::run_check;
/// use linkwatch::output::JsonLinesSink;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let sink = Arc::new(JsonLinesSink::new(std::io::stdout()));
/// let report = run_check(Config::default(), "https://example.com/", sink).await?;
/// println!("{} bad links", report.bad_links);
/// # Ok(())
/// # }
/// ```
pub async fn run_check(
    config: Config,
    start_url: &str,
    sink: Arc<dyn EventSink>,
) -> Result<CrawlReport, LinkwatchError> {
    let coordinator = Coordinator::with_audit_file(config, sink)?;
    coordinator.run(start_url).await
}
