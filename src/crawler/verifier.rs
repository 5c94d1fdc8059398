//! Link liveness verification
//!
//! Each candidate link gets one GET request. The response body is never read;
//! the status line is enough. Every outcome is written to the audit log and
//! anything other than a plain 200 is pushed to the event sink.

use crate::output::{AuditLevel, AuditLog, BadLink, EventSink, ReportedStatus};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// A link target paired with the page it was found on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateLink {
    pub url: String,
    pub page_url: String,
}

/// Classified result of checking one link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// Status 200
    Success,
    /// Any other HTTP status
    NonSuccess(u16),
    /// No response before the deadline
    Timeout,
    /// Connection, DNS, TLS, redirect or protocol failure
    TransportError(String),
    /// Anything else, e.g. a request that could not be built
    UnexpectedError(String),
}

impl VerificationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Status as reported in a `non_200_link` event; `None` for success
    pub fn reported_status(&self) -> Option<ReportedStatus> {
        match self {
            Self::Success => None,
            Self::NonSuccess(code) => Some(ReportedStatus::Code(*code)),
            Self::Timeout => Some(ReportedStatus::Text("Timeout".to_string())),
            Self::TransportError(msg) => Some(ReportedStatus::Text(format!("Error: {}", msg))),
            Self::UnexpectedError(msg) => {
                Some(ReportedStatus::Text(format!("Unexpected Error: {}", msg)))
            }
        }
    }

    /// Status text written to the audit log
    pub fn audit_status(&self) -> String {
        match self.reported_status() {
            Some(status) => status.to_string(),
            None => "200".to_string(),
        }
    }

    fn audit_level(&self) -> AuditLevel {
        match self {
            Self::Success | Self::NonSuccess(_) => AuditLevel::Info,
            _ => AuditLevel::Error,
        }
    }
}

/// Checks a single URL
///
/// Redirects are followed by the client. The response is dropped as soon as
/// the status is known, so the body is never downloaded.
pub async fn verify(client: &Client, url: &str, timeout: Duration) -> VerificationOutcome {
    match client.get(url).timeout(timeout).send().await {
        Ok(response) => match response.status().as_u16() {
            200 => VerificationOutcome::Success,
            code => VerificationOutcome::NonSuccess(code),
        },
        Err(e) if e.is_timeout() => VerificationOutcome::Timeout,
        Err(e) if e.is_builder() => VerificationOutcome::UnexpectedError(e.to_string()),
        Err(e) => VerificationOutcome::TransportError(e.to_string()),
    }
}

/// Totals for one verification batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub checked: u64,
    pub bad: u64,
}

/// Bounded pool that checks one page's links concurrently
pub struct LinkVerifier {
    client: Client,
    timeout: Duration,
    width: usize,
    sink: Arc<dyn EventSink>,
    audit: Arc<AuditLog>,
}

impl LinkVerifier {
    pub fn new(
        client: Client,
        timeout: Duration,
        width: usize,
        sink: Arc<dyn EventSink>,
        audit: Arc<AuditLog>,
    ) -> Self {
        Self {
            client,
            timeout,
            width: width.max(1),
            sink,
            audit,
        }
    }

    /// Checks every link in the batch and waits for all of them
    ///
    /// At most `width` checks are in flight at once. Results are reported in
    /// completion order, not submission order.
    pub async fn check_links(&self, links: Vec<CandidateLink>) -> BatchSummary {
        stream::iter(links)
            .map(|link| self.check_link(link))
            .buffer_unordered(self.width)
            .fold(BatchSummary::default(), |mut summary, outcome| async move {
                summary.checked += 1;
                if !outcome.is_success() {
                    summary.bad += 1;
                }
                summary
            })
            .await
    }

    /// Checks one link, records it, and reports it if it is bad
    pub async fn check_link(&self, link: CandidateLink) -> VerificationOutcome {
        let outcome = verify(&self.client, &link.url, self.timeout).await;

        self.audit.record(
            outcome.audit_level(),
            &link.url,
            &outcome.audit_status(),
            &link.page_url,
        );

        match outcome.reported_status() {
            Some(status_code) => {
                tracing::info!("Bad link {} on {}: {}", link.url, link.page_url, status_code);
                self.sink.report_bad_link(BadLink {
                    page_url: link.page_url,
                    link: link.url,
                    status_code,
                });
            }
            None => tracing::debug!("OK {}", link.url),
        }

        outcome
    }
}
