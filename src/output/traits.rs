//! Event sink trait and event types
//!
//! This module defines the outbound interface the crawler uses to report bad
//! links and completion, and the wire shape of those events.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status reported for a bad link
///
/// Serializes as a bare number for HTTP statuses and as a string for
/// failures (`"Timeout"`, `"Error: ..."`, `"Unexpected Error: ..."`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReportedStatus {
    /// HTTP status code other than 200
    Code(u16),
    /// Failure description
    Text(String),
}

impl fmt::Display for ReportedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "{}", code),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// A link whose check did not end in plain success
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadLink {
    /// The page the link was found on
    pub page_url: String,

    /// The resolved link target
    pub link: String,

    /// HTTP status or failure description
    pub status_code: ReportedStatus,
}

/// Events pushed to an observer during a crawl
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum CrawlEvent {
    #[serde(rename = "non_200_link")]
    Non200Link(BadLink),

    #[serde(rename = "check_complete")]
    CheckComplete { message: String },
}

/// Outbound interface for crawl events
///
/// Delivery is fire-and-forget: implementations must not block the crawl on
/// an observer and must swallow their own transport failures. The crawler
/// calls these from concurrent verification tasks, hence `Send + Sync`.
pub trait EventSink: Send + Sync {
    /// Reports a link that returned a non-200 status or failed to load
    fn report_bad_link(&self, link: BadLink);

    /// Reports the end of a crawl session
    fn report_complete(&self, message: &str);
}
