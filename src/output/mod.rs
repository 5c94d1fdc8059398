//! Output module for crawl events and reports
//!
//! This module handles:
//! - The `EventSink` interface bad-link and completion events are pushed through
//! - Sink implementations (JSON lines, in-process channel)
//! - The append-only audit log of every link check
//! - The end-of-crawl report

mod audit;
mod sinks;
pub mod stats;
mod traits;

pub use audit::{AuditLevel, AuditLog};
pub use sinks::{ChannelSink, JsonLinesSink};
pub use stats::{completion_message, print_report, CrawlReport};
pub use traits::{BadLink, CrawlEvent, EventSink, ReportedStatus};
