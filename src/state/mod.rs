//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `Frontier`: FIFO queue of same-site URLs waiting to be fetched
//! - `CrawlSession`: frontier, visited set and scope of one crawl invocation

mod frontier;
mod session;

// Re-export main types
pub use frontier::Frontier;
pub use session::CrawlSession;
