//! Linkwatch: a same-site crawler and live link checker
//!
//! This crate crawls a website breadth-first from a seed URL, checks every link
//! it finds on each page with a bounded pool of concurrent requests, and streams
//! the broken ones to an observer as they are found.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Linkwatch operations
///
/// These errors can only surface before a crawl session starts. Once the
/// crawl loop is running, failures are logged or reported as events.
#[derive(Debug, Error)]
pub enum LinkwatchError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing authority in URL: {0}")]
    MissingAuthority(String),
}

/// Result type alias for Linkwatch operations
pub type Result<T> = std::result::Result<T, LinkwatchError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{handle_start_check, CheckRequest, Coordinator};
pub use output::{BadLink, CrawlEvent, CrawlReport, EventSink, ReportedStatus};
pub use state::CrawlSession;
pub use url::{in_scope, is_valid_url, scope_token, Scope, ScopeMatch};
