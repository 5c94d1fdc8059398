//! Configuration module for Linkwatch
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use linkwatch::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("linkwatch.toml")).unwrap();
//! println!("Checking {} links at a time", config.crawler.max_concurrent_checks);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, ScopeMatch, UserAgentConfig};

// Re-export parser functions
pub use parser::{
    compute_config_hash, content_hash, load_config, load_config_with_hash, parse_config,
};
pub use validation::validate;
