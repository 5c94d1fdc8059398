use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigResult;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use linkwatch::config::load_config;
///
/// let config = load_config(Path::new("linkwatch.toml")).unwrap();
/// println!("Link timeout: {}s", config.crawler.link_timeout_secs);
/// ```
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    load_config_with_hash(path).map(|(config, _)| config)
}

/// Parses and validates configuration text
///
/// ```
/// use linkwatch::config::parse_config;
///
/// let config = parse_config("[crawler]\nlink-timeout-secs = 3\n").unwrap();
/// assert_eq!(config.crawler.link_timeout_secs, 3);
/// assert_eq!(config.crawler.max_concurrent_checks, 10);
/// ```
pub fn parse_config(content: &str) -> ConfigResult<Config> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Hex-encoded SHA-256 of configuration text
pub fn content_hash(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

/// Computes the SHA-256 hash of a configuration file
///
/// The binary logs it at startup and prints it on `--dry-run`, so the
/// settings behind an audit log can be identified later.
pub fn compute_config_hash(path: &Path) -> ConfigResult<String> {
    Ok(content_hash(&std::fs::read_to_string(path)?))
}

/// Loads a configuration and the hash of the exact text it was parsed from
pub fn load_config_with_hash(path: &Path) -> ConfigResult<(Config, String)> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    Ok((config, content_hash(&content)))
}
