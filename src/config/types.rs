use serde::Deserialize;

/// Main configuration structure for Linkwatch
///
/// Every section is optional; a missing section takes its defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// How discovered URLs are matched against the crawl scope
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeMatch {
    /// The URL string contains the scope token anywhere
    #[default]
    Substring,
    /// The URL authority equals the scope token
    Host,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Width of the per-page link verification pool
    #[serde(rename = "max-concurrent-checks")]
    pub max_concurrent_checks: usize,

    /// Timeout for a single link check (seconds)
    #[serde(rename = "link-timeout-secs")]
    pub link_timeout_secs: u64,

    /// Timeout for fetching a page to crawl (seconds)
    #[serde(rename = "page-timeout-secs")]
    pub page_timeout_secs: u64,

    /// Maximum redirect hops followed per request
    #[serde(rename = "max-redirects")]
    pub max_redirects: usize,

    /// Scope matching policy for frontier insertion
    #[serde(rename = "scope-match")]
    pub scope_match: ScopeMatch,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_checks: 10,
            link_timeout_secs: 10,
            page_timeout_secs: 10,
            max_redirects: 10,
            scope_match: ScopeMatch::Substring,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value: `Name/Version`
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.crawler_name, self.crawler_version)
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the append-only audit log of link checks
    #[serde(rename = "audit-log-path")]
    pub audit_log_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            audit_log_path: "linkwatch.log".to_string(),
        }
    }
}
