//! URL handling module for Linkwatch
//!
//! This module validates absolute URLs, derives the domain scope token from the
//! start URL, and decides whether discovered URLs belong to the crawled site.

mod domain;
mod matcher;

pub use crate::config::ScopeMatch;
pub use domain::{extract_authority, scope_token};
pub use matcher::{authority_matches, in_scope, matches_scope};

use url::Url;

/// Returns true if the string is an absolute URL with a scheme and an authority
///
/// # Examples
///
/// ```
/// use linkwatch::url::is_valid_url;
///
/// assert!(is_valid_url("https://example.com/page"));
/// assert!(!is_valid_url("/page"));
/// assert!(!is_valid_url("mailto:someone@example.com"));
/// assert!(!is_valid_url(""));
/// ```
pub fn is_valid_url(url: &str) -> bool {
    Url::parse(url)
        .map(|u| !u.scheme().is_empty() && u.host_str().is_some_and(|h| !h.is_empty()))
        .unwrap_or(false)
}

/// The crawl scope of one session: a token plus the policy used to match it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    token: String,
    policy: ScopeMatch,
}

impl Scope {
    /// Creates a scope from an explicit token
    pub fn new(token: impl Into<String>, policy: ScopeMatch) -> Self {
        Self {
            token: token.into(),
            policy,
        }
    }

    /// Derives the scope from the start URL's authority
    pub fn from_start_url(start_url: &str, policy: ScopeMatch) -> crate::UrlResult<Self> {
        Ok(Self::new(scope_token(start_url)?, policy))
    }

    /// The domain scope token
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The matching policy in use
    pub fn policy(&self) -> ScopeMatch {
        self.policy
    }

    /// Returns true if the URL is inside this scope
    pub fn contains(&self, url: &str) -> bool {
        matches_scope(self.policy, url, &self.token)
    }

    /// Returns true if the URL may be queued for crawling
    pub fn admits(&self, url: &str) -> bool {
        is_valid_url(url) && self.contains(url)
    }
}
