use crate::config::ScopeMatch;
use crate::url::domain::extract_authority;
use url::Url;

/// Checks whether a URL string falls inside the crawl scope
///
/// The match is a plain substring test against the whole URL, so a token of
/// `example.com` also accepts `notexample.com` and
/// `https://other.org/?ref=example.com`.
///
/// # Examples
///
/// ```
/// use linkwatch::url::in_scope;
///
/// assert!(in_scope("https://example.com/about", "example.com"));
/// assert!(in_scope("https://blog.example.com/", "example.com"));
/// assert!(!in_scope("https://other.org/", "example.com"));
/// ```
pub fn in_scope(url: &str, token: &str) -> bool {
    url.contains(token)
}

/// Checks whether a URL's authority equals the scope token exactly
pub fn authority_matches(url: &str, token: &str) -> bool {
    Url::parse(url)
        .ok()
        .and_then(|u| extract_authority(&u))
        .is_some_and(|authority| authority.eq_ignore_ascii_case(token))
}

/// Applies a scope matching policy
pub fn matches_scope(policy: ScopeMatch, url: &str, token: &str) -> bool {
    match policy {
        ScopeMatch::Substring => in_scope(url, token),
        ScopeMatch::Host => authority_matches(url, token),
    }
}
