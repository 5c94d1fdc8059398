use crate::{UrlError, UrlResult};
use url::Url;

/// Extracts the authority (`host[:port]`) from a URL
///
/// The host is lowercased by the URL parser. The port is only present when it
/// differs from the scheme's default, so `http://a.test:80/` yields `a.test`.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use linkwatch::url::extract_authority;
///
/// let url = Url::parse("https://EXAMPLE.com/path").unwrap();
/// assert_eq!(extract_authority(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(extract_authority(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn extract_authority(url: &Url) -> Option<String> {
    let host = url.host_str().filter(|h| !h.is_empty())?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// Derives the domain scope token from the crawl's start URL
///
/// # Returns
///
/// * `Ok(String)` - The authority of the start URL
/// * `Err(UrlError)` - The start URL is not an absolute http(s) URL
pub fn scope_token(start_url: &str) -> UrlResult<String> {
    let url = Url::parse(start_url.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    extract_authority(&url).ok_or_else(|| UrlError::MissingAuthority(start_url.to_string()))
}
