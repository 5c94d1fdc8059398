//! HTML parser for extracting link targets
//!
//! Targets come from two constructs:
//! - any element carrying an `href` attribute (`<a>`, `<link>`, `<area>`, ...)
//! - any element carrying an `onclick` handler of the form
//!   `window.location.href = '<target>'`, falling back to the element's own
//!   `href` when the handler does not match that pattern

use crate::url::is_valid_url;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Matches an assignment of a quoted string literal to `window.location.href`
static ONCLICK_NAVIGATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"window\.location\.href\s*=\s*['"]([^'"]+)"#)
        .expect("Invalid onclick navigation regex")
});

/// Where in the markup a link was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkSource {
    /// An `href` attribute
    Href,
    /// A `window.location.href` assignment inside `onclick`
    OnClick,
}

/// A resolved link target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedLink {
    /// Absolute http(s) URL
    pub url: String,
    pub source: LinkSource,
}

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// The page title (from <title> tag)
    pub title: Option<String>,

    /// Distinct link targets in document order
    pub links: Vec<ExtractedLink>,
}

/// Parses HTML content and extracts link targets and the title
///
/// Never fails: malformed markup yields whatever html5ever could recover,
/// and elements without a usable target are skipped.
///
/// # Link Extraction Rules
///
/// - Every `href` is resolved against `base_url`
/// - `onclick="window.location.href='...'"` targets are resolved the same way
/// - Empty references are skipped
/// - Targets without a host (`mailto:`, `javascript:`, `tel:`, ...) are
///   skipped; any other scheme is kept and left to the verifier
/// - A target found more than once is kept once, at its first position
///
/// # Example
///
/// ```
/// use linkwatch::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<a href="/page">Link</a><button onclick="window.location.href='/go'">Go</button>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html(html, &base_url);
/// let urls: Vec<&str> = parsed.links.iter().map(|l| l.url.as_str()).collect();
/// assert_eq!(urls, ["https://example.com/page", "https://example.com/go"]);
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        links: extract_links(&document, base_url),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts all link targets from the HTML document
fn extract_links(document: &Html, base_url: &Url) -> Vec<ExtractedLink> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    let mut push = |url: String, source: LinkSource| {
        if seen.insert(url.clone()) {
            links.push(ExtractedLink { url, source });
        }
    };

    if let Ok(href_selector) = Selector::parse("[href]") {
        for element in document.select(&href_selector) {
            if let Some(url) = element
                .value()
                .attr("href")
                .and_then(|href| resolve_link(href, base_url))
            {
                push(url, LinkSource::Href);
            }
        }
    }

    if let Ok(onclick_selector) = Selector::parse("[onclick]") {
        for element in document.select(&onclick_selector) {
            let onclick = element.value().attr("onclick").unwrap_or_default();

            let target = match onclick_target(onclick) {
                Some(target) => Some((target, LinkSource::OnClick)),
                None => element
                    .value()
                    .attr("href")
                    .map(|href| (href, LinkSource::Href)),
            };

            match target.and_then(|(t, source)| resolve_link(t, base_url).map(|u| (u, source))) {
                Some((url, source)) => push(url, source),
                None => tracing::trace!("No navigation target in onclick: {}", onclick),
            }
        }
    }

    links
}

/// Extracts the literal assigned to `window.location.href` in a handler
///
/// ```
/// use linkwatch::crawler::onclick_target;
///
/// assert_eq!(onclick_target("window.location.href='/go'"), Some("/go"));
/// assert_eq!(onclick_target(r#"window.location.href = "/docs""#), Some("/docs"));
/// assert_eq!(onclick_target("history.back()"), None);
/// ```
pub fn onclick_target(onclick: &str) -> Option<&str> {
    ONCLICK_NAVIGATION
        .captures(onclick)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Resolves a reference to an absolute URL with a scheme and a host
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?.to_string();
    is_valid_url(&absolute_url).then_some(absolute_url)
}

/// Convenience function for extracting just the link URLs from HTML
pub fn extract_links_simple(html: &str, base_url: &Url) -> Vec<String> {
    parse_html(html, base_url)
        .links
        .into_iter()
        .map(|link| link.url)
        .collect()
}
