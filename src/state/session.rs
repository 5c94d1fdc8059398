use crate::state::frontier::Frontier;
use crate::url::Scope;
use std::collections::HashSet;

/// Mutable state of one crawl invocation
///
/// Owned by the crawl loop for the whole session. Link verification never
/// touches it; it only sees the candidate links handed to it.
#[derive(Debug)]
pub struct CrawlSession {
    start_url: String,
    scope: Scope,
    frontier: Frontier,
    visited: HashSet<String>,
}

impl CrawlSession {
    /// Starts a session with the start URL as the only frontier entry
    pub fn new(start_url: impl Into<String>, scope: Scope) -> Self {
        let start_url = start_url.into();
        let mut frontier = Frontier::new();
        frontier.push(start_url.clone());

        Self {
            start_url,
            scope,
            frontier,
            visited: HashSet::new(),
        }
    }

    pub fn start_url(&self) -> &str {
        &self.start_url
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Pops the next page to fetch, skipping any URL already visited
    pub fn next_page(&mut self) -> Option<String> {
        while let Some(url) = self.frontier.pop() {
            if self.visited.contains(&url) {
                tracing::trace!("Skipping already visited {}", url);
                continue;
            }
            return Some(url);
        }
        None
    }

    /// Records a successfully fetched page
    ///
    /// Returns false if the page was already in the visited set.
    pub fn mark_visited(&mut self, url: &str) -> bool {
        self.visited.insert(url.to_string())
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn is_queued(&self, url: &str) -> bool {
        self.frontier.contains(url)
    }

    /// Offers a discovered link to the frontier
    ///
    /// The link is queued only if it is a valid absolute URL inside the
    /// session scope that has been neither visited nor queued before.
    /// Returns true if it was queued.
    pub fn offer(&mut self, url: &str) -> bool {
        if !self.scope.admits(url) || self.visited.contains(url) {
            return false;
        }
        self.frontier.push(url)
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }
}
