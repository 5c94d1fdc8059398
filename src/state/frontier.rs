use std::collections::{HashSet, VecDeque};

/// FIFO queue of URLs awaiting a fetch
///
/// A URL can be pushed at most once for the lifetime of the frontier, even
/// after it has been popped again. This keeps a page that failed to fetch
/// from being queued a second time by a later page that links to it.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<String>,
    seen: HashSet<String>,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a URL to the back of the queue
    ///
    /// Returns false if the URL was already queued at some point.
    pub fn push(&mut self, url: impl Into<String>) -> bool {
        let url = url.into();
        if self.seen.contains(&url) {
            return false;
        }
        self.seen.insert(url.clone());
        self.queue.push_back(url);
        true
    }

    /// Removes the URL at the front of the queue
    pub fn pop(&mut self) -> Option<String> {
        self.queue.pop_front()
    }

    /// Returns true if the URL has ever been queued
    pub fn contains(&self, url: &str) -> bool {
        self.seen.contains(url)
    }

    /// Number of URLs still waiting
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
