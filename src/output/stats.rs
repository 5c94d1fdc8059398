//! Crawl report generation
//!
//! Counters collected by the crawl loop and a console rendering of them.

use std::time::Duration;

/// Summary of one crawl session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrawlReport {
    /// Pages fetched and parsed (the final visited set size)
    pub pages_crawled: u64,

    /// Pages dropped because their fetch failed
    pub pages_discarded: u64,

    /// Link verifications performed
    pub links_checked: u64,

    /// Verifications reported as bad links
    pub bad_links: u64,

    /// Wall-clock duration of the session
    pub elapsed: Duration,
}

impl CrawlReport {
    /// The message carried by the completion event
    pub fn completion_message(&self) -> String {
        completion_message(self.elapsed)
    }

    /// Percentage of checked links that were fine
    pub fn healthy_rate(&self) -> f64 {
        if self.links_checked == 0 {
            return 100.0;
        }
        let healthy = self.links_checked.saturating_sub(self.bad_links);
        (healthy as f64 / self.links_checked as f64) * 100.0
    }
}

/// Formats the completion message for a given elapsed time
///
/// ```
/// use std::time::Duration;
/// use linkwatch::output::completion_message;
///
/// assert_eq!(
///     completion_message(Duration::from_millis(1234)),
///     "Check complete, elapsed: 1.23 seconds"
/// );
/// ```
pub fn completion_message(elapsed: Duration) -> String {
    format!("Check complete, elapsed: {:.2} seconds", elapsed.as_secs_f64())
}

/// Prints the report to stderr in a formatted manner
///
/// Stdout is reserved for the event stream.
pub fn print_report(report: &CrawlReport) {
    eprintln!("=== Link Check Report ===\n");
    eprintln!("Pages:");
    eprintln!("  Crawled: {}", report.pages_crawled);
    eprintln!("  Discarded: {}", report.pages_discarded);
    eprintln!();
    eprintln!("Links:");
    eprintln!("  Checked: {}", report.links_checked);
    eprintln!("  Bad: {}", report.bad_links);
    eprintln!();
    eprintln!(
        "Healthy Rate: {:.1}% in {:.2}s",
        report.healthy_rate(),
        report.elapsed.as_secs_f64()
    );
}
