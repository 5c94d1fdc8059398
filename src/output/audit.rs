//! Append-only audit log of link checks
//!
//! Every verification attempt is written as one line, successes included:
//!
//! ```text
//! 2026-10-19 14:03:11 - INFO - URL: https://example.com/a, Status: 200, Referer: https://example.com/
//! 2026-10-19 14:03:21 - ERROR - URL: https://example.com/b, Status: Timeout, Referer: https://example.com/
//! ```
//!
//! The log is never read back by the crawler.

use chrono::Local;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

/// Severity of an audit line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditLevel {
    /// The link answered with an HTTP status
    Info,
    /// The check failed before a status was received
    Error,
}

impl AuditLevel {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Error => "ERROR",
        }
    }
}

/// Thread-safe append-only audit log
pub struct AuditLog {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl AuditLog {
    /// Opens (or creates) the audit log file in append mode
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::from_writer(file))
    }

    /// Wraps an arbitrary writer, e.g. `io::sink()` to disable auditing
    pub fn from_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    /// Appends one verification record
    ///
    /// Write failures are logged and otherwise ignored; auditing never
    /// interrupts a crawl.
    pub fn record(&self, level: AuditLevel, link: &str, status: &str, referer: &str) {
        let line = format!(
            "{} - {} - URL: {}, Status: {}, Referer: {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            level.as_str(),
            link,
            status,
            referer
        );

        let mut writer = match self.writer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
            tracing::warn!("Failed to write audit record for {}: {}", link, e);
        }
    }
}
