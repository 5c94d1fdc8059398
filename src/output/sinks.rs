//! Event sink implementations

use crate::output::traits::{BadLink, CrawlEvent, EventSink};
use std::io::Write;
use std::sync::Mutex;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Writes each event as one JSON object per line
///
/// Used by the command-line tool to stream events to stdout.
pub struct JsonLinesSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Consumes the sink and returns the underlying writer
    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn emit(&self, event: &CrawlEvent) {
        let line = match serde_json::to_string(event) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!("Failed to serialize event: {}", e);
                return;
            }
        };

        let mut writer = match self.writer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
            tracing::warn!("Failed to write event: {}", e);
        }
    }
}

impl<W: Write + Send> EventSink for JsonLinesSink<W> {
    fn report_bad_link(&self, link: BadLink) {
        self.emit(&CrawlEvent::Non200Link(link));
    }

    fn report_complete(&self, message: &str) {
        self.emit(&CrawlEvent::CheckComplete {
            message: message.to_string(),
        });
    }
}

/// Forwards events into an unbounded tokio channel
///
/// Lets an in-process observer consume events as they arrive. Events sent
/// after the receiver is dropped are discarded.
#[derive(Clone)]
pub struct ChannelSink {
    tx: UnboundedSender<CrawlEvent>,
}

impl ChannelSink {
    /// Creates a sink and the receiver its events arrive on
    pub fn new() -> (Self, UnboundedReceiver<CrawlEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn emit(&self, event: CrawlEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("Event observer has gone away, dropping event");
        }
    }
}

impl EventSink for ChannelSink {
    fn report_bad_link(&self, link: BadLink) {
        self.emit(CrawlEvent::Non200Link(link));
    }

    fn report_complete(&self, message: &str) {
        self.emit(CrawlEvent::CheckComplete {
            message: message.to_string(),
        });
    }
}
