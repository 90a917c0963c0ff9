use super::{LogEntry, Severity};
use tracing::{debug, error, info, warn};

/// Receives request-scoped log entries from the handlers.
pub trait EventSink: Send + Sync {
    fn log(&self, entry: LogEntry);
}

/// Forwards entries to `tracing`. With the JSON subscriber installed by the
/// binary, each entry becomes one structured log line.
#[derive(Debug, Clone, Default)]
pub struct TracingSink {
    log_name: String,
}

impl TracingSink {
    pub fn new(log_name: impl Into<String>) -> Self {
        Self {
            log_name: log_name.into(),
        }
    }
}

impl EventSink for TracingSink {
    fn log(&self, entry: LogEntry) {
        let labels = serde_json::to_string(&entry.labels).unwrap_or_default();
        let http_request = entry
            .http_request
            .as_ref()
            .and_then(|r| serde_json::to_string(r).ok())
            .unwrap_or_default();
        let log_name = self.log_name.as_str();

        match entry.severity {
            Severity::Debug => debug!(
                log_name,
                labels = %labels,
                http_request = %http_request,
                "{}",
                entry.payload
            ),
            Severity::Info => info!(
                log_name,
                labels = %labels,
                http_request = %http_request,
                "{}",
                entry.payload
            ),
            Severity::Warning => warn!(
                log_name,
                labels = %labels,
                http_request = %http_request,
                "{}",
                entry.payload
            ),
            Severity::Error => error!(
                log_name,
                labels = %labels,
                http_request = %http_request,
                "{}",
                entry.payload
            ),
        }
    }
}

/// Drops every entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn log(&self, _entry: LogEntry) {}
}
