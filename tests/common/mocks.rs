use remote_decode::logging::{EventSink, LogEntry, Severity};
use std::sync::{Arc, Mutex};

/// Mock log sink that records every entry it receives
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn entries_with_severity(&self, severity: Severity) -> Vec<LogEntry> {
        self.entries()
            .into_iter()
            .filter(|entry| entry.severity == severity)
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn log(&self, entry: LogEntry) {
        self.entries.lock().unwrap().push(entry);
    }
}
