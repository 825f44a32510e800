use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::warn;

use crate::error::ContextError;
use crate::trace::trace::TraceEvent;

/// Append-only JSONL audit trail of extraction passes and actions.
///
/// Each event is one line, written with a single `write_all` so concurrent
/// appenders never interleave within a line. A logger without a sink
/// accepts and drops every event.
#[derive(Default)]
pub struct TraceLogger {
    sink: Option<Mutex<File>>,
    written: AtomicU64,
}

impl TraceLogger {
    /// Open `path` for appending, creating it if needed.
    pub fn open(path: &str) -> Result<Self, ContextError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| ContextError::Io {
                path: path.to_string(),
                source,
            })?;

        Ok(Self {
            sink: Some(Mutex::new(file)),
            written: AtomicU64::new(0),
        })
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Events successfully appended since the logger was opened.
    pub fn written(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }

    /// Append one event. Failures are reported through `tracing` and never
    /// reach the caller.
    pub fn log(&self, event: &TraceEvent) {
        let Some(sink) = &self.sink else {
            return;
        };

        let mut line = match serde_json::to_vec(event) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(kind = %event.kind, error = %e, "dropping unserializable trace event");
                return;
            }
        };
        line.push(b'\n');

        let Ok(mut file) = sink.lock() else {
            warn!(kind = %event.kind, "trace sink poisoned; event dropped");
            return;
        };
        match file.write_all(&line) {
            Ok(()) => {
                self.written.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => warn!(kind = %event.kind, error = %e, "trace append failed"),
        }
    }
}
