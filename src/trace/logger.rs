use std::fs::{File, OpenOptions};
use std::io::{LineWriter, Write};
use std::path::Path;
use std::sync::Mutex;

use crate::trace::trace::TraceEvent;

/// JSONL audit trail, one event per line, appended across worker threads.
///
/// The trail must never take a run down: a path that cannot be opened
/// degrades to a stderr warning and an untraced run, and individual write
/// failures drop that event only.
pub struct TraceLogger {
    sink: Option<Mutex<LineWriter<File>>>,
}

impl TraceLogger {
    /// Append events to `path`, creating the file if needed.
    pub fn to_file(path: &Path) -> Self {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Self {
                sink: Some(Mutex::new(LineWriter::new(file))),
            },
            Err(e) => {
                eprintln!(
                    "warning: audit trail '{}' unavailable, continuing untraced: {}",
                    path.display(),
                    e
                );
                Self { sink: None }
            }
        }
    }

    /// A logger that drops every event.
    pub fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    pub fn log(&self, event: &TraceEvent) {
        let Some(sink) = &self.sink else { return };

        let line = match serde_json::to_string(event) {
            Ok(line) => line,
            Err(e) => {
                eprintln!("warning: dropping unserializable trace event: {}", e);
                return;
            }
        };

        match sink.lock() {
            Ok(mut writer) => {
                if let Err(e) = writeln!(writer, "{}", line) {
                    eprintln!("warning: audit trail write failed: {}", e);
                }
            }
            Err(e) => eprintln!("warning: audit trail lock poisoned: {}", e),
        }
    }
}
