use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::time::SystemTime;

use parking_lot::Mutex;

/// Append-only activity log. Every call appends one timestamped line and
/// flushes before releasing the sink, so lines from concurrent handlers
/// never interleave.
pub struct Logger {
    sink: Mutex<File>,
    debug: bool,
}

impl Logger {
    /// Open (or create) the log file for appending. Failure here is a
    /// startup error and should abort the process.
    pub fn open(path: &Path, debug: bool) -> io::Result<Logger> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Logger {
            sink: Mutex::new(file),
            debug,
        })
    }

    /// Append one event line, suffixed with a human-readable timestamp.
    pub fn log(&self, event: &str) {
        let stamp = httpdate::fmt_http_date(SystemTime::now());
        let mut sink = self.sink.lock();
        // Nowhere left to report a failing log write.
        let _ = writeln!(sink, "{} [{}]", event, stamp);
        let _ = sink.flush();
    }

    /// Like `log`, but only when the debug flag is set.
    pub fn debug(&self, event: &str) {
        if self.debug {
            self.log(event);
        }
    }
}
