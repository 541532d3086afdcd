//! Redirected standard output
//!
//! Rust cannot swap out the process-wide `println!` target, so programs write
//! their normal output through a [`LogWriter`] instead (or the `stdout!` and
//! `stdoutln!` macros). Each write becomes one `STDOUT` record that carries no
//! line terminator of its own, so the sinks reproduce exactly the text written,
//! however it was chunked.

use crate::core::{LogLevel, LogRecord, Logger, ROOT_SOURCE};
use std::fmt;
use std::io;

/// A line-oriented output target with exactly two operations
pub trait OutputStream {
    fn write_str(&mut self, text: &str);

    /// Provided for consumers that expect buffered streams
    fn flush(&mut self);
}

/// Turns writes into log records at a fixed level.
///
/// # Example
///
/// ```
/// use cmd_helper::prelude::*;
/// use std::io::Write;
///
/// let logger = Logger::new();
/// logger.add_sink(StreamSink::stdout(), SinkConfig::new(LogLevel::STDOUT));
///
/// let mut out = logger.stdout_writer();
/// write!(out, "{} items", 3).unwrap();
/// writeln!(out, " processed").unwrap();
/// ```
pub struct LogWriter<'a> {
    logger: &'a Logger,
    level: LogLevel,
    source: &'a str,
}

impl<'a> LogWriter<'a> {
    pub fn new(logger: &'a Logger, level: LogLevel) -> Self {
        Self {
            logger,
            level,
            source: ROOT_SOURCE,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: &'a str) -> Self {
        self.source = source;
        self
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    fn emit(&self, text: &str) {
        if text.is_empty() {
            return;
        }
        let record = LogRecord::new(self.level, text)
            .with_source(self.source)
            .without_newline();
        self.logger.emit(&record);
    }
}

impl OutputStream for LogWriter<'_> {
    fn write_str(&mut self, text: &str) {
        self.emit(text);
    }

    fn flush(&mut self) {}
}

impl io::Write for LogWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.emit(&String::from_utf8_lossy(buf));
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl fmt::Write for LogWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.emit(s);
        Ok(())
    }
}
