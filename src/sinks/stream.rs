//! Console stream sink

use crate::core::{CmdError, LogRecord, Result, Sink};
use crate::formatters::{ConsoleFormatter, Formatter};
use std::io::Write;

/// Writes formatted records to a byte stream (stdout, stderr or any `Write`).
///
/// The record's line terminator is appended unless it asks for none, and the
/// stream is flushed after every record so partial lines show up immediately.
pub struct StreamSink {
    name: String,
    writer: Box<dyn Write + Send>,
    formatter: Box<dyn Formatter>,
    use_colors: bool,
}

impl StreamSink {
    pub fn new(name: impl Into<String>, writer: impl Write + Send + 'static) -> Self {
        Self {
            name: name.into(),
            writer: Box::new(writer),
            formatter: Box::new(ConsoleFormatter::new()),
            use_colors: false,
        }
    }

    pub fn stdout() -> Self {
        Self::new("stdout", std::io::stdout())
    }

    pub fn stderr() -> Self {
        Self::new("stderr", std::io::stderr())
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: impl Formatter + 'static) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    /// Highlight DEBUG, WARNING and above. Only meaningful with the `console` feature.
    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    #[cfg(feature = "console")]
    fn paint(&self, record: &LogRecord, text: String) -> String {
        use colored::Colorize;
        if !self.use_colors {
            return text;
        }
        match record.level.color_code() {
            Some(color) => text.color(color).to_string(),
            None => text,
        }
    }

    #[cfg(not(feature = "console"))]
    fn paint(&self, _record: &LogRecord, text: String) -> String {
        text
    }

    fn write_text(&mut self, text: &str) -> std::io::Result<()> {
        self.writer.write_all(text.as_bytes())?;
        self.writer.flush()
    }
}

impl Sink for StreamSink {
    fn emit(&mut self, record: &LogRecord) -> Result<()> {
        let formatted = self.formatter.format(record);
        let mut text = self.paint(record, formatted);
        text.push_str(record.terminator());

        self.write_text(&text).map_err(|e| {
            let operation = format!("writing to {}", self.name);
            CmdError::io_operation(operation, e.to_string(), e)
        })
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
