//! Log file formatter with optional timestamp prefixes

use super::Formatter;
use crate::core::{LogLevel, LogRecord, TimestampFormat};

/// Formatter for persistent log files.
///
/// Without a timestamp template the layout mirrors the console:
/// `LEVEL:SOURCE: message` for named sources, `LEVEL: message` for root
/// records above `STDOUT` and for `DEBUG`, the bare message otherwise.
///
/// With a template, every record is prefixed by the rendered timestamp. Redirected
/// stdout arrives in arbitrary chunks that need not end on a line boundary, so
/// the formatter remembers whether its last output ended a line. Only a chunk
/// that starts a new line gets a timestamp; lines after an embedded newline are
/// indented by the timestamp's width instead.
#[derive(Debug, Clone)]
pub struct FileFormatter {
    timestamp: Option<TimestampFormat>,
    at_line_start: bool,
}

impl FileFormatter {
    pub fn new() -> Self {
        Self {
            timestamp: None,
            at_line_start: true,
        }
    }

    pub fn with_timestamp(timestamp: TimestampFormat) -> Self {
        Self {
            timestamp: Some(timestamp),
            at_line_start: true,
        }
    }

    pub fn timestamp(&self) -> Option<&TimestampFormat> {
        self.timestamp.as_ref()
    }

    /// Whether the most recent timestamped output ended with a newline
    pub fn at_line_start(&self) -> bool {
        self.at_line_start
    }

    fn format_plain(record: &LogRecord) -> String {
        if !record.is_root() {
            format!("{}:{}: {}", record.level, record.source, record.message)
        } else if record.level > LogLevel::STDOUT || record.level == LogLevel::DEBUG {
            format!("{}: {}", record.level, record.message)
        } else {
            record.message.clone()
        }
    }

    fn format_stdout_chunk(&mut self, stamp: &str, message: &str) -> String {
        let indent = " ".repeat(stamp.chars().count());
        let mut output = String::with_capacity(message.len() + stamp.len());

        for (index, segment) in message.split('\n').enumerate() {
            if index == 0 {
                if self.at_line_start {
                    output.push_str(stamp);
                }
            } else {
                output.push('\n');
                // No indentation in front of empty lines
                if !segment.is_empty() {
                    output.push_str(&indent);
                }
            }
            output.push_str(segment);
        }

        self.at_line_start = output.ends_with('\n');
        output
    }
}

impl Default for FileFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for FileFormatter {
    fn format(&mut self, record: &LogRecord) -> String {
        let stamp = match self.timestamp {
            Some(ref timestamp) => timestamp.render(record),
            None => return Self::format_plain(record),
        };

        if record.level == LogLevel::STDOUT {
            self.format_stdout_chunk(&stamp, &record.message)
        } else {
            self.at_line_start = true;
            format!("{}{}", stamp, record.message)
        }
    }
}
