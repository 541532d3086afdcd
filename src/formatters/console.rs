//! Console formatter

use super::Formatter;
use crate::core::{LogLevel, LogRecord};

/// Formatter for human consumption on a terminal.
///
/// * records from a named source: `LEVEL   SOURCE                         message`
/// * root records above `STDOUT`: `WARNING: message`
/// * root `DEBUG` records: `... message`
/// * everything else (redirected output, `INFO`): the bare message
///
/// Redirected stdout is assumed to come from the root source.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Stateless rendering, usable through a shared reference
    pub fn render(&self, record: &LogRecord) -> String {
        if !record.is_root() {
            format!("{:<7} {:<30} {}", record.level, record.source, record.message)
        } else if record.level > LogLevel::STDOUT {
            format!("{}: {}", record.level, record.message)
        } else if record.level == LogLevel::DEBUG {
            format!("... {}", record.message)
        } else {
            record.message.clone()
        }
    }
}

impl Formatter for ConsoleFormatter {
    fn format(&mut self, record: &LogRecord) -> String {
        self.render(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(level: LogLevel, message: &str) -> String {
        ConsoleFormatter::new().render(&LogRecord::new(level, message))
    }

    #[test]
    fn test_root_levels() {
        assert_eq!(render(LogLevel::DEBUG, "message"), "... message");
        assert_eq!(render(LogLevel::INFO, "message"), "message");
        assert_eq!(render(LogLevel::STDOUT, "message"), "message");
        assert_eq!(render(LogLevel::WARNING, "message"), "WARNING: message");
        assert_eq!(render(LogLevel::ERROR, "message"), "ERROR: message");
        assert_eq!(render(LogLevel::CRITICAL, "message"), "CRITICAL: message");
    }

    #[test]
    fn test_named_source_layout() {
        let record = LogRecord::new(LogLevel::INFO, "message").with_source("NAME");
        assert_eq!(
            ConsoleFormatter::new().render(&record),
            "INFO    NAME                           message"
        );

        let record = LogRecord::new(LogLevel::WARNING, "message").with_source("NAME");
        let text = ConsoleFormatter::new().render(&record);
        assert_eq!(&text[..8], "WARNING ");
        assert_eq!(&text[8..39], format!("{:<31}", "NAME"));
        assert!(text.ends_with(" message"));
    }

    #[test]
    fn test_unnamed_numeric_level_above_stdout() {
        assert_eq!(
            render(LogLevel::from_number(35), "odd"),
            "Level 35: odd"
        );
    }

    #[test]
    fn test_no_newline_added() {
        assert_eq!(render(LogLevel::STDOUT, "partial"), "partial");
        assert_eq!(render(LogLevel::STDOUT, "line\n"), "line\n");
    }
}
