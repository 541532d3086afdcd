//! Log record structure

use super::log_level::LogLevel;
use chrono::{DateTime, Local};

/// Source name of the top-level application logger
pub const ROOT_SOURCE: &str = "root";

/// A single emitted message. Every sink that accepts it sees the same record.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub level: LogLevel,
    pub source: String,
    pub message: String,
    /// When set, sinks write the formatted text without a line terminator
    pub suppress_newline: bool,
    pub created: DateTime<Local>,
}

impl LogRecord {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            source: ROOT_SOURCE.to_string(),
            message: message.into(),
            suppress_newline: false,
            created: Local::now(),
        }
    }

    /// Record for a chunk of redirected standard output
    pub fn stdout(text: impl Into<String>) -> Self {
        Self::new(LogLevel::STDOUT, text).without_newline()
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    #[must_use]
    pub fn without_newline(mut self) -> Self {
        self.suppress_newline = true;
        self
    }

    #[must_use]
    pub fn with_created(mut self, created: DateTime<Local>) -> Self {
        self.created = created;
        self
    }

    pub fn is_root(&self) -> bool {
        self.source == ROOT_SOURCE
    }

    /// Line terminator sinks append after the formatted text
    pub fn terminator(&self) -> &'static str {
        if self.suppress_newline {
            ""
        } else {
            "\n"
        }
    }
}
