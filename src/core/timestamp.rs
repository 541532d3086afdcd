//! Timestamp templates for log file prefixes
//!
//! A template is a strftime string such as `"%Y-%m-%d %H:%M:%S "`, rendered in
//! local time. Two placeholders are substituted after the time fields:
//! `{level}` (the record's level name) and `{source}` (its source name).
//! Templates are validated once, when parsed, so rendering never fails.

use super::error::{CmdError, Result};
use super::log_record::LogRecord;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};

/// Date layout used by `asctime`-style templates: `Wed Jan 08 10:30:45 +01:00 2025`
pub const ASCTIME_FORMAT: &str = "%a %b %d %X %Z %Y";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampFormat {
    template: String,
}

impl TimestampFormat {
    /// Parse and validate a template
    ///
    /// # Examples
    ///
    /// ```
    /// use cmd_helper::TimestampFormat;
    ///
    /// assert!(TimestampFormat::parse("%Y-%m-%d %H:%M:%S ").is_ok());
    /// assert!(TimestampFormat::parse("%Q oops").is_err());
    /// ```
    pub fn parse(template: &str) -> Result<Self> {
        let invalid = StrftimeItems::new(template).any(|item| matches!(item, Item::Error));
        if invalid {
            return Err(CmdError::InvalidTimestampFormat {
                format: template.to_string(),
            });
        }
        Ok(Self {
            template: template.to_string(),
        })
    }

    /// `asctime` date followed by a separator, e.g. `"Wed Jan 08 10:30:45 +01:00 2025: "`
    pub fn asctime(separator: &str) -> Self {
        Self {
            template: format!("{}{}", ASCTIME_FORMAT, separator.replace('%', "%%")),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Render the prefix for a record
    #[must_use]
    pub fn render(&self, record: &LogRecord) -> String {
        self.render_parts(&record.created, &record.level.name(), &record.source)
    }

    #[must_use]
    pub fn render_parts(&self, datetime: &DateTime<Local>, level: &str, source: &str) -> String {
        let stamped = datetime.format(&self.template).to_string();
        if !stamped.contains('{') {
            return stamped;
        }
        stamped.replace("{level}", level).replace("{source}", source)
    }
}
