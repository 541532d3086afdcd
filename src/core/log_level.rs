//! Log level definitions
//!
//! Levels are numeric so that thresholds can be given either by name or as an
//! integer (`--loglevel 35`). The named levels are:
//!
//! | Name     | Value |
//! |----------|-------|
//! | NOTSET   | 0     |
//! | DEBUG    | 10    |
//! | INFO     | 20    |
//! | STDOUT   | 25    |
//! | WARNING  | 30    |
//! | ERROR    | 40    |
//! | CRITICAL | 50    |
//!
//! `STDOUT` is reserved for text written through the redirected standard
//! output stream, see [`LogWriter`](crate::redirect::LogWriter).
//! It sits between INFO and WARNING, so normal output shows at the default
//! console threshold while INFO messages need `--verbose`.

use super::error::{CmdError, Result};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LogLevel(u16);

impl LogLevel {
    pub const NOTSET: LogLevel = LogLevel(0);
    pub const DEBUG: LogLevel = LogLevel(10);
    pub const INFO: LogLevel = LogLevel(20);
    pub const STDOUT: LogLevel = LogLevel(25);
    pub const WARNING: LogLevel = LogLevel(30);
    pub const ERROR: LogLevel = LogLevel(40);
    pub const CRITICAL: LogLevel = LogLevel(50);

    /// Threshold above every named level; a sink at this level accepts nothing
    pub const OFF: LogLevel = LogLevel(9999);

    /// All named levels in ascending order
    pub const NAMED: [LogLevel; 6] = [
        LogLevel::DEBUG,
        LogLevel::INFO,
        LogLevel::STDOUT,
        LogLevel::WARNING,
        LogLevel::ERROR,
        LogLevel::CRITICAL,
    ];

    pub const fn from_number(value: u16) -> Self {
        LogLevel(value)
    }

    pub const fn as_number(self) -> u16 {
        self.0
    }

    /// Level name, or `Level N` for unnamed numeric levels
    pub fn name(&self) -> Cow<'static, str> {
        match self.known_name() {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Owned(format!("Level {}", self.0)),
        }
    }

    fn known_name(&self) -> Option<&'static str> {
        match *self {
            LogLevel::NOTSET => Some("NOTSET"),
            LogLevel::DEBUG => Some("DEBUG"),
            LogLevel::INFO => Some("INFO"),
            LogLevel::STDOUT => Some("STDOUT"),
            LogLevel::WARNING => Some("WARNING"),
            LogLevel::ERROR => Some("ERROR"),
            LogLevel::CRITICAL => Some("CRITICAL"),
            _ => None,
        }
    }

    /// Resolve a level given as a name (case-insensitive) or an integer.
    ///
    /// The caller decides which level to fall back to on error.
    ///
    /// ```
    /// use cmd_helper::LogLevel;
    ///
    /// assert_eq!(LogLevel::resolve("warning").unwrap(), LogLevel::WARNING);
    /// assert_eq!(LogLevel::resolve("35").unwrap().as_number(), 35);
    /// assert!(LogLevel::resolve("loud").is_err());
    /// ```
    pub fn resolve(level: &str) -> Result<LogLevel> {
        let trimmed = level.trim();
        if let Ok(value) = trimmed.parse::<u16>() {
            return Ok(LogLevel(value));
        }
        match trimmed.to_uppercase().as_str() {
            "NOTSET" => Ok(LogLevel::NOTSET),
            "DEBUG" => Ok(LogLevel::DEBUG),
            "INFO" => Ok(LogLevel::INFO),
            "STDOUT" => Ok(LogLevel::STDOUT),
            "WARNING" | "WARN" => Ok(LogLevel::WARNING),
            "ERROR" => Ok(LogLevel::ERROR),
            "CRITICAL" | "FATAL" => Ok(LogLevel::CRITICAL),
            _ => Err(CmdError::unknown_level(level)),
        }
    }

    /// Terminal color for this level, if it is highlighted at all
    #[cfg(feature = "console")]
    pub fn color_code(&self) -> Option<colored::Color> {
        use colored::Color::*;
        match *self {
            LogLevel::DEBUG => Some(BrightBlack),
            LogLevel::WARNING => Some(Yellow),
            LogLevel::ERROR => Some(Red),
            LogLevel::CRITICAL => Some(BrightRed),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // pad() so that width specifiers like {:<7} apply
        f.pad(&self.name())
    }
}

impl FromStr for LogLevel {
    type Err = CmdError;

    fn from_str(s: &str) -> Result<Self> {
        LogLevel::resolve(s)
    }
}

impl From<log::Level> for LogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => LogLevel::ERROR,
            log::Level::Warn => LogLevel::WARNING,
            log::Level::Info => LogLevel::INFO,
            log::Level::Debug | log::Level::Trace => LogLevel::DEBUG,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        assert!(LogLevel::DEBUG < LogLevel::INFO);
        assert!(LogLevel::INFO < LogLevel::STDOUT);
        assert!(LogLevel::STDOUT < LogLevel::WARNING);
        assert!(LogLevel::WARNING < LogLevel::ERROR);
        assert!(LogLevel::ERROR < LogLevel::CRITICAL);
        assert!(LogLevel::CRITICAL < LogLevel::OFF);
    }

    #[test]
    fn test_resolve_names_and_numbers() {
        assert_eq!(LogLevel::resolve("DEBUG").unwrap(), LogLevel::DEBUG);
        assert_eq!(LogLevel::resolve("stdout").unwrap(), LogLevel::STDOUT);
        assert_eq!(LogLevel::resolve(" Warn ").unwrap(), LogLevel::WARNING);
        assert_eq!(LogLevel::resolve("fatal").unwrap(), LogLevel::CRITICAL);
        assert_eq!(LogLevel::resolve("40").unwrap(), LogLevel::ERROR);
        assert_eq!(LogLevel::resolve("9999").unwrap(), LogLevel::OFF);
    }

    #[test]
    fn test_resolve_unknown_keeps_offending_string() {
        match LogLevel::resolve("verbose") {
            Err(CmdError::UnknownLevel { name }) => assert_eq!(name, "verbose"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(LogLevel::resolve("-5").is_err());
        assert!(LogLevel::resolve("").is_err());
    }

    #[test]
    fn test_names() {
        assert_eq!(LogLevel::WARNING.name(), "WARNING");
        assert_eq!(LogLevel::from_number(35).name(), "Level 35");
        assert_eq!(format!("{:<7}|", LogLevel::INFO), "INFO   |");
    }

    #[test]
    fn test_from_log_facade() {
        assert_eq!(LogLevel::from(log::Level::Trace), LogLevel::DEBUG);
        assert_eq!(LogLevel::from(log::Level::Warn), LogLevel::WARNING);
    }
}
