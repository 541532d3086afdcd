//! Sink trait for log output destinations

use super::{error::Result, level_filter::LevelFilter, log_level::LogLevel, log_record::LogRecord};

pub trait Sink: Send {
    /// Format and write (or buffer) one accepted record
    fn emit(&mut self, record: &LogRecord) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}

/// What the router does when a sink's `emit` fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Report on the real stderr and keep routing to the other sinks
    #[default]
    Report,

    /// Print `IOError: ...` to the real stderr and exit the process with status 1.
    ///
    /// Meant for console sinks: once stdout is a closed pipe (`prog | head`)
    /// every further record would fail the same way.
    Abort,
}

/// Routing parameters of a registered sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkConfig {
    pub threshold: LogLevel,
    pub filter: Option<LevelFilter>,
    pub failure_policy: FailurePolicy,
}

impl SinkConfig {
    pub fn new(threshold: LogLevel) -> Self {
        Self {
            threshold,
            filter: None,
            failure_policy: FailurePolicy::default(),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_filter(mut self, filter: LevelFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn accepts(&self, level: LogLevel) -> bool {
        level >= self.threshold
            && self.filter.as_ref().is_none_or(|filter| filter.allows(level))
    }
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self::new(LogLevel::NOTSET)
    }
}
