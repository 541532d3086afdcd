//! Bridge from the `log` crate facade into a [`Logger`]
//!
//! Libraries log through `log::info!` and friends. Installing the bridge routes
//! those records through the same sinks as the program's own output, with the
//! record's target as the source name.

use crate::core::{CmdError, LogLevel, LogRecord, Logger, Result};
use std::sync::Arc;

pub struct LogBridge {
    logger: Arc<Logger>,
    root_targets: Vec<String>,
}

impl LogBridge {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self {
            logger,
            root_targets: Vec::new(),
        }
    }

    /// Treat records whose target is `target` (or one of its submodules) as
    /// coming from the application itself rather than a named source
    #[must_use]
    pub fn with_root_target(mut self, target: impl Into<String>) -> Self {
        self.root_targets.push(target.into());
        self
    }

    fn is_root_target(&self, target: &str) -> bool {
        self.root_targets.iter().any(|root| {
            target == root
                || target
                    .strip_prefix(root.as_str())
                    .is_some_and(|rest| rest.starts_with("::"))
        })
    }

    fn to_record(&self, record: &log::Record<'_>) -> LogRecord {
        let entry = LogRecord::new(LogLevel::from(record.level()), record.args().to_string());
        if self.is_root_target(record.target()) {
            entry
        } else {
            entry.with_source(record.target())
        }
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        self.logger.is_enabled(LogLevel::from(metadata.level()))
    }

    fn log(&self, record: &log::Record<'_>) {
        if self.enabled(record.metadata()) {
            self.logger.emit(&self.to_record(record));
        }
    }

    fn flush(&self) {
        if let Err(e) = self.logger.flush() {
            eprintln!("[LOGGER ERROR] Flush through log facade failed: {}", e);
        }
    }
}

/// Install `bridge` as the process-wide `log` backend
pub fn install(bridge: LogBridge, max_level: log::LevelFilter) -> Result<()> {
    log::set_boxed_logger(Box::new(bridge))
        .map_err(|e| CmdError::config("log bridge", e.to_string()))?;
    log::set_max_level(max_level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Sink, SinkConfig};
    use log::Log;
    use parking_lot::Mutex;

    struct Collect(Arc<Mutex<Vec<LogRecord>>>);

    impl Sink for Collect {
        fn emit(&mut self, record: &LogRecord) -> Result<()> {
            self.0.lock().push(record.clone());
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "collect"
        }
    }

    fn bridge(threshold: LogLevel) -> (LogBridge, Arc<Mutex<Vec<LogRecord>>>) {
        let logger = Arc::new(Logger::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        logger.add_sink(Collect(Arc::clone(&seen)), SinkConfig::new(threshold));
        (LogBridge::new(logger).with_root_target("backup"), seen)
    }

    #[test]
    fn test_targets_become_sources() {
        let (bridge, seen) = bridge(LogLevel::DEBUG);

        bridge.log(
            &log::Record::builder()
                .level(log::Level::Warn)
                .target("hyper::client")
                .args(format_args!("slow response"))
                .build(),
        );
        bridge.log(
            &log::Record::builder()
                .level(log::Level::Info)
                .target("backup::scan")
                .args(format_args!("{} files", 12))
                .build(),
        );

        let seen = seen.lock();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].source, "hyper::client");
        assert_eq!(seen[0].level, LogLevel::WARNING);
        assert!(seen[1].is_root());
        assert_eq!(seen[1].message, "12 files");
    }

    #[test]
    fn test_enabled_follows_sink_thresholds() {
        let (bridge, seen) = bridge(LogLevel::WARNING);
        let debug = log::Metadata::builder()
            .level(log::Level::Debug)
            .target("x")
            .build();
        assert!(!bridge.enabled(&debug));

        bridge.log(
            &log::Record::builder()
                .level(log::Level::Trace)
                .target("x")
                .args(format_args!("hidden"))
                .build(),
        );
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_root_target_prefix_match() {
        let (bridge, _) = bridge(LogLevel::DEBUG);
        assert!(bridge.is_root_target("backup"));
        assert!(bridge.is_root_target("backup::io"));
        assert!(!bridge.is_root_target("backupctl"));
    }
}
