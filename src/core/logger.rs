//! Logging context: severity router over registered sinks

use super::{
    error::{CmdError, Result},
    level_filter::LevelFilter,
    log_level::LogLevel,
    log_record::{LogRecord, ROOT_SOURCE},
    metrics::LoggerMetrics,
    sink::{FailurePolicy, Sink, SinkConfig},
};
use crate::redirect::LogWriter;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Handle returned by [`Logger::add_sink`], used to adjust or remove the sink later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SinkId(u64);

struct SinkSlot {
    id: SinkId,
    config: RwLock<SinkConfig>,
    sink: Mutex<Box<dyn Sink>>,
}

/// Explicit logging context.
///
/// Records are routed synchronously: when `log` returns, every accepting sink
/// has formatted and written (or buffered) the record. Each sink sits behind
/// its own mutex, so one record's text is never interleaved with another
/// writer's text on the same sink.
///
/// # Example
///
/// ```
/// use cmd_helper::prelude::*;
///
/// let logger = Logger::new();
/// let console = logger.add_sink(StreamSink::stdout(), SinkConfig::new(LogLevel::STDOUT));
///
/// logger.info("hidden: below the console threshold");
/// logger.set_threshold(console, LogLevel::INFO);
/// logger.info("now visible");
/// ```
pub struct Logger {
    sinks: RwLock<Vec<Arc<SinkSlot>>>,
    next_id: AtomicU64,
    metrics: LoggerMetrics,
}

impl Logger {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sinks: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(0),
            metrics: LoggerMetrics::new(),
        }
    }

    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub fn add_sink<S: Sink + 'static>(&self, sink: S, config: SinkConfig) -> SinkId {
        self.add_boxed_sink(Box::new(sink), config)
    }

    pub fn add_boxed_sink(&self, sink: Box<dyn Sink>, config: SinkConfig) -> SinkId {
        let id = SinkId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let slot = Arc::new(SinkSlot {
            id,
            config: RwLock::new(config),
            sink: Mutex::new(sink),
        });
        self.sinks.write().push(slot);
        id
    }

    /// Unregister a sink. Buffered content is flushed first.
    pub fn remove_sink(&self, id: SinkId) -> bool {
        let removed = {
            let mut sinks = self.sinks.write();
            let index = sinks.iter().position(|slot| slot.id == id);
            index.map(|i| sinks.remove(i))
        };
        match removed {
            Some(slot) => {
                let mut sink = slot.sink.lock();
                if let Err(e) = sink.flush() {
                    eprintln!("[LOGGER ERROR] Sink '{}' flush on removal failed: {}", sink.name(), e);
                }
                true
            }
            None => false,
        }
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.read().len()
    }

    fn slot(&self, id: SinkId) -> Option<Arc<SinkSlot>> {
        self.sinks.read().iter().find(|slot| slot.id == id).cloned()
    }

    pub fn set_threshold(&self, id: SinkId, level: LogLevel) -> bool {
        match self.slot(id) {
            Some(slot) => {
                slot.config.write().threshold = level;
                true
            }
            None => false,
        }
    }

    pub fn threshold(&self, id: SinkId) -> Option<LogLevel> {
        self.slot(id).map(|slot| slot.config.read().threshold)
    }

    pub fn set_filter(&self, id: SinkId, filter: Option<LevelFilter>) -> bool {
        match self.slot(id) {
            Some(slot) => {
                slot.config.write().filter = filter;
                true
            }
            None => false,
        }
    }

    /// Whether any registered sink would accept a record at `level`
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        self.sinks
            .read()
            .iter()
            .any(|slot| slot.config.read().accepts(level))
    }

    /// Route a record to every accepting sink, in registration order
    pub fn emit(&self, record: &LogRecord) {
        // Snapshot so sinks may register or remove sinks while emitting
        let sinks: Vec<Arc<SinkSlot>> = self.sinks.read().clone();
        let mut accepted = 0u64;

        for slot in &sinks {
            let policy = {
                let config = slot.config.read();
                if !config.accepts(record.level) {
                    continue;
                }
                config.failure_policy
            };
            accepted += 1;

            let mut sink = slot.sink.lock();
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                sink.emit(record)
            }));

            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    self.metrics.record_failure();
                    match policy {
                        FailurePolicy::Report => {
                            eprintln!("[LOGGER ERROR] Sink '{}' failed: {}", sink.name(), e);
                        }
                        FailurePolicy::Abort => {
                            // Release the failed sink before the others are flushed
                            drop(sink);
                            self.shutdown_after_failure(slot.id, &e);
                            std::process::exit(1);
                        }
                    }
                }
                Err(panic_info) => {
                    self.metrics.record_failure();
                    let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                        s.to_string()
                    } else if let Some(s) = panic_info.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "Unknown panic".to_string()
                    };
                    eprintln!(
                        "[LOGGER CRITICAL] Sink '{}' panicked: {}. \
                         Other sinks continue to function.",
                        sink.name(),
                        panic_msg
                    );
                }
            }
        }

        if accepted > 0 {
            self.metrics.record_routed(accepted);
        } else {
            self.metrics.record_unrouted();
        }
    }

    /// Report a fatal sink failure and flush every other sink, so buffered
    /// digests still go out before the process exits
    fn shutdown_after_failure(&self, failed: SinkId, error: &CmdError) {
        eprintln!("IOError: {}", error);
        let sinks: Vec<Arc<SinkSlot>> = self.sinks.read().clone();
        for slot in sinks.iter().filter(|slot| slot.id != failed) {
            let mut sink = slot.sink.lock();
            if let Err(e) = sink.flush() {
                eprintln!("[LOGGER ERROR] Sink '{}' flush failed: {}", sink.name(), e);
            }
        }
    }

    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        self.emit(&LogRecord::new(level, message));
    }

    /// Log on behalf of a named (non-root) source
    pub fn log_from(&self, source: &str, level: LogLevel, message: impl Into<String>) {
        self.emit(&LogRecord::new(level, message).with_source(source));
    }

    /// Emit a chunk of redirected standard output; no line terminator is added
    pub fn write_stdout(&self, text: impl Into<String>) {
        self.emit(&LogRecord::stdout(text));
    }

    /// Writer that turns every write into a `STDOUT` record
    pub fn stdout_writer(&self) -> LogWriter<'_> {
        LogWriter::new(self, LogLevel::STDOUT)
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::DEBUG, message);
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::INFO, message);
    }

    /// A complete line of standard output.
    ///
    /// The newline travels inside the chunk, like `stdoutln!`, so timestamping
    /// sinks see the line end and stamp the next chunk.
    #[inline]
    pub fn stdout(&self, message: impl Into<String>) {
        let mut line = message.into();
        line.push('\n');
        self.write_stdout(line);
    }

    #[inline]
    pub fn warning(&self, message: impl Into<String>) {
        self.log(LogLevel::WARNING, message);
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::ERROR, message);
    }

    #[inline]
    pub fn critical(&self, message: impl Into<String>) {
        self.log(LogLevel::CRITICAL, message);
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Flush every sink; all sinks are attempted, the first error is returned
    pub fn flush(&self) -> Result<()> {
        let sinks: Vec<Arc<SinkSlot>> = self.sinks.read().clone();
        let mut first_error = None;
        for slot in &sinks {
            let mut sink = slot.sink.lock();
            if let Err(e) = sink.flush() {
                self.metrics.record_failure();
                if first_error.is_none() {
                    first_error = Some(e);
                } else {
                    eprintln!("[LOGGER ERROR] Sink '{}' flush failed: {}", sink.name(), e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        // Buffered sinks (e-mail digests) deliver here at the latest
        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("sinks", &self.sink_count())
            .field("default_source", &ROOT_SOURCE)
            .finish()
    }
}

/// Builder for constructing a Logger with a fluent API
///
/// # Example
/// ```
/// use cmd_helper::prelude::*;
///
/// let logger = Logger::builder()
///     .sink(StreamSink::stdout(), SinkConfig::new(LogLevel::STDOUT))
///     .build();
/// assert_eq!(logger.sink_count(), 1);
/// ```
pub struct LoggerBuilder {
    sinks: Vec<(Box<dyn Sink>, SinkConfig)>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S, config: SinkConfig) -> Self {
        self.sinks.push((Box::new(sink), config));
        self
    }

    pub fn build(self) -> Logger {
        let logger = Logger::new();
        for (sink, config) in self.sinks {
            logger.add_boxed_sink(sink, config);
        }
        logger
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
