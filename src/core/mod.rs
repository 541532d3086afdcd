//! Core logger types and traits

pub mod error;
pub mod level_filter;
pub mod log_level;
pub mod log_record;
pub mod logger;
pub mod metrics;
pub mod sink;
pub mod timestamp;

pub use error::{CmdError, Result};
pub use level_filter::{FilterMode, LevelFilter};
pub use log_level::LogLevel;
pub use log_record::{LogRecord, ROOT_SOURCE};
pub use logger::{Logger, LoggerBuilder, SinkId};
pub use metrics::LoggerMetrics;
pub use sink::{FailurePolicy, Sink, SinkConfig};
pub use timestamp::{TimestampFormat, ASCTIME_FORMAT};
