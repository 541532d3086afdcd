//! # cmd_helper
//!
//! Scaffolding for command-line programs with a consistent set of standard
//! options and one logging setup behind all of their output.
//!
//! ## Features
//!
//! - **Severity routing**: one [`Logger`] fans records out to console, file and
//!   e-mail sinks, each with its own threshold and level filter
//! - **Redirected standard output**: normal program output is a log level of
//!   its own (`STDOUT`), so it lands in the log file next to the messages
//! - **Timestamp continuation**: output written in pieces is stamped once per
//!   line in the log file
//! - **E-mail digests**: buffered records are mailed as one message, optionally
//!   only when something at a trigger level happened
//! - **Utilities**: command-line quoting, subprocess execution with output
//!   parsing, and confirmation prompts

pub mod bridge;
pub mod command_line;
pub mod core;
pub mod formatters;
pub mod helper;
pub mod macros;
pub mod process;
pub mod prompt;
pub mod redirect;
pub mod sinks;

pub mod prelude {
    pub use crate::command_line::{cmd_line, current_cmd_line, expand_vars};
    pub use crate::core::{
        CmdError, FailurePolicy, LevelFilter, LogLevel, LogRecord, Logger, LoggerBuilder,
        LoggerMetrics, Result, Sink, SinkConfig, SinkId, TimestampFormat,
    };
    pub use crate::formatters::{ConsoleFormatter, FileFormatter, Formatter};
    pub use crate::helper::{abort, handle_error, CmdHelper, HelperConfig, Options};
    pub use crate::process::{run, RunCommand, RunOptions, RunOutput};
    pub use crate::prompt::{confirm, confirm_with, ConfirmOptions};
    pub use crate::redirect::{LogWriter, OutputStream};
    pub use crate::sinks::{
        BufferingMailSink, DeliveryPolicy, FileSink, MailMessage, MailTransport, SmtpTransport,
        StreamSink,
    };
}

pub use command_line::{cmd_line, current_cmd_line, expand_vars};
pub use core::{
    CmdError, FailurePolicy, FilterMode, LevelFilter, LogLevel, LogRecord, Logger, LoggerBuilder,
    LoggerMetrics, Result, Sink, SinkConfig, SinkId, TimestampFormat, ASCTIME_FORMAT, ROOT_SOURCE,
};
pub use helper::{CmdHelper, HelperConfig};
