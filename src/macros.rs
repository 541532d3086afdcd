//! Logging macros for ergonomic log message formatting.
//!
//! These macros take the logger as their first argument and format the rest
//! like `format!`. `stdout!` and `stdoutln!` stand in for `print!` and
//! `println!` in programs whose standard output is routed through the logger.
//!
//! # Examples
//!
//! ```
//! use cmd_helper::prelude::*;
//! use cmd_helper::{info, stdoutln};
//!
//! let logger = Logger::new();
//!
//! info!(logger, "Backup started");
//!
//! let files = 12;
//! stdoutln!(logger, "{} files copied", files);
//! ```

/// Log a message at an explicit level.
///
/// # Examples
///
/// ```
/// # use cmd_helper::prelude::*;
/// # let logger = Logger::new();
/// use cmd_helper::log;
/// log!(logger, LogLevel::INFO, "Simple message");
/// log!(logger, LogLevel::from_number(15), "Between DEBUG and INFO: {}", 15);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+))
    };
}

/// Log a debug-level message.
///
/// ```
/// # use cmd_helper::prelude::*;
/// # let logger = Logger::new();
/// use cmd_helper::debug;
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::DEBUG, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::INFO, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::WARNING, $($arg)+)
    };
}

/// Log an error-level message.
///
/// ```
/// # use cmd_helper::prelude::*;
/// # let logger = Logger::new();
/// use cmd_helper::error;
/// error!(logger, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::ERROR, $($arg)+)
    };
}

/// Log a critical-level message.
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::CRITICAL, $($arg)+)
    };
}

/// Write redirected standard output without a trailing newline, like `print!`.
///
/// ```
/// # use cmd_helper::prelude::*;
/// # let logger = Logger::new();
/// use cmd_helper::stdout;
/// stdout!(logger, "Progress: ");
/// stdout!(logger, "{}%\n", 40);
/// ```
#[macro_export]
macro_rules! stdout {
    ($logger:expr, $($arg:tt)+) => {
        $logger.write_stdout(format!($($arg)+))
    };
}

/// Write a line of redirected standard output, like `println!`.
#[macro_export]
macro_rules! stdoutln {
    ($logger:expr) => {
        $logger.write_stdout("\n")
    };
    ($logger:expr, $($arg:tt)+) => {{
        let mut line = format!($($arg)+);
        line.push('\n');
        $logger.write_stdout(line)
    }};
}
