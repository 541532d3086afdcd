//! Formatter implementations

pub mod console;
pub mod file;

pub use console::ConsoleFormatter;
pub use file::FileFormatter;

use crate::core::LogRecord;

/// Renders a record as text, without the trailing line terminator.
///
/// `format` takes `&mut self` because some formatters track state across
/// records (see [`FileFormatter`]).
pub trait Formatter: Send {
    fn format(&mut self, record: &LogRecord) -> String;
}
