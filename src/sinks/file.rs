//! Append-only log file sink

use crate::core::{CmdError, LogRecord, Result, Sink, TimestampFormat};
use crate::formatters::{FileFormatter, Formatter};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Appends formatted records to a plain text file.
///
/// Each record is written with a single `write_all` while holding an advisory
/// exclusive lock on the file (`file-lock` feature), so scripts sharing a log
/// file do not interleave partial records.
pub struct FileSink {
    path: PathBuf,
    file: File,
    formatter: FileFormatter,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                CmdError::io_operation(
                    "opening log file",
                    format!("cannot open '{}'", path.display()),
                    e,
                )
            })?;

        Ok(Self {
            path,
            file,
            formatter: FileFormatter::new(),
        })
    }

    /// Prefix records with a timestamp
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use cmd_helper::sinks::FileSink;
    /// use cmd_helper::TimestampFormat;
    ///
    /// let sink = FileSink::new("/var/log/backup.log")
    ///     .unwrap()
    ///     .with_timestamp(TimestampFormat::parse("%Y-%m-%d %H:%M:%S ").unwrap());
    /// ```
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: TimestampFormat) -> Self {
        self.formatter = FileFormatter::with_timestamp(timestamp);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[cfg(feature = "file-lock")]
    fn append(&mut self, text: &str) -> std::io::Result<()> {
        use fs2::FileExt;
        self.file.lock_exclusive()?;
        let written = self.file.write_all(text.as_bytes());
        let unlocked = FileExt::unlock(&self.file);
        written.and(unlocked)
    }

    #[cfg(not(feature = "file-lock"))]
    fn append(&mut self, text: &str) -> std::io::Result<()> {
        self.file.write_all(text.as_bytes())
    }
}

impl Sink for FileSink {
    fn emit(&mut self, record: &LogRecord) -> Result<()> {
        let mut text = self.formatter.format(record);
        text.push_str(record.terminator());

        self.append(&text).map_err(|e| {
            CmdError::io_operation(
                "writing log file",
                format!("cannot append to '{}'", self.path.display()),
                e,
            )
        })
    }

    fn flush(&mut self) -> Result<()> {
        self.file.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_appends_across_sessions() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("session.log");

        {
            let mut sink = FileSink::new(&path).unwrap();
            sink.emit(&LogRecord::new(LogLevel::INFO, "first")).unwrap();
        }
        {
            let mut sink = FileSink::new(&path).unwrap();
            sink.emit(&LogRecord::new(LogLevel::ERROR, "second")).unwrap();
            sink.flush().unwrap();
        }

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "first\nERROR: second\n");
    }

    #[test]
    fn test_timestamped_stdout_fragments() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("stamped.log");

        let mut sink = FileSink::new(&path)
            .unwrap()
            .with_timestamp(TimestampFormat::parse("T> ").unwrap());
        for chunk in ["abc", "def\n", "ghi"] {
            sink.emit(&LogRecord::stdout(chunk)).unwrap();
        }

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "T> abcdef\nT> ghi");
    }

    #[test]
    fn test_open_failure_has_context() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let missing = temp_dir.path().join("no_such_dir").join("x.log");
        let err = FileSink::new(&missing).err().expect("open should fail");
        assert!(err.to_string().contains("opening log file"));
    }
}
