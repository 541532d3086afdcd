//! Interactive confirmation prompts

use crate::core::{CmdError, Logger, Result};
use std::io::{self, BufRead};

const INVALID_REPLY: &str =
    "ERROR: Invalid reply - please enter either 'y' or 'n', or press just enter to accept default\n";

/// Options for [`confirm`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmOptions {
    /// Answer used when the user just presses enter
    pub accept_by_default: bool,
    /// Exit status reported when the user declines; `None` makes a decline
    /// return `Ok(false)` instead
    pub exit_code_on_abort: Option<i32>,
    /// Skip the question and accept
    pub batch: bool,
}

impl Default for ConfirmOptions {
    fn default() -> Self {
        Self {
            accept_by_default: false,
            exit_code_on_abort: Some(1),
            batch: false,
        }
    }
}

impl ConfirmOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn accept_by_default(mut self, accept: bool) -> Self {
        self.accept_by_default = accept;
        self
    }

    #[must_use]
    pub fn exit_code_on_abort(mut self, code: Option<i32>) -> Self {
        self.exit_code_on_abort = code;
        self
    }

    #[must_use]
    pub fn batch(mut self, batch: bool) -> Self {
        self.batch = batch;
        self
    }
}

/// Ask the user on standard input to confirm `message`
///
/// Declining with an abort exit code set yields [`CmdError::Aborted`]; pass it
/// to [`handle_error`](crate::helper::handle_error) to end the program.
pub fn confirm(logger: &Logger, message: &str, options: &ConfirmOptions) -> Result<bool> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    confirm_with(logger, &mut input, message, options)
}

/// Like [`confirm`], reading replies from `input`
pub fn confirm_with(
    logger: &Logger,
    input: &mut impl BufRead,
    message: &str,
    options: &ConfirmOptions,
) -> Result<bool> {
    if options.batch {
        return Ok(true);
    }

    let default = if options.accept_by_default { "y" } else { "n" };
    let question = format!("{} - are you sure [{}] ? ", message, default);

    loop {
        logger.write_stdout(question.as_str());
        let mut line = String::new();
        input
            .read_line(&mut line)
            .map_err(|e| CmdError::io_operation("reading confirmation", message, e))?;
        logger.write_stdout("\n");

        let reply = line.trim_end_matches(['\r', '\n']).to_lowercase();
        let reply = if reply.is_empty() { default } else { reply.as_str() };
        match reply {
            "y" => return Ok(true),
            "n" => {
                return match options.exit_code_on_abort {
                    None => Ok(false),
                    Some(exit_code) => {
                        let err = CmdError::Aborted { exit_code };
                        logger.error(err.to_string());
                        Err(err)
                    }
                };
            }
            _ => logger.stdout(INVALID_REPLY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LogLevel, LogRecord, Sink, SinkConfig};
    use crate::formatters::ConsoleFormatter;
    use parking_lot::Mutex;
    use std::io::Cursor;
    use std::sync::Arc;

    struct Screen(Arc<Mutex<String>>);

    impl Sink for Screen {
        fn emit(&mut self, record: &LogRecord) -> Result<()> {
            let mut text = ConsoleFormatter::new().render(record);
            text.push_str(record.terminator());
            self.0.lock().push_str(&text);
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "screen"
        }
    }

    fn screen() -> (Logger, Arc<Mutex<String>>) {
        let logger = Logger::new();
        let text = Arc::new(Mutex::new(String::new()));
        logger.add_sink(Screen(Arc::clone(&text)), SinkConfig::new(LogLevel::STDOUT));
        (logger, text)
    }

    #[test]
    fn test_yes() {
        let (logger, text) = screen();
        let mut input = Cursor::new("Y\n");
        assert!(confirm_with(&logger, &mut input, "Delete", &ConfirmOptions::new()).unwrap());
        assert_eq!(*text.lock(), "Delete - are you sure [n] ? \n");
    }

    #[test]
    fn test_default_answers() {
        let (logger, _) = screen();
        let accept = ConfirmOptions::new().accept_by_default(true);
        assert!(confirm_with(&logger, &mut Cursor::new("\n"), "Go", &accept).unwrap());

        let decline = ConfirmOptions::new().exit_code_on_abort(None);
        assert!(!confirm_with(&logger, &mut Cursor::new("\n"), "Go", &decline).unwrap());
    }

    #[test]
    fn test_decline_aborts_with_exit_code() {
        let (logger, text) = screen();
        let options = ConfirmOptions::new().exit_code_on_abort(Some(3));
        let err = confirm_with(&logger, &mut Cursor::new("n\n"), "Go", &options).unwrap_err();

        assert_eq!(err.exit_code(), 3);
        assert!(text
            .lock()
            .ends_with("ERROR: Program execution aborted by user\n"));
    }

    #[test]
    fn test_invalid_reply_asks_again() {
        let (logger, text) = screen();
        let mut input = Cursor::new("maybe\ny\n");
        assert!(confirm_with(&logger, &mut input, "Go", &ConfirmOptions::new()).unwrap());

        let expected = format!(
            "Go - are you sure [n] ? \n{}\nGo - are you sure [n] ? \n",
            INVALID_REPLY
        );
        assert_eq!(*text.lock(), expected);
    }

    #[test]
    fn test_end_of_input_takes_default() {
        let (logger, _) = screen();
        let accept = ConfirmOptions::new().accept_by_default(true);
        assert!(confirm_with(&logger, &mut Cursor::new(""), "Go", &accept).unwrap());
    }

    #[test]
    fn test_batch_skips_prompt() {
        let (logger, text) = screen();
        let mut input = Cursor::new("n\n");
        assert!(confirm_with(&logger, &mut input, "Go", &ConfirmOptions::new().batch(true)).unwrap());
        assert!(text.lock().is_empty());
    }
}
