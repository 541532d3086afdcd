//! Subprocess execution with logging
//!
//! Commands run through `sh`, with stderr merged into stdout so the captured
//! output keeps the order in which the command produced it.

use crate::command_line::cmd_line;
use crate::core::{CmdError, Logger, Result};
use regex::Regex;
use std::fmt;
use std::io::{BufRead, BufReader};
use std::process::{Command, ExitStatus, Stdio};

/// A command given either as shell source or as an argument vector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunCommand {
    /// Interpreted by `sh -c`, so pipes, globbing and redirections work
    Shell(String),
    /// Executed directly, without shell interpretation of the arguments
    Argv(Vec<String>),
}

impl RunCommand {
    fn to_process(&self) -> Result<Command> {
        let mut process = Command::new("sh");
        match self {
            RunCommand::Shell(source) => {
                process.arg("-c").arg(format!("exec 2>&1\n{}", source));
            }
            RunCommand::Argv(words) => {
                if words.is_empty() {
                    return Err(CmdError::config("run", "empty argument vector"));
                }
                process
                    .arg("-c")
                    .arg("exec 2>&1; exec \"$0\" \"$@\"")
                    .args(words);
            }
        }
        Ok(process)
    }
}

impl fmt::Display for RunCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunCommand::Shell(source) => f.write_str(source),
            RunCommand::Argv(words) => f.write_str(&cmd_line(words, false)),
        }
    }
}

impl From<&str> for RunCommand {
    fn from(source: &str) -> Self {
        RunCommand::Shell(source.to_string())
    }
}

impl From<String> for RunCommand {
    fn from(source: String) -> Self {
        RunCommand::Shell(source)
    }
}

impl From<Vec<String>> for RunCommand {
    fn from(words: Vec<String>) -> Self {
        RunCommand::Argv(words)
    }
}

impl From<&[&str]> for RunCommand {
    fn from(words: &[&str]) -> Self {
        RunCommand::Argv(words.iter().map(|w| w.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for RunCommand {
    fn from(words: [&str; N]) -> Self {
        RunCommand::Argv(words.iter().map(|w| w.to_string()).collect())
    }
}

/// Options for [`run`]
///
/// `parse_for_regex` uses `regex` crate syntax; flags go inline, e.g. `(?i)error`.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Echo each output line through the redirected stdout stream
    pub print_output: bool,
    /// Return `CmdError::CommandFailed` on a non-zero exit status
    pub exception_on_error: bool,
    /// Log a warning on a non-zero exit status
    pub warning_on_error: bool,
    pub parse_for_regex: Option<String>,
    pub print_output_if_parsed: bool,
    pub print_errors_if_parsed: bool,
    pub exception_if_parsed: bool,
    /// Only log the command at DEBUG level
    pub dry_run: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            print_output: false,
            exception_on_error: false,
            warning_on_error: true,
            parse_for_regex: None,
            print_output_if_parsed: false,
            print_errors_if_parsed: false,
            exception_if_parsed: false,
            dry_run: false,
        }
    }
}

impl RunOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn print_output(mut self, enable: bool) -> Self {
        self.print_output = enable;
        self
    }

    #[must_use]
    pub fn exception_on_error(mut self, enable: bool) -> Self {
        self.exception_on_error = enable;
        self
    }

    #[must_use]
    pub fn warning_on_error(mut self, enable: bool) -> Self {
        self.warning_on_error = enable;
        self
    }

    #[must_use]
    pub fn parse_for(mut self, pattern: impl Into<String>) -> Self {
        self.parse_for_regex = Some(pattern.into());
        self
    }

    #[must_use]
    pub fn print_output_if_parsed(mut self, enable: bool) -> Self {
        self.print_output_if_parsed = enable;
        self
    }

    #[must_use]
    pub fn print_errors_if_parsed(mut self, enable: bool) -> Self {
        self.print_errors_if_parsed = enable;
        self
    }

    #[must_use]
    pub fn exception_if_parsed(mut self, enable: bool) -> Self {
        self.exception_if_parsed = enable;
        self
    }

    #[must_use]
    pub fn dry_run(mut self, enable: bool) -> Self {
        self.dry_run = enable;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    pub status: i32,
    /// Output lines joined by `\n`, without a trailing newline
    pub output: String,
    /// Lines matching `parse_for_regex`, joined by `\n`; `None` without a pattern
    pub parsed: Option<String>,
}

impl RunOutput {
    pub fn success(&self) -> bool {
        self.status == 0
    }

    fn has_matches(&self) -> bool {
        self.parsed.as_deref().is_some_and(|p| !p.is_empty())
    }
}

fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }
    -1
}

/// Run a command, capture its output, and report problems through `logger`
///
/// # Example
///
/// ```no_run
/// use cmd_helper::prelude::*;
///
/// let logger = Logger::new();
/// let result = run(&logger, "make -k 2>&1", &RunOptions::new().parse_for("(?i)error")).unwrap();
/// if result.success() {
///     logger.info("build ok");
/// }
/// ```
pub fn run(
    logger: &Logger,
    command: impl Into<RunCommand>,
    options: &RunOptions,
) -> Result<RunOutput> {
    let command = command.into();
    if options.dry_run {
        logger.debug(format!("would run cmd: {}", command));
        return Ok(RunOutput {
            status: 0,
            output: String::new(),
            parsed: None,
        });
    }
    logger.debug(format!("running cmd: {}", command));

    let pattern = options
        .parse_for_regex
        .as_deref()
        .map(Regex::new)
        .transpose()?;

    let mut child = command
        .to_process()?
        .stdout(Stdio::piped())
        .spawn()
        .map_err(|e| CmdError::io_operation("starting command", command.to_string(), e))?;

    let mut lines = Vec::new();
    if let Some(stdout) = child.stdout.take() {
        let mut reader = BufReader::new(stdout);
        let mut raw = Vec::new();
        loop {
            raw.clear();
            let read = reader
                .read_until(b'\n', &mut raw)
                .map_err(|e| CmdError::io_operation("reading command output", command.to_string(), e))?;
            if read == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&raw).into_owned();
            if options.print_output {
                logger.write_stdout(line.as_str());
            }
            lines.push(line.trim_end_matches('\n').to_string());
        }
    }

    let status = child
        .wait()
        .map_err(|e| CmdError::io_operation("waiting for command", command.to_string(), e))?;
    let status = exit_code(status);
    let output = lines.join("\n");

    if status != 0 && options.exception_on_error {
        return Err(CmdError::CommandFailed {
            status,
            command: command.to_string(),
            output,
        });
    }
    if status != 0 && options.warning_on_error {
        logger.warning(format!(
            "Error {} running command: {}: {}",
            status, command, output
        ));
    }

    let parsed = pattern.map(|regex| {
        lines
            .iter()
            .filter(|line| regex.is_match(line))
            .cloned()
            .collect::<Vec<_>>()
            .join("\n")
    });
    let result = RunOutput {
        status,
        output,
        parsed,
    };

    if result.has_matches() {
        if options.print_output_if_parsed && !options.print_output {
            logger.stdout(result.output.as_str());
        }
        if options.print_errors_if_parsed {
            if let Some(parsed) = result.parsed.as_deref() {
                for line in parsed.trim().split('\n') {
                    logger.error(format!("found in command output: {}", line));
                }
            }
        }
        if options.exception_if_parsed {
            return Err(CmdError::ParsedOutput);
        }
    }

    Ok(result)
}
