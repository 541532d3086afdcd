//! Command-line program scaffolding: standard options plus logging setup
//!
//! [`CmdHelper`] owns a [`Logger`] with console sinks from the start, so
//! messages logged before option parsing already reach the screen. Parsing the
//! command line then adds the log file and e-mail sinks and sets the console
//! verbosity.

use crate::command_line::{cmd_line, expand_vars};
use crate::core::{
    CmdError, FailurePolicy, LevelFilter, LogLevel, Logger, Result, SinkConfig, SinkId,
    TimestampFormat,
};
use crate::redirect::LogWriter;
use crate::sinks::{BufferingMailSink, FileSink, MailTransport, SmtpTransport, StreamSink};
use clap::{Arg, ArgAction, ArgMatches};
use std::ffi::OsString;
use std::io::{self, Write};
use std::sync::Arc;

/// Host name used in mail sender addresses and subjects
pub fn host_name() -> String {
    hostname::get()
        .map(|name| name.to_string_lossy().into_owned())
        .ok()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}

/// Login name of the current user
pub fn user_name() -> String {
    ["USER", "LOGNAME", "USERNAME"]
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|name| !name.is_empty()))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Which standard options a [`CmdHelper`] offers, and their defaults
#[derive(Debug, Clone)]
pub struct HelperConfig {
    name: String,
    version: Option<String>,
    description: Option<String>,
    epilog: Option<String>,
    redirect_stdout: bool,
    separate_stderr: bool,
    has_log_file: bool,
    has_email: bool,
    has_batch: bool,
    has_dry_run: bool,
    colors: bool,
    log_file: String,
    log_separator: Option<String>,
    log_timestamp_fmt: Option<String>,
}

impl HelperConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            description: None,
            epilog: None,
            redirect_stdout: true,
            separate_stderr: true,
            has_log_file: true,
            has_email: true,
            has_batch: false,
            has_dry_run: false,
            colors: false,
            log_file: String::new(),
            log_separator: None,
            log_timestamp_fmt: None,
        }
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn epilog(mut self, epilog: impl Into<String>) -> Self {
        self.epilog = Some(epilog.into());
        self
    }

    /// Send [`CmdHelper::out`] through the logger at `STDOUT` level (default)
    pub fn redirect_stdout(mut self, enable: bool) -> Self {
        self.redirect_stdout = enable;
        self
    }

    /// Write everything except standard output to stderr (default)
    pub fn separate_stderr(mut self, enable: bool) -> Self {
        self.separate_stderr = enable;
        self
    }

    pub fn has_log_file(mut self, enable: bool) -> Self {
        self.has_log_file = enable;
        self
    }

    pub fn has_email(mut self, enable: bool) -> Self {
        self.has_email = enable;
        self
    }

    pub fn has_batch(mut self, enable: bool) -> Self {
        self.has_batch = enable;
        self
    }

    pub fn has_dry_run(mut self, enable: bool) -> Self {
        self.has_dry_run = enable;
        self
    }

    /// Colour log messages on the error stream (needs the `console` feature)
    pub fn colors(mut self, enable: bool) -> Self {
        self.colors = enable;
        self
    }

    /// Default log file; `$VAR` references are expanded
    pub fn log_file(mut self, path: impl Into<String>) -> Self {
        self.log_file = path.into();
        self
    }

    pub fn log_separator(mut self, separator: impl Into<String>) -> Self {
        self.log_separator = Some(separator.into());
        self
    }

    pub fn log_timestamp_fmt(mut self, format: impl Into<String>) -> Self {
        self.log_timestamp_fmt = Some(format.into());
        self
    }

    fn build_command(&self) -> clap::Command {
        let mut command = clap::Command::new(self.name.clone()).disable_version_flag(true);
        if let Some(description) = &self.description {
            command = command.about(description.clone());
        }
        if let Some(epilog) = &self.epilog {
            command = command.after_help(epilog.clone());
        }
        if let Some(version) = &self.version {
            command = command.version(version.clone()).arg(
                Arg::new("version")
                    .long("version")
                    .action(ArgAction::Version)
                    .help("show program's version number and exit"),
            );
        }

        command = command
            .arg(flag("verbose", "verbose output").short('v'))
            .arg(flag("debug", "debugging output"));
        if self.has_dry_run {
            command = command.arg(flag(
                "dryrun",
                "only show what would be done without --dryrun",
            ));
        }
        if self.has_batch {
            command = command.arg(flag("batch", "batch mode (skips confirmations)"));
        }

        if self.has_log_file {
            let mut logfile = value("logfile", "PATH").help(format!(
                "write logging information to this file (default: {})",
                self.log_file
            ));
            let default_log_file = expand_vars(&self.log_file);
            if !default_log_file.is_empty() {
                logfile = logfile.default_value(default_log_file);
            }

            let mut separator = value("logseparator", "TEXT")
                .help("message to write to logfile at beginning of new log");
            if let Some(default) = &self.log_separator {
                separator = separator.default_value(default.clone());
            }

            let mut timestamp = value("logtimestampfmt", "FMT")
                .help("timestamp format string (strftime, plus {level} and {source})");
            if let Some(default) = &self.log_timestamp_fmt {
                timestamp = timestamp.default_value(default.clone());
            }

            command = command
                .arg(flag("noscreen", "disable logging output to screen"))
                .arg(logfile)
                .arg(
                    value("loglevel", "LEVEL")
                        .help("logging level for logfile (default: INFO or DEBUG)"),
                )
                .arg(separator)
                .arg(timestamp);
        }

        if self.has_email {
            command = command
                .arg(value("emailto", "ADDR").help("email address receiving any log messages"))
                .arg(value("emailsubject", "TEXT").help("subject for log e-mails"))
                .arg(
                    value("emaillevel", "LEVEL")
                        .default_value("WARNING")
                        .help("logging level for e-mails (default: WARNING)"),
                )
                .arg(
                    value("emailtriglevel", "LEVEL")
                        .help("trigger level for sending e-mails (default: None)"),
                );
        }
        command
    }
}

fn flag(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id).long(id).action(ArgAction::SetTrue).help(help)
}

fn value(id: &'static str, value_name: &'static str) -> Arg {
    Arg::new(id).long(id).value_name(value_name).action(ArgAction::Set)
}

/// Values of the standard options after parsing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    pub verbose: bool,
    pub debug: bool,
    pub dry_run: bool,
    pub batch: bool,
    pub no_screen: bool,
    pub log_file: Option<String>,
    /// Effective file log level name; filled in with `INFO`/`DEBUG` when a log file is used
    pub log_level: Option<String>,
    pub log_separator: Option<String>,
    pub log_timestamp_fmt: Option<String>,
    pub email_to: Option<String>,
    pub email_subject: Option<String>,
    pub email_level: Option<String>,
    pub email_trigger_level: Option<String>,
}

impl Options {
    fn from_matches(matches: &ArgMatches) -> Self {
        let get_flag = |id: &str| {
            matches
                .try_get_one::<bool>(id)
                .ok()
                .flatten()
                .copied()
                .unwrap_or(false)
        };
        let get_value = |id: &str| {
            matches
                .try_get_one::<String>(id)
                .ok()
                .flatten()
                .filter(|value| !value.is_empty())
                .cloned()
        };

        Self {
            verbose: get_flag("verbose"),
            debug: get_flag("debug"),
            dry_run: get_flag("dryrun"),
            batch: get_flag("batch"),
            no_screen: get_flag("noscreen"),
            log_file: get_value("logfile"),
            log_level: get_value("loglevel"),
            log_separator: get_value("logseparator"),
            log_timestamp_fmt: get_value("logtimestampfmt"),
            email_to: get_value("emailto"),
            email_subject: get_value("emailsubject"),
            email_level: get_value("emaillevel"),
            email_trigger_level: get_value("emailtriglevel"),
        }
    }

    /// Console threshold selected by `--verbose`, `--debug` and `--noscreen`
    pub fn screen_level(&self) -> LogLevel {
        if self.no_screen {
            LogLevel::OFF
        } else if self.debug {
            LogLevel::DEBUG
        } else if self.verbose {
            LogLevel::INFO
        } else {
            LogLevel::STDOUT
        }
    }
}

/// Standard output of a helper-based program
pub enum Output<'a> {
    Logged(LogWriter<'a>),
    Direct(io::Stdout),
}

impl Write for Output<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Logged(writer) => writer.write(buf),
            Output::Direct(stdout) => stdout.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Logged(writer) => writer.flush(),
            Output::Direct(stdout) => stdout.flush(),
        }
    }
}

/// Option parsing and logging setup for a command-line program.
///
/// # Example
///
/// ```no_run
/// use cmd_helper::prelude::*;
/// use clap::Arg;
///
/// let mut helper = CmdHelper::new(HelperConfig::new("backup").version("0.3.0"));
/// helper.arg(Arg::new("target").required(true));
/// let matches = helper.parse().unwrap();
///
/// let logger = helper.logger();
/// logger.debug("start processing");
/// logger.info(format!("target {}", matches.get_one::<String>("target").unwrap()));
/// helper.finish().unwrap();
/// ```
pub struct CmdHelper {
    config: HelperConfig,
    command: clap::Command,
    logger: Arc<Logger>,
    console: SinkId,
    errors: Option<SinkId>,
    file: Option<SinkId>,
    email: Option<SinkId>,
    transport: Option<Box<dyn MailTransport>>,
    options: Options,
}

impl CmdHelper {
    pub fn new(config: HelperConfig) -> Self {
        Self::with_streams(config, io::stdout(), io::stderr())
    }

    /// Like [`CmdHelper::new`], with explicit console streams
    pub fn with_streams(
        config: HelperConfig,
        stdout: impl Write + Send + 'static,
        stderr: impl Write + Send + 'static,
    ) -> Self {
        let logger = Arc::new(Logger::new());

        let mut console_config =
            SinkConfig::new(LogLevel::STDOUT).with_failure_policy(FailurePolicy::Abort);
        if config.separate_stderr {
            console_config = console_config.with_filter(LevelFilter::pass_only([LogLevel::STDOUT]));
        }
        let console = logger.add_sink(StreamSink::new("stdout", stdout), console_config);

        let errors = config.separate_stderr.then(|| {
            logger.add_sink(
                StreamSink::new("stderr", stderr).with_colors(config.colors),
                SinkConfig::new(LogLevel::STDOUT)
                    .with_filter(LevelFilter::suppress([LogLevel::STDOUT])),
            )
        });

        Self {
            command: config.build_command(),
            config,
            logger,
            console,
            errors,
            file: None,
            email: None,
            transport: None,
            options: Options::default(),
        }
    }

    /// Deliver e-mail digests through `transport` instead of the local SMTP relay
    #[must_use]
    pub fn with_mail_transport(mut self, transport: impl MailTransport + 'static) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }

    /// Add a program-specific argument or option
    pub fn arg(&mut self, arg: Arg) -> &mut Self {
        let command = std::mem::take(&mut self.command);
        self.command = command.arg(arg);
        self
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Standard output of the program, routed through the logger unless
    /// redirection was disabled
    pub fn out(&self) -> Output<'_> {
        if self.config.redirect_stdout {
            Output::Logged(self.logger.stdout_writer())
        } else {
            Output::Direct(io::stdout())
        }
    }

    /// Parse the process arguments and configure logging.
    ///
    /// `--help`, `--version` and usage errors print their message and exit the
    /// process, like any clap-based program.
    pub fn parse(&mut self) -> Result<ArgMatches> {
        match self.try_parse_from(std::env::args_os()) {
            Err(CmdError::Clap(e)) => e.exit(),
            other => other,
        }
    }

    /// Parse `args` (program name first) and configure logging
    pub fn try_parse_from<I, T>(&mut self, args: I) -> Result<ArgMatches>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let matches = self.command.try_get_matches_from_mut(args.iter().cloned())?;
        let words: Vec<String> = args
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();

        self.options = Options::from_matches(&matches);
        self.setup_logging(&words)?;
        Ok(matches)
    }

    fn setup_logging(&mut self, words: &[String]) -> Result<()> {
        // a repeated parse replaces the sinks of the previous one
        for id in [self.file.take(), self.email.take()].into_iter().flatten() {
            self.logger.remove_sink(id);
        }
        self.setup_log_file()?;

        // Only the file sink is open at this point; the console still sits at
        // STDOUT, so the session header stays off the screen.
        self.logger.info("");
        if let Some(separator) = &self.options.log_separator {
            self.logger.info(separator.as_str());
        }
        self.logger.info(cmd_line(words, false));
        self.logger.info("");

        self.setup_email(words);

        let screen = self.options.screen_level();
        self.logger.set_threshold(self.console, screen);
        if let Some(errors) = self.errors {
            self.logger.set_threshold(errors, screen);
        }
        Ok(())
    }

    fn setup_log_file(&mut self) -> Result<()> {
        let Some(path) = self.options.log_file.clone() else {
            return Ok(());
        };

        let default_level = if self.options.debug { "DEBUG" } else { "INFO" };
        let level_name = self
            .options
            .log_level
            .get_or_insert_with(|| default_level.to_string())
            .clone();

        let mut sink = FileSink::new(path)?;
        let mut bad_timestamp = None;
        if let Some(template) = &self.options.log_timestamp_fmt {
            match TimestampFormat::parse(template) {
                Ok(timestamp) => sink = sink.with_timestamp(timestamp),
                Err(e) => bad_timestamp = Some(e),
            }
        }

        let level = LogLevel::resolve(&level_name);
        let threshold = level.as_ref().copied().unwrap_or(LogLevel::INFO);
        self.file = Some(self.logger.add_sink(sink, SinkConfig::new(threshold)));

        if level.is_err() {
            self.logger.error(format!("illegal loglevel: {}", level_name));
        }
        if let Some(e) = bad_timestamp {
            self.logger.error(e.to_string());
        }
        Ok(())
    }

    fn setup_email(&mut self, words: &[String]) {
        let Some(to) = self.options.email_to.clone() else {
            return;
        };

        let host = host_name();
        let from = format!("{}@{}", user_name(), host);
        let subject = self
            .options
            .email_subject
            .clone()
            .unwrap_or_else(|| format!("Report from {} ({})", cmd_line(words, true), host));

        let trigger = match self.options.email_trigger_level.as_deref() {
            Some(name) => match LogLevel::resolve(name) {
                Ok(level) => Some(level),
                Err(_) => {
                    self.logger
                        .error(format!("illegal email trigger level {}", name));
                    None
                }
            },
            None => None,
        };

        let transport = self
            .transport
            .take()
            .unwrap_or_else(|| Box::new(SmtpTransport::localhost()) as Box<dyn MailTransport>);
        let sink = BufferingMailSink::new(from, to, subject, transport).with_trigger(trigger);

        let level_name = self
            .options
            .email_level
            .clone()
            .unwrap_or_else(|| "WARNING".to_string());
        let level = LogLevel::resolve(&level_name);
        let threshold = level.as_ref().copied().unwrap_or(LogLevel::WARNING);
        self.email = Some(self.logger.add_sink(sink, SinkConfig::new(threshold)));

        if level.is_err() {
            self.logger.error(format!("illegal emaillevel {}", level_name));
        }
    }

    /// Sink handles, for programs that adjust routing after parsing
    pub fn console_sink(&self) -> SinkId {
        self.console
    }

    pub fn error_sink(&self) -> Option<SinkId> {
        self.errors
    }

    pub fn file_sink(&self) -> Option<SinkId> {
        self.file
    }

    pub fn email_sink(&self) -> Option<SinkId> {
        self.email
    }

    /// Flush all sinks, sending any pending e-mail digest
    pub fn finish(&self) -> Result<()> {
        self.logger.flush()
    }
}

/// Log `err` at ERROR level and, if `abort` is set, exit with its exit code.
///
/// With `debug` set, the chain of underlying causes is logged at DEBUG first,
/// except for plain user-facing messages.
pub fn handle_error(logger: &Logger, err: &CmdError, debug: bool, abort: bool) {
    if debug && !err.is_user_facing() {
        logger.debug(format!("{:?}", err));
        let mut source = std::error::Error::source(err);
        while let Some(cause) = source {
            logger.debug(format!("caused by: {}", cause));
            source = std::error::Error::source(cause);
        }
    }
    logger.error(err.to_string());
    if abort {
        exit(logger, err.exit_code());
    }
}

/// Log `message` at ERROR level and exit with `exit_code`
pub fn abort(logger: &Logger, message: impl Into<String>, exit_code: i32) -> ! {
    logger.error(message);
    exit(logger, exit_code)
}

fn exit(logger: &Logger, code: i32) -> ! {
    // process::exit skips destructors, so buffered sinks are flushed here
    if let Err(e) = logger.flush() {
        eprintln!("[LOGGER ERROR] Failed to flush before exit: {}", e);
    }
    std::process::exit(code)
}
