//! Error types for cmd_helper

pub type Result<T> = std::result::Result<T, CmdError>;

#[derive(Debug, thiserror::Error)]
pub enum CmdError {
    /// User-facing error, reported without any source chain
    #[error("{0}")]
    Message(String),

    /// Level name that is neither a known severity nor an integer
    #[error("illegal loglevel {name}")]
    UnknownLevel { name: String },

    /// Timestamp template rejected by the strftime parser
    #[error("Invalid timestamp format '{format}'")]
    InvalidTimestampFormat { format: String },

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// SMTP server answered with an unexpected reply
    #[error("Mail delivery failed during {stage}: {reply}")]
    Mail { stage: String, reply: String },

    /// Subprocess exited with a non-zero status
    #[error("Error {status} running command: {command}: {output}")]
    CommandFailed {
        status: i32,
        command: String,
        output: String,
    },

    /// Subprocess output matched the error pattern
    #[error("Errors found in command output - please check")]
    ParsedOutput,

    /// User declined a confirmation prompt
    #[error("Program execution aborted by user")]
    Aborted { exit_code: i32 },

    /// Invalid option value or inconsistent helper setup
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Option parsing failed
    #[error(transparent)]
    Clap(#[from] clap::Error),

    /// Output regex did not compile
    #[error("Invalid regular expression: {0}")]
    Regex(#[from] regex::Error),
}

impl CmdError {
    /// Create a user-facing error
    pub fn message<S: Into<String>>(msg: S) -> Self {
        CmdError::Message(msg.into())
    }

    /// Create an unknown level error
    pub fn unknown_level(name: impl Into<String>) -> Self {
        CmdError::UnknownLevel { name: name.into() }
    }

    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        CmdError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a mail protocol error
    pub fn mail(stage: impl Into<String>, reply: impl Into<String>) -> Self {
        CmdError::Mail {
            stage: stage.into(),
            reply: reply.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        CmdError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Process exit status to use when this error terminates the program
    pub fn exit_code(&self) -> i32 {
        match self {
            CmdError::Aborted { exit_code } => *exit_code,
            CmdError::Clap(e) => e.exit_code(),
            _ => 1,
        }
    }

    /// Whether this error carries its full explanation in its message
    pub fn is_user_facing(&self) -> bool {
        matches!(self, CmdError::Message(_) | CmdError::Aborted { .. })
    }

    /// Whether this is an IO error caused by a closed downstream pipe
    pub fn is_broken_pipe(&self) -> bool {
        match self {
            CmdError::Io(e) | CmdError::IoOperation { source: e, .. } => {
                e.kind() == std::io::ErrorKind::BrokenPipe
            }
            _ => false,
        }
    }
}
