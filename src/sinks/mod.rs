//! Sink implementations

pub mod file;
pub mod mail;
pub mod smtp;
pub mod stream;

pub use file::FileSink;
pub use mail::{BufferingMailSink, DeliveryPolicy, DEFAULT_MAIL_CAPACITY};
pub use smtp::{MailMessage, MailTransport, SmtpTransport};
pub use stream::StreamSink;

pub use crate::core::Sink;
