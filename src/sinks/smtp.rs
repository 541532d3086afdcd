//! Mail transport used by the buffering mail sink
//!
//! [`SmtpTransport`] is a minimal blocking SMTP client meant for a local mail
//! relay: it connects for every message, sends it, and disconnects.

use crate::core::{CmdError, Result};
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Timeout for connecting, reading replies and writing commands
pub const SMTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl MailMessage {
    /// Headers and body as sent after `DATA`, with CRLF line endings and
    /// dot-stuffing applied. Does not include the terminating `.` line.
    pub fn to_wire(&self) -> String {
        let mut wire = format!(
            "From: {}\r\nTo: {}\r\nSubject: {}\r\nMIME-Version: 1.0\r\n\
             Content-Type: text/plain; charset=\"utf-8\"\r\n\
             Content-Transfer-Encoding: 8bit\r\n\r\n",
            self.from, self.to, self.subject
        );
        for line in self.body.lines() {
            if line.starts_with('.') {
                wire.push('.');
            }
            wire.push_str(line);
            wire.push_str("\r\n");
        }
        wire
    }
}

/// Delivers a composed message
pub trait MailTransport: Send {
    fn send(&mut self, message: &MailMessage) -> Result<()>;
}

impl<T: MailTransport + ?Sized> MailTransport for Box<T> {
    fn send(&mut self, message: &MailMessage) -> Result<()> {
        (**self).send(message)
    }
}

pub struct SmtpTransport {
    address: String,
    helo_name: String,
    timeout: Duration,
}

impl SmtpTransport {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            helo_name: crate::helper::host_name(),
            timeout: SMTP_TIMEOUT,
        }
    }

    /// Relay on the local host, port 25
    pub fn localhost() -> Self {
        Self::new("localhost:25")
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    fn connect(&self) -> Result<TcpStream> {
        let mut last_error = None;
        let addrs = self.address.to_socket_addrs().map_err(|e| {
            CmdError::io_operation("resolving mail relay", self.address.clone(), e)
        })?;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(stream) => {
                    stream.set_read_timeout(Some(self.timeout))?;
                    stream.set_write_timeout(Some(self.timeout))?;
                    return Ok(stream);
                }
                Err(e) => last_error = Some(e),
            }
        }
        let error = last_error.unwrap_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "no address for mail relay")
        });
        Err(CmdError::io_operation(
            "connecting to mail relay",
            self.address.clone(),
            error,
        ))
    }
}

impl MailTransport for SmtpTransport {
    fn send(&mut self, message: &MailMessage) -> Result<()> {
        let stream = self.connect()?;
        let mut session = SmtpSession {
            reader: BufReader::new(stream.try_clone()?),
            writer: stream,
        };

        session.expect("greeting", 2)?;
        session.command(&format!("HELO {}", self.helo_name), "HELO", 2)?;
        session.command(&format!("MAIL FROM:<{}>", message.from), "MAIL FROM", 2)?;
        session.command(&format!("RCPT TO:<{}>", message.to), "RCPT TO", 2)?;
        session.command("DATA", "DATA", 3)?;
        session.write_raw(&message.to_wire())?;
        session.command(".", "message body", 2)?;
        session.command("QUIT", "QUIT", 2)?;
        Ok(())
    }
}

struct SmtpSession {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

impl SmtpSession {
    fn write_raw(&mut self, text: &str) -> Result<()> {
        self.writer
            .write_all(text.as_bytes())
            .map_err(|e| CmdError::io_operation("talking to mail relay", "write failed", e))
    }

    fn command(&mut self, line: &str, stage: &str, expected_class: u16) -> Result<()> {
        self.write_raw(&format!("{}\r\n", line))?;
        self.expect(stage, expected_class)
    }

    /// Read a (possibly multi-line) reply and check its first digit
    fn expect(&mut self, stage: &str, expected_class: u16) -> Result<()> {
        let mut reply = String::new();
        loop {
            let mut line = String::new();
            let read = self
                .reader
                .read_line(&mut line)
                .map_err(|e| CmdError::io_operation("talking to mail relay", "read failed", e))?;
            if read == 0 {
                return Err(CmdError::mail(stage, "connection closed"));
            }
            let line = line.trim_end();
            reply.push_str(line);
            // "250-..." continues, "250 ..." ends the reply
            if line.as_bytes().get(3) != Some(&b'-') {
                break;
            }
            reply.push(' ');
        }

        let code: u16 = reply
            .get(..3)
            .and_then(|digits| digits.parse().ok())
            .ok_or_else(|| CmdError::mail(stage, reply.clone()))?;
        if code / 100 != expected_class {
            return Err(CmdError::mail(stage, reply));
        }
        Ok(())
    }
}
