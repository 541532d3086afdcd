//! Buffering e-mail digest sink

use super::smtp::{MailMessage, MailTransport};
use crate::core::{LogLevel, LogRecord, Result, Sink};
use crate::formatters::ConsoleFormatter;

/// Default number of records collected before a digest is forced out
pub const DEFAULT_MAIL_CAPACITY: usize = 8192;

/// What happens to the buffered records when the transport fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryPolicy {
    /// Drop the buffer and return the transport error from `flush`
    #[default]
    Propagate,

    /// Drop the buffer, report the failure on stderr, and return `Ok`
    Discard,

    /// Keep the buffer for the next flush and return the transport error.
    /// The capacity still applies; the oldest records go first. Until the
    /// next flush, a full buffer evicts records instead of retrying the send.
    Retain,
}

/// Collects records and mails them as one message on flush.
///
/// With a trigger level set, nothing is sent unless at least one collected
/// record reached that level; the buffer is then discarded on flush. Once
/// triggered, the sink stays triggered for its lifetime.
pub struct BufferingMailSink {
    from: String,
    to: String,
    subject: String,
    capacity: usize,
    trigger: Option<LogLevel>,
    triggered: bool,
    buffer: Vec<LogRecord>,
    formatter: ConsoleFormatter,
    transport: Box<dyn MailTransport>,
    policy: DeliveryPolicy,
    // a retained delivery failed; only flush retries it
    held: bool,
}

impl BufferingMailSink {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        subject: impl Into<String>,
        transport: impl MailTransport + 'static,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            subject: subject.into(),
            capacity: DEFAULT_MAIL_CAPACITY,
            trigger: None,
            triggered: true,
            buffer: Vec::new(),
            formatter: ConsoleFormatter::new(),
            transport: Box::new(transport),
            policy: DeliveryPolicy::default(),
            held: false,
        }
    }

    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Only send if some record is at or above `level`
    #[must_use]
    pub fn with_trigger(mut self, level: Option<LogLevel>) -> Self {
        self.trigger = level;
        self.triggered = level.is_none();
        self
    }

    #[must_use]
    pub fn with_delivery_policy(mut self, policy: DeliveryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    fn compose(&self) -> MailMessage {
        let body: String = self
            .buffer
            .iter()
            .map(|record| {
                let mut text = self.formatter.render(record);
                text.push_str(record.terminator());
                text
            })
            .collect();

        MailMessage {
            from: self.from.clone(),
            to: self.to.clone(),
            subject: self.subject.clone(),
            body,
        }
    }

    fn deliver(&mut self) -> Result<()> {
        if !self.triggered || self.buffer.is_empty() {
            self.buffer.clear();
            return Ok(());
        }

        let message = self.compose();
        match self.transport.send(&message) {
            Ok(()) => {
                self.buffer.clear();
                self.held = false;
                Ok(())
            }
            Err(e) => match self.policy {
                DeliveryPolicy::Propagate => {
                    self.buffer.clear();
                    Err(e)
                }
                DeliveryPolicy::Discard => {
                    eprintln!(
                        "[LOGGER WARNING] Discarding {} log records, mail to {} failed: {}",
                        self.buffer.len(),
                        self.to,
                        e
                    );
                    self.buffer.clear();
                    Ok(())
                }
                DeliveryPolicy::Retain => {
                    self.held = true;
                    Err(e)
                }
            },
        }
    }
}

impl Sink for BufferingMailSink {
    fn emit(&mut self, record: &LogRecord) -> Result<()> {
        if self.trigger.is_some_and(|trigger| record.level >= trigger) {
            self.triggered = true;
        }
        self.buffer.push(record.clone());

        if self.buffer.len() > self.capacity {
            let excess = self.buffer.len() - self.capacity;
            self.buffer.drain(..excess);
        }
        if self.buffer.len() >= self.capacity && !self.held {
            return self.deliver();
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.deliver()
    }

    fn name(&self) -> &str {
        "email"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CmdError;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct RecordingTransport {
        sent: Arc<Mutex<Vec<MailMessage>>>,
        attempts: Arc<Mutex<usize>>,
        fail: bool,
    }

    impl MailTransport for RecordingTransport {
        fn send(&mut self, message: &MailMessage) -> Result<()> {
            *self.attempts.lock() += 1;
            if self.fail {
                return Err(CmdError::mail("greeting", "421 unavailable"));
            }
            self.sent.lock().push(message.clone());
            Ok(())
        }
    }

    fn sink(transport: RecordingTransport) -> BufferingMailSink {
        BufferingMailSink::new("me@host", "you@host", "Report", transport)
    }

    #[test]
    fn test_untriggered_buffer_is_discarded() {
        let transport = RecordingTransport::default();
        let mut sink = sink(transport.clone())
            .with_capacity(3)
            .with_trigger(Some(LogLevel::WARNING));

        sink.emit(&LogRecord::new(LogLevel::INFO, "one")).unwrap();
        sink.emit(&LogRecord::new(LogLevel::INFO, "two")).unwrap();
        sink.flush().unwrap();

        assert!(transport.sent.lock().is_empty());
        assert_eq!(sink.buffered(), 0);
    }

    #[test]
    fn test_trigger_sends_everything_in_one_message() {
        let transport = RecordingTransport::default();
        let mut sink = sink(transport.clone())
            .with_capacity(3)
            .with_trigger(Some(LogLevel::WARNING));

        sink.emit(&LogRecord::new(LogLevel::INFO, "one")).unwrap();
        sink.emit(&LogRecord::new(LogLevel::INFO, "two")).unwrap();
        sink.emit(&LogRecord::new(LogLevel::WARNING, "three")).unwrap();
        assert!(sink.is_triggered());
        sink.flush().unwrap();

        let sent = transport.sent.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].body, "one\ntwo\nWARNING: three\n");
        assert_eq!(sent[0].subject, "Report");
    }

    #[test]
    fn test_capacity_forces_flush() {
        let transport = RecordingTransport::default();
        let mut sink = sink(transport.clone()).with_capacity(2);

        sink.emit(&LogRecord::new(LogLevel::ERROR, "a")).unwrap();
        assert!(transport.sent.lock().is_empty());
        sink.emit(&LogRecord::new(LogLevel::ERROR, "b")).unwrap();

        assert_eq!(transport.sent.lock().len(), 1);
        assert_eq!(sink.buffered(), 0);
    }

    #[test]
    fn test_stdout_chunks_keep_line_structure() {
        let transport = RecordingTransport::default();
        let mut sink = sink(transport.clone());

        sink.emit(&LogRecord::stdout("hel")).unwrap();
        sink.emit(&LogRecord::stdout("lo\n")).unwrap();
        sink.flush().unwrap();

        assert_eq!(transport.sent.lock()[0].body, "hello\n");
    }

    #[test]
    fn test_empty_buffer_sends_nothing() {
        let transport = RecordingTransport::default();
        let mut sink = sink(transport.clone());
        sink.flush().unwrap();
        assert!(transport.sent.lock().is_empty());
    }

    #[test]
    fn test_delivery_policies() {
        let failing = RecordingTransport {
            fail: true,
            ..Default::default()
        };

        let mut propagate = sink(failing.clone());
        propagate.emit(&LogRecord::new(LogLevel::ERROR, "x")).unwrap();
        assert!(propagate.flush().is_err());
        assert_eq!(propagate.buffered(), 0);

        let mut discard = sink(failing.clone()).with_delivery_policy(DeliveryPolicy::Discard);
        discard.emit(&LogRecord::new(LogLevel::ERROR, "x")).unwrap();
        assert!(discard.flush().is_ok());
        assert_eq!(discard.buffered(), 0);

        let mut retain = sink(failing)
            .with_capacity(3)
            .with_delivery_policy(DeliveryPolicy::Retain);
        retain.emit(&LogRecord::new(LogLevel::ERROR, "x")).unwrap();
        assert!(retain.flush().is_err());
        assert_eq!(retain.buffered(), 1);
    }

    #[test]
    fn test_retained_buffer_stays_bounded() {
        let failing = RecordingTransport {
            fail: true,
            ..Default::default()
        };
        let mut sink = sink(failing)
            .with_capacity(2)
            .with_delivery_policy(DeliveryPolicy::Retain);

        let _ = sink.emit(&LogRecord::new(LogLevel::ERROR, "1"));
        let _ = sink.emit(&LogRecord::new(LogLevel::ERROR, "2"));
        let _ = sink.emit(&LogRecord::new(LogLevel::ERROR, "3"));

        assert_eq!(sink.buffered(), 2);
    }

    #[test]
    fn test_retained_failure_waits_for_flush() {
        let mut failing = RecordingTransport {
            fail: true,
            ..Default::default()
        };
        let mut sink = sink(failing.clone())
            .with_capacity(3)
            .with_delivery_policy(DeliveryPolicy::Retain);

        let results: Vec<Result<()>> = (0..10)
            .map(|i| sink.emit(&LogRecord::new(LogLevel::ERROR, i.to_string())))
            .collect();
        assert_eq!(results.iter().filter(|r| r.is_err()).count(), 1);
        assert_eq!(*failing.attempts.lock(), 1);
        assert_eq!(sink.buffered(), 3);

        assert!(sink.flush().is_err());
        assert_eq!(*failing.attempts.lock(), 2);

        failing.fail = false;
        sink.transport = Box::new(failing.clone());
        sink.flush().unwrap();
        let sent = failing.sent.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].body, "ERROR: 7\nERROR: 8\nERROR: 9\n");
        drop(sent);

        sink.emit(&LogRecord::new(LogLevel::ERROR, "a")).unwrap();
        sink.emit(&LogRecord::new(LogLevel::ERROR, "b")).unwrap();
        sink.emit(&LogRecord::new(LogLevel::ERROR, "c")).unwrap();
        assert_eq!(failing.sent.lock().len(), 2);
        assert_eq!(sink.buffered(), 0);
    }
}
