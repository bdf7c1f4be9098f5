use crate::domain::event::TransactionEvent;
use crate::domain::ports::EventSink;
use crate::error::{BankError, Result};
use std::io::{BufWriter, Write};
use std::sync::{Mutex, PoisonError};

/// Event sink writing one JSON object per line.
///
/// Workers publish concurrently, so the writer sits behind a mutex. Lines go
/// into a buffer and reach the underlying writer when it fills up, on
/// `flush`, or when the sink is dropped.
pub struct JsonLinesEventSink<W: Write + Send> {
    writer: Mutex<BufWriter<W>>,
}

impl<W: Write + Send> JsonLinesEventSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(BufWriter::new(writer)),
        }
    }

    /// Flushes the buffer and returns the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .into_inner()
            .map_err(|e| BankError::IoError(e.into_error()))
    }
}

impl<W: Write + Send> EventSink for JsonLinesEventSink<W> {
    fn publish(&self, event: &TransactionEvent) {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let written = serde_json::to_writer(&mut *writer, event)
            .map_err(std::io::Error::from)
            .and_then(|()| writeln!(writer));
        if let Err(e) = written {
            tracing::error!(error = %e, "Failed to write transaction event");
        }
    }

    fn flush(&self) -> Result<()> {
        self.writer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::{Amount, Balance};
    use crate::domain::event::Outcome;
    use crate::domain::transaction::Action;
    use rust_decimal_macros::dec;

    #[test]
    fn test_writes_one_line_per_event() {
        let sink = JsonLinesEventSink::new(Vec::new());
        sink.publish(&TransactionEvent {
            client_id: 1,
            account_id: 1,
            action: Action::Withdraw,
            amount: Amount::new(dec!(2000)).unwrap(),
            status: Outcome::InsufficientFunds,
            balance: Some(Balance::new(dec!(700))),
        });
        sink.publish(&TransactionEvent {
            client_id: 1,
            account_id: 9,
            action: Action::Deposit,
            amount: Amount::new(dec!(5)).unwrap(),
            status: Outcome::NoMatchingAccount,
            balance: None,
        });

        let output = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["status"], "insufficient_funds");
        assert_eq!(first["balance"], "700");
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["status"], "no_matching_account");
    }

    /// Records how many times the sink reached the underlying writer.
    #[derive(Default)]
    struct CountingWriter {
        data: Vec<u8>,
        writes: usize,
        flushes: usize,
    }

    impl Write for CountingWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.writes += 1;
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[test]
    fn test_publish_buffers_until_flush() {
        let mut target = CountingWriter::default();
        let sink = JsonLinesEventSink::new(&mut target);
        for account_id in 1..=50 {
            sink.publish(&TransactionEvent {
                client_id: 1,
                account_id,
                action: Action::Deposit,
                amount: Amount::new(dec!(5)).unwrap(),
                status: Outcome::Deposited,
                balance: Some(Balance::new(dec!(5))),
            });
        }
        sink.flush().unwrap();
        drop(sink);

        assert_eq!(target.flushes, 1);
        assert_eq!(target.writes, 1);
        assert_eq!(String::from_utf8(target.data).unwrap().lines().count(), 50);
    }
}
