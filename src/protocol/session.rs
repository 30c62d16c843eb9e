//! ProtocolSession: owns a serial connection and runs one exchange at a time.
//!
//! Pure translation lives in `encode` / `decode`. The session only writes
//! the encoded line and reads exactly what the command's response shape
//! calls for. The protocol carries no request ids, so a partially consumed
//! reply would misalign every later command; `&mut self` keeps exchanges
//! strictly sequential.

use crate::domain::IrmResult;
use crate::ports::SerialConnection;

use super::{decode, encode_command, Command, RawReply, ResponseShape};

/// Owns a serial connection and executes commands against the IrMagician.
pub struct ProtocolSession {
    serial: Box<dyn SerialConnection>,
}

impl ProtocolSession {
    pub fn new(serial: Box<dyn SerialConnection>) -> Self {
        Self { serial }
    }

    /// Send a command and return its payload, if the command has one.
    ///
    /// Arguments are validated before anything is written. Read errors,
    /// including timeouts, are returned as-is; nothing is retried.
    pub fn execute(&mut self, cmd: &Command) -> IrmResult<Option<String>> {
        let wire = encode_command(cmd)?;
        log::debug!("IRM TX: {}", wire.trim_end());

        self.serial.write(wire.as_bytes())?;

        let raw = self.read_reply(cmd.spec().shape)?;
        decode(cmd.spec().shape, raw)
    }

    /// Read exactly what `shape` calls for.
    fn read_reply(&mut self, shape: ResponseShape) -> IrmResult<RawReply> {
        match shape {
            ResponseShape::None => Ok(RawReply::Empty),
            ResponseShape::Bytes(n) => {
                let bytes = self.serial.read_exact(n)?;
                log::debug!("IRM RX: {:?}", String::from_utf8_lossy(&bytes));
                Ok(RawReply::Bytes(bytes))
            }
            _ => {
                let mut lines = Vec::with_capacity(shape.line_count());
                for _ in 0..shape.line_count() {
                    let line = self.serial.read_line()?;
                    log::debug!("IRM RX: {line}");
                    lines.push(line);
                }
                Ok(RawReply::Lines(lines))
            }
        }
    }

    pub fn is_connected(&self) -> bool {
        self.serial.is_connected()
    }
}

impl Drop for ProtocolSession {
    fn drop(&mut self) {
        if let Err(e) = self.serial.close() {
            log::warn!("Failed to close serial port: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IrmError;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    // ---------------------------------------------------------------------------
    // MockSerial for ProtocolSession tests
    // ---------------------------------------------------------------------------

    #[derive(Default)]
    struct Calls {
        writes: Vec<String>,
        line_reads: usize,
        byte_reads: Vec<usize>,
    }

    struct MockSerial {
        calls: Arc<Mutex<Calls>>,
        lines: VecDeque<String>,
        bytes: Vec<u8>,
    }

    impl SerialConnection for MockSerial {
        fn write(&mut self, data: &[u8]) -> IrmResult<()> {
            self.calls
                .lock()
                .unwrap()
                .writes
                .push(String::from_utf8_lossy(data).into());
            Ok(())
        }
        fn read_line(&mut self) -> IrmResult<String> {
            self.calls.lock().unwrap().line_reads += 1;
            self.lines
                .pop_front()
                .ok_or_else(|| IrmError::Timeout("no line".into()))
        }
        fn read_exact(&mut self, n: usize) -> IrmResult<Vec<u8>> {
            self.calls.lock().unwrap().byte_reads.push(n);
            Ok(self.bytes.drain(..n.min(self.bytes.len())).collect())
        }
        fn close(&mut self) -> IrmResult<()> {
            Ok(())
        }
        fn is_connected(&self) -> bool {
            true
        }
    }

    fn make_session(lines: &[&str], bytes: &[u8]) -> (ProtocolSession, Arc<Mutex<Calls>>) {
        let calls = Arc::new(Mutex::new(Calls::default()));
        let mock = MockSerial {
            calls: Arc::clone(&calls),
            lines: lines.iter().map(|s| s.to_string()).collect(),
            bytes: bytes.to_vec(),
        };
        (ProtocolSession::new(Box::new(mock)), calls)
    }

    #[test]
    fn write_only_command_reads_nothing() {
        let (mut session, calls) = make_session(&["unused"], b"");
        assert_eq!(session.execute(&Command::Capture).unwrap(), None);
        let calls = calls.lock().unwrap();
        assert_eq!(calls.writes, ["c\r\n"]);
        assert_eq!(calls.line_reads, 0);
        assert!(calls.byte_reads.is_empty());
    }

    #[test]
    fn version_consumes_three_lines() {
        let (mut session, calls) = make_session(&["v", "OK", "D00010", "extra"], b"");
        let reply = session.execute(&Command::Version).unwrap();
        assert_eq!(reply.as_deref(), Some("D00010"));
        assert_eq!(calls.lock().unwrap().line_reads, 3);
    }

    #[test]
    fn temperature_consumes_two_lines() {
        let (mut session, calls) = make_session(&["182", "OK", "extra"], b"");
        let reply = session.execute(&Command::Temperature).unwrap();
        assert_eq!(reply.as_deref(), Some("182"));
        assert_eq!(calls.lock().unwrap().line_reads, 2);
    }

    #[test]
    fn dump_reads_two_bytes_not_a_line() {
        let (mut session, calls) = make_session(&["never"], b"3f");
        let reply = session.execute(&Command::Dump(0)).unwrap();
        assert_eq!(reply.as_deref(), Some("3f"));
        let calls = calls.lock().unwrap();
        assert_eq!(calls.byte_reads, [2]);
        assert_eq!(calls.line_reads, 0);
    }

    #[test]
    fn rejected_argument_never_written() {
        let (mut session, calls) = make_session(&[], b"");
        assert!(matches!(
            session.execute(&Command::SetBank(10)),
            Err(IrmError::OutOfRange(_))
        ));
        assert!(calls.lock().unwrap().writes.is_empty());
    }

    #[test]
    fn timeout_propagates() {
        let (mut session, _) = make_session(&[], b"");
        assert!(matches!(
            session.execute(&Command::Statics),
            Err(IrmError::Timeout(_))
        ));
    }
}
