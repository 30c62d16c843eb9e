//! In-memory IrMagician for development and testing without hardware.
//!
//! Activate from the CLI with `--mock` or by setting IRM_MOCK=1:
//!
//!   IRM_MOCK=1 RUST_LOG=irmagician=info irm version
//!
//! The mock parses each command line the driver writes and queues the reply
//! the firmware would send, with the same framing: CRLF lines for most
//! commands, three lines for `v`, two for `t`, and two bare hex digits for `d`.

use std::collections::VecDeque;

use crate::domain::{IrmError, IrmResult, PortConfig, SerialPortInfo};
use crate::ports::{SerialConnection, SerialFactory};

const BANKS: usize = 10;
const BANK_SIZE: usize = 64;

/// Version string reported by the mock firmware
const MOCK_VERSION: &str = "D00010";

/// Raw ADC sample the mock reports, ≈25 °C
const MOCK_RAW_TEMPERATURE: i64 = 182;

/// Factory that hands out fresh [`MockDevice`]s.
pub struct MockDeviceFactory;

impl SerialFactory for MockDeviceFactory {
    fn list_ports(&self) -> IrmResult<Vec<SerialPortInfo>> {
        Ok(vec![SerialPortInfo {
            name: "mock".to_string(),
            port_type: "Mock".to_string(),
        }])
    }

    fn open(&self, config: &PortConfig) -> IrmResult<Box<dyn SerialConnection>> {
        log::info!("[MOCK IRM] Opened {} at {} baud", config.path, config.baud_rate);
        Ok(Box::new(MockDevice::new()))
    }
}

pub struct MockDevice {
    outbox: VecDeque<u8>,
    memory: Vec<[u8; BANK_SIZE]>,
    bank: usize,
    connected: bool,
}

impl MockDevice {
    pub fn new() -> Self {
        Self {
            outbox: VecDeque::new(),
            memory: vec![[0u8; BANK_SIZE]; BANKS],
            bank: 0,
            connected: true,
        }
    }

    fn reply_line(&mut self, line: &str) {
        self.outbox.extend(line.bytes());
        self.outbox.extend(b"\r\n");
    }

    fn handle(&mut self, line: &str) -> IrmResult<()> {
        let mut fields = line.split(',');
        let tag = fields.next().unwrap_or_default();
        let args = fields
            .map(|f| f.trim().parse::<usize>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| IrmError::Serial(format!("Mock got malformed line '{line}': {e}")))?;
        let arg = |i: usize| {
            args.get(i)
                .copied()
                .ok_or_else(|| IrmError::Serial(format!("Mock got '{line}' with missing argument")))
        };

        match tag {
            "b" => {
                self.bank = arg(0)?.min(BANKS - 1);
                log::info!("[MOCK IRM] BANK → {}", self.bank);
            }
            "c" => log::info!("[MOCK IRM] CAPTURE"),
            "p" => log::info!("[MOCK IRM] PLAY"),
            "d" => {
                let value = self.memory[self.bank][arg(0)? % BANK_SIZE];
                log::info!("[MOCK IRM] DUMP {} → {value:02x}", arg(0)?);
                self.outbox.extend(format!("{value:02x}").bytes());
            }
            "w" => {
                let (pos, data) = (arg(0)? % BANK_SIZE, arg(1)?);
                self.memory[self.bank][pos] = data as u8;
                log::info!("[MOCK IRM] WRITE bank {} [{pos}] = {data}", self.bank);
            }
            "t" => {
                let raw = MOCK_RAW_TEMPERATURE.to_string();
                self.reply_line(&raw);
                self.reply_line("OK");
            }
            "v" => {
                self.reply_line("v");
                self.reply_line("OK");
                self.reply_line(MOCK_VERSION);
            }
            "i" | "e" => self.reply_line("0"),
            "k" | "l" | "m" | "n" | "r" | "s" => {
                log::info!("[MOCK IRM] {line} → OK");
                self.reply_line("OK");
            }
            other => {
                log::warn!("[MOCK IRM] unknown command '{other}'");
                self.reply_line("NG");
            }
        }
        Ok(())
    }
}

impl Default for MockDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl SerialConnection for MockDevice {
    fn write(&mut self, data: &[u8]) -> IrmResult<()> {
        let text = std::str::from_utf8(data)
            .map_err(|e| IrmError::Serial(format!("Mock got non-ASCII write: {e}")))?;
        for line in text.split("\r\n").filter(|l| !l.is_empty()) {
            self.handle(line)?;
        }
        Ok(())
    }

    fn read_line(&mut self) -> IrmResult<String> {
        let end = self
            .outbox
            .iter()
            .position(|&b| b == b'\n')
            .ok_or_else(|| IrmError::Timeout("mock device has no line queued".into()))?;
        let bytes: Vec<u8> = self.outbox.drain(..=end).collect();
        Ok(String::from_utf8_lossy(&bytes).trim().to_string())
    }

    fn read_exact(&mut self, n: usize) -> IrmResult<Vec<u8>> {
        if self.outbox.len() < n {
            return Err(IrmError::Timeout(format!(
                "mock device has {} of {n} bytes queued",
                self.outbox.len()
            )));
        }
        Ok(self.outbox.drain(..n).collect())
    }

    fn close(&mut self) -> IrmResult<()> {
        self.connected = false;
        log::info!("[MOCK IRM] Closed");
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_three_lines() {
        let mut dev = MockDevice::new();
        dev.write(b"v\r\n").unwrap();
        assert_eq!(dev.read_line().unwrap(), "v");
        assert_eq!(dev.read_line().unwrap(), "OK");
        assert_eq!(dev.read_line().unwrap(), MOCK_VERSION);
        assert!(matches!(dev.read_line(), Err(IrmError::Timeout(_))));
    }

    #[test]
    fn write_then_dump_in_selected_bank() {
        let mut dev = MockDevice::new();
        dev.write(b"b,3\r\nw,10,200\r\n").unwrap();
        dev.write(b"d,10\r\n").unwrap();
        assert_eq!(dev.read_exact(2).unwrap(), b"c8");
        dev.write(b"b,0\r\nd,10\r\n").unwrap();
        assert_eq!(dev.read_exact(2).unwrap(), b"00");
    }

    #[test]
    fn dump_reply_has_no_line_terminator() {
        let mut dev = MockDevice::new();
        dev.write(b"d,0\r\n").unwrap();
        assert!(dev.read_line().is_err());
    }

    #[test]
    fn malformed_argument_is_rejected() {
        let mut dev = MockDevice::new();
        assert!(dev.write(b"b,x\r\n").is_err());
    }
}
