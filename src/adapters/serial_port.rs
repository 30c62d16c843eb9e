//! Serial port adapter using the `serialport` crate
//!
//! Implements `SerialFactory` and `SerialConnection` traits.

use std::io::{self, Read, Write};

use crate::domain::{IrmError, IrmResult, PortConfig, SerialPortInfo};
use crate::ports::{SerialConnection, SerialFactory};

/// Longest reply line accepted before giving up on finding `\n`.
const MAX_LINE_LEN: usize = 256;

/// Zero-sized factory for creating serial port connections.
pub struct SerialPortFactory;

impl SerialFactory for SerialPortFactory {
    fn list_ports(&self) -> IrmResult<Vec<SerialPortInfo>> {
        let ports = serialport::available_ports()
            .map_err(|e| IrmError::Serial(format!("Failed to list ports: {e}")))?;

        Ok(ports
            .into_iter()
            .map(|p| {
                let port_type = match &p.port_type {
                    serialport::SerialPortType::UsbPort(info) => {
                        format!("USB ({:04X}:{:04X})", info.vid, info.pid)
                    }
                    serialport::SerialPortType::PciPort => "PCI".to_string(),
                    serialport::SerialPortType::BluetoothPort => "Bluetooth".to_string(),
                    serialport::SerialPortType::Unknown => "Native".to_string(),
                };
                SerialPortInfo {
                    name: p.port_name,
                    port_type,
                }
            })
            .collect())
    }

    fn open(&self, config: &PortConfig) -> IrmResult<Box<dyn SerialConnection>> {
        let serial = serialport::new(&config.path, config.baud_rate)
            .timeout(config.timeout())
            .open()
            .map_err(|e| IrmError::Serial(format!("Failed to open {}: {e}", config.path)))?;

        log::info!("Opened {} at {} baud", config.path, config.baud_rate);

        Ok(Box::new(SerialPortConnection {
            port: serial,
            connected: true,
        }))
    }
}

/// An open serial port connection wrapping the `serialport` crate.
pub struct SerialPortConnection {
    port: Box<dyn serialport::SerialPort>,
    connected: bool,
}

impl SerialPortConnection {
    fn read_byte(&mut self, waiting_for: &str) -> IrmResult<u8> {
        let mut byte = [0u8; 1];
        match self.port.read(&mut byte) {
            Ok(1) => Ok(byte[0]),
            Ok(_) => Err(IrmError::Timeout(format!("no data while reading {waiting_for}"))),
            Err(e) if e.kind() == io::ErrorKind::TimedOut => {
                Err(IrmError::Timeout(format!("no data while reading {waiting_for}")))
            }
            Err(e) => Err(IrmError::Serial(format!("Read failed: {e}"))),
        }
    }
}

impl SerialConnection for SerialPortConnection {
    fn write(&mut self, data: &[u8]) -> IrmResult<()> {
        self.port
            .write_all(data)
            .and_then(|_| self.port.flush())
            .map_err(|e| IrmError::Serial(format!("Write failed: {e}")))
    }

    fn read_line(&mut self) -> IrmResult<String> {
        let mut buf: Vec<u8> = Vec::with_capacity(32);
        loop {
            let byte = self.read_byte("a line")?;
            if byte == b'\n' {
                break;
            }
            buf.push(byte);
            if buf.len() > MAX_LINE_LEN {
                return Err(IrmError::Decode(format!(
                    "No line terminator within {MAX_LINE_LEN} bytes"
                )));
            }
        }
        let line = std::str::from_utf8(&buf)
            .map_err(|e| IrmError::Decode(format!("Invalid UTF-8 response: {e}")))?;
        Ok(line.trim().to_string())
    }

    fn read_exact(&mut self, n: usize) -> IrmResult<Vec<u8>> {
        let mut buf = Vec::with_capacity(n);
        while buf.len() < n {
            let byte = self.read_byte(&format!("{n} bytes"))?;
            buf.push(byte);
        }
        Ok(buf)
    }

    fn close(&mut self) -> IrmResult<()> {
        self.connected = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}
