//! Serial port traits
//!
//! Split into two traits:
//! - `SerialFactory`: lists and opens ports
//! - `SerialConnection`: line and fixed-size I/O on an open port

use crate::domain::{IrmResult, PortConfig, SerialPortInfo};

/// Factory for creating serial connections.
///
/// Takes `&self` so tests can hand the driver a factory that records what it
/// opened.
pub trait SerialFactory {
    /// List available serial ports on the system
    fn list_ports(&self) -> IrmResult<Vec<SerialPortInfo>>;

    /// Open the configured port, returning a boxed connection
    fn open(&self, config: &PortConfig) -> IrmResult<Box<dyn SerialConnection>>;
}

/// Trait for an open serial port connection.
/// Only requires `Send` (not `Sync`); the caller serializes exchanges.
pub trait SerialConnection: Send {
    /// Write all bytes to the port
    fn write(&mut self, data: &[u8]) -> IrmResult<()>;

    /// Read up to and including the next `\n`, returning the line with
    /// surrounding whitespace and CRLF trimmed. Fails with `Timeout` if the
    /// terminator does not arrive within the port timeout.
    fn read_line(&mut self) -> IrmResult<String>;

    /// Read exactly `n` bytes, ignoring line terminators.
    fn read_exact(&mut self, n: usize) -> IrmResult<Vec<u8>>;

    /// Close the connection
    fn close(&mut self) -> IrmResult<()>;

    /// Check if the port is still connected
    fn is_connected(&self) -> bool;
}
