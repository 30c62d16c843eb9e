//! IrMagician driver: one method per firmware command.
//!
//! The driver starts `Disconnected` and moves to `Connected` on the first
//! successful [`IrMagician::connect`]. Every protocol method fails with
//! [`IrmError::NotConnected`] until then. There is no disconnect; the port is
//! closed when the driver is dropped.

use crate::adapters::serial_port::SerialPortFactory;
use crate::domain::{
    current_platform, resolve, IrmError, IrmResult, PortConfig, TemperatureReading,
};
use crate::ports::SerialFactory;
use crate::protocol::{Command, ProtocolSession};

enum ConnectionState {
    Disconnected,
    Connected(ProtocolSession),
}

/// Driver for one IrMagician.
///
/// Not internally synchronized: wrap it in a `Mutex` to share it between
/// threads.
pub struct IrMagician<F: SerialFactory = SerialPortFactory> {
    config: PortConfig,
    factory: F,
    state: ConnectionState,
}

impl IrMagician<SerialPortFactory> {
    /// Build a driver for `port`, or for this platform's default device node.
    pub fn new(port: Option<&str>) -> IrmResult<Self> {
        let config = resolve(port, current_platform())?;
        Ok(Self::with_factory(config, SerialPortFactory))
    }
}

impl<F: SerialFactory> IrMagician<F> {
    pub fn with_factory(config: PortConfig, factory: F) -> Self {
        Self {
            config,
            factory,
            state: ConnectionState::Disconnected,
        }
    }

    pub fn config(&self) -> &PortConfig {
        &self.config
    }

    pub fn port(&self) -> &str {
        &self.config.path
    }

    pub fn connected(&self) -> bool {
        matches!(&self.state, ConnectionState::Connected(session) if session.is_connected())
    }

    /// Open the port. Does nothing if already connected.
    pub fn connect(&mut self) -> IrmResult<()> {
        if let ConnectionState::Disconnected = self.state {
            let serial = self.factory.open(&self.config)?;
            self.state = ConnectionState::Connected(ProtocolSession::new(serial));
            log::info!("Connected to IrMagician on {}", self.config.path);
        }
        Ok(())
    }

    fn session(&mut self) -> IrmResult<&mut ProtocolSession> {
        match &mut self.state {
            ConnectionState::Connected(session) => Ok(session),
            ConnectionState::Disconnected => Err(IrmError::NotConnected),
        }
    }

    fn send(&mut self, cmd: Command) -> IrmResult<()> {
        self.session()?.execute(&cmd)?;
        Ok(())
    }

    fn query(&mut self, cmd: Command) -> IrmResult<String> {
        self.session()?
            .execute(&cmd)?
            .ok_or_else(|| IrmError::Decode(format!("{cmd:?} returned no payload")))
    }

    /// Select memory bank 0–9.
    pub fn set_bank(&mut self, n: i64) -> IrmResult<()> {
        self.send(Command::SetBank(n))
    }

    /// Start capturing an IR signal.
    pub fn capture(&mut self) -> IrmResult<()> {
        self.send(Command::Capture)
    }

    /// Read the byte at position 0–63 of the selected bank.
    ///
    /// The reply is two bare characters with no line terminator.
    pub fn dump(&mut self, n: i64) -> IrmResult<String> {
        self.query(Command::Dump(n))
    }

    pub fn error_check(&mut self) -> IrmResult<String> {
        self.query(Command::ErrorCheck)
    }

    /// Read information slot 0–7.
    pub fn information(&mut self, n: i64) -> IrmResult<String> {
        self.query(Command::Information(n))
    }

    /// Set the capture pos-scaler, 1–255.
    pub fn set_pos_scaler(&mut self, n: i64) -> IrmResult<String> {
        self.query(Command::PosScaler(n))
    }

    pub fn led_on(&mut self) -> IrmResult<String> {
        self.query(Command::LedOn)
    }

    pub fn led_off(&mut self) -> IrmResult<String> {
        self.query(Command::LedOff)
    }

    /// Set the carrier modulation, 0–2.
    pub fn set_modulation(&mut self, n: i64) -> IrmResult<String> {
        self.query(Command::Modulation(n))
    }

    /// Set the record pointer, 0–65535.
    pub fn set_record_pointer(&mut self, n: i64) -> IrmResult<String> {
        self.query(Command::RecordPointer(n))
    }

    /// Replay the captured signal.
    pub fn play(&mut self) -> IrmResult<()> {
        self.send(Command::Play)
    }

    pub fn reset(&mut self, n: i64) -> IrmResult<String> {
        self.query(Command::Reset(n))
    }

    pub fn statics(&mut self) -> IrmResult<String> {
        self.query(Command::Statics)
    }

    /// Raw ADC sample of the temperature sensor, as the device sent it.
    pub fn raw_temperature(&mut self) -> IrmResult<String> {
        self.query(Command::Temperature)
    }

    /// Raw temperature reply along with whether it parsed.
    pub fn temperature_reading(&mut self) -> IrmResult<TemperatureReading> {
        let reply = self.raw_temperature()?;
        Ok(TemperatureReading::parse(&reply))
    }

    /// Temperature in degrees Celsius.
    ///
    /// Returns `-273.0` if the device reply is not an integer; use
    /// [`temperature_reading`](Self::temperature_reading) to tell that case
    /// apart. Transport errors are still returned.
    pub fn temperature(&mut self) -> IrmResult<f64> {
        let reading = self.temperature_reading()?;
        if !reading.is_valid() {
            log::warn!("Unparseable temperature reply '{}'", reading.reply);
        }
        Ok(reading.celsius())
    }

    /// Firmware version string.
    pub fn version(&mut self) -> IrmResult<String> {
        self.query(Command::Version)
    }

    /// Store `data` (0–255) at `pos` (0–63) of the selected bank.
    pub fn write(&mut self, pos: i64, data: i64) -> IrmResult<()> {
        self.send(Command::Write { pos, data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock_device::MockDeviceFactory;

    fn mock_driver() -> IrMagician<MockDeviceFactory> {
        IrMagician::with_factory(PortConfig::new("mock"), MockDeviceFactory)
    }

    #[test]
    fn starts_disconnected() {
        let irm = mock_driver();
        assert!(!irm.connected());
        assert_eq!(irm.port(), "mock");
    }

    #[test]
    fn calls_before_connect_are_rejected() {
        let mut irm = mock_driver();
        assert!(matches!(irm.version(), Err(IrmError::NotConnected)));
        assert!(matches!(irm.capture(), Err(IrmError::NotConnected)));
    }

    #[test]
    fn connect_then_query() {
        let mut irm = mock_driver();
        irm.connect().unwrap();
        assert!(irm.connected());
        assert_eq!(irm.version().unwrap(), "D00010");
    }

    #[test]
    fn temperature_from_mock() {
        let mut irm = mock_driver();
        irm.connect().unwrap();
        let t = irm.temperature().unwrap();
        assert!((t - 25.0).abs() < 0.5, "got {t}");
    }

    #[test]
    fn explicit_port_is_kept() {
        let irm = IrMagician::new(Some("/dev/ttyUSB9")).unwrap();
        assert_eq!(irm.port(), "/dev/ttyUSB9");
        assert!(!irm.connected());
    }
}
