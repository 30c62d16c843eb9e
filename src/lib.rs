//! IrMagician host driver
//!
//! Drives the IrMagician USB infrared transceiver over its ASCII serial
//! protocol: capture, store and replay IR waveforms, and read the on-board
//! temperature sensor.
//!
//! ## Architecture (Hexagonal / Ports & Adapters)
//!
//! - `domain/` - Pure domain types, no I/O dependencies
//! - `ports/` - Trait definitions for the serial transport
//! - `protocol/` - Command table, validation, encoding, decoding, session
//! - `adapters/` - Implementations of ports (serialport, in-memory mock)
//! - `driver` - `IrMagician`, the typed public API
//!
//! ```no_run
//! use irmagician::IrMagician;
//!
//! let mut irm = IrMagician::new(None)?;
//! irm.connect()?;
//! println!("firmware {}", irm.version()?);
//! println!("{:.1} °C", irm.temperature()?);
//! # Ok::<(), irmagician::domain::IrmError>(())
//! ```

// Core domain (pure, no I/O)
pub mod domain;
pub mod ports;
pub mod protocol;

// Adapters (external I/O)
pub mod adapters;

pub mod driver;

pub use driver::IrMagician;
