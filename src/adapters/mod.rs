//! Adapters: implementations of port traits for real and emulated hardware

pub mod mock_device;
pub mod serial_port;
