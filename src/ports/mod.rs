//! Port traits (interfaces)
//!
//! These traits define the boundary between the protocol layer and the
//! physical transport. Adapters implement them to reach real hardware.

pub mod serial;

pub use serial::*;
