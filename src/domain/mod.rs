//! Core domain types
//!
//! Pure types with no I/O dependencies: errors, port configuration and
//! temperature conversion.

pub mod config;
pub mod error;
pub mod temperature;
pub mod types;

pub use config::*;
pub use error::*;
pub use temperature::*;
pub use types::*;
