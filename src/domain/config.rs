//! Port configuration and platform resolution
//!
//! A `PortConfig` names the device path plus the fixed serial parameters the
//! firmware expects. It is resolved once, when the driver is built, either
//! from an explicit path or from the platform's default device node.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{IrmError, IrmResult};

/// Baud rate the IrMagician firmware listens at
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Read timeout for every line or byte read
pub const DEFAULT_TIMEOUT_MS: u64 = 1000;

/// Default device node per platform, keyed by platform identifier.
pub const PLATFORM_PORTS: &[(&str, &str)] = &[
    ("Linux", "/dev/ttyACM0"),
    ("Darwin", "/dev/cu.usbmodem01231"),
];

fn default_baud_rate() -> u32 {
    DEFAULT_BAUD_RATE
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// Serial parameters for one IrMagician
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortConfig {
    /// Device path, e.g. "/dev/ttyACM0"
    pub path: String,
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl PortConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Read a configuration from a JSON file.
    pub fn load(path: &Path) -> IrmResult<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| IrmError::Config(format!("Failed to read {}: {e}", path.display())))?;
        serde_json::from_str(&json)
            .map_err(|e| IrmError::Config(format!("Failed to parse {}: {e}", path.display())))
    }

    /// Write this configuration as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> IrmResult<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| IrmError::Config(format!("Serialization error: {e}")))?;
        std::fs::write(path, json)
            .map_err(|e| IrmError::Config(format!("Failed to write {}: {e}", path.display())))
    }
}

/// Resolve the port to use.
///
/// An explicit port wins and is taken verbatim; its existence is only checked
/// when the transport opens it. Otherwise `platform_id` is looked up in
/// [`PLATFORM_PORTS`].
pub fn resolve(explicit_port: Option<&str>, platform_id: &str) -> IrmResult<PortConfig> {
    if let Some(port) = explicit_port {
        return Ok(PortConfig::new(port));
    }
    PLATFORM_PORTS
        .iter()
        .find(|(platform, _)| *platform == platform_id)
        .map(|(_, path)| PortConfig::new(*path))
        .ok_or_else(|| IrmError::UnsupportedPlatform(platform_id.to_string()))
}

/// Platform identifier of the running host, in the spelling the port table uses.
pub fn current_platform() -> &'static str {
    match std::env::consts::OS {
        "linux" => "Linux",
        "macos" => "Darwin",
        "windows" => "Windows",
        other => other,
    }
}
