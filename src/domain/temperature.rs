//! Temperature sensor conversion
//!
//! The `t` command returns a 10-bit ADC sample of the on-board sensor as a
//! decimal string. The sensor output is linear: 0.4 V at 0 °C, 19.53 mV/°C,
//! sampled against a 5 V reference.

use serde::{Deserialize, Serialize};

/// Returned by `temperature()` when the device reply is not an integer.
pub const INVALID_TEMPERATURE: f64 = -273.0;

/// Convert a raw ADC sample to degrees Celsius.
pub fn celsius_from_raw(raw: i64) -> f64 {
    ((5.0 / 1024.0 * raw as f64) - 0.4) / (19.53 / 1000.0)
}

/// A raw temperature reply together with its parse outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureReading {
    /// Reply line exactly as received (trimmed)
    pub reply: String,
    /// Parsed ADC sample, `None` if the reply was not an integer
    pub raw: Option<i64>,
}

impl TemperatureReading {
    pub fn parse(reply: &str) -> Self {
        let reply = reply.trim();
        Self {
            reply: reply.to_string(),
            raw: reply.parse::<i64>().ok(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.raw.is_some()
    }

    /// Degrees Celsius, or [`INVALID_TEMPERATURE`] if the reply did not parse.
    pub fn celsius(&self) -> f64 {
        self.raw.map_or(INVALID_TEMPERATURE, celsius_from_raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_512_matches_transfer_function() {
        let expected = ((5.0 / 1024.0 * 512.0) - 0.4) / (19.53 / 1000.0);
        assert_eq!(celsius_from_raw(512), expected);
        assert!((celsius_from_raw(512) - 107.5269).abs() < 1e-3);
    }

    #[test]
    fn room_temperature_sample() {
        // 0.4 V + 25 * 19.53 mV ≈ 0.888 V ≈ 182 counts
        let t = celsius_from_raw(182);
        assert!((t - 25.1).abs() < 0.5, "got {t}");
    }

    #[test]
    fn reading_parses_integer_reply() {
        let reading = TemperatureReading::parse(" 512 ");
        assert!(reading.is_valid());
        assert_eq!(reading.raw, Some(512));
        assert_eq!(reading.reply, "512");
        assert_eq!(reading.celsius(), celsius_from_raw(512));
    }

    #[test]
    fn garbage_reply_yields_sentinel() {
        let reading = TemperatureReading::parse("ERR");
        assert!(!reading.is_valid());
        assert_eq!(reading.celsius(), -273.0);
    }

    #[test]
    fn empty_reply_yields_sentinel() {
        assert_eq!(TemperatureReading::parse("").celsius(), INVALID_TEMPERATURE);
    }
}
