//! Analog axis decoding
//!
//! Converts raw 16-bit stick samples into normalized values with a
//! radial-per-axis deadzone around the center of the range.

use crate::config::ConfigError;
use crate::controller::constants::{AXIS_CENTER, DEFAULT_DEADZONE};

/// Deadzone radius in raw axis units.
///
/// Always strictly below [`AXIS_CENTER`], so the scaling in [`normalize`]
/// never divides by zero or flips sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadzone(u16);

impl Deadzone {
    /// Validate a raw deadzone radius
    pub fn new(radius: u16) -> Result<Self, ConfigError> {
        if f64::from(radius) >= AXIS_CENTER {
            return Err(ConfigError::InvalidDeadzone(radius));
        }
        Ok(Self(radius))
    }

    /// Raw radius
    pub fn get(self) -> u16 {
        self.0
    }
}

impl Default for Deadzone {
    fn default() -> Self {
        Self(DEFAULT_DEADZONE)
    }
}

/// Normalize a raw axis sample into `[-1.0, 1.0]`.
///
/// Samples within the deadzone collapse to exactly `0.0`. Outside it the
/// deadzone band is removed from the magnitude before scaling, so the output
/// starts at zero at the deadzone edge and reaches ±1.0 at 0 and 65535.
pub fn normalize(raw: u16, deadzone: Deadzone) -> f64 {
    let deadzone = f64::from(deadzone.0);
    let delta = f64::from(raw) - AXIS_CENTER;

    if delta.abs() < deadzone {
        return 0.0;
    }

    (delta - delta.signum() * deadzone) / (AXIS_CENTER - deadzone)
}

/// Reconstruct a little-endian 16-bit sample from two report bytes
pub fn sample(low: u8, high: u8) -> u16 {
    u16::from_le_bytes([low, high])
}
