//! Input report parsing
//!
//! Turns the raw bytes of one HID input report into a [`ControllerState`].
//! The report layout is fixed; the first byte is the report ID and the
//! payload fields follow at the offsets in [`constants`](super::constants).

use log::trace;
use thiserror::Error;

use crate::controller::axis::{sample, Deadzone};
use crate::controller::constants::*;
use crate::controller::types::{Axis, ButtonFlags, ControllerState, DPad};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Report too short: got {len} bytes, need at least {required}")]
    ShortBuffer { len: usize, required: usize },
}

/// Decoder for the controller's input report
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportParser {
    deadzone: Deadzone,
}

impl ReportParser {
    /// Create a parser applying `deadzone` to both sticks
    pub fn new(deadzone: Deadzone) -> Self {
        Self { deadzone }
    }

    pub fn deadzone(&self) -> Deadzone {
        self.deadzone
    }

    /// Parse one input report.
    ///
    /// Bytes past the last known offset are ignored. Field values are used
    /// as-is; the only failure is a buffer too short to hold the layout.
    pub fn parse(&self, report: &[u8]) -> Result<ControllerState, ParseError> {
        let report_id = *report.get(REPORT_ID_OFFSET).ok_or(ParseError::ShortBuffer {
            len: report.len(),
            required: REPORT_LEN,
        })?;

        let required = Self::required_len(report_id);
        if report.len() < required {
            return Err(ParseError::ShortBuffer {
                len: report.len(),
                required,
            });
        }

        let word = |offset: usize| sample(report[offset], report[offset + 1]);

        let state = ControllerState {
            report_id,
            left_stick: Axis::from_raw(
                word(LEFT_STICK_X_OFFSET),
                word(LEFT_STICK_Y_OFFSET),
                self.deadzone,
            ),
            right_stick: Axis::from_raw(
                word(RIGHT_STICK_X_OFFSET),
                word(RIGHT_STICK_Y_OFFSET),
                self.deadzone,
            ),
            left_trigger: word(LEFT_TRIGGER_OFFSET),
            right_trigger: word(RIGHT_TRIGGER_OFFSET),
            dpad: DPad::from_code(report[DPAD_OFFSET]),
            buttons: ButtonFlags::from_byte(report[BUTTONS_OFFSET]),
        };

        trace!("Parsed report 0x{:02X} ({} bytes)", report_id, report.len());
        Ok(state)
    }

    /// Minimum length of the layout selected by `report_id`.
    ///
    /// Only one layout is recognized so far, so every ID maps to it.
    fn required_len(_report_id: u8) -> usize {
        REPORT_LEN
    }
}
