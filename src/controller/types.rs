//! Xbox controller state types
//!
//! This module defines the decoded values produced from a single input
//! report: stick axes, D-pad flags, button flags and the aggregate
//! [`ControllerState`] snapshot.

use std::fmt;

use bitflags::bitflags;
use serde::Serialize;

use crate::controller::axis::{normalize, Deadzone};
use crate::dispatch::ButtonEvent;

/// Analog stick state (normalized -1.0 to 1.0)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Axis {
    /// Horizontal axis
    pub x: f64,

    /// Vertical axis
    pub y: f64,
}

impl Axis {
    /// Decode a stick from its raw 16-bit samples
    pub fn from_raw(x: u16, y: u16, deadzone: Deadzone) -> Self {
        Self {
            x: normalize(x, deadzone),
            y: normalize(y, deadzone),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(x={:?}, y={:?})", self.x, self.y)
    }
}

/// D-pad state decoded from the 8-way direction code.
///
/// Codes run clockwise from 1 = up to 8 = up-left; 0 is centered. Codes
/// above 8 decode as centered so newer firmware revisions that add values
/// don't fail to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DPad {
    code: u8,
    pub up: bool,
    pub right: bool,
    pub down: bool,
    pub left: bool,
}

impl DPad {
    pub fn from_code(code: u8) -> Self {
        Self {
            code,
            up: matches!(code, 1 | 2 | 8),
            right: matches!(code, 2..=4),
            down: matches!(code, 4..=6),
            left: matches!(code, 6..=8),
        }
    }

    /// Raw direction code as reported by the controller
    pub fn code(&self) -> u8 {
        self.code
    }

    pub fn is_centered(&self) -> bool {
        !(self.up || self.right || self.down || self.left)
    }
}

impl fmt::Display for DPad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(up={}, right={}, down={}, left={})",
            self.up, self.right, self.down, self.left
        )
    }
}

bitflags! {
    /// Face and shoulder buttons (report byte 14).
    ///
    /// Bits 2 and 5 are reserved in this layout and ignored.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    pub struct ButtonFlags: u8 {
        const A = 1 << 0;
        const B = 1 << 1;
        const X = 1 << 3;
        const Y = 1 << 4;
        const LB = 1 << 6;
        const RB = 1 << 7;
    }
}

impl ButtonFlags {
    /// Decode a raw bitmask, dropping reserved bits
    pub fn from_byte(byte: u8) -> Self {
        Self::from_bits_truncate(byte)
    }

    /// Whether the button behind an event is held
    pub fn is_pressed(&self, event: ButtonEvent) -> bool {
        self.contains(event.flag())
    }

    pub fn a(&self) -> bool {
        self.contains(Self::A)
    }

    pub fn b(&self) -> bool {
        self.contains(Self::B)
    }

    pub fn x(&self) -> bool {
        self.contains(Self::X)
    }

    pub fn y(&self) -> bool {
        self.contains(Self::Y)
    }

    pub fn lb(&self) -> bool {
        self.contains(Self::LB)
    }

    pub fn rb(&self) -> bool {
        self.contains(Self::RB)
    }
}

/// Snapshot of the controller decoded from one input report
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControllerState {
    /// Report ID byte the state was decoded from
    pub report_id: u8,

    pub left_stick: Axis,
    pub right_stick: Axis,

    /// Raw trigger magnitudes (0-65535, not normalized)
    pub left_trigger: u16,
    pub right_trigger: u16,

    pub dpad: DPad,
    pub buttons: ButtonFlags,
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.buttons;
        write!(
            f,
            "ControllerState(lj={}, rj={}, lt={}, rt={}, dpad={}, buttons=(a={}, b={}, x={}, y={}, lb={}, rb={}))",
            self.left_stick,
            self.right_stick,
            self.left_trigger,
            self.right_trigger,
            self.dpad,
            b.a(),
            b.b(),
            b.x(),
            b.y(),
            b.lb(),
            b.rb(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(d: &DPad) -> (bool, bool, bool, bool) {
        (d.up, d.right, d.down, d.left)
    }

    #[test]
    fn test_dpad_table() {
        let expected = [
            (0, (false, false, false, false)),
            (1, (true, false, false, false)),
            (2, (true, true, false, false)),
            (3, (false, true, false, false)),
            (4, (false, true, true, false)),
            (5, (false, false, true, false)),
            (6, (false, false, true, true)),
            (7, (false, false, false, true)),
            (8, (true, false, false, true)),
        ];

        for (code, want) in expected {
            assert_eq!(flags(&DPad::from_code(code)), want, "code {}", code);
        }
    }

    #[test]
    fn test_dpad_out_of_range_is_centered() {
        for code in [9u8, 15, 200, 255] {
            let dpad = DPad::from_code(code);
            assert!(dpad.is_centered());
            assert_eq!(dpad.code(), code);
        }
    }

    #[test]
    fn test_single_button_bits() {
        let x_only = ButtonFlags::from_byte(8);
        assert!(x_only.x());
        assert!(!x_only.a() && !x_only.b() && !x_only.y() && !x_only.lb() && !x_only.rb());

        let y_only = ButtonFlags::from_byte(16);
        assert!(y_only.y());
        assert!(!y_only.a() && !y_only.b() && !y_only.x() && !y_only.lb() && !y_only.rb());
    }

    #[test]
    fn test_mixed_mask() {
        // 0b1001_1001: a, x, y, rb
        let buttons = ButtonFlags::from_byte(0x99);
        assert!(buttons.a());
        assert!(!buttons.b());
        assert!(buttons.x());
        assert!(buttons.y());
        assert!(!buttons.lb());
        assert!(buttons.rb());
    }

    #[test]
    fn test_reserved_bits_ignored() {
        let buttons = ButtonFlags::from_byte(0b0010_0100);
        assert!(buttons.is_empty());
    }

    #[test]
    fn test_is_pressed_by_event() {
        let buttons = ButtonFlags::X | ButtonFlags::LB;
        assert!(buttons.is_pressed(ButtonEvent::X));
        assert!(buttons.is_pressed(ButtonEvent::Lb));
        assert!(!buttons.is_pressed(ButtonEvent::Y));
    }

    #[test]
    fn test_state_display() {
        let state = ControllerState {
            report_id: 1,
            left_stick: Axis { x: 0.0, y: 0.0 },
            right_stick: Axis { x: 1.0, y: -1.0 },
            left_trigger: 0,
            right_trigger: 1023,
            dpad: DPad::from_code(2),
            buttons: ButtonFlags::X,
        };

        assert_eq!(
            state.to_string(),
            "ControllerState(lj=(x=0.0, y=0.0), rj=(x=1.0, y=-1.0), lt=0, rt=1023, \
             dpad=(up=true, right=true, down=false, left=false), \
             buttons=(a=false, b=false, x=true, y=false, lb=false, rb=false))"
        );
    }
}
