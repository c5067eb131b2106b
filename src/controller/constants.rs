//! Xbox wireless controller report constants
//!
//! This module contains the fixed layout of the controller's input report
//! and the default tuning values used by the decoder:
//! - Byte offsets of every field in the report
//! - Axis center and default deadzone
//! - Default USB vendor/product identifiers

// ============================================================================
// Device Identity
// ============================================================================

/// Microsoft Corp. USB vendor ID
pub const XBOX_VENDOR_ID: u16 = 0x045e;

/// Xbox Wireless Controller (Bluetooth) product ID
pub const XBOX_WIRELESS_PRODUCT_ID: u16 = 0x0b13;

/// Size of the buffer handed to the read source on each poll
pub const DEFAULT_READ_SIZE: usize = 64;

// ============================================================================
// Input Report Layout
// ============================================================================

/// Offset of the report ID byte
pub const REPORT_ID_OFFSET: usize = 0;

/// Left stick X (low, high)
pub const LEFT_STICK_X_OFFSET: usize = 1;

/// Left stick Y (low, high)
pub const LEFT_STICK_Y_OFFSET: usize = 3;

/// Right stick X (low, high)
pub const RIGHT_STICK_X_OFFSET: usize = 5;

/// Right stick Y (low, high)
pub const RIGHT_STICK_Y_OFFSET: usize = 7;

/// Left trigger (low, high)
pub const LEFT_TRIGGER_OFFSET: usize = 9;

/// Right trigger (low, high)
pub const RIGHT_TRIGGER_OFFSET: usize = 11;

/// D-pad direction code
pub const DPAD_OFFSET: usize = 13;

/// Face/shoulder button bitmask
pub const BUTTONS_OFFSET: usize = 14;

/// Minimum report length covering every offset above
pub const REPORT_LEN: usize = BUTTONS_OFFSET + 1;

// ============================================================================
// Axis Constants
// ============================================================================

/// Midpoint of the raw 16-bit axis range
pub const AXIS_CENTER: f64 = 65535.0 / 2.0;

/// Default stick deadzone in raw axis units
pub const DEFAULT_DEADZONE: u16 = 4000;
