//! Xbox wireless controller report decoding
//!
//! This module turns raw HID input reports into structured state:
//! - Report layout constants
//! - Axis normalization with deadzone
//! - Decoded state types
//! - Report parsing

pub mod axis;
pub mod constants;
pub mod parser;
pub mod types;

// Re-export commonly used items
pub use axis::{normalize, Deadzone};
pub use constants::*;
pub use parser::{ParseError, ReportParser};
pub use types::*;
