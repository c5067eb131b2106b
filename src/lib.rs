//! xbox-wireless: Xbox Wireless Controller report decoder
//!
//! This library decodes raw HID input reports from an Xbox wireless
//! controller into structured state and dispatches button events to
//! registered observers.

pub mod config;
pub mod controller;
pub mod dispatch;
pub mod manager;
pub mod session;
pub mod transport;

// Re-export commonly used items
pub use config::{Config, ConfigError};
pub use controller::{Axis, ButtonFlags, ControllerState, DPad, Deadzone, ParseError, ReportParser};
pub use dispatch::{ButtonEvent, EventDispatcher, EventSet, Observer};
pub use manager::{run_all, run_session, SessionManager};
pub use session::{ControllerSession, SessionError, SessionSettings};
pub use transport::{ReadSource, TransportError};
