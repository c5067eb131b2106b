//! Report transport abstraction
//!
//! This module defines the boundary between the decoder and whatever
//! produces raw report bytes. A [`ReadSource`] is opened and owned by the
//! caller; sessions only read from it.

pub mod mock_source;
#[cfg(feature = "hid")]
pub mod hid_source;

pub use mock_source::ScriptedSource;
#[cfg(feature = "hid")]
pub use hid_source::HidReadSource;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Device disconnected")]
    Disconnected,

    #[error("Failed to read report: {0}")]
    Read(String),

    #[error("Failed to open device: {0}")]
    Open(String),
}

/// Non-blocking source of raw input reports
pub trait ReadSource: Send {
    /// Read one report (report ID + payload) into `buf`.
    ///
    /// Returns the number of bytes written, or `0` when no report is ready.
    /// Must not block waiting for data.
    fn read_report(&mut self, buf: &mut [u8]) -> Result<usize, TransportError>;

    /// Human-readable name used in log output
    fn name(&self) -> &str {
        "controller"
    }
}

impl<S: ReadSource + ?Sized> ReadSource for Box<S> {
    fn read_report(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        (**self).read_report(buf)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
