//! hidapi-backed read source.
//!
//! Wraps an opened `hidapi::HidDevice` in non-blocking mode. The handle is
//! released when the source is dropped, which happens when the owning
//! session is torn down.

use hidapi::{HidApi, HidDevice, HidResult};
use log::{debug, info};

use crate::transport::{ReadSource, TransportError};

/// Read source reading input reports from a HID device
pub struct HidReadSource {
    device: HidDevice,
    name: String,
}

impl HidReadSource {
    /// Open the first device matching `vendor_id`/`product_id`
    pub fn open(api: &HidApi, vendor_id: u16, product_id: u16) -> Result<Self, TransportError> {
        let device = api
            .open(vendor_id, product_id)
            .map_err(|e| TransportError::Open(e.to_string()))?;

        let name = match device.get_product_string() {
            Ok(Some(product)) => product,
            _ => format!("{:04x}:{:04x}", vendor_id, product_id),
        };

        Self::from_device(device, name)
    }

    /// Wrap an already opened device.
    ///
    /// Fails if the device can't be switched to non-blocking reads.
    pub fn from_device(device: HidDevice, name: impl Into<String>) -> Result<Self, TransportError> {
        let name = name.into();

        // Sessions only see cancellation between polls, so reads must never block
        require_non_blocking(device.set_blocking_mode(false), &name)?;

        info!("Opened HID device: {}", name);
        Ok(Self { device, name })
    }
}

fn require_non_blocking(result: HidResult<()>, name: &str) -> Result<(), TransportError> {
    result.map_err(|e| TransportError::Open(format!("{}: could not switch to non-blocking mode: {}", name, e)))
}

impl ReadSource for HidReadSource {
    fn read_report(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        self.device
            .read(buf)
            .map_err(|e| TransportError::Read(e.to_string()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for HidReadSource {
    fn drop(&mut self) {
        // hidapi closes the handle when `device` drops
        debug!("Closing device {}", self.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hidapi::HidError;

    #[test]
    fn test_blocking_mode_failure_refuses_device() {
        let failed = Err(HidError::HidApiError { message: "not supported".into() });

        match require_non_blocking(failed, "pad") {
            Err(TransportError::Open(message)) => {
                assert!(message.starts_with("pad: could not switch to non-blocking mode"));
                assert!(message.contains("not supported"));
            }
            other => panic!("expected an open error, got {:?}", other),
        }
        assert!(require_non_blocking(Ok(()), "pad").is_ok());
    }
}
