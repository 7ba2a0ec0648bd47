//! Device handle, opening, enumeration and identity for the ITUSB1.

use crate::bridge::{Bridge, UsbConfig};
use crate::consts;
use crate::delay::{Delay, StdDelay};
use crate::error::{Error, ErrorLog, Result};
use log::{debug, trace};

/// A handle to an ITUSB1 USB test switch.
///
/// Wraps one CP2130 [`Bridge`] and a [`Delay`] provider. Methods that talk to
/// the fixture take `&mut self` and an [`ErrorLog`]; bridge failures are
/// recorded there and the operation continues with a conservative default,
/// so a single lost transfer never aborts an attach, detach or measurement
/// halfway through.
#[derive(Debug)]
pub struct Itusb1Device<B: Bridge, D: Delay = StdDelay> {
    pub(crate) bridge: B,
    pub(crate) delay: D,
}

impl<B: Bridge> Itusb1Device<B> {
    /// Wraps `bridge`, sleeping the calling thread for hardware delays.
    pub fn new(bridge: B) -> Self {
        Self::with_delay(bridge, StdDelay)
    }

    /// Serial numbers of all connected ITUSB1 fixtures.
    pub fn list_devices(errors: &mut ErrorLog) -> Vec<String> {
        let serials = errors.check(B::list_devices(consts::ITUSB1_VID, consts::ITUSB1_PID));
        debug!("Found {} ITUSB1 device(s): {:?}", serials.len(), serials);
        serials
    }
}

impl<B: Bridge + Default> Default for Itusb1Device<B> {
    fn default() -> Self {
        Self::new(B::default())
    }
}

impl<B: Bridge, D: Delay> Itusb1Device<B, D> {
    // --- Constructors and Info ---

    /// Wraps `bridge`, using `delay` for every hardware delay.
    pub fn with_delay(bridge: B, delay: D) -> Self {
        Self { bridge, delay }
    }

    /// Opens the fixture with the given serial number, or the first one found
    /// if `serial` is empty.
    ///
    /// Open failures are returned rather than recorded.
    pub fn open(&mut self, serial: &str) -> Result<()> {
        let serial = (!serial.is_empty()).then_some(serial);
        self.bridge
            .open(consts::ITUSB1_VID, consts::ITUSB1_PID, serial)?;
        debug!(
            "Opened ITUSB1 device: VID={:04X}, PID={:04X}, SN={:?}",
            consts::ITUSB1_VID,
            consts::ITUSB1_PID,
            serial
        );
        Ok(())
    }

    /// Closes the fixture if it is open.
    pub fn close(&mut self) {
        if self.bridge.is_open() {
            self.bridge.close();
            debug!("Closed ITUSB1 device");
        }
    }

    pub fn is_open(&self) -> bool {
        self.bridge.is_open()
    }

    /// Diagnostic: whether the fixture was unplugged while open.
    pub fn disconnected(&self) -> bool {
        self.bridge.disconnected()
    }

    /// Resets the CP2130, which resets the entire fixture.
    pub fn reset(&mut self, errors: &mut ErrorLog) {
        debug!("Resetting ITUSB1 device");
        errors.check(self.bridge.reset());
    }

    pub fn manufacturer_desc(&mut self, errors: &mut ErrorLog) -> String {
        let units = errors.check(self.bridge.manufacturer_desc());
        decode_descriptor("manufacturer", &units, errors)
    }

    pub fn product_desc(&mut self, errors: &mut ErrorLog) -> String {
        let units = errors.check(self.bridge.product_desc());
        decode_descriptor("product", &units, errors)
    }

    pub fn serial_desc(&mut self, errors: &mut ErrorLog) -> String {
        let units = errors.check(self.bridge.serial_desc());
        decode_descriptor("serial", &units, errors)
    }

    /// USB configuration of the CP2130. All-zero if the read fails.
    pub fn usb_config(&mut self, errors: &mut ErrorLog) -> UsbConfig {
        let config = errors.check(self.bridge.usb_config());
        trace!("USB config: {:?}", config);
        config
    }

    // --- Access to the wrapped parts ---

    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    pub fn bridge_mut(&mut self) -> &mut B {
        &mut self.bridge
    }

    pub fn delay(&self) -> &D {
        &self.delay
    }

    pub fn into_inner(self) -> (B, D) {
        (self.bridge, self.delay)
    }
}

// Invalid UTF-16 is recorded and replaced rather than dropped, so a damaged
// descriptor still shows something.
fn decode_descriptor(kind: &'static str, units: &[u16], errors: &mut ErrorLog) -> String {
    match String::from_utf16(units) {
        Ok(s) => s,
        Err(_) => {
            errors.record(Error::InvalidDescriptor(kind));
            String::from_utf16_lossy(units)
        }
    }
}
