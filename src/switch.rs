//! VBUS/data switching and the attach/detach sequences.

use crate::bridge::Bridge;
use crate::consts;
use crate::delay::Delay;
use crate::device::Itusb1Device;
use crate::error::ErrorLog;
use crate::gpio::{Signal, UsbState};
use log::{debug, trace};

impl<B: Bridge, D: Delay> Itusb1Device<B, D> {
    // --- Active-low signal helpers ---

    // A failed read counts as a low line, i.e. the signal reads as asserted.
    fn read_signal(&mut self, signal: Signal, errors: &mut ErrorLog) -> bool {
        let physical = errors.check(self.bridge.get_gpio(signal.line()));
        let logical = Signal::from_physical(physical);
        trace!("{:?}: line={} logical={}", signal, physical, logical);
        logical
    }

    fn write_signal(&mut self, signal: Signal, value: bool, errors: &mut ErrorLog) {
        trace!("Switching {:?} to {}", signal, value);
        errors.check(
            self.bridge
                .set_gpio(signal.line(), Signal::to_physical(value)),
        );
    }

    // --- Status ---

    /// Whether VBUS is switched on.
    pub fn usb_power_status(&mut self, errors: &mut ErrorLog) -> bool {
        self.read_signal(Signal::UsbPower, errors)
    }

    /// Whether the data lines are connected.
    pub fn usb_data_status(&mut self, errors: &mut ErrorLog) -> bool {
        self.read_signal(Signal::UsbData, errors)
    }

    /// Whether the overcurrent flag is raised.
    pub fn overcurrent_status(&mut self, errors: &mut ErrorLog) -> bool {
        self.read_signal(Signal::Overcurrent, errors)
    }

    /// Reads VBUS, then the data lines.
    pub fn usb_state(&mut self, errors: &mut ErrorLog) -> UsbState {
        let power = self.usb_power_status(errors);
        let data = self.usb_data_status(errors);
        UsbState::from_lines(power, data)
    }

    // --- Switching ---

    /// Switches VBUS on or off.
    pub fn switch_usb_power(&mut self, value: bool, errors: &mut ErrorLog) {
        self.write_signal(Signal::UsbPower, value, errors);
    }

    /// Connects or disconnects the data lines.
    pub fn switch_usb_data(&mut self, value: bool, errors: &mut ErrorLog) {
        self.write_signal(Signal::UsbData, value, errors);
    }

    /// Switches VBUS and the data lines together, in a single GPIO write.
    pub fn switch_usb(&mut self, value: bool, errors: &mut ErrorLog) {
        let mask = Signal::UsbPower.line().mask() | Signal::UsbData.line().mask();
        let bits = if Signal::to_physical(value) {
            consts::gpio::BM_GPIOS
        } else {
            0
        };
        trace!(
            "Switching VBUS and data to {} (bits={:04X}, mask={:04X})",
            value,
            bits,
            mask
        );
        errors.check(self.bridge.set_gpios(bits, mask));
    }

    // --- Attach / detach ---

    /// Attaches the DUT to the HUT the way a person plugging it in would:
    /// VBUS first, then the data lines.
    ///
    /// If VBUS and data disagree, both are switched off first. If both are
    /// already on this does nothing. Returns after enumeration has had a
    /// chance to start, not after it completes.
    pub fn attach(&mut self, errors: &mut ErrorLog) {
        let state = self.usb_state(errors);
        if !state.is_consistent() {
            debug!("Attach: inconsistent switch state {:?}, forcing off", state);
            self.switch_usb(false, errors);
            self.delay.delay(consts::POWER_DOWN_DELAY);
        }
        // Data is only read when VBUS is off
        if !self.usb_power_status(errors) && !self.usb_data_status(errors) {
            debug!("Attach: switching VBUS on");
            self.switch_usb_power(true, errors);
            self.delay.delay(consts::INSERTION_DELAY);
            debug!("Attach: connecting data lines");
            self.switch_usb_data(true, errors);
            self.delay.delay(consts::ENUMERATION_DELAY);
        } else {
            trace!("Attach: already attached");
        }
    }

    /// Detaches the DUT from the HUT: data lines first, then VBUS.
    pub fn detach(&mut self, errors: &mut ErrorLog) {
        if self.usb_data_status(errors) {
            debug!("Detach: disconnecting data lines");
            self.switch_usb_data(false, errors);
            self.delay.delay(consts::REMOVAL_DELAY);
        }
        if self.usb_power_status(errors) {
            debug!("Detach: switching VBUS off");
            self.switch_usb_power(false, errors);
            self.delay.delay(consts::POWER_DOWN_DELAY);
        }
    }
}
