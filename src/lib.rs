//! # itusb1
//!
//! A Rust crate for controlling the ITUSB1 USB test switch: a pass-through
//! fixture that attaches and detaches a USB device under test (DUT) from a
//! host under test (HUT), and measures the current the DUT draws from VBUS.
//!
//! The fixture is built around a Silicon Labs CP2130 USB-to-SPI/GPIO bridge.
//! This crate holds the fixture logic only; talking to the CP2130 is left to
//! an implementation of the [`Bridge`] trait.
//!
//! ## Features
//!
//! *   Device enumeration and opening by serial number (`list_devices`, `open`).
//! *   Identity: manufacturer, product and serial descriptors, USB configuration.
//! *   Switching:
//!     *   VBUS and data lines individually (`switch_usb_power`, `switch_usb_data`).
//!     *   Both at once in a single GPIO write (`switch_usb`).
//!     *   Timed `attach`/`detach` sequences that emulate a manual plug/unplug.
//! *   Status: VBUS, data and overcurrent flags, as logical (active-high) values.
//! *   VBUS current measurement, averaged over five ADC conversions (`current`).
//!
//! ## Error Handling
//!
//! Fixture operations are multi-step and must not stop halfway (an attach that
//! switched VBUS on but gave up before the data lines would leave the DUT in a
//! state no person could produce by hand). Each operation therefore takes an
//! [`ErrorLog`], records every failed bridge call in it, and carries on with a
//! conservative default. Check the log once the whole sequence is done.
//!
//! Opening is the exception: [`Itusb1Device::open`] returns a [`Result`].
//!
//! ## Basic Usage
//!
//! ```no_run
//! use itusb1::{Bridge, ErrorLog, Itusb1Device};
//! # fn run<B: Bridge + Default>() -> itusb1::Result<()> {
//!
//! let mut device = Itusb1Device::new(B::default());
//! device.open("")?; // First fixture found
//!
//! let mut errors = ErrorLog::new();
//! device.setup(&mut errors);
//! device.attach(&mut errors);
//! println!("VBUS current: {:.1} mA", device.current(&mut errors));
//! device.detach(&mut errors);
//!
//! if !errors.is_empty() {
//!     eprintln!("{} error(s):\n{}", errors.count(), errors);
//! }
//! device.close();
//! # Ok(())
//! # }
//! ```
//!
//! ## Pin Mapping
//!
//! *   GPIO.1: `!UPEN`, VBUS enable (output, active-low).
//! *   GPIO.2: `!UDEN`, data lines enable (output, active-low).
//! *   GPIO.3: `!UDOC`, overcurrent flag (input, active-low).
//! *   SPI channel 0: LTC2312 current-sense ADC (push-pull CS, 1.5 MHz, mode 0).
//!
//! ## License
//!
//! This project is licensed under the WTFPL.

// Make internal modules private, re-export public types
mod bridge;
pub mod consts;
mod current;
mod delay;
mod device;
mod error;
pub mod gpio;
mod switch;

pub use bridge::{
    Bridge, ClockFrequency, ClockPhase, ClockPolarity, CsMode, SpiMode, UsbConfig,
};
pub use consts::{ITUSB1_PID, ITUSB1_VID};
pub use current::{codes_to_milliamps, decode_raw_current, ADC_SPI_MODE};
pub use delay::{Delay, StdDelay};
pub use device::Itusb1Device;
pub use error::{Error, ErrorLog, Result};
pub use gpio::{GpioLine, Signal, UsbState};
