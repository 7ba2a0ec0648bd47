//! Fixture constants: identification, pin and channel assignment, timing.

use std::time::Duration;

// Default Vendor/Product IDs
/// Silicon Labs vendor ID, as used by the ITUSB1 CP2130 bridge.
pub const ITUSB1_VID: u16 = 0x10C4;
/// ITUSB1 USB test switch product ID.
pub const ITUSB1_PID: u16 = 0x8C52;

/// CP2130 GPIO bitmasks, in the layout of the GET/SET_GPIO_VALUES word.
pub mod gpio {
    /// GPIO.0 bit.
    pub const BM_GPIO0: u16 = 0x0008;
    /// GPIO.1 bit (`!UPEN`).
    pub const BM_GPIO1: u16 = 0x0010;
    /// GPIO.2 bit (`!UDEN`).
    pub const BM_GPIO2: u16 = 0x0020;
    /// GPIO.3 bit (`!UDOC`).
    pub const BM_GPIO3: u16 = 0x0040;
    /// GPIO.4 bit.
    pub const BM_GPIO4: u16 = 0x0080;
    /// GPIO.5 bit.
    pub const BM_GPIO5: u16 = 0x0100;
    // Bit 9 is not a GPIO
    /// GPIO.6 bit.
    pub const BM_GPIO6: u16 = 0x0400;
    /// GPIO.7 bit.
    pub const BM_GPIO7: u16 = 0x0800;
    /// GPIO.8 bit.
    pub const BM_GPIO8: u16 = 0x1000;
    /// GPIO.9 bit.
    pub const BM_GPIO9: u16 = 0x2000;
    /// GPIO.10 bit.
    pub const BM_GPIO10: u16 = 0x4000;
    /// All eleven GPIO bits.
    pub const BM_GPIOS: u16 = 0x7DF8;

    /// Highest CP2130 GPIO line number.
    pub const MAX_LINE: u8 = 10;

    // Fixture line assignment (all active-low)
    /// GPIO.1 drives !UPEN (VBUS enable).
    pub const LINE_UPEN: u8 = 1;
    /// GPIO.2 drives !UDEN (data lines enable).
    pub const LINE_UDEN: u8 = 2;
    /// GPIO.3 reads !UDOC (overcurrent flag).
    pub const LINE_UDOC: u8 = 3;
}

/// SPI channel assignment and CP2130 channel configuration word fields.
pub mod spi {
    /// SPI channel wired to the LTC2312 current-sense ADC.
    pub const ADC_CHANNEL: u8 = 0;
    /// Bulk IN endpoint used for SPI reads.
    pub const EP_IN: u8 = 0x82;
    /// Bulk OUT endpoint used for SPI read commands.
    pub const EP_OUT: u8 = 0x01;
    /// Bytes per LTC2312 conversion result.
    pub const ADC_READ_LEN: usize = 2;

    // Channel configuration word fields
    pub const CFRQ_MASK: u8 = 0b0000_0111;
    pub const CSMODE_BIT: u8 = 1 << 3;
    pub const CPOL_BIT: u8 = 1 << 4;
    pub const CPHA_BIT: u8 = 1 << 5;
}

// --- Current measurement ---
/// Samples averaged per current measurement.
pub const CURRENT_SAMPLES: usize = 5;
/// ADC codes per milliamp.
pub const CURRENT_CODES_PER_MA: f32 = 4.0;

// --- Hardware timing ---
// These are tuned for the physical fixture; do not change without
// validating on hardware.
/// Lets the DUT shut down after VBUS and data are forced off.
pub const POWER_DOWN_DELAY: Duration = Duration::from_millis(100);
/// Emulates the gap between VBUS and data contact on a manual insertion.
pub const INSERTION_DELAY: Duration = Duration::from_millis(100);
/// Lets enumeration start after the data lines connect (does not wait for it to finish).
pub const ENUMERATION_DELAY: Duration = Duration::from_millis(100);
/// Emulates the gap between data and VBUS on a manual removal.
pub const REMOVAL_DELAY: Duration = Duration::from_millis(100);
/// Wakes the LTC2312 from nap/sleep; also avoids a CS disable race (workaround).
pub const ADC_WAKE_UP_DELAY: Duration = Duration::from_micros(1100);
/// Avoids a race when disabling the chip select right after a transfer (workaround).
pub const CS_DISABLE_DELAY: Duration = Duration::from_micros(100);
