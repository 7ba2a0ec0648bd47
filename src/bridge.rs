//! The CP2130 bridge interface the fixture logic is written against.
//!
//! This crate does not talk to USB itself. A CP2130 driver implements
//! [`Bridge`] and hands an instance to [`Itusb1Device`](crate::Itusb1Device).

use crate::consts::spi;
use crate::error::Result;
use crate::gpio::GpioLine;

/// Chip select pin drive mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsMode {
    OpenDrain,
    PushPull,
}

/// SPI clock frequencies supported by the CP2130.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockFrequency {
    Mhz12,
    Mhz6,
    Mhz3,
    Khz1500,
    Khz750,
    Khz375,
    Khz187_5,
    Khz93_75,
}

impl ClockFrequency {
    /// Three-bit CP2130 frequency code.
    pub fn code(self) -> u8 {
        match self {
            ClockFrequency::Mhz12 => 0,
            ClockFrequency::Mhz6 => 1,
            ClockFrequency::Mhz3 => 2,
            ClockFrequency::Khz1500 => 3,
            ClockFrequency::Khz750 => 4,
            ClockFrequency::Khz375 => 5,
            ClockFrequency::Khz187_5 => 6,
            ClockFrequency::Khz93_75 => 7,
        }
    }

    pub fn hz(self) -> u32 {
        12_000_000 >> self.code()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockPolarity {
    /// Clock idles low (CPOL = 0).
    Cpol0,
    /// Clock idles high (CPOL = 1).
    Cpol1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockPhase {
    /// Data valid on the leading edge (CPHA = 0).
    Cpha0,
    /// Data valid on the trailing edge (CPHA = 1).
    Cpha1,
}

/// SPI configuration for one CP2130 channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpiMode {
    pub cs_mode: CsMode,
    pub clock: ClockFrequency,
    pub polarity: ClockPolarity,
    pub phase: ClockPhase,
}

impl SpiMode {
    /// Encodes the mode as the CP2130 channel configuration byte.
    pub fn word(&self) -> u8 {
        let mut word = self.clock.code() & spi::CFRQ_MASK;
        if self.cs_mode == CsMode::PushPull {
            word |= spi::CSMODE_BIT;
        }
        if self.polarity == ClockPolarity::Cpol1 {
            word |= spi::CPOL_BIT;
        }
        if self.phase == ClockPhase::Cpha1 {
            word |= spi::CPHA_BIT;
        }
        word
    }
}

/// USB configuration of the CP2130, as read back from the device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsbConfig {
    pub vid: u16,
    pub pid: u16,
    /// Maximum power draw, in units of 2 mA.
    pub max_power: u8,
    pub power_mode: u8,
    pub major_release: u8,
    pub minor_release: u8,
    pub transfer_priority: u8,
}

impl UsbConfig {
    pub fn max_power_ma(&self) -> u16 {
        u16::from(self.max_power) * 2
    }
}

/// Primitive operations of a CP2130 USB-to-SPI/GPIO bridge.
///
/// Every fallible call reports through [`Result`]; implementations should
/// not panic on communication failures. GPIO values are physical levels
/// (`true` = high).
pub trait Bridge {
    /// Opens the first device matching `vid`/`pid`, or the one with the given serial number.
    fn open(&mut self, vid: u16, pid: u16, serial: Option<&str>) -> Result<()>;
    /// Closes the device. Must be harmless on a closed handle.
    fn close(&mut self);
    fn is_open(&self) -> bool;
    /// Whether the device disappeared since it was opened.
    fn disconnected(&self) -> bool;

    /// Reads `len` bytes over SPI from the currently selected channel.
    /// May return fewer bytes than requested.
    fn spi_read(&mut self, len: usize, endpoint_in: u8, endpoint_out: u8) -> Result<Vec<u8>>;
    /// Enables the chip select of `channel` and disables all others.
    fn select_cs(&mut self, channel: u8) -> Result<()>;
    fn disable_cs(&mut self, channel: u8) -> Result<()>;
    fn configure_spi_mode(&mut self, channel: u8, mode: SpiMode) -> Result<()>;
    /// Disables inter-byte, post-assert and pre-deassert delays on `channel`.
    fn disable_spi_delays(&mut self, channel: u8) -> Result<()>;

    fn get_gpio(&mut self, line: GpioLine) -> Result<bool>;
    fn set_gpio(&mut self, line: GpioLine, value: bool) -> Result<()>;
    /// Writes the lines selected by `mask` in one transfer.
    fn set_gpios(&mut self, bits: u16, mask: u16) -> Result<()>;

    /// USB string descriptors, as UTF-16 code units.
    fn manufacturer_desc(&mut self) -> Result<Vec<u16>>;
    fn product_desc(&mut self) -> Result<Vec<u16>>;
    fn serial_desc(&mut self) -> Result<Vec<u16>>;
    fn usb_config(&mut self) -> Result<UsbConfig>;
    /// Resets the bridge, which resets the whole fixture.
    fn reset(&mut self) -> Result<()>;

    /// Serial numbers of all connected devices matching `vid`/`pid`.
    fn list_devices(vid: u16, pid: u16) -> Result<Vec<String>>
    where
        Self: Sized;
}
