//! SPI setup and VBUS current measurement through the LTC2312 ADC.

use crate::bridge::{Bridge, ClockFrequency, ClockPhase, ClockPolarity, CsMode, SpiMode};
use crate::consts::{self, spi};
use crate::delay::Delay;
use crate::device::Itusb1Device;
use crate::error::{Error, ErrorLog};
use log::{debug, trace};

/// SPI mode of the ADC channel.
pub const ADC_SPI_MODE: SpiMode = SpiMode {
    cs_mode: CsMode::PushPull,
    clock: ClockFrequency::Khz1500,
    polarity: ClockPolarity::Cpol0,
    phase: ClockPhase::Cpha0,
};

/// Decodes a two-byte LTC2312 result into its 12-bit code.
///
/// Anything other than exactly two bytes decodes to 0.
#[inline]
pub fn decode_raw_current(bytes: &[u8]) -> u16 {
    match bytes {
        [b0, b1] => (u16::from(*b0) << 4) | (u16::from(*b1) >> 4),
        _ => 0,
    }
}

/// Converts a sum of `samples` raw codes to milliamps.
#[inline]
pub fn codes_to_milliamps(code_sum: u32, samples: usize) -> f32 {
    code_sum as f32 / (consts::CURRENT_CODES_PER_MA * samples as f32)
}

impl<B: Bridge, D: Delay> Itusb1Device<B, D> {
    // One conversion result. A failed or short read yields 0; the log says
    // why.
    fn raw_current(&mut self, errors: &mut ErrorLog) -> u16 {
        match self
            .bridge
            .spi_read(spi::ADC_READ_LEN, spi::EP_IN, spi::EP_OUT)
        {
            Ok(bytes) if bytes.len() == spi::ADC_READ_LEN => {
                let code = decode_raw_current(&bytes);
                trace!("ADC read {:02X?} -> code {}", bytes, code);
                code
            }
            Ok(bytes) => {
                errors.record(Error::ShortRead {
                    expected: spi::ADC_READ_LEN,
                    actual: bytes.len(),
                });
                0
            }
            Err(e) => {
                errors.record(e);
                0
            }
        }
    }

    /// Prepares the fixture for current measurements. Call once after
    /// [`open`](Self::open).
    ///
    /// Configures SPI channel 0 for the ADC and wakes the ADC up with a
    /// throwaway conversion.
    pub fn setup(&mut self, errors: &mut ErrorLog) {
        debug!("Setting up ADC channel: {:?}", ADC_SPI_MODE);
        errors.check(self.bridge.configure_spi_mode(spi::ADC_CHANNEL, ADC_SPI_MODE));
        errors.check(self.bridge.disable_spi_delays(spi::ADC_CHANNEL));
        errors.check(self.bridge.select_cs(spi::ADC_CHANNEL));
        self.raw_current(errors);
        self.delay.delay(consts::ADC_WAKE_UP_DELAY);
        errors.check(self.bridge.disable_cs(spi::ADC_CHANNEL));
    }

    /// Measures VBUS current in milliamps, averaged over
    /// [`CURRENT_SAMPLES`](consts::CURRENT_SAMPLES) conversions.
    ///
    /// Requires [`setup`](Self::setup) to have configured the SPI channel.
    /// Failed conversions count as zero.
    pub fn current(&mut self, errors: &mut ErrorLog) -> f32 {
        errors.check(self.bridge.select_cs(spi::ADC_CHANNEL));
        // The ADC returns the previous conversion; discard it
        self.raw_current(errors);
        let code_sum: u32 = (0..consts::CURRENT_SAMPLES)
            .map(|_| u32::from(self.raw_current(errors)))
            .sum();
        self.delay.delay(consts::CS_DISABLE_DELAY);
        errors.check(self.bridge.disable_cs(spi::ADC_CHANNEL));
        let current = codes_to_milliamps(code_sum, consts::CURRENT_SAMPLES);
        debug!("VBUS current: {:.2} mA (code sum {})", current, code_sum);
        current
    }
}
