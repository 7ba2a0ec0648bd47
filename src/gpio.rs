use crate::consts::gpio as consts;
use crate::error::{Error, Result};

/// Represents a valid CP2130 GPIO line (GPIO.0 to GPIO.10).
/// Use `GpioLine::new(num)` to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GpioLine(u8);

impl GpioLine {
    /// Creates a new GpioLine, returning an error if the number is out of range (0-10).
    pub fn new(line: u8) -> Result<Self> {
        if line <= consts::MAX_LINE {
            Ok(GpioLine(line))
        } else {
            Err(Error::PinArgumentOutOfRange {
                pin: line,
                message: "CP2130 GPIO lines are numbered 0-10".to_string(),
            })
        }
    }

    /// Returns the underlying line number (0-10).
    #[inline]
    pub fn number(&self) -> u8 {
        self.0
    }

    /// Returns the bit this line occupies in the CP2130 GPIO value word.
    #[inline]
    pub fn mask(&self) -> u16 {
        match self.0 {
            0 => consts::BM_GPIO0,
            1 => consts::BM_GPIO1,
            2 => consts::BM_GPIO2,
            3 => consts::BM_GPIO3,
            4 => consts::BM_GPIO4,
            5 => consts::BM_GPIO5,
            6 => consts::BM_GPIO6,
            7 => consts::BM_GPIO7,
            8 => consts::BM_GPIO8,
            9 => consts::BM_GPIO9,
            _ => consts::BM_GPIO10,
        }
    }
}

/// Fixture signals carried on GPIO lines.
///
/// All three are active-low on the board. Everything in this crate above the
/// [`Bridge`](crate::Bridge) boundary deals in logical (active-high) values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// VBUS enable (`!UPEN`, GPIO.1). Output.
    UsbPower,
    /// Data lines enable (`!UDEN`, GPIO.2). Output.
    UsbData,
    /// Overcurrent flag (`!UDOC`, GPIO.3). Input.
    Overcurrent,
}

impl Signal {
    pub fn line(self) -> GpioLine {
        GpioLine(match self {
            Signal::UsbPower => consts::LINE_UPEN,
            Signal::UsbData => consts::LINE_UDEN,
            Signal::Overcurrent => consts::LINE_UDOC,
        })
    }

    /// Physical line level for a logical value.
    #[inline]
    pub fn to_physical(logical: bool) -> bool {
        !logical
    }

    /// Logical value for a physical line level.
    #[inline]
    pub fn from_physical(physical: bool) -> bool {
        !physical
    }
}

/// The VBUS/data switch pair seen as one state.
///
/// `DataOnly` and `PowerOnly` should never persist; [`attach`] collapses them
/// to `Off` before powering up.
///
/// [`attach`]: crate::Itusb1Device::attach
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsbState {
    Off,
    DataOnly,
    PowerOnly,
    On,
}

impl UsbState {
    pub fn from_lines(power: bool, data: bool) -> Self {
        match (power, data) {
            (false, false) => UsbState::Off,
            (false, true) => UsbState::DataOnly,
            (true, false) => UsbState::PowerOnly,
            (true, true) => UsbState::On,
        }
    }

    pub fn power(self) -> bool {
        matches!(self, UsbState::PowerOnly | UsbState::On)
    }

    pub fn data(self) -> bool {
        matches!(self, UsbState::DataOnly | UsbState::On)
    }

    /// True when VBUS and data agree.
    pub fn is_consistent(self) -> bool {
        self.power() == self.data()
    }
}
