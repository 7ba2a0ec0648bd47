use log::warn;
use std::fmt;
use thiserror::Error;

/// Errors that can occur when talking to an ITUSB1 fixture.
///
/// Bridge implementations return these from every [`Bridge`](crate::Bridge)
/// call. The fixture-level operations on [`Itusb1Device`](crate::Itusb1Device)
/// never return them directly (except `open`); they fold them into the
/// caller's [`ErrorLog`] and carry on.
#[derive(Error, Debug)]
pub enum Error {
    /// No device was found with the fixture's vendor/product ID.
    #[error("Device not found with specified VID/PID")]
    DeviceNotFound,
    /// No device was found with the specified serial number.
    #[error("Device not found with serial number '{serial}'")]
    DeviceNotFoundBySerial {
        /// The serial number that was searched for.
        serial: String,
    },
    /// The device exists but is claimed by another process or driver.
    #[error("Device is busy or already claimed")]
    DeviceBusy,
    /// An operation was attempted on a closed handle.
    #[error("Device is not open")]
    NotOpen,
    /// The device went away while it was open.
    #[error("Device was disconnected")]
    Disconnected,
    /// A USB transfer failed.
    #[error("Failed {operation}: {message}")]
    Transfer {
        /// What the bridge was doing, e.g. "setting GPIO values".
        operation: &'static str,
        /// Details reported by the backend.
        message: String,
    },
    /// A read returned a different number of bytes than requested.
    #[error("Short read (expected {expected} bytes, got {actual})")]
    ShortRead {
        /// Number of bytes requested.
        expected: usize,
        /// Number of bytes received.
        actual: usize,
    },
    /// Timeout waiting for device response.
    #[error("Timeout waiting for device response")]
    Timeout,
    /// A USB string descriptor was not valid UTF-16.
    #[error("Invalid UTF-16 in {0} descriptor")]
    InvalidDescriptor(&'static str),
    /// GPIO line number is outside the range of the bridge.
    #[error("GPIO pin {pin} argument out of range (0-10): {message}")]
    PinArgumentOutOfRange {
        /// The invalid line number that was specified.
        pin: u8,
        /// Detailed error message explaining the constraint.
        message: String,
    },
    /// General I/O error during device communication.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Backend-specific error from the bridge implementation.
    #[error("Bridge error: {0}")]
    Bridge(Box<dyn std::error::Error + Send + Sync>),
}

/// Result type alias for bridge and device operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Caller-owned record of failures collected across a chain of operations.
///
/// Multi-step fixture operations (attach, detach, current measurement) keep
/// going after a failed bridge call, so they cannot report through a single
/// `Result`. Each failure is appended here instead, in the order it happened.
/// Nothing in this crate ever clears a log; the caller decides whether the
/// recorded failures make the whole operation a failure.
///
/// ```
/// use itusb1::{Error, ErrorLog};
///
/// let mut errors = ErrorLog::new();
/// let value: u16 = errors.check(Err(Error::Timeout));
/// assert_eq!(value, 0);
/// assert_eq!(errors.count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct ErrorLog {
    errors: Vec<Error>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a failure.
    pub fn record(&mut self, error: Error) {
        warn!("Recorded error #{}: {}", self.errors.len() + 1, error);
        self.errors.push(error);
    }

    /// Unwraps `result`, recording the error and substituting `T::default()` on failure.
    pub fn check<T: Default>(&mut self, result: Result<T>) -> T {
        self.check_or(result, T::default())
    }

    /// Unwraps `result`, recording the error and substituting `fallback` on failure.
    pub fn check_or<T>(&mut self, result: Result<T>, fallback: T) -> T {
        match result {
            Ok(value) => value,
            Err(e) => {
                self.record(e);
                fallback
            }
        }
    }

    /// Number of failures recorded so far.
    pub fn count(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// One human-readable line per recorded failure, oldest first.
    pub fn messages(&self) -> impl Iterator<Item = String> + '_ {
        self.errors.iter().map(|e| e.to_string())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Error> {
        self.errors.iter()
    }

    /// Forgets every recorded failure. Only callers do this.
    pub fn clear(&mut self) {
        self.errors.clear();
    }

    /// Converts the log into a `Result`, failing with the first recorded error.
    pub fn into_result(self) -> Result<()> {
        match self.errors.into_iter().next() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl fmt::Display for ErrorLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", e)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ErrorLog {
    type Item = &'a Error;
    type IntoIter = std::slice::Iter<'a, Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
