//! Recording mock of the CP2130 bridge for fixture-level tests.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use itusb1::consts::gpio::{BM_GPIO1, BM_GPIO2, BM_GPIO3, BM_GPIOS};
use itusb1::{Bridge, Delay, Error, GpioLine, Itusb1Device, Result, SpiMode, UsbConfig};

/// Everything the device asked of the hardware, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Open { vid: u16, pid: u16, serial: Option<String> },
    Close,
    SpiRead { len: usize, endpoint_in: u8, endpoint_out: u8 },
    SelectCs(u8),
    DisableCs(u8),
    ConfigureSpiMode(u8, SpiMode),
    DisableSpiDelays(u8),
    GetGpio(u8),
    SetGpio(u8, bool),
    SetGpios { bits: u16, mask: u16 },
    Reset,
    Delay(Duration),
}

pub type EventLog = Rc<RefCell<Vec<Event>>>;

thread_local! {
    // Enumeration has no bridge instance to carry the switch.
    static FAIL_LIST_DEVICES: Cell<bool> = const { Cell::new(false) };
}

/// Makes `MockBridge::list_devices` fail on the current test thread.
pub fn set_fail_list_devices(fail: bool) {
    FAIL_LIST_DEVICES.with(|f| f.set(fail));
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Debug)]
pub struct MockBridge {
    pub events: EventLog,
    /// Physical GPIO value word, CP2130 layout.
    pub gpio_word: u16,
    pub open: bool,
    pub spi_responses: VecDeque<Result<Vec<u8>>>,
    pub fail_gpio_reads: bool,
    pub fail_gpio_writes: bool,
    pub fail_open: bool,
    pub fail_descriptors: bool,
    pub fail_spi_config: bool,
    pub fail_select_cs: bool,
    pub fail_disable_cs: bool,
    pub manufacturer: Vec<u16>,
    pub product: Vec<u16>,
    pub serial: Vec<u16>,
    pub config: UsbConfig,
}

impl MockBridge {
    /// A fixture with every active-low line high: VBUS off, data off, no overcurrent.
    pub fn new(events: EventLog) -> Self {
        Self {
            events,
            gpio_word: BM_GPIOS,
            open: false,
            spi_responses: VecDeque::new(),
            fail_gpio_reads: false,
            fail_gpio_writes: false,
            fail_open: false,
            fail_descriptors: false,
            fail_spi_config: false,
            fail_select_cs: false,
            fail_disable_cs: false,
            manufacturer: "Bloguetronica".encode_utf16().collect(),
            product: "ITUSB1 USB Test Switch".encode_utf16().collect(),
            serial: "IT-0001".encode_utf16().collect(),
            config: UsbConfig {
                vid: 0x10C4,
                pid: 0x8C52,
                max_power: 0x32,
                power_mode: 0x01,
                major_release: 1,
                minor_release: 0,
                transfer_priority: 0x01,
            },
        }
    }

    /// Sets the logical state of the two switches.
    pub fn with_usb(mut self, power: bool, data: bool) -> Self {
        self.set_logical(BM_GPIO1, power);
        self.set_logical(BM_GPIO2, data);
        self
    }

    pub fn with_overcurrent(mut self, flagged: bool) -> Self {
        self.set_logical(BM_GPIO3, flagged);
        self
    }

    fn set_logical(&mut self, mask: u16, value: bool) {
        // Active-low
        if value {
            self.gpio_word &= !mask;
        } else {
            self.gpio_word |= mask;
        }
    }

    pub fn power(&self) -> bool {
        self.gpio_word & BM_GPIO1 == 0
    }

    pub fn data(&self) -> bool {
        self.gpio_word & BM_GPIO2 == 0
    }

    pub fn queue_spi(&mut self, response: Result<Vec<u8>>) {
        self.spi_responses.push_back(response);
    }

    fn push(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }

    fn transfer_error(operation: &'static str) -> Error {
        Error::Transfer {
            operation,
            message: "injected failure".to_string(),
        }
    }
}

impl Bridge for MockBridge {
    fn open(&mut self, vid: u16, pid: u16, serial: Option<&str>) -> Result<()> {
        self.push(Event::Open {
            vid,
            pid,
            serial: serial.map(String::from),
        });
        if self.fail_open {
            return Err(match serial {
                Some(s) => Error::DeviceNotFoundBySerial {
                    serial: s.to_string(),
                },
                None => Error::DeviceNotFound,
            });
        }
        self.open = true;
        Ok(())
    }

    fn close(&mut self) {
        self.push(Event::Close);
        self.open = false;
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn disconnected(&self) -> bool {
        false
    }

    fn spi_read(&mut self, len: usize, endpoint_in: u8, endpoint_out: u8) -> Result<Vec<u8>> {
        self.push(Event::SpiRead {
            len,
            endpoint_in,
            endpoint_out,
        });
        self.spi_responses
            .pop_front()
            .unwrap_or_else(|| Ok(vec![0; len]))
    }

    fn select_cs(&mut self, channel: u8) -> Result<()> {
        self.push(Event::SelectCs(channel));
        if self.fail_select_cs {
            return Err(Self::transfer_error("selecting chip select"));
        }
        Ok(())
    }

    fn disable_cs(&mut self, channel: u8) -> Result<()> {
        self.push(Event::DisableCs(channel));
        if self.fail_disable_cs {
            return Err(Self::transfer_error("disabling chip select"));
        }
        Ok(())
    }

    fn configure_spi_mode(&mut self, channel: u8, mode: SpiMode) -> Result<()> {
        self.push(Event::ConfigureSpiMode(channel, mode));
        if self.fail_spi_config {
            return Err(Self::transfer_error("configuring SPI mode"));
        }
        Ok(())
    }

    fn disable_spi_delays(&mut self, channel: u8) -> Result<()> {
        self.push(Event::DisableSpiDelays(channel));
        if self.fail_spi_config {
            return Err(Self::transfer_error("setting SPI delays"));
        }
        Ok(())
    }

    fn get_gpio(&mut self, line: GpioLine) -> Result<bool> {
        self.push(Event::GetGpio(line.number()));
        if self.fail_gpio_reads {
            return Err(Self::transfer_error("getting GPIO values"));
        }
        Ok(self.gpio_word & line.mask() != 0)
    }

    fn set_gpio(&mut self, line: GpioLine, value: bool) -> Result<()> {
        self.push(Event::SetGpio(line.number(), value));
        if self.fail_gpio_writes {
            return Err(Self::transfer_error("setting GPIO value"));
        }
        if value {
            self.gpio_word |= line.mask();
        } else {
            self.gpio_word &= !line.mask();
        }
        Ok(())
    }

    fn set_gpios(&mut self, bits: u16, mask: u16) -> Result<()> {
        self.push(Event::SetGpios { bits, mask });
        if self.fail_gpio_writes {
            return Err(Self::transfer_error("setting GPIO values"));
        }
        self.gpio_word = (self.gpio_word & !mask) | (bits & mask);
        Ok(())
    }

    fn manufacturer_desc(&mut self) -> Result<Vec<u16>> {
        if self.fail_descriptors {
            return Err(Self::transfer_error("getting manufacturer descriptor"));
        }
        Ok(self.manufacturer.clone())
    }

    fn product_desc(&mut self) -> Result<Vec<u16>> {
        if self.fail_descriptors {
            return Err(Self::transfer_error("getting product descriptor"));
        }
        Ok(self.product.clone())
    }

    fn serial_desc(&mut self) -> Result<Vec<u16>> {
        if self.fail_descriptors {
            return Err(Self::transfer_error("getting serial descriptor"));
        }
        Ok(self.serial.clone())
    }

    fn usb_config(&mut self) -> Result<UsbConfig> {
        if !self.open {
            return Err(Error::NotOpen);
        }
        Ok(self.config)
    }

    fn reset(&mut self) -> Result<()> {
        self.push(Event::Reset);
        Ok(())
    }

    fn list_devices(vid: u16, pid: u16) -> Result<Vec<String>> {
        if FAIL_LIST_DEVICES.with(|f| f.get()) {
            return Err(Error::Timeout);
        }
        if (vid, pid) == (0x10C4, 0x8C52) {
            Ok(vec!["IT-0001".to_string(), "IT-0002".to_string()])
        } else {
            Ok(Vec::new())
        }
    }
}

/// Records requested delays instead of sleeping.
#[derive(Debug)]
pub struct RecordingDelay {
    pub events: EventLog,
}

impl Delay for RecordingDelay {
    fn delay(&mut self, duration: Duration) {
        self.events.borrow_mut().push(Event::Delay(duration));
    }
}

pub type TestDevice = Itusb1Device<MockBridge, RecordingDelay>;

/// Builds a device around a mock bridge; `configure` adjusts the bridge first.
pub fn test_device(configure: impl FnOnce(MockBridge) -> MockBridge) -> (TestDevice, EventLog) {
    init_logging();
    let events: EventLog = Rc::new(RefCell::new(Vec::new()));
    let bridge = configure(MockBridge::new(events.clone()));
    let delay = RecordingDelay {
        events: events.clone(),
    };
    (Itusb1Device::with_delay(bridge, delay), events)
}

/// Events other than GPIO reads, which only observe state.
pub fn actions(events: &EventLog) -> Vec<Event> {
    events
        .borrow()
        .iter()
        .filter(|e| !matches!(e, Event::GetGpio(_)))
        .cloned()
        .collect()
}

pub fn spi_read_count(events: &EventLog) -> usize {
    events
        .borrow()
        .iter()
        .filter(|e| matches!(e, Event::SpiRead { .. }))
        .count()
}
