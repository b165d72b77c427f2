//! Blocking SPI0 host with per-device chip select
//!
//! The bus peripheral lives in a critical-section mutex so devices can be
//! handed to different tasks. Each device owns its chip-select output and
//! reapplies its own clock configuration before every transaction.

use core::cell::RefCell;

use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::SPI0;
use embassy_rp::spi::{self, Blocking, Spi};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use keyquiz_hal::gpio::PinId;
use keyquiz_hal::spi::{Phase, Polarity, SpiConfig, SpiDevice, SpiHost};

use crate::pins::{PinBank, PinError, SpiPeripherals};

/// Highest SPI0 clock at the default 125 MHz system clock
pub const MAX_FREQUENCY_HZ: u32 = 62_500_000;

/// SPI0 in blocking, transmit-only mode
pub type Spi0 = Spi<'static, SPI0, Blocking>;

/// SPI0 shared between devices
pub type SharedBus = Mutex<CriticalSectionRawMutex, RefCell<Spi0>>;

/// SPI errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiError {
    /// Requested clock is zero or above [`MAX_FREQUENCY_HZ`]
    Frequency,
    /// Chip-select pin unavailable
    Pin(PinError),
    /// Transfer failed
    Bus,
}

/// Create the display bus on SPI0
pub fn new_bus(p: SpiPeripherals) -> SharedBus {
    let spi = Spi::new_blocking_txonly(p.spi, p.sck, p.mosi, spi::Config::default());
    Mutex::new(RefCell::new(spi))
}

/// Attaches devices to a shared SPI0 bus, taking chip selects from a pin bank
pub struct Rp2040SpiHost<'p> {
    bus: &'static SharedBus,
    pins: &'p mut PinBank,
}

impl<'p> Rp2040SpiHost<'p> {
    pub fn new(bus: &'static SharedBus, pins: &'p mut PinBank) -> Self {
        Self { bus, pins }
    }
}

impl SpiHost for Rp2040SpiHost<'_> {
    type Device = Rp2040SpiDevice;
    type Error = SpiError;

    fn attach(&mut self, cs_pin: PinId, config: SpiConfig) -> Result<Rp2040SpiDevice, SpiError> {
        if config.frequency == 0 || config.frequency > MAX_FREQUENCY_HZ {
            return Err(SpiError::Frequency);
        }

        let cs = self.pins.take(cs_pin).map_err(SpiError::Pin)?;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "SPI0: device on GPIO{} at {} Hz",
            cs_pin,
            config.frequency
        );

        Ok(Rp2040SpiDevice {
            bus: self.bus,
            cs: Output::new(cs, Level::High),
            config: rp_config(config),
        })
    }

    /// The chip-select output is released to its reset state; it does not
    /// return to the pin bank.
    fn detach(&mut self, mut device: Rp2040SpiDevice) -> Result<(), SpiError> {
        device.cs.set_high();
        Ok(())
    }
}

/// One chip select on the shared bus
pub struct Rp2040SpiDevice {
    bus: &'static SharedBus,
    cs: Output<'static>,
    config: spi::Config,
}

impl SpiDevice for Rp2040SpiDevice {
    type Error = SpiError;

    fn transmit(&mut self, data: &[u8]) -> Result<(), SpiError> {
        self.bus.lock(|bus| {
            let mut bus = bus.borrow_mut();
            bus.set_config(&self.config);

            self.cs.set_low();
            let result = bus.blocking_write(data);
            self.cs.set_high();

            result.map_err(|_| SpiError::Bus)
        })
    }
}

fn rp_config(config: SpiConfig) -> spi::Config {
    let (polarity, phase) = config.mode.into();

    let mut rp = spi::Config::default();
    rp.frequency = config.frequency;
    rp.polarity = match polarity {
        Polarity::IdleLow => spi::Polarity::IdleLow,
        Polarity::IdleHigh => spi::Polarity::IdleHigh,
    };
    rp.phase = match phase {
        Phase::CaptureOnFirstTransition => spi::Phase::CaptureOnFirstTransition,
        Phase::CaptureOnSecondTransition => spi::Phase::CaptureOnSecondTransition,
    };
    rp
}
