//! Dynamic pin allocation for config-driven hardware setup
//!
//! Keypad rows, columns and the display chip select come from
//! `keyquiz.toml`, so pins are handed out by number at runtime. The SPI0
//! clock and data pins are wired to the display bus and kept out of the
//! bank.

use embassy_rp::gpio::AnyPin;
use embassy_rp::peripherals::{PIN_18, PIN_19, SPI0};
use embassy_rp::{Peri, Peripherals};
use keyquiz_hal::gpio::PinId;

/// Number of GPIO pins on RP2040
pub const GPIO_COUNT: usize = 30;

/// SPI0 clock pin driving the display
pub const SPI_SCK_PIN: PinId = 18;

/// SPI0 data-out pin driving the display
pub const SPI_MOSI_PIN: PinId = 19;

/// Error when requesting a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range (0-29 valid)
    InvalidPin,
    /// Pin already taken
    AlreadyTaken,
    /// Pin reserved for the display bus
    Reserved,
    /// Pin was never handed to this bank
    NotClaimed,
}

/// Check that `pin` may be handed out by a [`PinBank`]
pub fn check_pin(pin: PinId) -> Result<(), PinError> {
    if pin as usize >= GPIO_COUNT {
        return Err(PinError::InvalidPin);
    }
    if pin == SPI_SCK_PIN || pin == SPI_MOSI_PIN {
        return Err(PinError::Reserved);
    }
    Ok(())
}

/// Peripherals for the display SPI bus
pub struct SpiPeripherals {
    pub spi: Peri<'static, SPI0>,
    pub sck: Peri<'static, PIN_18>,
    pub mosi: Peri<'static, PIN_19>,
}

/// All general-purpose pins, taken by number
pub struct PinBank {
    pins: [Option<Peri<'static, AnyPin>>; GPIO_COUNT],
}

impl PinBank {
    /// Split the peripherals into the pin bank and the display bus
    pub fn split(p: Peripherals) -> (Self, SpiPeripherals) {
        let pins: [Option<Peri<'static, AnyPin>>; GPIO_COUNT] = [
            Some(p.PIN_0.into()),
            Some(p.PIN_1.into()),
            Some(p.PIN_2.into()),
            Some(p.PIN_3.into()),
            Some(p.PIN_4.into()),
            Some(p.PIN_5.into()),
            Some(p.PIN_6.into()),
            Some(p.PIN_7.into()),
            Some(p.PIN_8.into()),
            Some(p.PIN_9.into()),
            Some(p.PIN_10.into()),
            Some(p.PIN_11.into()),
            Some(p.PIN_12.into()),
            Some(p.PIN_13.into()),
            Some(p.PIN_14.into()),
            Some(p.PIN_15.into()),
            Some(p.PIN_16.into()),
            Some(p.PIN_17.into()),
            None, // GPIO18: SPI0
            None, // GPIO19: SPI0
            Some(p.PIN_20.into()),
            Some(p.PIN_21.into()),
            Some(p.PIN_22.into()),
            Some(p.PIN_23.into()),
            Some(p.PIN_24.into()),
            Some(p.PIN_25.into()),
            Some(p.PIN_26.into()),
            Some(p.PIN_27.into()),
            Some(p.PIN_28.into()),
            Some(p.PIN_29.into()),
        ];
        let spi = SpiPeripherals {
            spi: p.SPI0,
            sck: p.PIN_18,
            mosi: p.PIN_19,
        };
        (Self { pins }, spi)
    }

    /// Take a pin by number
    pub fn take(&mut self, pin: PinId) -> Result<Peri<'static, AnyPin>, PinError> {
        check_pin(pin)?;
        self.pins[pin as usize].take().ok_or(PinError::AlreadyTaken)
    }
}
