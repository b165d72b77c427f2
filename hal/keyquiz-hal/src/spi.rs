//! SPI bus abstractions
//!
//! A [`SpiHost`] owns the bus peripheral and hands out [`SpiDevice`]
//! handles, one per chip-select line. Each device transaction asserts its
//! chip select for the duration of the write, which is what latches data
//! into shift-register style peripherals such as the MAX7219.

use crate::gpio::PinId;

/// SPI bus master that devices attach to
pub trait SpiHost {
    /// Device handle produced by [`SpiHost::attach`]
    type Device: SpiDevice;

    /// Error type for attach/detach
    type Error;

    /// Register a device on the bus
    ///
    /// Fails if the chip-select pin is unavailable or the bus cannot run
    /// at the requested clock frequency.
    fn attach(&mut self, cs_pin: PinId, config: SpiConfig) -> Result<Self::Device, Self::Error>;

    /// Release a device previously returned by [`SpiHost::attach`]
    fn detach(&mut self, device: Self::Device) -> Result<(), Self::Error>;
}

/// A single device on a shared SPI bus
pub trait SpiDevice {
    /// Error type for SPI operations
    type Error;

    /// Write `data` in one chip-select-framed transaction
    ///
    /// The transaction length in bits is `data.len() * 8`.
    fn transmit(&mut self, data: &[u8]) -> Result<(), Self::Error>;
}

/// SPI configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
    /// Clock polarity and phase
    pub mode: Mode,
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self {
            frequency: 1_000_000, // 1 MHz
            mode: Mode::Mode0,
        }
    }
}

/// SPI clock polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Clock idles low (CPOL=0)
    IdleLow,
    /// Clock idles high (CPOL=1)
    IdleHigh,
}

/// SPI clock phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Data captured on first clock transition (CPHA=0)
    CaptureOnFirstTransition,
    /// Data captured on second clock transition (CPHA=1)
    CaptureOnSecondTransition,
}

/// SPI mode (combined polarity and phase)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Mode 0: CPOL=0, CPHA=0
    Mode0,
    /// Mode 1: CPOL=0, CPHA=1
    Mode1,
    /// Mode 2: CPOL=1, CPHA=0
    Mode2,
    /// Mode 3: CPOL=1, CPHA=1
    Mode3,
}

impl From<Mode> for (Polarity, Phase) {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Mode0 => (Polarity::IdleLow, Phase::CaptureOnFirstTransition),
            Mode::Mode1 => (Polarity::IdleLow, Phase::CaptureOnSecondTransition),
            Mode::Mode2 => (Polarity::IdleHigh, Phase::CaptureOnFirstTransition),
            Mode::Mode3 => (Polarity::IdleHigh, Phase::CaptureOnSecondTransition),
        }
    }
}
