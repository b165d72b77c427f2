//! RP2040-specific HAL for the keypad quiz firmware
//!
//! Implementations of the shared `keyquiz-hal` traits over `embassy-rp`:
//!
//! - Pin bank for taking GPIOs by number at runtime
//! - Flex-pin [`GpioBank`](keyquiz_hal::gpio::GpioBank) for the keypad matrix
//! - Blocking SPI0 host with per-device chip select
//! - Monotonic clock backed by `embassy-time`

#![no_std]

pub mod gpio;
pub mod pins;
pub mod spi;
pub mod time;

pub use gpio::FlexBank;
pub use pins::{PinBank, PinError, SpiPeripherals};
pub use spi::{Rp2040SpiDevice, Rp2040SpiHost, SharedBus, SpiError};
pub use time::EmbassyClock;
