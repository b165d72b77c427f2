//! Keyquiz Hardware Abstraction Layer
//!
//! This crate defines hardware abstraction traits that can be implemented
//! by chip-specific HALs. Drivers in `keyquiz-drivers` are written against
//! these traits only, so they can be exercised on the host with mock pins
//! and buses.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (keyquiz-firmware)         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  keyquiz-drivers (MAX7219, keypad)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  keyquiz-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  keyquiz-hal-rp2040                     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::GpioBank`] - Pin-addressed digital I/O with runtime configuration
//! - [`spi::SpiHost`], [`spi::SpiDevice`] - Shared SPI bus with attached devices
//! - [`time::Clock`] - Monotonic millisecond clock

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod gpio;
pub mod spi;
pub mod time;

// Re-export key traits at crate root for convenience
pub use gpio::{Direction, GpioBank, PinId, Pull};
pub use spi::{SpiConfig, SpiDevice, SpiHost};
pub use time::Clock;
