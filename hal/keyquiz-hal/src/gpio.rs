//! GPIO pin abstractions
//!
//! Pins are addressed by number through a [`GpioBank`] rather than by
//! owned typed pins, so a keypad layout loaded from configuration can name
//! its row and column pins at runtime.

/// GPIO pin number
pub type PinId = u8;

/// Pin direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Digital input
    Input,
    /// Push-pull output
    Output,
}

/// Internal pull resistor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    /// Floating
    None,
    /// Pull-up enabled
    Up,
    /// Pull-down enabled
    Down,
}

/// A set of runtime-configurable digital pins
///
/// Implementations own the underlying hardware pins and look them up by
/// number. Level access is infallible: a pin that is unknown to the bank
/// (or was never configured) reads low and ignores writes.
pub trait GpioBank {
    /// Error type for pin configuration
    type Error;

    /// Configure direction and pull mode of a pin
    fn configure(&mut self, pin: PinId, direction: Direction, pull: Pull)
        -> Result<(), Self::Error>;

    /// Drive an output pin high or low
    fn set_level(&mut self, pin: PinId, high: bool);

    /// Read the current level of a pin
    fn is_high(&self, pin: PinId) -> bool;

    /// Drive an output pin high
    fn set_high(&mut self, pin: PinId) {
        self.set_level(pin, true);
    }

    /// Drive an output pin low
    fn set_low(&mut self, pin: PinId) {
        self.set_level(pin, false);
    }

    /// Check if a pin reads low
    fn is_low(&self, pin: PinId) -> bool {
        !self.is_high(pin)
    }
}
