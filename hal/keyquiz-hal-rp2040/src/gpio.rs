//! Runtime-numbered GPIO bank over embassy-rp flex pins
//!
//! Keypad pins switch between input and output at configuration time, so
//! each claimed pin is held as a [`Flex`] and reconfigured in place.

use embassy_rp::gpio::{self as rp, Flex, Level};
use keyquiz_hal::gpio::{Direction, GpioBank, PinId, Pull};

use crate::pins::{PinBank, PinError, GPIO_COUNT};

/// A set of GPIOs claimed from a [`PinBank`]
pub struct FlexBank {
    pins: [Option<Flex<'static>>; GPIO_COUNT],
}

impl FlexBank {
    /// Claim `pins` from `bank`
    ///
    /// Pins that cannot be taken are skipped; configuring them later fails
    /// with [`PinError::NotClaimed`].
    pub fn claim(bank: &mut PinBank, pins: impl IntoIterator<Item = PinId>) -> Self {
        let mut slots: [Option<Flex<'static>>; GPIO_COUNT] = core::array::from_fn(|_| None);

        for pin in pins {
            match bank.take(pin) {
                Ok(peri) => slots[pin as usize] = Some(Flex::new(peri)),
                Err(_e) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("GPIO{} unavailable: {}", pin, _e);
                }
            }
        }

        Self { pins: slots }
    }

    fn pin_mut(&mut self, pin: PinId) -> Option<&mut Flex<'static>> {
        self.pins.get_mut(pin as usize).and_then(Option::as_mut)
    }
}

impl GpioBank for FlexBank {
    type Error = PinError;

    fn configure(&mut self, pin: PinId, direction: Direction, pull: Pull) -> Result<(), PinError> {
        let flex = self.pin_mut(pin).ok_or(PinError::NotClaimed)?;

        flex.set_pull(match pull {
            Pull::None => rp::Pull::None,
            Pull::Up => rp::Pull::Up,
            Pull::Down => rp::Pull::Down,
        });
        match direction {
            Direction::Input => flex.set_as_input(),
            Direction::Output => flex.set_as_output(),
        }

        Ok(())
    }

    fn set_level(&mut self, pin: PinId, high: bool) {
        if let Some(flex) = self.pin_mut(pin) {
            flex.set_level(Level::from(high));
        }
    }

    fn is_high(&self, pin: PinId) -> bool {
        self.pins
            .get(pin as usize)
            .and_then(Option::as_ref)
            .is_some_and(|flex| flex.is_high())
    }
}
