//! Row-driven matrix keypad scanner
//!
//! Rows are push-pull outputs held low; columns are inputs with pull-downs.
//! A key press connects one row to one column, so driving a single row high
//! and sampling the columns finds the pressed keys on that row.

use embedded_hal_async::delay::DelayNs;
use keyquiz_core::config::KeypadConfig;
use keyquiz_core::traits::KeyScanner;
use keyquiz_hal::gpio::{Direction, GpioBank, Pull};
use keyquiz_hal::time::Clock;

use super::layout::KeypadLayout;

/// Scanner timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeypadTiming {
    /// Wait before confirming a candidate press
    pub debounce_ms: u32,
    /// Wait after a confirmed press so the key is released before the next scan
    pub settle_ms: u32,
    /// Wait between scans in [`Keypad::scan_with_timeout`]
    pub poll_ms: u32,
}

impl Default for KeypadTiming {
    fn default() -> Self {
        Self {
            debounce_ms: 50,
            settle_ms: 200,
            poll_ms: 10,
        }
    }
}

impl From<&KeypadConfig> for KeypadTiming {
    fn from(config: &KeypadConfig) -> Self {
        Self {
            debounce_ms: config.debounce_ms,
            settle_ms: config.settle_ms,
            poll_ms: config.poll_ms,
        }
    }
}

/// Matrix keypad on a GPIO bank
pub struct Keypad<G, D, C> {
    gpio: G,
    delay: D,
    clock: C,
    layout: KeypadLayout,
    timing: KeypadTiming,
    /// Bit n set when row n configured successfully
    rows_enabled: u8,
    /// Bit n set when column n configured successfully
    cols_enabled: u8,
    failed_pins: u8,
}

impl<G, D, C> Keypad<G, D, C>
where
    G: GpioBank,
    D: DelayNs,
    C: Clock,
{
    /// Configure the row and column pins and return a ready scanner
    ///
    /// A pin that fails to configure is logged and left out of every scan,
    /// so keys on it never register. Check [`Keypad::failed_pins`].
    pub fn configure(
        mut gpio: G,
        layout: KeypadLayout,
        timing: KeypadTiming,
        delay: D,
        clock: C,
    ) -> Self {
        let mut failed_pins = 0;

        let mut rows_enabled = 0u8;
        for (i, &pin) in layout.rows().iter().enumerate() {
            match gpio.configure(pin, Direction::Output, Pull::None) {
                Ok(()) => {
                    gpio.set_low(pin);
                    rows_enabled |= 1 << i;
                }
                Err(_) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("Keypad: row pin {} config failed, disabled", pin);
                    failed_pins += 1;
                }
            }
        }

        let mut cols_enabled = 0u8;
        for (j, &pin) in layout.cols().iter().enumerate() {
            match gpio.configure(pin, Direction::Input, Pull::Down) {
                Ok(()) => cols_enabled |= 1 << j,
                Err(_) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("Keypad: column pin {} config failed, disabled", pin);
                    failed_pins += 1;
                }
            }
        }

        Self {
            gpio,
            delay,
            clock,
            layout,
            timing,
            rows_enabled,
            cols_enabled,
            failed_pins,
        }
    }

    /// Number of pins that could not be configured
    pub fn failed_pins(&self) -> u8 {
        self.failed_pins
    }

    /// Pin layout in use
    pub fn layout(&self) -> &KeypadLayout {
        &self.layout
    }

    /// Scan every row once
    ///
    /// Returns the first debounced press found, lowest row first and then
    /// lowest column. A press waits out the settle time before returning.
    pub async fn scan_once(&mut self) -> Option<char> {
        for row in 0..self.layout.rows().len() {
            if self.rows_enabled & (1 << row) == 0 {
                continue;
            }
            let row_pin = self.layout.rows()[row];

            self.release_rows();
            self.gpio.set_high(row_pin);

            for col in 0..self.layout.cols().len() {
                if self.cols_enabled & (1 << col) == 0 {
                    continue;
                }
                let col_pin = self.layout.cols()[col];
                if self.gpio.is_low(col_pin) {
                    continue;
                }

                self.delay.delay_ms(self.timing.debounce_ms).await;
                if self.gpio.is_high(col_pin) {
                    self.release_rows();
                    self.delay.delay_ms(self.timing.settle_ms).await;

                    let key = self.layout.key(row, col);
                    #[cfg(feature = "defmt")]
                    defmt::debug!("Keypad: {:?} at row {}, col {}", key, row, col);
                    return key;
                }
            }

            self.gpio.set_low(row_pin);
        }

        None
    }

    /// Scan until a key is pressed or `timeout_ms` has elapsed
    pub async fn scan_with_timeout(&mut self, timeout_ms: u32) -> Option<char> {
        let start = self.clock.now_ms();

        while self.clock.elapsed_ms(start) < u64::from(timeout_ms) {
            if let Some(key) = self.scan_once().await {
                return Some(key);
            }
            self.delay.delay_ms(self.timing.poll_ms).await;
        }

        None
    }

    /// Drive every enabled row low
    fn release_rows(&mut self) {
        for (i, &pin) in self.layout.rows().iter().enumerate() {
            if self.rows_enabled & (1 << i) != 0 {
                self.gpio.set_low(pin);
            }
        }
    }
}

impl<G, D, C> KeyScanner for Keypad<G, D, C>
where
    G: GpioBank,
    D: DelayNs,
    C: Clock,
{
    async fn scan_with_timeout(&mut self, timeout_ms: u32) -> Option<char> {
        Keypad::scan_with_timeout(self, timeout_ms).await
    }
}
