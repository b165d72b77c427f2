//! Keypad wiring: row/column pins and the symbol under each key

use heapless::Vec;
use keyquiz_core::config::{KeypadConfig, MAX_COLS, MAX_KEYS, MAX_ROWS};
use keyquiz_hal::gpio::PinId;

/// Malformed keypad layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LayoutError {
    /// No row pins or no column pins
    Empty,
    /// More than 8 rows or 8 columns
    TooManyPins,
    /// A pin appears more than once across rows and columns
    DuplicatePin(PinId),
    /// Key map does not have exactly `rows * cols` symbols
    KeyCount { expected: usize, found: usize },
}

/// Row and column pins plus a row-major key map
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeypadLayout {
    rows: Vec<PinId, MAX_ROWS>,
    cols: Vec<PinId, MAX_COLS>,
    keys: Vec<char, MAX_KEYS>,
}

impl KeypadLayout {
    /// Build a layout, checking that pins are distinct and every key has a symbol
    pub fn new(rows: &[PinId], cols: &[PinId], keys: &[char]) -> Result<Self, LayoutError> {
        if rows.is_empty() || cols.is_empty() {
            return Err(LayoutError::Empty);
        }

        let rows = Vec::from_slice(rows).map_err(|_| LayoutError::TooManyPins)?;
        let cols = Vec::from_slice(cols).map_err(|_| LayoutError::TooManyPins)?;

        let pins: Vec<PinId, { MAX_ROWS + MAX_COLS }> =
            rows.iter().chain(cols.iter()).copied().collect();
        for (i, pin) in pins.iter().enumerate() {
            if pins[i + 1..].contains(pin) {
                return Err(LayoutError::DuplicatePin(*pin));
            }
        }

        let expected = rows.len() * cols.len();
        if keys.len() != expected {
            return Err(LayoutError::KeyCount {
                expected,
                found: keys.len(),
            });
        }
        // expected <= MAX_KEYS, so this cannot overflow
        let keys = Vec::from_slice(keys).map_err(|_| LayoutError::TooManyPins)?;

        Ok(Self { rows, cols, keys })
    }

    /// Row pins, top to bottom
    pub fn rows(&self) -> &[PinId] {
        &self.rows
    }

    /// Column pins, left to right
    pub fn cols(&self) -> &[PinId] {
        &self.cols
    }

    /// Symbol at `row`, `col`
    pub fn key(&self, row: usize, col: usize) -> Option<char> {
        if row >= self.rows.len() || col >= self.cols.len() {
            return None;
        }
        self.keys.get(row * self.cols.len() + col).copied()
    }
}

impl TryFrom<&KeypadConfig> for KeypadLayout {
    type Error = LayoutError;

    fn try_from(config: &KeypadConfig) -> Result<Self, Self::Error> {
        Self::new(&config.rows, &config.cols, &config.keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: [char; 16] = [
        '1', '2', '3', '/', '4', '5', '6', '*', '7', '8', '9', '-', '.', '0', '^', '+',
    ];

    #[test]
    fn test_from_default_config() {
        let layout = KeypadLayout::try_from(&KeypadConfig::default()).unwrap();
        assert_eq!(layout.rows(), &[2, 3, 4, 5]);
        assert_eq!(layout.cols(), &[6, 7, 8, 9]);
        assert_eq!(layout.key(0, 0), Some('1'));
        assert_eq!(layout.key(0, 3), Some('/'));
        assert_eq!(layout.key(3, 3), Some('+'));
        assert_eq!(layout.key(4, 0), None);
        assert_eq!(layout.key(0, 4), None);
    }

    #[test]
    fn test_rejects_duplicate_pins() {
        assert_eq!(
            KeypadLayout::new(&[2, 3, 4, 5], &[6, 7, 3, 9], &KEYS),
            Err(LayoutError::DuplicatePin(3))
        );
        assert_eq!(
            KeypadLayout::new(&[2, 2], &[6, 7], &KEYS[..4]),
            Err(LayoutError::DuplicatePin(2))
        );
    }

    #[test]
    fn test_rejects_wrong_key_count() {
        assert_eq!(
            KeypadLayout::new(&[2, 3, 4, 5], &[6, 7, 8, 9], &KEYS[..15]),
            Err(LayoutError::KeyCount {
                expected: 16,
                found: 15
            })
        );
    }

    #[test]
    fn test_rejects_empty_and_oversized() {
        assert_eq!(KeypadLayout::new(&[], &[6], &[]), Err(LayoutError::Empty));
        assert_eq!(
            KeypadLayout::new(&[0, 1, 2, 3, 4, 5, 6, 7, 8], &[9], &['x'; 9]),
            Err(LayoutError::TooManyPins)
        );
    }

    #[test]
    fn test_single_key() {
        let layout = KeypadLayout::new(&[10], &[11], &['A']).unwrap();
        assert_eq!(layout.key(0, 0), Some('A'));
    }
}
