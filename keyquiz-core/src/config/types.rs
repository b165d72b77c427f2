//! Configuration type definitions

use heapless::Vec;

/// Maximum keypad rows
pub const MAX_ROWS: usize = 8;

/// Maximum keypad columns
pub const MAX_COLS: usize = 8;

/// Maximum keys in a layout (`MAX_ROWS * MAX_COLS`)
pub const MAX_KEYS: usize = MAX_ROWS * MAX_COLS;

/// Default 4x4 key map, row-major
pub const DEFAULT_KEYS: &str = "123/456*789-.0^+";

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AppConfig {
    /// LED matrix cascade
    pub display: DisplayConfig,
    /// Matrix keypad wiring and timing
    pub keypad: KeypadConfig,
    /// Quiz rules and pacing
    pub quiz: QuizConfig,
}

/// LED matrix cascade configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayConfig {
    /// Number of chained chips (1-8)
    pub cascade_size: u8,
    /// Addressable digits, 0 = cascade_size * 8
    pub digits: u8,
    /// Reverse digit order (modules mounted upside down)
    pub mirrored: bool,
    /// Initial brightness (0-15)
    pub brightness: u8,
    /// SPI clock in Hz
    pub clock_hz: u32,
    /// Chip-select (LOAD) pin
    pub cs_pin: u8,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            cascade_size: 1,
            digits: 0,
            mirrored: true,
            brightness: 0,
            clock_hz: 10_000_000,
            cs_pin: 17,
        }
    }
}

/// Matrix keypad configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeypadConfig {
    /// Row pins, top to bottom (driven)
    pub rows: Vec<u8, MAX_ROWS>,
    /// Column pins, left to right (sampled)
    pub cols: Vec<u8, MAX_COLS>,
    /// Symbols, row-major, `rows.len() * cols.len()` entries
    pub keys: Vec<char, MAX_KEYS>,
    /// Delay before re-reading a candidate press
    pub debounce_ms: u32,
    /// Delay after a confirmed press so the key can be released
    pub settle_ms: u32,
    /// Interval between scans while waiting for a key
    pub poll_ms: u32,
}

impl Default for KeypadConfig {
    fn default() -> Self {
        let mut rows = Vec::new();
        let mut cols = Vec::new();
        let mut keys = Vec::new();
        // Capacities exceed the defaults, pushes cannot fail
        let _ = rows.extend_from_slice(&[2, 3, 4, 5]);
        let _ = cols.extend_from_slice(&[6, 7, 8, 9]);
        for c in DEFAULT_KEYS.chars() {
            let _ = keys.push(c);
        }

        Self {
            rows,
            cols,
            keys,
            debounce_ms: 50,
            settle_ms: 200,
            poll_ms: 10,
        }
    }
}

/// Quiz rules and pacing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QuizConfig {
    /// Answer time budget at level 0
    pub initial_budget_ms: u32,
    /// Budget never drops below this
    pub min_budget_ms: u32,
    /// Budget reduction when leaving level 0
    pub level_step_ms: u32,
    /// Extra reduction per level already reached
    pub level_step_growth_ms: u32,
    /// Consecutive correct answers needed to level up
    pub streak_to_level: u8,
    /// Operands are drawn from `0..max_operand` (1-5, answers stay single-digit)
    pub max_operand: u8,
    /// Delay between problem scroll repeats
    pub refresh_ms: u32,
    /// How long answer feedback stays on screen
    pub feedback_ms: u32,
    /// Pause between level-up animation frames
    pub level_up_ms: u32,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            initial_budget_ms: 15_000,
            min_budget_ms: 1_000,
            level_step_ms: 1_000,
            level_step_growth_ms: 50,
            streak_to_level: 5,
            max_operand: 5,
            refresh_ms: 600,
            feedback_ms: 1_000,
            level_up_ms: 400,
        }
    }
}
