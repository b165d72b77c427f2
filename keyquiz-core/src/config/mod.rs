//! Configuration types and parsing
//!
//! Board configuration lives in a TOML file embedded into the firmware and
//! parsed at boot. Every key is optional; missing keys keep the defaults
//! below.

pub mod toml;
pub mod types;

pub use self::toml::{parse_config, ParseError};
pub use types::{
    AppConfig, DisplayConfig, KeypadConfig, QuizConfig, MAX_COLS, MAX_KEYS, MAX_ROWS,
};
