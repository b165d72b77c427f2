//! LED display drivers

pub mod font;
pub mod max7219;

pub use max7219::{DecodeMode, Max7219, Max7219Config, Max7219Error};
