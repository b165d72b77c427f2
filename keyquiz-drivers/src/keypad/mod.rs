//! Matrix keypad

pub mod layout;
pub mod scanner;

pub use layout::{KeypadLayout, LayoutError};
pub use scanner::{Keypad, KeypadTiming};
