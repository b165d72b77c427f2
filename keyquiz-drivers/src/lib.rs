//! Hardware driver implementations
//!
//! Concrete implementations of the traits defined in keyquiz-core:
//!
//! - MAX7219 cascaded LED matrix driver with 8x8 and 7-segment fonts
//! - Row-driven matrix keypad scanner

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod display;
pub mod keypad;
