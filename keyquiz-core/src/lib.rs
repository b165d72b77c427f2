//! Board-agnostic core logic for the keypad quiz firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits consumed by the quiz (display, keypad, RNG)
//! - Quiz state machine (scoring, streaks, level escalation)
//! - Problem generation
//! - Producer/Responder coordination over bounded channels
//! - Configuration type definitions and the embedded TOML parser

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod quiz;
pub mod traits;
