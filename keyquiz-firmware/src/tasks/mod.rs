//! Embassy async tasks
//!
//! Each task owns its hardware and communicates via the static channels.

pub mod keypad;
pub mod quiz;

pub use keypad::{keypad_task, Scanner};
pub use quiz::{quiz_task, Display};
