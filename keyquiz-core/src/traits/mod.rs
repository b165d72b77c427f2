//! Hardware abstraction traits
//!
//! These traits define the interface between the quiz logic and the
//! concrete drivers in `keyquiz-drivers`.

pub mod display;
pub mod keypad;
pub mod random;

pub use display::MatrixDisplay;
pub use keypad::KeyScanner;
pub use random::RandomSource;
