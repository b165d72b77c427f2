//! Messages exchanged between the quiz tasks

/// Capacity of each quiz channel
pub const QUEUE_DEPTH: usize = 10;

/// Producer to responder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Request {
    /// Scan the keypad for up to `budget_ms` and report the result
    NeedAnswer {
        /// Time the player has to answer
        budget_ms: u32,
    },
    /// Stop the responder loop
    Shutdown,
}

/// Responder to producer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Answer {
    /// A debounced key press
    Key(char),
    /// The budget ran out with no key pressed
    Timeout,
}

impl From<Option<char>> for Answer {
    fn from(scan: Option<char>) -> Self {
        match scan {
            Some(key) => Answer::Key(key),
            None => Answer::Timeout,
        }
    }
}
