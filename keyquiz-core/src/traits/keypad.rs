//! Keypad scanner trait

/// Trait for a key input source with bounded waiting
#[allow(async_fn_in_trait)]
pub trait KeyScanner {
    /// Wait up to `timeout_ms` for a single debounced key press
    ///
    /// Returns `None` when the deadline passes without a press. The wait
    /// must yield to the executor between polls.
    async fn scan_with_timeout(&mut self, timeout_ms: u32) -> Option<char>;
}
