//! Time abstractions
//!
//! Delays use `embedded_hal_async::delay::DelayNs`; this module only adds
//! the monotonic clock needed to measure deadlines.

/// Monotonic millisecond clock
pub trait Clock {
    /// Milliseconds since an arbitrary fixed epoch (usually boot)
    fn now_ms(&self) -> u64;

    /// Milliseconds elapsed since `start`
    fn elapsed_ms(&self, start: u64) -> u64 {
        self.now_ms().saturating_sub(start)
    }
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}
