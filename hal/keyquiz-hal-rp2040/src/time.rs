//! Monotonic clock over the embassy time driver

use embassy_time::Instant;
use keyquiz_hal::time::Clock;

/// [`Clock`] reading `embassy_time::Instant`
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}
