//! Random source for problem generation

use keyquiz_core::traits::RandomSource;
use rand_core::RngCore;

/// Adapts any `rand_core` generator to [`RandomSource`]
pub struct Rng<R>(pub R);

impl<R: RngCore> RandomSource for Rng<R> {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }
}
