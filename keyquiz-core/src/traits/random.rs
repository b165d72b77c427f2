//! Random number source for problem generation

/// Source of uniformly distributed 32-bit values
pub trait RandomSource {
    /// Next random value
    fn next_u32(&mut self) -> u32;
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }
}
