//! Display trait for the 8x8 LED matrix cascade

/// An 8x8 glyph, one byte per row
pub type Image = [u8; 8];

/// Trait for drawing on a cascade of 8x8 LED matrices
///
/// Positions are logical digit (row register) indices; each chip in the
/// cascade spans eight of them.
#[allow(async_fn_in_trait)]
pub trait MatrixDisplay {
    /// Error type for display writes
    type Error;

    /// Write an 8-row bitmap starting at `pos`, clipped at the last digit
    fn draw_image(&mut self, pos: u8, image: &Image) -> Result<(), Self::Error>;

    /// Draw a single character from the 8x8 glyph table at `pos`
    fn draw_char(&mut self, pos: u8, c: char) -> Result<(), Self::Error>;

    /// Scroll `text` across the cascade and return once it has been shown
    async fn draw_string(&mut self, text: &str) -> Result<(), Self::Error>;

    /// Draw a glyph packed as a little-endian `u64` (row 0 in the low byte)
    fn draw_packed(&mut self, pos: u8, packed: u64) -> Result<(), Self::Error> {
        self.draw_image(pos, &packed.to_le_bytes())
    }
}
