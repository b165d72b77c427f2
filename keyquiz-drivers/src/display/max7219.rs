//! MAX7219 LED driver, cascaded over SPI
//!
//! Each chip drives eight digit registers. On an 8x8 matrix module a digit
//! register is one row of the matrix, so "digit" and "row" are used
//! interchangeably below.
//!
//! # Wire format
//!
//! Every command is a 16-bit word `(register << 8) | value`, shifted out
//! register byte first. The chips form one long shift register, so a
//! transaction always carries exactly one word per chip:
//! - broadcast writes repeat the word `cascade_size` times
//! - chip-addressed writes place the word in the chip's slot and fill
//!   the other slots with no-op words
//!
//! Data latches when chip select is released at the end of the transaction.

use embedded_hal_async::delay::DelayNs;
use heapless::Vec;
use keyquiz_core::config::DisplayConfig;
use keyquiz_core::traits::display::{Image, MatrixDisplay};
use keyquiz_hal::gpio::PinId;
use keyquiz_hal::spi::{Mode, SpiConfig, SpiDevice, SpiHost};

use super::font;

/// MAX7219 register addresses
pub mod reg {
    /// No-op, used to pad chip-addressed writes
    pub const NO_OP: u8 = 0x00;
    /// First digit register; digits 0-7 are 0x01-0x08
    pub const DIGIT_0: u8 = 0x01;
    /// Code-B decode enable per digit
    pub const DECODE_MODE: u8 = 0x09;
    /// Brightness (PWM duty)
    pub const INTENSITY: u8 = 0x0A;
    /// Number of scanned digits minus one
    pub const SCAN_LIMIT: u8 = 0x0B;
    /// 0 = shutdown, 1 = normal operation
    pub const SHUTDOWN: u8 = 0x0C;
    /// All segments on when set
    pub const DISPLAY_TEST: u8 = 0x0F;
}

/// Maximum chips in one cascade
pub const MAX_CASCADE_SIZE: u8 = 8;

/// Digit registers per chip
pub const DIGITS_PER_CHIP: u8 = 8;

/// Maximum intensity register value
pub const MAX_BRIGHTNESS: u8 = 15;

/// Maximum SPI clock supported by the chip
pub const MAX_CLOCK_HZ: u32 = 10_000_000;

/// Delay between frames while scrolling
pub const SCROLL_FRAME_MS: u32 = 100;

/// Longest text [`Max7219::draw_string`] accepts
pub const MAX_SCROLL_CHARS: usize = 32;

/// Decimal point segment
const DECIMAL_POINT: u8 = 0x80;

const MAX_TRANSACTION: usize = MAX_CASCADE_SIZE as usize * 2;

/// MAX7219 errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Max7219Error<E> {
    /// Argument outside the device's configured range
    InvalidArgument,
    /// SPI transfer or attach failed
    Bus(E),
}

/// Digit decoding performed by the chip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeMode {
    /// Register values are segment (or matrix row) bitmaps
    Raw,
    /// Register values are Code-B characters
    Bcd,
}

impl DecodeMode {
    /// Decode-mode register value (applies to all eight digits)
    pub fn register_value(self) -> u8 {
        match self {
            DecodeMode::Raw => 0x00,
            DecodeMode::Bcd => 0xFF,
        }
    }

    /// Register value that lights nothing
    pub fn blank(self) -> u8 {
        match self {
            DecodeMode::Raw => 0x00,
            DecodeMode::Bcd => font::BCD_BLANK,
        }
    }
}

/// Cascade geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Max7219Config {
    /// Chips in the chain (1-8)
    pub cascade_size: u8,
    /// Addressable digits; 0 selects `cascade_size * 8`
    pub digits: u8,
    /// Reverse the digit order
    pub mirrored: bool,
}

impl Default for Max7219Config {
    fn default() -> Self {
        Self {
            cascade_size: 1,
            digits: 0,
            mirrored: true,
        }
    }
}

impl From<&DisplayConfig> for Max7219Config {
    fn from(config: &DisplayConfig) -> Self {
        Self {
            cascade_size: config.cascade_size,
            digits: config.digits,
            mirrored: config.mirrored,
        }
    }
}

#[derive(Clone, Copy)]
enum Target {
    All,
    Chip(usize),
}

/// A chain of MAX7219 chips behind one chip select
pub struct Max7219<S, D> {
    device: S,
    delay: D,
    cascade_size: u8,
    digits: u8,
    mirrored: bool,
    decode: DecodeMode,
    brightness: u8,
    shutdown: bool,
    /// Last value written to each chip's digit registers
    registers: [[u8; DIGITS_PER_CHIP as usize]; MAX_CASCADE_SIZE as usize],
}

impl<S: SpiDevice, D: DelayNs> Max7219<S, D> {
    /// Attach a cascade to `host` on chip select `cs_pin`
    ///
    /// The device runs in SPI mode 0 at `clock_hz`, which must be in
    /// `1..=10 MHz`. Call [`Max7219::initialize`] before drawing.
    pub fn attach<H>(
        host: &mut H,
        cs_pin: PinId,
        clock_hz: u32,
        config: Max7219Config,
        delay: D,
    ) -> Result<Self, Max7219Error<H::Error>>
    where
        H: SpiHost<Device = S>,
    {
        if clock_hz == 0 || clock_hz > MAX_CLOCK_HZ {
            return Err(Max7219Error::InvalidArgument);
        }

        let spi_config = SpiConfig {
            frequency: clock_hz,
            mode: Mode::Mode0,
        };
        let device = host.attach(cs_pin, spi_config).map_err(Max7219Error::Bus)?;

        Ok(Self::new(device, config, delay))
    }

    /// Wrap an already attached bus device
    pub fn new(device: S, config: Max7219Config, delay: D) -> Self {
        Self {
            device,
            delay,
            cascade_size: config.cascade_size,
            digits: config.digits,
            mirrored: config.mirrored,
            decode: DecodeMode::Raw,
            brightness: 0,
            shutdown: true,
            registers: [[0; DIGITS_PER_CHIP as usize]; MAX_CASCADE_SIZE as usize],
        }
    }

    /// Release the bus device back to `host`
    pub fn detach<H>(self, host: &mut H) -> Result<(), H::Error>
    where
        H: SpiHost<Device = S>,
    {
        host.detach(self.device)
    }

    /// Number of chips in the chain
    pub fn cascade_size(&self) -> u8 {
        self.cascade_size
    }

    /// Number of addressable digits
    pub fn digit_count(&self) -> u8 {
        self.digits
    }

    /// Whether digit order is reversed
    pub fn is_mirrored(&self) -> bool {
        self.mirrored
    }

    /// Current decode mode
    pub fn decode_mode(&self) -> DecodeMode {
        self.decode
    }

    /// Last brightness written
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Whether the chips are in shutdown
    pub fn is_shut_down(&self) -> bool {
        self.shutdown
    }

    /// Validate the geometry and bring the chips to a known state
    ///
    /// Sequence: shutdown, display test off, scan all 8 digits, raw decode
    /// (which clears), brightness 0, wake up. Stops at the first failed
    /// write; earlier writes are not undone.
    pub fn initialize(&mut self) -> Result<(), Max7219Error<S::Error>> {
        if self.cascade_size == 0 || self.cascade_size > MAX_CASCADE_SIZE {
            return Err(Max7219Error::InvalidArgument);
        }

        let max_digits = self.cascade_size * DIGITS_PER_CHIP;
        if self.digits > max_digits {
            return Err(Max7219Error::InvalidArgument);
        }
        if self.digits == 0 {
            self.digits = max_digits;
        }

        self.set_shutdown(true)?;
        self.write(Target::All, reg::DISPLAY_TEST, 0)?;
        self.write(Target::All, reg::SCAN_LIMIT, DIGITS_PER_CHIP - 1)?;
        self.set_decode_mode(DecodeMode::Raw)?;
        self.set_brightness(0)?;
        self.set_shutdown(false)?;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "MAX7219: {} chips, {} digits, mirrored={}",
            self.cascade_size,
            self.digits,
            self.mirrored
        );

        Ok(())
    }

    /// Switch decode mode on every chip and clear the display
    pub fn set_decode_mode(&mut self, mode: DecodeMode) -> Result<(), Max7219Error<S::Error>> {
        self.write(Target::All, reg::DECODE_MODE, mode.register_value())?;
        self.decode = mode;
        self.clear()
    }

    /// Set brightness on every chip (0-15)
    pub fn set_brightness(&mut self, value: u8) -> Result<(), Max7219Error<S::Error>> {
        if value > MAX_BRIGHTNESS {
            return Err(Max7219Error::InvalidArgument);
        }
        self.write(Target::All, reg::INTENSITY, value)?;
        self.brightness = value;
        Ok(())
    }

    /// Enter or leave shutdown on every chip
    pub fn set_shutdown(&mut self, shutdown: bool) -> Result<(), Max7219Error<S::Error>> {
        self.write(Target::All, reg::SHUTDOWN, u8::from(!shutdown))?;
        self.shutdown = shutdown;
        Ok(())
    }

    /// Write one digit register
    ///
    /// `index` is the logical digit; with mirroring enabled digit 0 is the
    /// last physical digit of the chain.
    pub fn set_digit(&mut self, index: u8, value: u8) -> Result<(), Max7219Error<S::Error>> {
        let (chip, local) = self.locate(index).ok_or(Max7219Error::InvalidArgument)?;
        self.write(Target::Chip(chip), reg::DIGIT_0 + local, value)
    }

    /// Last value written to logical digit `index`
    pub fn digit(&self, index: u8) -> Option<u8> {
        let (chip, local) = self.locate(index)?;
        Some(self.registers[chip][local as usize])
    }

    /// Last value written to digit register `local` of chip `chip`
    pub fn register(&self, chip: u8, local: u8) -> Option<u8> {
        if chip >= self.cascade_size.min(MAX_CASCADE_SIZE) || local >= DIGITS_PER_CHIP {
            return None;
        }
        Some(self.registers[chip as usize][local as usize])
    }

    /// Blank every digit on every chip
    pub fn clear(&mut self) -> Result<(), Max7219Error<S::Error>> {
        let blank = self.decode.blank();
        for local in 0..DIGITS_PER_CHIP {
            self.write(Target::All, reg::DIGIT_0 + local, blank)?;
        }
        Ok(())
    }

    /// Render `text` as 7-segment characters starting at digit `start`
    ///
    /// A `.` directly after a character lights that digit's decimal point
    /// instead of taking a digit of its own. Output stops at the last
    /// digit.
    pub fn draw_text(&mut self, start: u8, text: &str) -> Result<(), Max7219Error<S::Error>> {
        let mut chars = text.chars().peekable();
        let mut pos = start;

        while pos < self.digits {
            let Some(c) = chars.next() else {
                break;
            };

            let mut value = match self.decode {
                DecodeMode::Raw => font::seven_segment(c),
                DecodeMode::Bcd => font::bcd(c),
            };
            if chars.peek() == Some(&'.') {
                chars.next();
                value |= DECIMAL_POINT;
            }

            self.set_digit(pos, value)?;
            pos += 1;
        }

        Ok(())
    }

    /// Write eight rows starting at digit `start`, clipped at the last digit
    pub fn draw_image(&mut self, start: u8, image: &Image) -> Result<(), Max7219Error<S::Error>> {
        for (offset, &row) in image.iter().enumerate() {
            let pos = start as usize + offset;
            if pos >= self.digits as usize {
                break;
            }
            self.set_digit(pos as u8, row)?;
        }
        Ok(())
    }

    /// Draw the 8x8 glyph for `c` at digit `pos`
    pub fn draw_char(&mut self, pos: u8, c: char) -> Result<(), Max7219Error<S::Error>> {
        if c == '\0' {
            return Err(Max7219Error::InvalidArgument);
        }
        self.draw_image(pos, &font::glyph_rows(c))
    }

    /// Show `text` as 8x8 glyphs, one per chip
    ///
    /// Text that fits the chain is drawn once and the remaining chips are
    /// blanked. Longer text scrolls one column per frame, pausing
    /// [`SCROLL_FRAME_MS`] between frames, for `(len - cascade_size) * 8`
    /// frames.
    pub async fn draw_string(&mut self, text: &str) -> Result<(), Max7219Error<S::Error>> {
        let chips = self.chip_count()?;

        let mut strip: Vec<Image, MAX_SCROLL_CHARS> = Vec::new();
        for c in text.chars() {
            strip
                .push(font::glyph_rows(c))
                .map_err(|_| Max7219Error::InvalidArgument)?;
        }

        if strip.len() <= chips {
            for chip in 0..chips {
                let image = strip.get(chip).copied().unwrap_or([0; 8]);
                self.draw_image(chip_origin(chip), &image)?;
            }
            return Ok(());
        }

        let frames = (strip.len() - chips) * DIGITS_PER_CHIP as usize;
        for offset in 0..frames {
            for chip in 0..chips {
                let first = chip * DIGITS_PER_CHIP as usize + offset;
                let mut image = [0u8; 8];
                for (i, row) in image.iter_mut().enumerate() {
                    let column = first + i;
                    *row = strip[column / 8][column % 8];
                }
                self.draw_image(chip_origin(chip), &image)?;
            }
            self.delay.delay_ms(SCROLL_FRAME_MS).await;
        }

        Ok(())
    }

    /// Map a logical digit to (chip, local register index)
    fn locate(&self, index: u8) -> Option<(usize, u8)> {
        if index >= self.digits || self.digits > self.cascade_size.saturating_mul(DIGITS_PER_CHIP)
        {
            return None;
        }
        let physical = if self.mirrored {
            self.digits - index - 1
        } else {
            index
        };
        let chip = (physical / DIGITS_PER_CHIP) as usize;
        if chip >= MAX_CASCADE_SIZE as usize {
            return None;
        }
        Some((chip, physical % DIGITS_PER_CHIP))
    }

    fn chip_count(&self) -> Result<usize, Max7219Error<S::Error>> {
        match self.cascade_size {
            1..=MAX_CASCADE_SIZE => Ok(self.cascade_size as usize),
            _ => Err(Max7219Error::InvalidArgument),
        }
    }

    /// Send one command word to one chip or to all of them
    fn write(
        &mut self,
        target: Target,
        register: u8,
        value: u8,
    ) -> Result<(), Max7219Error<S::Error>> {
        let chips = self.chip_count()?;

        // Register byte goes out first
        let word = ((register as u16) << 8 | value as u16).to_be_bytes();
        let noop = [reg::NO_OP, 0];

        let mut buf = [0u8; MAX_TRANSACTION];
        for (slot, frame) in buf[..chips * 2].chunks_exact_mut(2).enumerate() {
            let selected = match target {
                Target::All => true,
                Target::Chip(chip) => chip == slot,
            };
            frame.copy_from_slice(if selected { &word } else { &noop });
        }

        self.device
            .transmit(&buf[..chips * 2])
            .map_err(Max7219Error::Bus)?;

        if let Some(local) = register
            .checked_sub(reg::DIGIT_0)
            .filter(|&local| local < DIGITS_PER_CHIP)
        {
            let local = local as usize;
            match target {
                Target::All => {
                    for chip in &mut self.registers[..chips] {
                        chip[local] = value;
                    }
                }
                Target::Chip(chip) => self.registers[chip][local] = value,
            }
        }

        Ok(())
    }
}

fn chip_origin(chip: usize) -> u8 {
    (chip * DIGITS_PER_CHIP as usize) as u8
}

impl<S: SpiDevice, D: DelayNs> MatrixDisplay for Max7219<S, D> {
    type Error = Max7219Error<S::Error>;

    fn draw_image(&mut self, pos: u8, image: &Image) -> Result<(), Self::Error> {
        Max7219::draw_image(self, pos, image)
    }

    fn draw_char(&mut self, pos: u8, c: char) -> Result<(), Self::Error> {
        Max7219::draw_char(self, pos, c)
    }

    async fn draw_string(&mut self, text: &str) -> Result<(), Self::Error> {
        Max7219::draw_string(self, text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use proptest::prelude::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use std::vec::Vec;

    type Log = Rc<RefCell<Vec<Vec<u8>>>>;

    struct MockSpi {
        log: Log,
        fail: Rc<Cell<bool>>,
    }

    impl SpiDevice for MockSpi {
        type Error = ();

        fn transmit(&mut self, data: &[u8]) -> Result<(), ()> {
            if self.fail.get() {
                return Err(());
            }
            self.log.borrow_mut().push(data.to_vec());
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockHost {
        log: Log,
        attached: Vec<(PinId, SpiConfig)>,
        detached: usize,
    }

    impl SpiHost for MockHost {
        type Device = MockSpi;
        type Error = &'static str;

        fn attach(&mut self, cs_pin: PinId, config: SpiConfig) -> Result<MockSpi, Self::Error> {
            if cs_pin > 29 {
                return Err("no such pin");
            }
            self.attached.push((cs_pin, config));
            Ok(MockSpi {
                log: self.log.clone(),
                fail: Rc::new(Cell::new(false)),
            })
        }

        fn detach(&mut self, _device: MockSpi) -> Result<(), Self::Error> {
            self.detached += 1;
            Ok(())
        }
    }

    /// Records total requested delay without waiting
    #[derive(Clone, Default)]
    struct MockDelay {
        elapsed_ms: Rc<Cell<u64>>,
    }

    impl DelayNs for MockDelay {
        async fn delay_ns(&mut self, ns: u32) {
            self.elapsed_ms
                .set(self.elapsed_ms.get() + u64::from(ns) / 1_000_000);
        }

        async fn delay_ms(&mut self, ms: u32) {
            self.elapsed_ms.set(self.elapsed_ms.get() + u64::from(ms));
        }
    }

    struct Fixture {
        display: Max7219<MockSpi, MockDelay>,
        log: Log,
        fail: Rc<Cell<bool>>,
        delay: MockDelay,
    }

    fn fixture(cascade_size: u8, digits: u8, mirrored: bool) -> Fixture {
        let log: Log = Rc::default();
        let fail = Rc::new(Cell::new(false));
        let delay = MockDelay::default();
        let spi = MockSpi {
            log: log.clone(),
            fail: fail.clone(),
        };
        let config = Max7219Config {
            cascade_size,
            digits,
            mirrored,
        };
        Fixture {
            display: Max7219::new(spi, config, delay.clone()),
            log,
            fail,
            delay,
        }
    }

    /// Initialized display with the init traffic dropped from the log
    fn ready(cascade_size: u8, digits: u8, mirrored: bool) -> Fixture {
        let mut f = fixture(cascade_size, digits, mirrored);
        f.display.initialize().unwrap();
        f.log.borrow_mut().clear();
        f
    }

    fn broadcast(chips: usize, register: u8, value: u8) -> Vec<u8> {
        [register, value].repeat(chips)
    }

    #[test]
    fn test_attach_validates_clock() {
        let mut host = MockHost::default();
        let config = Max7219Config::default();

        for clock in [0, MAX_CLOCK_HZ + 1] {
            let result = Max7219::attach(&mut host, 17, clock, config, MockDelay::default());
            assert!(matches!(result, Err(Max7219Error::InvalidArgument)));
        }
        assert!(host.attached.is_empty());

        let display =
            Max7219::attach(&mut host, 17, MAX_CLOCK_HZ, config, MockDelay::default()).unwrap();
        assert_eq!(
            host.attached,
            [(
                17,
                SpiConfig {
                    frequency: MAX_CLOCK_HZ,
                    mode: Mode::Mode0
                }
            )]
        );

        display.detach(&mut host).unwrap();
        assert_eq!(host.detached, 1);
    }

    #[test]
    fn test_attach_reports_host_failure() {
        let mut host = MockHost::default();
        let result = Max7219::attach(
            &mut host,
            40,
            1_000_000,
            Max7219Config::default(),
            MockDelay::default(),
        );
        assert!(matches!(result, Err(Max7219Error::Bus("no such pin"))));
    }

    #[test]
    fn test_initialize_sequence() {
        let mut f = fixture(2, 0, true);
        f.display.initialize().unwrap();

        let mut expected = std::vec![
            broadcast(2, reg::SHUTDOWN, 0),
            broadcast(2, reg::DISPLAY_TEST, 0),
            broadcast(2, reg::SCAN_LIMIT, 7),
            broadcast(2, reg::DECODE_MODE, 0x00),
        ];
        for local in 0..8 {
            expected.push(broadcast(2, reg::DIGIT_0 + local, 0x00));
        }
        expected.push(broadcast(2, reg::INTENSITY, 0));
        expected.push(broadcast(2, reg::SHUTDOWN, 1));

        assert_eq!(*f.log.borrow(), expected);
        assert_eq!(f.display.digit_count(), 16);
        assert_eq!(f.display.decode_mode(), DecodeMode::Raw);
        assert!(!f.display.is_shut_down());
    }

    #[test]
    fn test_initialize_rejects_bad_geometry() {
        for (cascade, digits) in [(0, 0), (9, 0), (2, 17)] {
            let mut f = fixture(cascade, digits, false);
            assert_eq!(f.display.initialize(), Err(Max7219Error::InvalidArgument));
            assert!(f.log.borrow().is_empty());
        }

        let mut f = fixture(2, 12, false);
        f.display.initialize().unwrap();
        assert_eq!(f.display.digit_count(), 12);
    }

    #[test]
    fn test_initialize_stops_at_first_bus_error() {
        let mut f = fixture(1, 0, false);
        f.fail.set(true);
        assert_eq!(f.display.initialize(), Err(Max7219Error::Bus(())));
        assert!(f.log.borrow().is_empty());
        assert!(f.display.is_shut_down());
    }

    #[test]
    fn test_set_digit_addresses_one_chip() {
        let mut f = ready(2, 0, false);
        f.display.set_digit(9, 0xAA).unwrap();
        assert_eq!(*f.log.borrow(), [std::vec![0x00, 0x00, 0x02, 0xAA]]);
        assert_eq!(f.display.digit(9), Some(0xAA));
        assert_eq!(f.display.register(1, 1), Some(0xAA));
    }

    #[test]
    fn test_set_digit_mirrored() {
        let mut f = ready(2, 0, true);
        f.display.set_digit(0, 0x55).unwrap();
        assert_eq!(*f.log.borrow(), [std::vec![0x00, 0x00, 0x08, 0x55]]);
        assert_eq!(f.display.register(1, 7), Some(0x55));
    }

    #[test]
    fn test_set_digit_out_of_range() {
        let mut f = ready(1, 6, false);
        assert_eq!(f.display.set_digit(6, 1), Err(Max7219Error::InvalidArgument));
        assert!(f.log.borrow().is_empty());
        assert_eq!(f.display.digit(6), None);
    }

    #[test]
    fn test_brightness_range() {
        let mut f = ready(1, 0, false);
        assert_eq!(
            f.display.set_brightness(16),
            Err(Max7219Error::InvalidArgument)
        );
        f.display.set_brightness(15).unwrap();
        assert_eq!(*f.log.borrow(), [std::vec![reg::INTENSITY, 15]]);
        assert_eq!(f.display.brightness(), 15);
    }

    #[test]
    fn test_bcd_clear_uses_blank_code() {
        let mut f = ready(2, 0, false);
        f.display.set_decode_mode(DecodeMode::Bcd).unwrap();

        let log = f.log.borrow();
        assert_eq!(log[0], broadcast(2, reg::DECODE_MODE, 0xFF));
        for local in 0..8u8 {
            assert_eq!(log[1 + local as usize], broadcast(2, reg::DIGIT_0 + local, 0x0F));
        }
        assert_eq!(f.display.digit(3), Some(0x0F));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut f = ready(3, 0, true);
        f.display.set_digit(5, 0x7E).unwrap();
        f.display.clear().unwrap();
        let first: Vec<Vec<u8>> = f.log.borrow_mut().drain(..).collect();
        f.display.clear().unwrap();
        assert_eq!(first[1..], f.log.borrow()[..]);
        assert_eq!(f.display.digit(5), Some(0));
    }

    /// Draw onto a cleared display, then onto a freshly initialized one
    fn assert_clear_restores_fresh_state(
        cascade: u8,
        mirrored: bool,
        draw: fn(&mut Max7219<MockSpi, MockDelay>),
    ) {
        let mut fresh = ready(cascade, 0, mirrored);
        draw(&mut fresh.display);

        let mut reused = ready(cascade, 0, mirrored);
        assert_eq!(reused.display.is_mirrored(), mirrored);
        reused.display.draw_char(0, 'Z').unwrap();
        reused.display.set_digit(cascade * 8 - 1, 0xFF).unwrap();
        reused.display.clear().unwrap();
        reused.log.borrow_mut().clear();
        draw(&mut reused.display);

        assert_eq!(*reused.log.borrow(), *fresh.log.borrow());
        assert_eq!(reused.delay.elapsed_ms.get(), fresh.delay.elapsed_ms.get());
        for i in 0..cascade * 8 {
            assert_eq!(reused.display.digit(i), fresh.display.digit(i));
        }
        for chip in 0..cascade {
            for local in 0..DIGITS_PER_CHIP {
                assert_eq!(
                    reused.display.register(chip, local),
                    fresh.display.register(chip, local)
                );
            }
        }
    }

    #[test]
    fn test_clear_then_draw_matches_fresh_draw() {
        for (cascade, mirrored) in [(1, true), (3, false), (2, true)] {
            assert_clear_restores_fresh_state(cascade, mirrored, |d| {
                block_on(d.draw_string("1+2?")).unwrap()
            });
            assert_clear_restores_fresh_state(cascade, mirrored, |d| {
                d.draw_image(3, &[0xAA, 0x55, 1, 2, 3, 4, 5, 6]).unwrap()
            });
            assert_clear_restores_fresh_state(cascade, mirrored, |d| {
                block_on(d.draw_string("7")).unwrap()
            });
        }
    }

    #[test]
    fn test_draw_text_decimal_point() {
        let mut f = ready(1, 0, false);
        f.display.draw_text(0, "1.2").unwrap();
        assert_eq!(f.display.digit(0), Some(0x30 | 0x80));
        assert_eq!(f.display.digit(1), Some(0x6d));
        assert_eq!(f.log.borrow().len(), 2);
    }

    #[test]
    fn test_draw_text_bcd() {
        let mut f = ready(1, 0, false);
        f.display.set_decode_mode(DecodeMode::Bcd).unwrap();
        f.display.draw_text(2, "-E.h?").unwrap();
        assert_eq!(f.display.digit(2), Some(0x0A));
        assert_eq!(f.display.digit(3), Some(0x0B | 0x80));
        assert_eq!(f.display.digit(4), Some(0x0C));
        assert_eq!(f.display.digit(5), Some(0x0F));
    }

    #[test]
    fn test_draw_text_stops_at_last_digit() {
        let mut f = ready(1, 3, false);
        f.display.draw_text(0, "12345").unwrap();
        assert_eq!(f.log.borrow().len(), 3);
        assert_eq!(f.display.digit(2), Some(0x79));
    }

    #[test]
    fn test_draw_image_clips() {
        let mut f = ready(1, 4, false);
        f.display
            .draw_image(2, &[1, 2, 3, 4, 5, 6, 7, 8])
            .unwrap();
        assert_eq!(f.log.borrow().len(), 2);
        assert_eq!(f.display.digit(2), Some(1));
        assert_eq!(f.display.digit(3), Some(2));
    }

    #[test]
    fn test_draw_image_propagates_bus_error() {
        let mut f = ready(1, 0, false);
        f.fail.set(true);
        assert_eq!(
            f.display.draw_image(0, &[0xFF; 8]),
            Err(Max7219Error::Bus(()))
        );
    }

    #[test]
    fn test_draw_char() {
        let mut f = ready(1, 0, false);
        f.display.draw_char(0, '0').unwrap();
        let rows: Vec<u8> = (0..8).map(|i| f.display.digit(i).unwrap()).collect();
        assert_eq!(rows, font::glyph_rows('0'));
        assert_eq!(
            f.display.draw_char(0, '\0'),
            Err(Max7219Error::InvalidArgument)
        );
    }

    #[test]
    fn test_draw_string_fits_without_scrolling() {
        let mut f = ready(2, 0, false);
        block_on(f.display.draw_string("1")).unwrap();

        for i in 0..8 {
            assert_eq!(f.display.digit(i), Some(font::glyph_rows('1')[i as usize]));
            assert_eq!(f.display.digit(8 + i), Some(0));
        }
        assert_eq!(f.delay.elapsed_ms.get(), 0);
    }

    #[test]
    fn test_draw_string_scrolls() {
        let mut f = ready(1, 0, false);
        block_on(f.display.draw_string("12")).unwrap();

        // 8 frames of 8 rows each
        assert_eq!(f.log.borrow().len(), 64);
        assert_eq!(f.delay.elapsed_ms.get(), 8 * u64::from(SCROLL_FRAME_MS));

        // Last frame starts at column 7 of the strip
        let one = font::glyph_rows('1');
        let two = font::glyph_rows('2');
        assert_eq!(f.display.digit(0), Some(one[7]));
        for i in 1..8 {
            assert_eq!(f.display.digit(i), Some(two[i as usize - 1]));
        }
    }

    #[test]
    fn test_draw_string_too_long() {
        let mut f = ready(1, 0, false);
        let text: std::string::String = core::iter::repeat('x').take(MAX_SCROLL_CHARS + 1).collect();
        assert_eq!(
            block_on(f.display.draw_string(&text)),
            Err(Max7219Error::InvalidArgument)
        );
        assert!(f.log.borrow().is_empty());
    }

    proptest! {
        #[test]
        fn prop_set_digit_mapping(
            cascade in 1u8..=8,
            digits_seed in any::<u8>(),
            index_seed in any::<u8>(),
            mirrored in any::<bool>(),
            value in any::<u8>(),
        ) {
            let digits = digits_seed % (cascade * 8) + 1;
            let index = index_seed % digits;
            let mut f = ready(cascade, digits, mirrored);

            f.display.set_digit(index, value).unwrap();

            let physical = if mirrored { digits - index - 1 } else { index };
            let chip = (physical / 8) as usize;
            let local = physical % 8;

            let log = f.log.borrow();
            prop_assert_eq!(log.len(), 1);
            let frame = &log[0];
            prop_assert_eq!(frame.len(), cascade as usize * 2);
            for (slot, word) in frame.chunks(2).enumerate() {
                if slot == chip {
                    prop_assert_eq!(word, &[reg::DIGIT_0 + local, value][..]);
                } else {
                    prop_assert_eq!(word, &[0, 0][..]);
                }
            }
            prop_assert_eq!(f.display.digit(index), Some(value));
        }

        #[test]
        fn prop_brightness_accepts_only_valid_range(value in any::<u8>()) {
            let mut f = ready(1, 0, false);
            let result = f.display.set_brightness(value);
            prop_assert_eq!(result.is_ok(), value <= MAX_BRIGHTNESS);
            prop_assert_eq!(f.log.borrow().len(), usize::from(value <= MAX_BRIGHTNESS));
        }
    }
}
