//! Glyph tables for the MAX7219
//!
//! The 8x8 tables pack one glyph per `u64`; byte `n` of the little-endian
//! representation is the bitmap for digit register `n`. The 7-segment font
//! is used by [`super::Max7219::draw_text`] in raw decode mode.

/// Glyph shown for characters without an entry in the 8x8 tables
pub const BLANK: u64 = 0;

/// Characters covered by [`SYMBOLS`], same order
pub const SYMBOL_CHARS: [char; 30] = [
    '+', '-', '*', '/', '%', '=', '~', '^', '<', '>', '(', ')', '[', ']', '{', '}', '.', ':',
    ';', ',', '!', '?', '@', '&', '$', '#', '"', '\\', '\'', '`',
];

/// Digits `0`-`9`
pub const NUMBERS: [u64; 10] = [
    0x007e_8181_817e_0000, // 0
    0x0000_0001_ff41_0000, // 1
    0x0000_7189_8583_4100, // 2
    0x0000_6e91_9181_4200, // 3
    0x0000_ff44_2414_0c00, // 4
    0x0000_8e91_9191_f200, // 5
    0x0000_4e91_9191_7e00, // 6
    0x0000_e090_8887_8000, // 7
    0x0000_6e91_9191_6e00, // 8
    0x0000_7e89_8989_7200, // 9
];

/// `A`-`Z`, then `a`-`z`, then the blank glyph
pub const LETTERS: [u64; 53] = [
    0x003f_7f48_487f_3f00, // A
    0x0036_7f49_497f_7f00, // B
    0x0022_6341_417f_3e00, // C
    0x003e_7f41_417f_7f00, // D
    0x0041_4949_497f_7f00, // E
    0x0040_4848_487f_7f00, // F
    0x0026_6745_417f_3e00, // G
    0x007f_7f08_087f_7f00, // H
    0x0000_417f_7f41_0000, // I
    0x0040_7e7f_4107_0600, // J
    0x0041_6336_1c7f_7f00, // K
    0x0001_0101_017f_7f00, // L
    0x7f7f_3018_307f_7f00, // M
    0x7f7f_0c18_307f_7f00, // N
    0x003e_7f41_417f_3e00, // O
    0x0038_7c44_447f_7f00, // P
    0x003d_7f46_427e_3c00, // Q
    0x0031_7b4e_4c7f_7f00, // R
    0x0026_6f49_497b_3200, // S
    0x0060_407f_7f40_6000, // T
    0x007f_7f01_017f_7e00, // U
    0x007c_7e03_037e_7c00, // V
    0x7f7f_060c_067f_7f00, // W
    0x6377_1c08_1c77_6300, // X
    0x0070_780f_0f78_7000, // Y
    0x0061_7159_4d47_4300, // Z
    0x000f_1f15_1517_0200, // a
    0x3e66_663e_0606_0600, // b
    0x000a_1b11_111f_0e00, // c
    0x007f_7f09_090f_0600, // d
    0x000c_1d15_151f_0e00, // e
    0x0020_6444_7f3f_0400, // f
    0x003e_3f25_253d_1800, // g
    0x0007_0f08_087f_7f00, // h
    0x0000_012f_2f01_0000, // i
    0x0000_5e5f_0107_0600, // j
    0x0011_1b0e_047f_7f00, // k
    0x0000_007f_7f00_0000, // l
    0x1f1f_0c07_0c1f_1f00, // m
    0x000f_1f18_181f_1f00, // n
    0x000e_1f11_111f_0e00, // o
    0x0018_3c24_243f_3f00, // p
    0x0301_3f3f_243c_1800, // q
    0x000c_1c10_101f_1f00, // r
    0x0012_1515_1515_0900, // s
    0x0008_083f_3f08_0800, // t
    0x001f_1f01_011f_1e00, // u
    0x183c_6666_0000_0000, // v
    0x1e1f_010f_011f_1e00, // w
    0x0011_1b0e_0e1b_1100, // x
    0x001e_1f05_051d_1800, // y
    0x0000_191d_1713_0000, // z
    0x0000_0000_0000_0000, // blank
];

/// Punctuation, in [`SYMBOL_CHARS`] order
pub const SYMBOLS: [u64; 30] = [
    0x0008_083e_0808_0000, // +
    0x0000_0808_0808_0000, // -
    0x082a_3e1c_3e2a_0800, // *
    0x0006_0c18_3060_0000, // /
    0x0023_3318_0c66_6200, // %
    0x0000_1414_1414_0000, // =
    0x0010_0818_1018_0800, // ~
    0x0810_2040_2010_0800, // ^
    0x0041_6336_1c08_0000, // <
    0x0000_081c_3663_4100, // >
    0x0041_633e_1c00_0000, // (
    0x0000_001c_3e63_4100, // )
    0x0041_417f_7f00_0000, // [
    0x0000_007f_7f41_4100, // ]
    0x0041_4177_3e08_0000, // {
    0x0000_083e_7741_4100, // }
    0x0000_0000_0003_0300, // .
    0x0000_0036_3600_0000, // :
    0x0000_0036_3701_0000, // ;
    0x0000_0000_0e0f_0100, // ,
    0x0000_307d_7d30_0000, // !
    0x0030_784d_4d60_2000, // ?
    0x0004_325a_5a42_3c00, // @
    0x0523_7759_517f_2600, // &
    0x0024_2a6b_2a12_0000, // $
    0x147f_7f14_7f7f_1400, // #
    0x0060_7000_7060_0000, // "
    0x0002_060c_1830_2000, // \
    0x0010_7060_0000_0000, // '
    0x0000_0070_7808_0000, // `
];

/// 7-segment patterns for printable ASCII, indexed by `c - 0x20`
///
/// Bit layout `DP A B C D E F G` (bit 7 to bit 0).
pub const FONT_7SEG: [u8; 95] = [
    // sp    !     "     #     $     %     &     '     (     )
    0x00, 0x00, 0x22, 0x00, 0x00, 0x00, 0x00, 0x02, 0x4e, 0x78,
    // *     +     ,     -     .     /     0     1     2     3
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x7e, 0x30, 0x6d, 0x79,
    // 4     5     6     7     8     9     :     ;     <     =
    0x33, 0x5b, 0x5f, 0x70, 0x7f, 0x7b, 0x00, 0x00, 0x0d, 0x09,
    // >     ?     @     A     B     C     D     E     F     G
    0x19, 0x65, 0x00, 0x77, 0x1f, 0x4e, 0x3d, 0x4f, 0x47, 0x5e,
    // H     I     J     K     L     M     N     O     P     Q
    0x37, 0x06, 0x38, 0x57, 0x0e, 0x76, 0x15, 0x1d, 0x67, 0x73,
    // R     S     T     U     V     W     X     Y     Z     [
    0x05, 0x5b, 0x0f, 0x1c, 0x3e, 0x2a, 0x49, 0x3b, 0x6d, 0x4e,
    // \     ]     ^     _     `     a     b     c     d     e
    0x00, 0x78, 0x00, 0x08, 0x02, 0x77, 0x1f, 0x4e, 0x3d, 0x4f,
    // f     g     h     i     j     k     l     m     n     o
    0x47, 0x5e, 0x37, 0x06, 0x38, 0x57, 0x0e, 0x76, 0x15, 0x1d,
    // p     q     r     s     t     u     v     w     x     y
    0x67, 0x73, 0x05, 0x5b, 0x0f, 0x1c, 0x3e, 0x2a, 0x49, 0x3b,
    // z     {     |     }     ~
    0x6d, 0x4e, 0x06, 0x78, 0x00,
];

/// BCD code for a blank digit
pub const BCD_BLANK: u8 = 0x0F;

/// Look up the packed 8x8 glyph for `c`
///
/// Unknown characters (including space) map to [`BLANK`].
pub fn glyph(c: char) -> u64 {
    match c {
        '0'..='9' => NUMBERS[(c as u8 - b'0') as usize],
        'A'..='Z' => LETTERS[(c as u8 - b'A') as usize],
        'a'..='z' => LETTERS[26 + (c as u8 - b'a') as usize],
        _ => SYMBOL_CHARS
            .iter()
            .position(|&s| s == c)
            .map_or(BLANK, |i| SYMBOLS[i]),
    }
}

/// Rows of the 8x8 glyph for `c`, row 0 first
pub fn glyph_rows(c: char) -> [u8; 8] {
    glyph(c).to_le_bytes()
}

/// Raw segment pattern for `c`, blank outside printable ASCII
pub fn seven_segment(c: char) -> u8 {
    let code = c as u32;
    if (0x20..0x7f).contains(&code) {
        FONT_7SEG[(code - 0x20) as usize]
    } else {
        0
    }
}

/// Code-B value for `c` when the chip decodes digits itself
pub fn bcd(c: char) -> u8 {
    match c {
        '0'..='9' => c as u8 - b'0',
        '-' => 0x0A,
        'E' | 'e' => 0x0B,
        'H' | 'h' => 0x0C,
        'L' | 'l' => 0x0D,
        'P' | 'p' => 0x0E,
        _ => BCD_BLANK,
    }
}
