//! Font representations.
//!
//! Two glyph sources exist: the compiled-in classic 5x8 font (column-major,
//! LSB = top row, covering the printable ASCII range), and caller-supplied
//! variable-metric fonts described by [`Font`]. Fonts are read-only tables
//! shared by reference; the engine never copies or mutates them.

/// Per-glyph metrics and bitmap location for a variable-metric font.
#[derive(Debug, Clone, Copy)]
pub struct Glyph {
    /// Offset of this glyph's bits inside [`Font::bitmap`].
    pub bitmap_offset: u16,
    /// Bitmap width in pixels.
    pub width: u8,
    /// Bitmap height in pixels.
    pub height: u8,
    /// Horizontal pen advance.
    pub x_advance: u8,
    /// X offset from the pen position to the bitmap's upper-left corner.
    pub x_offset: i8,
    /// Y offset from the pen position to the bitmap's upper-left corner.
    pub y_offset: i8,
}

/// A variable-metric font: concatenated MSB-first glyph bitmaps plus a glyph
/// table indexed by code point.
#[derive(Debug)]
pub struct Font {
    /// Glyph bitmaps, concatenated, MSB-first bit stream per glyph.
    pub bitmap: &'static [u8],
    /// One entry per code point in `first..=last`.
    pub glyphs: &'static [Glyph],
    /// First covered code point.
    pub first: u16,
    /// Last covered code point.
    pub last: u16,
    /// Newline distance in pixels.
    pub y_advance: u8,
}

impl Font {
    /// Look up the glyph for a code point; `None` outside `first..=last`.
    pub fn glyph(&self, code: u32) -> Option<&Glyph> {
        if code < self.first as u32 || code > self.last as u32 {
            return None;
        }
        self.glyphs.get((code - self.first as u32) as usize)
    }
}

// ---------------------------------------------------------------------------
// Classic built-in 5x8 font
// ---------------------------------------------------------------------------

/// Columns per classic glyph (a 6th spacer column is added when drawing).
pub const CLASSIC_GLYPH_WIDTH: i32 = 5;
/// Rows per classic glyph.
pub const CLASSIC_GLYPH_HEIGHT: i32 = 8;
/// Horizontal pen advance of the classic font.
pub const CLASSIC_ADVANCE: i32 = 6;
/// First covered code point of the classic font.
pub const CLASSIC_FIRST: u32 = 0x20;
/// Last covered code point of the classic font.
pub const CLASSIC_LAST: u32 = 0x7F;

/// Classic glcd-style font: 5 bytes per glyph, one byte per column,
/// LSB = top row, code points 0x20..=0x7F.
pub(crate) const CLASSIC_FONT: [u8; 480] = [
    0x00, 0x00, 0x00, 0x00, 0x00, // (space)
    0x00, 0x00, 0x5F, 0x00, 0x00, // !
    0x00, 0x07, 0x00, 0x07, 0x00, // "
    0x14, 0x7F, 0x14, 0x7F, 0x14, // #
    0x24, 0x2A, 0x7F, 0x2A, 0x12, // $
    0x23, 0x13, 0x08, 0x64, 0x62, // %
    0x36, 0x49, 0x55, 0x22, 0x50, // &
    0x00, 0x05, 0x03, 0x00, 0x00, // '
    0x00, 0x1C, 0x22, 0x41, 0x00, // (
    0x00, 0x41, 0x22, 0x1C, 0x00, // )
    0x08, 0x2A, 0x1C, 0x2A, 0x08, // *
    0x08, 0x08, 0x3E, 0x08, 0x08, // +
    0x00, 0x50, 0x30, 0x00, 0x00, // ,
    0x08, 0x08, 0x08, 0x08, 0x08, // -
    0x00, 0x60, 0x60, 0x00, 0x00, // .
    0x20, 0x10, 0x08, 0x04, 0x02, // /
    0x3E, 0x51, 0x49, 0x45, 0x3E, // 0
    0x00, 0x42, 0x7F, 0x40, 0x00, // 1
    0x42, 0x61, 0x51, 0x49, 0x46, // 2
    0x21, 0x41, 0x45, 0x4B, 0x31, // 3
    0x18, 0x14, 0x12, 0x7F, 0x10, // 4
    0x27, 0x45, 0x45, 0x45, 0x39, // 5
    0x3C, 0x4A, 0x49, 0x49, 0x30, // 6
    0x01, 0x71, 0x09, 0x05, 0x03, // 7
    0x36, 0x49, 0x49, 0x49, 0x36, // 8
    0x06, 0x49, 0x49, 0x29, 0x1E, // 9
    0x00, 0x36, 0x36, 0x00, 0x00, // :
    0x00, 0x56, 0x36, 0x00, 0x00, // ;
    0x00, 0x08, 0x14, 0x22, 0x41, // <
    0x14, 0x14, 0x14, 0x14, 0x14, // =
    0x41, 0x22, 0x14, 0x08, 0x00, // >
    0x02, 0x01, 0x51, 0x09, 0x06, // ?
    0x32, 0x49, 0x79, 0x41, 0x3E, // @
    0x7E, 0x11, 0x11, 0x11, 0x7E, // A
    0x7F, 0x49, 0x49, 0x49, 0x36, // B
    0x3E, 0x41, 0x41, 0x41, 0x22, // C
    0x7F, 0x41, 0x41, 0x22, 0x1C, // D
    0x7F, 0x49, 0x49, 0x49, 0x41, // E
    0x7F, 0x09, 0x09, 0x01, 0x01, // F
    0x3E, 0x41, 0x41, 0x51, 0x32, // G
    0x7F, 0x08, 0x08, 0x08, 0x7F, // H
    0x00, 0x41, 0x7F, 0x41, 0x00, // I
    0x20, 0x40, 0x41, 0x3F, 0x01, // J
    0x7F, 0x08, 0x14, 0x22, 0x41, // K
    0x7F, 0x40, 0x40, 0x40, 0x40, // L
    0x7F, 0x02, 0x04, 0x02, 0x7F, // M
    0x7F, 0x04, 0x08, 0x10, 0x7F, // N
    0x3E, 0x41, 0x41, 0x41, 0x3E, // O
    0x7F, 0x09, 0x09, 0x09, 0x06, // P
    0x3E, 0x41, 0x51, 0x21, 0x5E, // Q
    0x7F, 0x09, 0x19, 0x29, 0x46, // R
    0x46, 0x49, 0x49, 0x49, 0x31, // S
    0x01, 0x01, 0x7F, 0x01, 0x01, // T
    0x3F, 0x40, 0x40, 0x40, 0x3F, // U
    0x1F, 0x20, 0x40, 0x20, 0x1F, // V
    0x7F, 0x20, 0x18, 0x20, 0x7F, // W
    0x63, 0x14, 0x08, 0x14, 0x63, // X
    0x03, 0x04, 0x78, 0x04, 0x03, // Y
    0x61, 0x51, 0x49, 0x45, 0x43, // Z
    0x00, 0x00, 0x7F, 0x41, 0x41, // [
    0x02, 0x04, 0x08, 0x10, 0x20, // backslash
    0x41, 0x41, 0x7F, 0x00, 0x00, // ]
    0x04, 0x02, 0x01, 0x02, 0x04, // ^
    0x40, 0x40, 0x40, 0x40, 0x40, // _
    0x00, 0x01, 0x02, 0x04, 0x00, // `
    0x20, 0x54, 0x54, 0x54, 0x78, // a
    0x7F, 0x48, 0x44, 0x44, 0x38, // b
    0x38, 0x44, 0x44, 0x44, 0x20, // c
    0x38, 0x44, 0x44, 0x48, 0x7F, // d
    0x38, 0x54, 0x54, 0x54, 0x18, // e
    0x08, 0x7E, 0x09, 0x01, 0x02, // f
    0x08, 0x14, 0x54, 0x54, 0x3C, // g
    0x7F, 0x08, 0x04, 0x04, 0x78, // h
    0x00, 0x44, 0x7D, 0x40, 0x00, // i
    0x20, 0x40, 0x44, 0x3D, 0x00, // j
    0x00, 0x7F, 0x10, 0x28, 0x44, // k
    0x00, 0x41, 0x7F, 0x40, 0x00, // l
    0x7C, 0x04, 0x18, 0x04, 0x78, // m
    0x7C, 0x08, 0x04, 0x04, 0x78, // n
    0x38, 0x44, 0x44, 0x44, 0x38, // o
    0x7C, 0x14, 0x14, 0x14, 0x08, // p
    0x08, 0x14, 0x14, 0x18, 0x7C, // q
    0x7C, 0x08, 0x04, 0x04, 0x08, // r
    0x48, 0x54, 0x54, 0x54, 0x20, // s
    0x04, 0x3F, 0x44, 0x40, 0x20, // t
    0x3C, 0x40, 0x40, 0x20, 0x7C, // u
    0x1C, 0x20, 0x40, 0x20, 0x1C, // v
    0x3C, 0x40, 0x30, 0x40, 0x3C, // w
    0x44, 0x28, 0x10, 0x28, 0x44, // x
    0x0C, 0x50, 0x50, 0x50, 0x3C, // y
    0x44, 0x64, 0x54, 0x4C, 0x44, // z
    0x00, 0x08, 0x36, 0x41, 0x00, // {
    0x00, 0x00, 0x7F, 0x00, 0x00, // |
    0x00, 0x41, 0x36, 0x08, 0x00, // }
    0x08, 0x08, 0x2A, 0x1C, 0x08, // right arrow
    0x08, 0x1C, 0x2A, 0x08, 0x08, // left arrow
];

/// The five column bytes of a classic glyph; out-of-range code points get
/// the `?` fallback.
pub(crate) fn classic_columns(code: u32) -> &'static [u8] {
    let code = if (CLASSIC_FIRST..=CLASSIC_LAST).contains(&code) {
        code
    } else {
        '?' as u32
    };
    let index = (code - CLASSIC_FIRST) as usize * 5;
    &CLASSIC_FONT[index..index + 5]
}
