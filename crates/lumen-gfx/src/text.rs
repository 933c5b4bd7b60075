//! Text rendering and cursor state.
//!
//! Two glyph paths share the cursor machinery: the classic 5x8 font (fixed
//! 6-pixel advance, optional background fill plus a spacer column) and
//! variable-metric [`Font`]s (baseline-relative placement, per-glyph
//! advance, foreground bits only).

use lumen_types::Rgb565;

use crate::backend::PixelBackend;
use crate::canvas::Canvas;
use crate::font::{
    self, CLASSIC_ADVANCE, CLASSIC_GLYPH_HEIGHT, CLASSIC_GLYPH_WIDTH, Font,
};

impl<B: PixelBackend> Canvas<B> {
    // -----------------------------------------------------------------------
    // Text state
    // -----------------------------------------------------------------------

    /// Move the text cursor.
    pub fn set_cursor(&mut self, x: i16, y: i16) {
        self.cursor_x = x;
        self.cursor_y = y;
    }

    /// Current cursor x.
    pub fn cursor_x(&self) -> i16 {
        self.cursor_x
    }

    /// Current cursor y.
    pub fn cursor_y(&self) -> i16 {
        self.cursor_y
    }

    /// Set the foreground text color; the background resets to black.
    pub fn set_text_color(&mut self, color: Rgb565) {
        self.text_color = color;
        self.text_bg = Rgb565::BLACK;
    }

    /// Set foreground and background text colors. Passing the same color for
    /// both makes glyph backgrounds transparent.
    pub fn set_text_color_bg(&mut self, color: Rgb565, bg: Rgb565) {
        self.text_color = color;
        self.text_bg = bg;
    }

    /// Set a uniform text magnification. Zero is treated as one.
    pub fn set_text_size(&mut self, size: u8) {
        self.set_text_size_xy(size, size);
    }

    /// Set independent horizontal and vertical text magnification.
    pub fn set_text_size_xy(&mut self, size_x: u8, size_y: u8) {
        self.text_size_x = size_x.max(1);
        self.text_size_y = size_y.max(1);
    }

    /// Enable or disable wrapping at the right edge.
    pub fn set_text_wrap(&mut self, wrap: bool) {
        self.text_wrap = wrap;
    }

    /// Select a variable-metric font, or `None` for the classic 5x8 font.
    pub fn set_font(&mut self, font: Option<&'static Font>) {
        self.font = font;
    }

    // -----------------------------------------------------------------------
    // Glyph rendering
    // -----------------------------------------------------------------------

    /// Draw a single character at an explicit position, independent of the
    /// cursor. For variable-metric fonts `(x, y)` is the baseline pen
    /// position; for the classic font it is the glyph's upper-left corner.
    pub fn draw_char(
        &mut self,
        x: i16,
        y: i16,
        c: char,
        color: Rgb565,
        bg: Rgb565,
        size_x: u8,
        size_y: u8,
    ) {
        self.start_write();
        self.render_char(x as i32, y as i32, c, color, bg, size_x.max(1) as i32, size_y.max(1) as i32);
        self.end_write();
    }

    fn render_char(
        &mut self,
        x: i32,
        y: i32,
        c: char,
        color: Rgb565,
        bg: Rgb565,
        size_x: i32,
        size_y: i32,
    ) {
        match self.font {
            None => self.render_classic_char(x, y, c, color, bg, size_x, size_y),
            Some(f) => self.render_custom_char(f, x, y, c, color, size_x, size_y),
        }
    }

    fn render_classic_char(
        &mut self,
        x: i32,
        y: i32,
        c: char,
        color: Rgb565,
        bg: Rgb565,
        size_x: i32,
        size_y: i32,
    ) {
        // Whole cell (including the spacer column) off-surface: nothing to do.
        if x >= self.width as i32
            || y >= self.height as i32
            || x + CLASSIC_ADVANCE * size_x - 1 < 0
            || y + CLASSIC_GLYPH_HEIGHT * size_y - 1 < 0
        {
            return;
        }

        let columns = font::classic_columns(c as u32);
        for i in 0..CLASSIC_GLYPH_WIDTH {
            let mut line = columns[i as usize];
            for j in 0..CLASSIC_GLYPH_HEIGHT {
                if line & 1 != 0 {
                    if size_x == 1 && size_y == 1 {
                        self.put_pixel(x + i, y + j, color);
                    } else {
                        self.clipped_fill_rect(x + i * size_x, y + j * size_y, size_x, size_y, color);
                    }
                } else if bg != color {
                    if size_x == 1 && size_y == 1 {
                        self.put_pixel(x + i, y + j, bg);
                    } else {
                        self.clipped_fill_rect(x + i * size_x, y + j * size_y, size_x, size_y, bg);
                    }
                }
                line >>= 1;
            }
        }
        // Spacer column between cells, only when the background is opaque.
        if bg != color {
            if size_x == 1 && size_y == 1 {
                self.clipped_vline(x + CLASSIC_GLYPH_WIDTH, y, CLASSIC_GLYPH_HEIGHT, bg);
            } else {
                self.clipped_fill_rect(
                    x + CLASSIC_GLYPH_WIDTH * size_x,
                    y,
                    size_x,
                    CLASSIC_GLYPH_HEIGHT * size_y,
                    bg,
                );
            }
        }
    }

    /// Variable-metric glyphs carry no background: only set bits are drawn.
    fn render_custom_char(
        &mut self,
        f: &'static Font,
        x: i32,
        y: i32,
        c: char,
        color: Rgb565,
        size_x: i32,
        size_y: i32,
    ) {
        let Some(glyph) = f.glyph(c as u32) else {
            return;
        };
        let w = glyph.width as i32;
        let h = glyph.height as i32;
        let xo = glyph.x_offset as i32;
        let yo = glyph.y_offset as i32;

        let mut bo = glyph.bitmap_offset as usize;
        let mut bits: u8 = 0;
        let mut bit: u32 = 0;

        for yy in 0..h {
            for xx in 0..w {
                if bit & 7 == 0 {
                    let Some(&b) = f.bitmap.get(bo) else {
                        return;
                    };
                    bits = b;
                    bo += 1;
                }
                bit += 1;
                if bits & 0x80 != 0 {
                    if size_x == 1 && size_y == 1 {
                        self.put_pixel(x + xo + xx, y + yo + yy, color);
                    } else {
                        self.clipped_fill_rect(
                            x + (xo + xx) * size_x,
                            y + (yo + yy) * size_y,
                            size_x,
                            size_y,
                            color,
                        );
                    }
                }
                bits <<= 1;
            }
        }
    }

    // -----------------------------------------------------------------------
    // Cursor-based output
    // -----------------------------------------------------------------------

    /// Process one character at the cursor within an open bracket: handles
    /// newline, carriage return, wrapping, and advances the cursor.
    pub fn write_char(&mut self, c: char) {
        let size_x = self.text_size_x as i32;
        let size_y = self.text_size_y as i32;

        match self.font {
            None => match c {
                '\n' => {
                    self.cursor_x = 0;
                    self.cursor_y =
                        (self.cursor_y as i32 + size_y * CLASSIC_GLYPH_HEIGHT) as i16;
                }
                '\r' => {}
                _ => {
                    if self.text_wrap
                        && self.cursor_x as i32 + size_x * CLASSIC_ADVANCE > self.width as i32
                    {
                        self.cursor_x = 0;
                        self.cursor_y =
                            (self.cursor_y as i32 + size_y * CLASSIC_GLYPH_HEIGHT) as i16;
                    }
                    self.render_char(
                        self.cursor_x as i32,
                        self.cursor_y as i32,
                        c,
                        self.text_color,
                        self.text_bg,
                        size_x,
                        size_y,
                    );
                    self.cursor_x = (self.cursor_x as i32 + size_x * CLASSIC_ADVANCE) as i16;
                }
            },
            Some(f) => match c {
                '\n' => {
                    self.cursor_x = 0;
                    self.cursor_y =
                        (self.cursor_y as i32 + size_y * f.y_advance as i32) as i16;
                }
                '\r' => {}
                _ => {
                    // Characters outside the font's range are skipped without
                    // advancing the cursor.
                    let Some(glyph) = f.glyph(c as u32) else {
                        return;
                    };
                    let (w, xo, advance) =
                        (glyph.width as i32, glyph.x_offset as i32, glyph.x_advance as i32);
                    if glyph.height > 0 && w > 0 {
                        if self.text_wrap
                            && self.cursor_x as i32 + size_x * (xo + w) > self.width as i32
                        {
                            self.cursor_x = 0;
                            self.cursor_y =
                                (self.cursor_y as i32 + size_y * f.y_advance as i32) as i16;
                        }
                        self.render_char(
                            self.cursor_x as i32,
                            self.cursor_y as i32,
                            c,
                            self.text_color,
                            self.text_bg,
                            size_x,
                            size_y,
                        );
                    }
                    self.cursor_x = (self.cursor_x as i32 + size_x * advance) as i16;
                }
            },
        }
    }

    /// Write a string at the cursor within an open bracket.
    pub fn write_text(&mut self, text: &str) {
        for c in text.chars() {
            self.write_char(c);
        }
    }

    /// Bracketed string draw at the cursor.
    pub fn draw_text(&mut self, text: &str) {
        self.start_write();
        self.write_text(text);
        self.end_write();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::Glyph;
    use crate::test_utils::MemoryBackend;

    fn canvas(w: i16, h: i16) -> Canvas<MemoryBackend> {
        Canvas::new(MemoryBackend::new(w, h))
    }

    #[test]
    fn classic_glyph_matches_column_table() {
        let mut c = canvas(16, 16);
        // '|' is a single full column: 0x00,0x00,0x7F,0x00,0x00.
        c.draw_char(0, 0, '|', Rgb565::WHITE, Rgb565::WHITE, 1, 1);
        for y in 0..7 {
            assert_eq!(c.pixel(2, y), Rgb565::WHITE, "column bit at row {y}");
        }
        assert_eq!(c.pixel(2, 7), Rgb565::BLACK);
        assert_eq!(c.pixel(1, 3), Rgb565::BLACK);
        assert_eq!(c.pixel(3, 3), Rgb565::BLACK);
        assert_eq!(c.backend().painted(), 7);
    }

    #[test]
    fn opaque_background_fills_cell_and_spacer() {
        let mut c = canvas(16, 16);
        c.draw_char(0, 0, '|', Rgb565::RED, Rgb565::BLUE, 1, 1);
        // Cleared glyph bit gets the background.
        assert_eq!(c.pixel(0, 0), Rgb565::BLUE);
        // Spacer column is background too.
        for y in 0..8 {
            assert_eq!(c.pixel(5, y), Rgb565::BLUE, "spacer at row {y}");
        }
        // Full 6x8 cell painted.
        assert_eq!(c.backend().painted(), 48);
    }

    #[test]
    fn transparent_background_leaves_gaps() {
        let mut c = canvas(16, 16);
        c.draw_char(0, 0, '|', Rgb565::RED, Rgb565::RED, 1, 1);
        assert_eq!(c.backend().painted(), 7);
        assert_eq!(c.pixel(5, 0), Rgb565::BLACK);
    }

    #[test]
    fn magnification_scales_glyph_blocks() {
        let mut c = canvas(32, 32);
        c.draw_char(0, 0, '|', Rgb565::WHITE, Rgb565::WHITE, 2, 2);
        // Column 2 becomes x in [4,6), rows 0..7 become y in [0,14).
        assert_eq!(c.pixel(4, 0), Rgb565::WHITE);
        assert_eq!(c.pixel(5, 13), Rgb565::WHITE);
        assert_eq!(c.pixel(5, 14), Rgb565::BLACK);
        assert_eq!(c.backend().painted(), 7 * 4);
    }

    #[test]
    fn unknown_code_point_renders_question_mark() {
        let mut want = canvas(16, 16);
        want.draw_char(0, 0, '?', Rgb565::WHITE, Rgb565::WHITE, 1, 1);
        let mut got = canvas(16, 16);
        got.draw_char(0, 0, 'é', Rgb565::WHITE, Rgb565::WHITE, 1, 1);
        for y in 0..16 {
            for x in 0..16 {
                assert_eq!(got.pixel(x, y), want.pixel(x, y), "pixel ({x},{y})");
            }
        }
    }

    #[test]
    fn fully_offscreen_char_writes_nothing() {
        let mut c = canvas(16, 16);
        c.draw_char(16, 0, 'A', Rgb565::WHITE, Rgb565::BLUE, 1, 1);
        c.draw_char(0, 16, 'A', Rgb565::WHITE, Rgb565::BLUE, 1, 1);
        c.draw_char(-6, 0, 'A', Rgb565::WHITE, Rgb565::BLUE, 1, 1);
        c.draw_char(0, -8, 'A', Rgb565::WHITE, Rgb565::BLUE, 1, 1);
        assert_eq!(c.backend().painted(), 0);
    }

    #[test]
    fn wrap_fires_when_next_cell_overflows() {
        // 36 px wide: exactly six 6-px cells per row at size 1.
        let mut c = canvas(36, 32);
        c.set_text_color(Rgb565::WHITE);
        c.draw_text("ABCDEFG");
        // Six chars fit; the seventh wraps to the next 8-px line.
        assert_eq!(c.cursor_x(), 6);
        assert_eq!(c.cursor_y(), 8);
        // 'G' starts with column 0x3E: rows 1..=5 set at x = 0.
        assert_eq!(c.pixel(0, 9), Rgb565::WHITE);
    }

    #[test]
    fn wrap_disabled_runs_off_the_edge() {
        let mut c = canvas(36, 32);
        c.set_text_wrap(false);
        c.draw_text("ABCDEFG");
        assert_eq!(c.cursor_x(), 42);
        assert_eq!(c.cursor_y(), 0);
    }

    #[test]
    fn newline_resets_x_and_advances_y() {
        let mut c = canvas(64, 64);
        c.set_cursor(10, 0);
        c.set_text_size(2);
        c.draw_text("A\nB");
        // After newline: x back to 0, y advanced by 8 * size_y; then B drew
        // and advanced x by 6 * size_x.
        assert_eq!(c.cursor_x(), 12);
        assert_eq!(c.cursor_y(), 16);
    }

    #[test]
    fn carriage_return_is_ignored() {
        let mut c = canvas(64, 64);
        c.draw_text("A\rB");
        assert_eq!(c.cursor_x(), 12);
        assert_eq!(c.cursor_y(), 0);
    }

    #[test]
    fn zero_text_size_clamps_to_one() {
        let mut c = canvas(64, 64);
        c.set_text_size(0);
        c.draw_text("A");
        assert_eq!(c.cursor_x(), 6);
    }

    #[test]
    fn set_text_color_resets_background_to_black() {
        let mut c = canvas(64, 64);
        c.set_text_color_bg(Rgb565::WHITE, Rgb565::BLUE);
        c.set_text_color(Rgb565::RED);
        assert_eq!(c.text_bg, Rgb565::BLACK);
    }

    // A one-glyph variable-metric font: 'A' is a 2x1 bar one pixel above
    // the baseline.
    static TINY_BITMAP: [u8; 1] = [0b1100_0000];
    static TINY_GLYPHS: [Glyph; 1] = [Glyph {
        bitmap_offset: 0,
        width: 2,
        height: 1,
        x_advance: 3,
        x_offset: 0,
        y_offset: -1,
    }];
    static TINY_FONT: Font = Font {
        bitmap: &TINY_BITMAP,
        glyphs: &TINY_GLYPHS,
        first: 'A' as u16,
        last: 'A' as u16,
        y_advance: 10,
    };

    #[test]
    fn custom_font_draws_relative_to_baseline() {
        let mut c = canvas(32, 32);
        c.set_font(Some(&TINY_FONT));
        c.set_text_color(Rgb565::WHITE);
        c.set_cursor(5, 5);
        c.draw_text("A");
        assert_eq!(c.pixel(5, 4), Rgb565::WHITE);
        assert_eq!(c.pixel(6, 4), Rgb565::WHITE);
        assert_eq!(c.backend().painted(), 2);
        assert_eq!(c.cursor_x(), 8);
    }

    #[test]
    fn custom_font_skips_uncovered_characters() {
        let mut c = canvas(32, 32);
        c.set_font(Some(&TINY_FONT));
        c.set_cursor(5, 5);
        c.draw_text("Z");
        assert_eq!(c.backend().painted(), 0);
        assert_eq!(c.cursor_x(), 5);
    }

    #[test]
    fn custom_font_newline_uses_font_y_advance() {
        let mut c = canvas(32, 32);
        c.set_font(Some(&TINY_FONT));
        c.set_cursor(5, 5);
        c.set_text_size(2);
        c.draw_text("\n");
        assert_eq!(c.cursor_x(), 0);
        assert_eq!(c.cursor_y(), 25);
    }

    #[test]
    fn custom_font_wraps_on_glyph_extent() {
        // Width 8: first glyph ends at x=8 after advancing; a second glyph
        // would span [9, 11) and must wrap.
        let mut c = canvas(8, 32);
        c.set_font(Some(&TINY_FONT));
        c.set_text_color(Rgb565::WHITE);
        c.set_cursor(0, 5);
        c.draw_text("AAA");
        // Third glyph: cursor_x 6, extent 6 + 2 <= 8, still fits; fourth wraps.
        c.draw_text("A");
        assert_eq!(c.cursor_y(), 15);
        assert_eq!(c.cursor_x(), 3);
    }
}
