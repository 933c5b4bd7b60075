//! Circle, round-rect, and triangle rasterization.
//!
//! Circles use the integer midpoint algorithm with 8-way symmetry; the
//! corner-masked helpers reuse the same iteration for round-rect corners.
//! Filled triangles sort vertices by y and interpolate the left/right span
//! boundary per scanline with integer accumulators.

use lumen_types::Rgb565;

use crate::backend::PixelBackend;
use crate::canvas::Canvas;

/// Corner selection masks for the arc helpers.
///
/// Bit assignment matches the quadrant layout used by the round-rect code:
/// 0x1 = upper-left, 0x2 = upper-right, 0x4 = lower-right, 0x8 = lower-left
/// for [`Canvas::write_circle_quadrants`]; for the filled helper 0x1 selects
/// the +x side and 0x2 the -x side.
impl<B: PixelBackend> Canvas<B> {
    /// Circle outline.
    pub fn draw_circle(&mut self, cx: i16, cy: i16, r: i16, color: Rgb565) {
        self.start_write();
        let (cx, cy, r) = (cx as i32, cy as i32, r as i32);
        let mut f = 1 - r;
        let mut ddf_x = 1;
        let mut ddf_y = -2 * r;
        let mut x = 0;
        let mut y = r;

        // Cardinal points first, so the loop never double-plots them.
        self.put_pixel(cx, cy + r, color);
        self.put_pixel(cx, cy - r, color);
        self.put_pixel(cx + r, cy, color);
        self.put_pixel(cx - r, cy, color);

        while x < y {
            if f >= 0 {
                y -= 1;
                ddf_y += 2;
                f += ddf_y;
            }
            x += 1;
            ddf_x += 2;
            f += ddf_x;

            self.put_pixel(cx + x, cy + y, color);
            self.put_pixel(cx - x, cy + y, color);
            self.put_pixel(cx + x, cy - y, color);
            self.put_pixel(cx - x, cy - y, color);
            self.put_pixel(cx + y, cy + x, color);
            self.put_pixel(cx - y, cy + x, color);
            self.put_pixel(cx + y, cy - x, color);
            self.put_pixel(cx - y, cy - x, color);
        }
        self.end_write();
    }

    /// Quarter-circle arcs: each set bit of `corners` selects one quadrant
    /// (two symmetric points per iteration). Used for round-rect outlines.
    pub(crate) fn write_circle_quadrants(
        &mut self,
        cx: i32,
        cy: i32,
        r: i32,
        corners: u8,
        color: Rgb565,
    ) {
        let mut f = 1 - r;
        let mut ddf_x = 1;
        let mut ddf_y = -2 * r;
        let mut x = 0;
        let mut y = r;

        while x < y {
            if f >= 0 {
                y -= 1;
                ddf_y += 2;
                f += ddf_y;
            }
            x += 1;
            ddf_x += 2;
            f += ddf_x;

            if corners & 0x4 != 0 {
                self.put_pixel(cx + x, cy + y, color);
                self.put_pixel(cx + y, cy + x, color);
            }
            if corners & 0x2 != 0 {
                self.put_pixel(cx + x, cy - y, color);
                self.put_pixel(cx + y, cy - x, color);
            }
            if corners & 0x8 != 0 {
                self.put_pixel(cx - y, cy + x, color);
                self.put_pixel(cx - x, cy + y, color);
            }
            if corners & 0x1 != 0 {
                self.put_pixel(cx - y, cy - x, color);
                self.put_pixel(cx - x, cy - y, color);
            }
        }
    }

    /// Filled circle halves as vertical spans. `delta` extends every span,
    /// which is how round-rect corner fill reuses this without re-deriving
    /// the arc: 0x1 fills the +x side, 0x2 the -x side.
    pub(crate) fn fill_circle_quadrants(
        &mut self,
        cx: i32,
        cy: i32,
        r: i32,
        corners: u8,
        delta: i32,
        color: Rgb565,
    ) {
        let mut f = 1 - r;
        let mut ddf_x = 1;
        let mut ddf_y = -2 * r;
        let mut x = 0;
        let mut y = r;

        while x < y {
            if f >= 0 {
                y -= 1;
                ddf_y += 2;
                f += ddf_y;
            }
            x += 1;
            ddf_x += 2;
            f += ddf_x;

            if corners & 0x1 != 0 {
                self.clipped_vline(cx + x, cy - y, 2 * y + 1 + delta, color);
                self.clipped_vline(cx + y, cy - x, 2 * x + 1 + delta, color);
            }
            if corners & 0x2 != 0 {
                self.clipped_vline(cx - x, cy - y, 2 * y + 1 + delta, color);
                self.clipped_vline(cx - y, cy - x, 2 * x + 1 + delta, color);
            }
        }
    }

    /// Filled circle.
    pub fn fill_circle(&mut self, cx: i16, cy: i16, r: i16, color: Rgb565) {
        self.start_write();
        let (cx, cy, r) = (cx as i32, cy as i32, r as i32);
        self.clipped_vline(cx, cy - r, 2 * r + 1, color);
        self.fill_circle_quadrants(cx, cy, r, 0x3, 0, color);
        self.end_write();
    }

    /// Rounded-rectangle outline. The radius is clamped to half the smaller
    /// dimension so opposite corners never overlap.
    pub fn draw_round_rect(&mut self, x: i16, y: i16, w: i16, h: i16, r: i16, color: Rgb565) {
        if w <= 0 || h <= 0 {
            return;
        }
        let (x, y, w, h) = (x as i32, y as i32, w as i32, h as i32);
        let r = (r as i32).clamp(0, w.min(h) / 2);
        self.start_write();
        self.clipped_hline(x + r, y, w - 2 * r, color);
        self.clipped_hline(x + r, y + h - 1, w - 2 * r, color);
        self.clipped_vline(x, y + r, h - 2 * r, color);
        self.clipped_vline(x + w - 1, y + r, h - 2 * r, color);

        self.write_circle_quadrants(x + r, y + r, r, 0x1, color);
        self.write_circle_quadrants(x + w - r - 1, y + r, r, 0x2, color);
        self.write_circle_quadrants(x + w - r - 1, y + h - r - 1, r, 0x4, color);
        self.write_circle_quadrants(x + r, y + h - r - 1, r, 0x8, color);
        self.end_write();
    }

    /// Filled rounded rectangle: a center strip, two side strips, and the
    /// two corner-arc fills.
    pub fn fill_round_rect(&mut self, x: i16, y: i16, w: i16, h: i16, r: i16, color: Rgb565) {
        if w <= 0 || h <= 0 {
            return;
        }
        let (x, y, w, h) = (x as i32, y as i32, w as i32, h as i32);
        let r = (r as i32).clamp(0, w.min(h) / 2);
        self.start_write();
        self.clipped_fill_rect(x + r, y, w - 2 * r, h, color);
        self.clipped_fill_rect(x, y + r, r, h - 2 * r, color);
        self.clipped_fill_rect(x + w - r, y + r, r, h - 2 * r, color);

        self.fill_circle_quadrants(x + w - r - 1, y + r, r, 0x1, h - 2 * r - 1, color);
        self.fill_circle_quadrants(x + r, y + r, r, 0x2, h - 2 * r - 1, color);
        self.end_write();
    }

    /// Triangle outline: three lines.
    pub fn draw_triangle(
        &mut self,
        x0: i16,
        y0: i16,
        x1: i16,
        y1: i16,
        x2: i16,
        y2: i16,
        color: Rgb565,
    ) {
        self.start_write();
        self.write_line(x0, y0, x1, y1, color);
        self.write_line(x1, y1, x2, y2, color);
        self.write_line(x2, y2, x0, y0, color);
        self.end_write();
    }

    /// Filled triangle via two-phase scanline interpolation.
    pub fn fill_triangle(
        &mut self,
        x0: i16,
        y0: i16,
        x1: i16,
        y1: i16,
        x2: i16,
        y2: i16,
        color: Rgb565,
    ) {
        let (mut x0, mut y0) = (x0 as i32, y0 as i32);
        let (mut x1, mut y1) = (x1 as i32, y1 as i32);
        let (mut x2, mut y2) = (x2 as i32, y2 as i32);

        // Sort by ascending y.
        if y0 > y1 {
            std::mem::swap(&mut y0, &mut y1);
            std::mem::swap(&mut x0, &mut x1);
        }
        if y1 > y2 {
            std::mem::swap(&mut y2, &mut y1);
            std::mem::swap(&mut x2, &mut x1);
        }
        if y0 > y1 {
            std::mem::swap(&mut y0, &mut y1);
            std::mem::swap(&mut x0, &mut x1);
        }

        self.start_write();
        if y0 == y2 {
            // All on one scanline: single span across min/max x.
            let mut a = x0;
            let mut b = x0;
            if x1 < a {
                a = x1;
            } else if x1 > b {
                b = x1;
            }
            if x2 < a {
                a = x2;
            } else if x2 > b {
                b = x2;
            }
            self.clipped_hline(a, y0, b - a + 1, color);
            self.end_write();
            return;
        }

        // Accumulators run in i64: |dx| * dy can reach 65535^2, past i32.
        let dx01 = (x1 - x0) as i64;
        let dy01 = (y1 - y0) as i64;
        let dx02 = (x2 - x0) as i64;
        let dy02 = (y2 - y0) as i64;
        let dx12 = (x2 - x1) as i64;
        let dy12 = (y2 - y1) as i64;
        let mut sa: i64 = 0;
        let mut sb: i64 = 0;

        // Upper half: top vertex to middle vertex. The middle vertex's row
        // belongs to the lower half unless the triangle is flat-bottomed.
        let last = if y1 == y2 { y1 } else { y1 - 1 };

        let mut y = y0;
        while y <= last {
            let mut a = x0 as i64 + sa / dy01;
            let mut b = x0 as i64 + sb / dy02;
            sa += dx01;
            sb += dx02;
            if a > b {
                std::mem::swap(&mut a, &mut b);
            }
            self.clipped_hline(a as i32, y, (b - a + 1) as i32, color);
            y += 1;
        }

        // Lower half: middle vertex to bottom vertex. Accumulators are
        // seeded from the row counter once; dy12 is non-zero here because
        // the flat-bottom case never enters this loop.
        sa = dx12 * (y - y1) as i64;
        sb = dx02 * (y - y0) as i64;
        while y <= y2 {
            let mut a = x1 as i64 + sa / dy12;
            let mut b = x0 as i64 + sb / dy02;
            sa += dx12;
            sb += dx02;
            if a > b {
                std::mem::swap(&mut a, &mut b);
            }
            self.clipped_hline(a as i32, y, (b - a + 1) as i32, color);
            y += 1;
        }
        self.end_write();
    }
}
