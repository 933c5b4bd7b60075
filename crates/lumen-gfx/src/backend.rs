//! Pixel backend trait.
//!
//! Two structurally different execution models sit behind this one contract:
//! direct stores into a memory-mapped pixel region, and quad submission
//! against a GPU rendering context. The required surface is deliberately
//! tiny -- one pixel in, one pixel out -- so the shared rasterizer stays
//! backend-agnostic.
//!
//! The bulk methods have default implementations that loop the single-pixel
//! write. They exist so a backend can substitute a faster path (row fills,
//! one GPU quad, a textured quad); overrides must preserve the default's
//! clipping behavior for everything they accept.

use lumen_types::Rgb565;

/// A write target for the rasterizer.
///
/// Coordinates are in the backend's native (unrotated) pixel space.
pub trait PixelBackend {
    /// Native width in pixels.
    fn width(&self) -> i16;

    /// Native height in pixels.
    fn height(&self) -> i16;

    /// Write one pixel. Out-of-bounds coordinates are a no-op.
    fn write_pixel(&mut self, x: i16, y: i16, color: Rgb565);

    /// Read one pixel. Out-of-bounds coordinates return `Rgb565(0)`.
    ///
    /// Backends without an addressable pixel store also return `Rgb565(0)`;
    /// that is a documented capability gap, not an error.
    fn read_pixel(&self, x: i16, y: i16) -> Rgb565;

    /// Transaction bracket open: a batch of writes is about to start.
    ///
    /// Purely a batching hint; no atomicity is implied.
    fn start_write(&mut self) {}

    /// Transaction bracket close.
    fn end_write(&mut self) {}

    /// Fill a rectangle. Negative or zero extents write nothing.
    fn fill_rect(&mut self, x: i16, y: i16, w: i16, h: i16, color: Rgb565) {
        for yy in y as i32..y as i32 + h.max(0) as i32 {
            for xx in x as i32..x as i32 + w.max(0) as i32 {
                self.write_pixel(xx as i16, yy as i16, color);
            }
        }
    }

    /// Fill the entire native surface.
    fn fill_screen(&mut self, color: Rgb565) {
        self.fill_rect(0, 0, self.width(), self.height(), color);
    }

    /// Blit a row-major RGB565 rectangle with its upper-left at (x, y).
    ///
    /// `pixels` must hold `w * h` values; a shorter slice writes nothing.
    fn blit_rgb(&mut self, x: i16, y: i16, w: i16, h: i16, pixels: &[Rgb565]) {
        if w <= 0 || h <= 0 || pixels.len() < w as usize * h as usize {
            return;
        }
        for j in 0..h as i32 {
            for i in 0..w as i32 {
                let px = pixels[(j * w as i32 + i) as usize];
                self.write_pixel((x as i32 + i) as i16, (y as i32 + j) as i16, px);
            }
        }
    }
}
