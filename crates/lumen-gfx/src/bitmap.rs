//! Bitmap blitting.
//!
//! All variants take row-major source data with the upper-left corner at
//! `(x, y)`. 1-bit sources are byte-padded per row (stride `(w + 7) / 8`);
//! the plain variants read bits MSB-first, the XBM variant LSB-first.

use lumen_types::Rgb565;

use crate::backend::PixelBackend;
use crate::canvas::Canvas;

impl<B: PixelBackend> Canvas<B> {
    /// Draw set bits of a 1-bit bitmap in `color`; cleared bits are skipped.
    pub fn draw_bitmap(&mut self, x: i16, y: i16, bitmap: &[u8], w: i16, h: i16, color: Rgb565) {
        let stride = (w as i32 + 7) / 8;
        self.start_write();
        let mut byte: u8 = 0;
        for j in 0..h as i32 {
            for i in 0..w as i32 {
                if i & 7 != 0 {
                    byte <<= 1;
                } else {
                    byte = bitmap
                        .get((j * stride + i / 8) as usize)
                        .copied()
                        .unwrap_or(0);
                }
                if byte & 0x80 != 0 {
                    self.put_pixel(x as i32 + i, y as i32 + j, color);
                }
            }
        }
        self.end_write();
    }

    /// Draw a 1-bit bitmap with an opaque background: set bits in `color`,
    /// cleared bits in `bg`.
    pub fn draw_bitmap_bg(
        &mut self,
        x: i16,
        y: i16,
        bitmap: &[u8],
        w: i16,
        h: i16,
        color: Rgb565,
        bg: Rgb565,
    ) {
        let stride = (w as i32 + 7) / 8;
        self.start_write();
        let mut byte: u8 = 0;
        for j in 0..h as i32 {
            for i in 0..w as i32 {
                if i & 7 != 0 {
                    byte <<= 1;
                } else {
                    byte = bitmap
                        .get((j * stride + i / 8) as usize)
                        .copied()
                        .unwrap_or(0);
                }
                let c = if byte & 0x80 != 0 { color } else { bg };
                self.put_pixel(x as i32 + i, y as i32 + j, c);
            }
        }
        self.end_write();
    }

    /// Draw a 1-bit XBM-format bitmap (LSB-first within each byte).
    pub fn draw_xbitmap(&mut self, x: i16, y: i16, bitmap: &[u8], w: i16, h: i16, color: Rgb565) {
        let stride = (w as i32 + 7) / 8;
        self.start_write();
        let mut byte: u8 = 0;
        for j in 0..h as i32 {
            for i in 0..w as i32 {
                if i & 7 != 0 {
                    byte >>= 1;
                } else {
                    byte = bitmap
                        .get((j * stride + i / 8) as usize)
                        .copied()
                        .unwrap_or(0);
                }
                if byte & 0x01 != 0 {
                    self.put_pixel(x as i32 + i, y as i32 + j, color);
                }
            }
        }
        self.end_write();
    }

    /// Draw an 8-bit grayscale bitmap; each sample expands to a gray RGB565
    /// value.
    pub fn draw_grayscale_bitmap(&mut self, x: i16, y: i16, bitmap: &[u8], w: i16, h: i16) {
        self.start_write();
        for j in 0..h as i32 {
            for i in 0..w as i32 {
                let Some(&g) = bitmap.get((j * w as i32 + i) as usize) else {
                    self.end_write();
                    return;
                };
                self.put_pixel(x as i32 + i, y as i32 + j, Rgb565::from_rgb(g, g, g));
            }
        }
        self.end_write();
    }

    /// Draw an 8-bit grayscale bitmap through a 1-bit mask (MSB-first);
    /// cleared mask bits leave the destination untouched.
    pub fn draw_grayscale_bitmap_masked(
        &mut self,
        x: i16,
        y: i16,
        bitmap: &[u8],
        mask: &[u8],
        w: i16,
        h: i16,
    ) {
        let mask_stride = (w as i32 + 7) / 8;
        self.start_write();
        let mut mbyte: u8 = 0;
        for j in 0..h as i32 {
            for i in 0..w as i32 {
                if i & 7 != 0 {
                    mbyte <<= 1;
                } else {
                    mbyte = mask
                        .get((j * mask_stride + i / 8) as usize)
                        .copied()
                        .unwrap_or(0);
                }
                if mbyte & 0x80 != 0 {
                    let Some(&g) = bitmap.get((j * w as i32 + i) as usize) else {
                        self.end_write();
                        return;
                    };
                    self.put_pixel(x as i32 + i, y as i32 + j, Rgb565::from_rgb(g, g, g));
                }
            }
        }
        self.end_write();
    }

    /// Draw a full-color RGB565 bitmap. A fully visible bitmap is handed to
    /// the backend's bulk blit; anything clipped falls back to per-pixel
    /// writes.
    pub fn draw_rgb_bitmap(&mut self, x: i16, y: i16, pixels: &[Rgb565], w: i16, h: i16) {
        self.start_write();
        let fully_visible = x >= 0
            && y >= 0
            && w > 0
            && h > 0
            && x as i32 + w as i32 <= self.width as i32
            && y as i32 + h as i32 <= self.height as i32
            && pixels.len() >= w as usize * h as usize;
        if fully_visible {
            self.backend.blit_rgb(x, y, w, h, pixels);
        } else {
            for j in 0..h as i32 {
                for i in 0..w as i32 {
                    let Some(&px) = pixels.get((j * w as i32 + i) as usize) else {
                        self.end_write();
                        return;
                    };
                    self.put_pixel(x as i32 + i, y as i32 + j, px);
                }
            }
        }
        self.end_write();
    }

    /// Draw an RGB565 bitmap through a 1-bit mask (MSB-first).
    pub fn draw_rgb_bitmap_masked(
        &mut self,
        x: i16,
        y: i16,
        pixels: &[Rgb565],
        mask: &[u8],
        w: i16,
        h: i16,
    ) {
        let mask_stride = (w as i32 + 7) / 8;
        self.start_write();
        let mut mbyte: u8 = 0;
        for j in 0..h as i32 {
            for i in 0..w as i32 {
                if i & 7 != 0 {
                    mbyte <<= 1;
                } else {
                    mbyte = mask
                        .get((j * mask_stride + i / 8) as usize)
                        .copied()
                        .unwrap_or(0);
                }
                if mbyte & 0x80 != 0 {
                    let Some(&px) = pixels.get((j * w as i32 + i) as usize) else {
                        self.end_write();
                        return;
                    };
                    self.put_pixel(x as i32 + i, y as i32 + j, px);
                }
            }
        }
        self.end_write();
    }
}
