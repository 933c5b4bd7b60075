//! Surface state and the core draw API.
//!
//! [`Canvas`] wraps a [`PixelBackend`] and adds everything the backends do
//! not know about: logical dimensions under rotation, the transaction
//! bracket, text/cursor state, and the rasterization of primitives into
//! bounded pixel and span writes.
//!
//! The `write_*` methods assume an open transaction bracket; the `draw_*`
//! methods are the bracketed public entry points, mirroring the split
//! between one-shot calls and batched sequences.

use lumen_types::Rgb565;

use crate::backend::PixelBackend;
use crate::font::Font;

/// An immediate-mode drawing surface over a pixel backend.
pub struct Canvas<B: PixelBackend> {
    pub(crate) backend: B,
    /// Logical width; reflects the current rotation.
    pub(crate) width: i16,
    /// Logical height; reflects the current rotation.
    pub(crate) height: i16,
    rotation: u8,
    inverted: bool,
    in_transaction: bool,

    // Text engine state (mutated only by the text API and wrap logic).
    pub(crate) cursor_x: i16,
    pub(crate) cursor_y: i16,
    pub(crate) text_color: Rgb565,
    pub(crate) text_bg: Rgb565,
    pub(crate) text_size_x: u8,
    pub(crate) text_size_y: u8,
    pub(crate) text_wrap: bool,
    pub(crate) font: Option<&'static Font>,
}

impl<B: PixelBackend> Canvas<B> {
    /// Wrap a backend. Logical dimensions start at the backend's native ones.
    pub fn new(backend: B) -> Self {
        let width = backend.width();
        let height = backend.height();
        log::debug!("canvas created: {width}x{height}");
        Self {
            backend,
            width,
            height,
            rotation: 0,
            inverted: false,
            in_transaction: false,
            cursor_x: 0,
            cursor_y: 0,
            text_color: Rgb565::WHITE,
            text_bg: Rgb565::BLACK,
            text_size_x: 1,
            text_size_y: 1,
            text_wrap: true,
            font: None,
        }
    }

    /// Shared access to the backend (for backend-specific queries).
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Exclusive access to the backend (buffer management, presentation).
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Unwrap the backend.
    pub fn into_backend(self) -> B {
        self.backend
    }

    // -----------------------------------------------------------------------
    // Transaction bracket
    // -----------------------------------------------------------------------

    /// Open a transaction bracket around a batch of `write_*` calls.
    ///
    /// Signals intent to batch; provides no atomicity.
    pub fn start_write(&mut self) {
        if !self.in_transaction {
            self.backend.start_write();
        }
        self.in_transaction = true;
    }

    /// Close the transaction bracket.
    pub fn end_write(&mut self) {
        if self.in_transaction {
            self.backend.end_write();
        }
        self.in_transaction = false;
    }

    // -----------------------------------------------------------------------
    // Pixels and spans
    // -----------------------------------------------------------------------

    /// Write one pixel; silently dropped when out of logical bounds.
    pub fn write_pixel(&mut self, x: i16, y: i16, color: Rgb565) {
        self.put_pixel(x as i32, y as i32, color);
    }

    /// Bounds-checked pixel write in widened coordinates. All internal
    /// rasterizer math runs in i32 so intermediate sums cannot wrap.
    pub(crate) fn put_pixel(&mut self, x: i32, y: i32, color: Rgb565) {
        if x < 0 || x >= self.width as i32 || y < 0 || y >= self.height as i32 {
            return;
        }
        self.backend.write_pixel(x as i16, y as i16, color);
    }

    /// Bracketed single-pixel draw.
    pub fn draw_pixel(&mut self, x: i16, y: i16, color: Rgb565) {
        self.start_write();
        self.write_pixel(x, y, color);
        self.end_write();
    }

    /// Read one pixel; `Rgb565(0)` when out of bounds or unsupported.
    pub fn pixel(&self, x: i16, y: i16) -> Rgb565 {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return Rgb565(0);
        }
        self.backend.read_pixel(x, y)
    }

    /// Horizontal span, clipped to the surface before iterating.
    pub fn write_hline(&mut self, x: i16, y: i16, w: i16, color: Rgb565) {
        self.clipped_hline(x as i32, y as i32, w as i32, color);
    }

    /// Vertical span, clipped to the surface before iterating.
    pub fn write_vline(&mut self, x: i16, y: i16, h: i16, color: Rgb565) {
        self.clipped_vline(x as i32, y as i32, h as i32, color);
    }

    pub(crate) fn clipped_hline(&mut self, x: i32, y: i32, w: i32, color: Rgb565) {
        if y < 0 || y >= self.height as i32 {
            return;
        }
        let x_start = x.max(0);
        let x_end = (x + w).min(self.width as i32);
        for i in x_start..x_end {
            self.backend.write_pixel(i as i16, y as i16, color);
        }
    }

    pub(crate) fn clipped_vline(&mut self, x: i32, y: i32, h: i32, color: Rgb565) {
        if x < 0 || x >= self.width as i32 {
            return;
        }
        let y_start = y.max(0);
        let y_end = (y + h).min(self.height as i32);
        for i in y_start..y_end {
            self.backend.write_pixel(x as i16, i as i16, color);
        }
    }

    /// Bresenham line between inclusive endpoints. Equal endpoints draw
    /// exactly one pixel.
    pub fn write_line(&mut self, x0: i16, y0: i16, x1: i16, y1: i16, color: Rgb565) {
        let (x0, y0, x1, y1) = (x0 as i32, y0 as i32, x1 as i32, y1 as i32);
        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx - dy;

        let mut x = x0;
        let mut y = y0;
        loop {
            self.put_pixel(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x += sx;
            }
            if e2 < dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Filled rectangle within the bracket; clipped, then handed to the
    /// backend's (possibly overridden) bulk fill.
    pub fn write_fill_rect(&mut self, x: i16, y: i16, w: i16, h: i16, color: Rgb565) {
        self.clipped_fill_rect(x as i32, y as i32, w as i32, h as i32, color);
    }

    pub(crate) fn clipped_fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb565) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(self.width as i32);
        let y1 = (y + h).min(self.height as i32);
        if x1 <= x0 || y1 <= y0 {
            return;
        }
        self.backend
            .fill_rect(x0 as i16, y0 as i16, (x1 - x0) as i16, (y1 - y0) as i16, color);
    }

    // -----------------------------------------------------------------------
    // Bracketed primitives
    // -----------------------------------------------------------------------

    /// Horizontal line.
    pub fn draw_hline(&mut self, x: i16, y: i16, w: i16, color: Rgb565) {
        self.start_write();
        self.write_hline(x, y, w, color);
        self.end_write();
    }

    /// Vertical line.
    pub fn draw_vline(&mut self, x: i16, y: i16, h: i16, color: Rgb565) {
        self.start_write();
        self.write_vline(x, y, h, color);
        self.end_write();
    }

    /// Line between two points.
    pub fn draw_line(&mut self, x0: i16, y0: i16, x1: i16, y1: i16, color: Rgb565) {
        self.start_write();
        self.write_line(x0, y0, x1, y1, color);
        self.end_write();
    }

    /// Rectangle outline.
    pub fn draw_rect(&mut self, x: i16, y: i16, w: i16, h: i16, color: Rgb565) {
        self.start_write();
        self.write_hline(x, y, w, color);
        self.clipped_hline(x as i32, y as i32 + h as i32 - 1, w as i32, color);
        self.write_vline(x, y, h, color);
        self.clipped_vline(x as i32 + w as i32 - 1, y as i32, h as i32, color);
        self.end_write();
    }

    /// Filled rectangle.
    pub fn fill_rect(&mut self, x: i16, y: i16, w: i16, h: i16, color: Rgb565) {
        self.start_write();
        self.write_fill_rect(x, y, w, h, color);
        self.end_write();
    }

    /// Fill the whole surface.
    pub fn fill_screen(&mut self, color: Rgb565) {
        self.start_write();
        self.backend.fill_screen(color);
        self.end_write();
    }

    // -----------------------------------------------------------------------
    // Rotation, inversion, dimensions
    // -----------------------------------------------------------------------

    /// Set the surface rotation in quarter turns (0-3); width/height swap
    /// whenever the orientation parity changes.
    pub fn set_rotation(&mut self, r: u8) {
        let r = r % 4;
        if (r & 1) != (self.rotation & 1) {
            std::mem::swap(&mut self.width, &mut self.height);
        }
        self.rotation = r;
    }

    /// Current rotation in quarter turns.
    pub fn rotation(&self) -> u8 {
        self.rotation
    }

    /// Set the display inversion flag.
    pub fn invert_display(&mut self, inverted: bool) {
        self.inverted = inverted;
    }

    /// Whether the display inversion flag is set.
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Logical width under the current rotation.
    pub fn width(&self) -> i16 {
        self.width
    }

    /// Logical height under the current rotation.
    pub fn height(&self) -> i16 {
        self.height
    }
}
