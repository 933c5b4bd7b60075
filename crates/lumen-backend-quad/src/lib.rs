//! GPU quad-compositing backend.
//!
//! Instead of storing pixels, [`QuadBackend`] turns every write into
//! geometry: a single pixel is a 1x1 solid quad, a rectangle fill is one
//! quad, and an RGB blit becomes a scratch-texture upload drawn as a
//! textured quad. The rendering context owns the actual GPU state; this
//! crate only decides what to submit.
//!
//! There is no pixel store to read back from, so `read_pixel` always
//! returns `Rgb565(0)`.

use lumen_gfx::PixelBackend;
use lumen_types::Rgb565;

/// A GPU rendering context that can draw solid and textured quads in
/// screen space.
pub trait RenderContext {
    /// Target width in pixels.
    fn width(&self) -> i16;

    /// Target height in pixels.
    fn height(&self) -> i16;

    /// Draw a solid quad; `rgba` channels are normalized floats.
    fn draw_quad(&mut self, x: i16, y: i16, w: i16, h: i16, rgba: [f32; 4]);

    /// Upload RGBA8 pixel data into the scratch texture.
    fn upload_scratch(&mut self, w: i16, h: i16, rgba: &[u8]);

    /// Draw the scratch texture as a quad at the given position and size.
    fn draw_scratch(&mut self, x: i16, y: i16, w: i16, h: i16);

    /// Present the composed frame.
    fn present(&mut self);
}

/// Pixel backend that composites by submitting quads to a [`RenderContext`].
pub struct QuadBackend<C: RenderContext> {
    ctx: C,
    width: i16,
    height: i16,
    /// Reused RGBA8 conversion buffer for blits.
    scratch: Vec<u8>,
}

impl<C: RenderContext> QuadBackend<C> {
    /// Wrap a rendering context.
    pub fn new(ctx: C) -> Self {
        let width = ctx.width();
        let height = ctx.height();
        log::info!("quad backend: {width}x{height}");
        Self {
            ctx,
            width,
            height,
            scratch: Vec::new(),
        }
    }

    /// Shared access to the rendering context.
    pub fn ctx(&self) -> &C {
        &self.ctx
    }

    /// Exclusive access to the rendering context.
    pub fn ctx_mut(&mut self) -> &mut C {
        &mut self.ctx
    }

    /// Present the composed frame.
    pub fn present(&mut self) {
        self.ctx.present();
    }

    /// Clip a rectangle against the target; `None` when nothing remains.
    fn clip(&self, x: i16, y: i16, w: i16, h: i16) -> Option<(i16, i16, i16, i16)> {
        let x0 = (x as i32).max(0);
        let y0 = (y as i32).max(0);
        let x1 = (x as i32 + w as i32).min(self.width as i32);
        let y1 = (y as i32 + h as i32).min(self.height as i32);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some((x0 as i16, y0 as i16, (x1 - x0) as i16, (y1 - y0) as i16))
    }
}

impl<C: RenderContext> PixelBackend for QuadBackend<C> {
    fn width(&self) -> i16 {
        self.width
    }

    fn height(&self) -> i16 {
        self.height
    }

    fn write_pixel(&mut self, x: i16, y: i16, color: Rgb565) {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return;
        }
        self.ctx.draw_quad(x, y, 1, 1, color.to_f32());
    }

    fn read_pixel(&self, _x: i16, _y: i16) -> Rgb565 {
        // Quads are write-only; there is no composed pixel store to sample.
        Rgb565(0)
    }

    /// One clipped quad instead of the per-pixel default.
    fn fill_rect(&mut self, x: i16, y: i16, w: i16, h: i16, color: Rgb565) {
        let Some((x, y, w, h)) = self.clip(x, y, w, h) else {
            return;
        };
        self.ctx.draw_quad(x, y, w, h, color.to_f32());
    }

    fn fill_screen(&mut self, color: Rgb565) {
        self.ctx
            .draw_quad(0, 0, self.width, self.height, color.to_f32());
    }

    /// Upload once, draw once: the whole bitmap becomes a textured quad.
    fn blit_rgb(&mut self, x: i16, y: i16, w: i16, h: i16, pixels: &[Rgb565]) {
        if w <= 0 || h <= 0 || pixels.len() < w as usize * h as usize {
            return;
        }
        self.scratch.clear();
        self.scratch.reserve(pixels.len() * 4);
        for &px in &pixels[..w as usize * h as usize] {
            self.scratch.extend_from_slice(&px.to_rgba8());
        }
        self.ctx.upload_scratch(w, h, &self.scratch);
        self.ctx.draw_scratch(x, y, w, h);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Command {
        Quad { x: i16, y: i16, w: i16, h: i16, rgba: [f32; 4] },
        Upload { w: i16, h: i16, bytes: usize },
        Scratch { x: i16, y: i16, w: i16, h: i16 },
        Present,
    }

    /// Records every submission for assertion.
    struct RecordingContext {
        width: i16,
        height: i16,
        commands: Vec<Command>,
    }

    impl RecordingContext {
        fn new(width: i16, height: i16) -> Self {
            Self {
                width,
                height,
                commands: Vec::new(),
            }
        }
    }

    impl RenderContext for RecordingContext {
        fn width(&self) -> i16 {
            self.width
        }

        fn height(&self) -> i16 {
            self.height
        }

        fn draw_quad(&mut self, x: i16, y: i16, w: i16, h: i16, rgba: [f32; 4]) {
            self.commands.push(Command::Quad { x, y, w, h, rgba });
        }

        fn upload_scratch(&mut self, w: i16, h: i16, rgba: &[u8]) {
            self.commands.push(Command::Upload { w, h, bytes: rgba.len() });
        }

        fn draw_scratch(&mut self, x: i16, y: i16, w: i16, h: i16) {
            self.commands.push(Command::Scratch { x, y, w, h });
        }

        fn present(&mut self) {
            self.commands.push(Command::Present);
        }
    }

    #[test]
    fn pixel_becomes_a_unit_quad() {
        let mut b = QuadBackend::new(RecordingContext::new(16, 16));
        b.write_pixel(3, 4, Rgb565::RED);
        assert_eq!(
            b.ctx().commands,
            vec![Command::Quad { x: 3, y: 4, w: 1, h: 1, rgba: Rgb565::RED.to_f32() }]
        );
    }

    #[test]
    fn out_of_range_pixel_submits_nothing() {
        let mut b = QuadBackend::new(RecordingContext::new(16, 16));
        b.write_pixel(-1, 0, Rgb565::RED);
        b.write_pixel(16, 0, Rgb565::RED);
        assert!(b.ctx().commands.is_empty());
    }

    #[test]
    fn fill_rect_is_one_clipped_quad() {
        let mut b = QuadBackend::new(RecordingContext::new(16, 16));
        b.fill_rect(-2, -2, 10, 10, Rgb565::GREEN);
        assert_eq!(
            b.ctx().commands,
            vec![Command::Quad { x: 0, y: 0, w: 8, h: 8, rgba: Rgb565::GREEN.to_f32() }]
        );
    }

    #[test]
    fn fully_clipped_rect_submits_nothing() {
        let mut b = QuadBackend::new(RecordingContext::new(16, 16));
        b.fill_rect(20, 20, 4, 4, Rgb565::GREEN);
        b.fill_rect(0, 0, -4, 4, Rgb565::GREEN);
        assert!(b.ctx().commands.is_empty());
    }

    #[test]
    fn fill_screen_covers_the_target() {
        let mut b = QuadBackend::new(RecordingContext::new(32, 24));
        b.fill_screen(Rgb565::BLUE);
        assert_eq!(
            b.ctx().commands,
            vec![Command::Quad { x: 0, y: 0, w: 32, h: 24, rgba: Rgb565::BLUE.to_f32() }]
        );
    }

    #[test]
    fn blit_is_one_upload_and_one_textured_quad() {
        let mut b = QuadBackend::new(RecordingContext::new(16, 16));
        let pixels = [Rgb565::WHITE; 6];
        b.blit_rgb(2, 3, 3, 2, &pixels);
        assert_eq!(
            b.ctx().commands,
            vec![
                Command::Upload { w: 3, h: 2, bytes: 24 },
                Command::Scratch { x: 2, y: 3, w: 3, h: 2 },
            ]
        );
    }

    #[test]
    fn short_blit_slice_submits_nothing() {
        let mut b = QuadBackend::new(RecordingContext::new(16, 16));
        b.blit_rgb(0, 0, 3, 2, &[Rgb565::WHITE; 5]);
        assert!(b.ctx().commands.is_empty());
    }

    #[test]
    fn read_back_is_unsupported() {
        let mut b = QuadBackend::new(RecordingContext::new(16, 16));
        b.write_pixel(1, 1, Rgb565::WHITE);
        assert_eq!(b.read_pixel(1, 1), Rgb565(0));
    }

    #[test]
    fn present_forwards_to_the_context() {
        let mut b = QuadBackend::new(RecordingContext::new(16, 16));
        b.present();
        assert_eq!(b.ctx().commands, vec![Command::Present]);
    }
}
