//! Memory-mapped framebuffer backend.
//!
//! [`FbBackend`] renders by storing packed RGB565 values into pixel memory.
//! In direct mode every write lands in the device's mapped framebuffer; with
//! multi-buffering enabled, writes land in one of up to three off-screen
//! frame slots and reach the device only on swap or display selection.
//!
//! Frame slots are either owned heap allocations or caller-attached external
//! regions; see [`FbBackend::attach_external_buffer`] for the latter's
//! contract.

mod buffers;
mod snapshot;

pub use buffers::ClearTarget;
pub use snapshot::save_png;

use lumen_gfx::PixelBackend;
use lumen_types::Rgb565;

/// Maximum number of frame slots.
pub const MAX_BUFFERS: u8 = 3;

/// A display device exposing a memory-mapped RGB565 pixel region.
///
/// The region reported by [`framebuffer`](Self::framebuffer) must stay valid
/// and at least `pitch() * height()` bytes for as long as any backend built
/// on it is alive.
pub trait DisplayDevice {
    /// Native width in pixels.
    fn width(&self) -> i16;

    /// Native height in pixels.
    fn height(&self) -> i16;

    /// Bits per pixel. Only 16 is supported.
    fn depth(&self) -> u8 {
        16
    }

    /// Bytes per scanline, padding included.
    fn pitch(&self) -> usize;

    /// Base of the pixel region, or null when the device is not mapped.
    fn framebuffer(&self) -> *mut u16;
}

/// Backing store of one frame slot.
pub(crate) enum SlotMem {
    /// Heap allocation managed by the backend.
    Owned(Vec<u16>),
    /// Caller-provided region; validity is guaranteed by the attach contract.
    Borrowed(*mut u16),
}

/// One off-screen frame slot.
pub(crate) struct FrameSlot {
    pub(crate) mem: SlotMem,
    /// Pixels per scanline of this slot's memory.
    pub(crate) pitch_px: usize,
    /// Set once the slot holds a completed frame.
    pub(crate) ready: bool,
}

impl FrameSlot {
    /// The first `width` pixels of scanline `y`.
    pub(crate) fn row(&self, y: usize, width: usize) -> Option<&[u16]> {
        let start = y * self.pitch_px;
        match &self.mem {
            SlotMem::Owned(mem) => mem.get(start..start + width),
            // SAFETY: the attach contract guarantees `pitch_px * height`
            // valid pixels; `y` is bounds-checked by every caller.
            SlotMem::Borrowed(ptr) => {
                Some(unsafe { std::slice::from_raw_parts(ptr.add(start), width) })
            }
        }
    }

    /// Mutable view of the first `width` pixels of scanline `y`.
    pub(crate) fn row_mut(&mut self, y: usize, width: usize) -> Option<&mut [u16]> {
        let start = y * self.pitch_px;
        match &mut self.mem {
            SlotMem::Owned(mem) => mem.get_mut(start..start + width),
            // SAFETY: same contract as `row`, with exclusive access through
            // `&mut self`.
            SlotMem::Borrowed(ptr) => {
                Some(unsafe { std::slice::from_raw_parts_mut(ptr.add(start), width) })
            }
        }
    }
}

/// Framebuffer pixel backend with optional multi-buffering.
pub struct FbBackend {
    width: i16,
    height: i16,
    /// Pixels per scanline of the device framebuffer.
    device_pitch_px: usize,
    device_fb: *mut u16,
    slots: [Option<FrameSlot>; MAX_BUFFERS as usize],
    buffer_count: u8,
    draw_index: u8,
    display_index: u8,
    multi_enabled: bool,
}

impl FbBackend {
    /// Build a backend over a display device.
    ///
    /// An unmapped device (null framebuffer) or an unsupported pixel depth
    /// yields an inert zero-size backend: every draw is silently dropped.
    pub fn new<D: DisplayDevice + ?Sized>(device: &D) -> Self {
        let fb = device.framebuffer();
        let (width, height, pitch_px, fb) = if fb.is_null() {
            log::warn!("display device has no mapped framebuffer; backend is inert");
            (0, 0, 0, std::ptr::null_mut())
        } else if device.depth() != 16 {
            log::warn!(
                "unsupported pixel depth {} (only 16-bit RGB565); backend is inert",
                device.depth()
            );
            (0, 0, 0, std::ptr::null_mut())
        } else {
            (
                device.width(),
                device.height(),
                device.pitch() / 2,
                fb,
            )
        };
        log::info!("framebuffer backend: {width}x{height}, pitch {pitch_px} px");
        Self {
            width,
            height,
            device_pitch_px: pitch_px,
            device_fb: fb,
            slots: [None, None, None],
            buffer_count: 1,
            draw_index: 0,
            display_index: 0,
            multi_enabled: false,
        }
    }

    /// The first `width` pixels of scanline `y` of the current draw target.
    pub(crate) fn draw_row(&self, y: usize) -> Option<&[u16]> {
        let width = self.width as usize;
        if self.multi_enabled {
            self.slots[self.draw_index as usize]
                .as_ref()
                .and_then(|slot| slot.row(y, width))
        } else if self.device_fb.is_null() {
            None
        } else {
            let start = y * self.device_pitch_px;
            // SAFETY: the device contract guarantees `pitch * height` bytes;
            // `y` is bounds-checked by every caller.
            Some(unsafe { std::slice::from_raw_parts(self.device_fb.add(start), width) })
        }
    }

    /// Mutable view of scanline `y` of the current draw target.
    pub(crate) fn draw_row_mut(&mut self, y: usize) -> Option<&mut [u16]> {
        let width = self.width as usize;
        if self.multi_enabled {
            self.slots[self.draw_index as usize]
                .as_mut()
                .and_then(|slot| slot.row_mut(y, width))
        } else if self.device_fb.is_null() {
            None
        } else {
            let start = y * self.device_pitch_px;
            // SAFETY: same contract as `draw_row`, exclusive through
            // `&mut self`.
            Some(unsafe { std::slice::from_raw_parts_mut(self.device_fb.add(start), width) })
        }
    }
}

impl PixelBackend for FbBackend {
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
        if let Some(row) = self.draw_row_mut(y as usize) {
            row[x as usize] = color.raw();
        }
    }

    fn read_pixel(&self, x: i16, y: i16) -> Rgb565 {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return Rgb565(0);
        }
        self.draw_row(y as usize)
            .map_or(Rgb565(0), |row| Rgb565(row[x as usize]))
    }

    /// Row-slice fill instead of the per-pixel default.
    fn fill_rect(&mut self, x: i16, y: i16, w: i16, h: i16, color: Rgb565) {
        let x0 = (x as i32).max(0);
        let y0 = (y as i32).max(0);
        let x1 = (x as i32 + w as i32).min(self.width as i32);
        let y1 = (y as i32 + h as i32).min(self.height as i32);
        if x1 <= x0 || y1 <= y0 {
            return;
        }
        let raw = color.raw();
        for yy in y0..y1 {
            if let Some(row) = self.draw_row_mut(yy as usize) {
                row[x0 as usize..x1 as usize].fill(raw);
            }
        }
    }

    fn fill_screen(&mut self, color: Rgb565) {
        self.fill_rect(0, 0, self.width, self.height, color);
    }

    /// Row-wise copy instead of the per-pixel default. Same contract: a
    /// slice shorter than `w * h` writes nothing.
    fn blit_rgb(&mut self, x: i16, y: i16, w: i16, h: i16, pixels: &[Rgb565]) {
        if w <= 0 || h <= 0 || pixels.len() < w as usize * h as usize {
            return;
        }
        let width = self.width as i32;
        let height = self.height as i32;
        for j in 0..h as i32 {
            let dy = y as i32 + j;
            if dy < 0 || dy >= height {
                continue;
            }
            let x0 = (x as i32).max(0);
            let x1 = (x as i32 + w as i32).min(width);
            if x1 <= x0 {
                continue;
            }
            let src_start = (j * w as i32 + (x0 - x as i32)) as usize;
            let count = (x1 - x0) as usize;
            let Some(src) = pixels.get(src_start..src_start + count) else {
                return;
            };
            if let Some(row) = self.draw_row_mut(dy as usize) {
                for (dst, px) in row[x0 as usize..x1 as usize].iter_mut().zip(src) {
                    *dst = px.raw();
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_device {
    use std::cell::UnsafeCell;

    use super::DisplayDevice;

    /// A fake display device over plain heap memory, with optional row
    /// padding to exercise pitch handling.
    pub(crate) struct TestDevice {
        width: i16,
        height: i16,
        pitch_px: usize,
        mem: UnsafeCell<Vec<u16>>,
    }

    impl TestDevice {
        pub(crate) fn new(width: i16, height: i16) -> Self {
            Self::with_pitch(width, height, width as usize)
        }

        pub(crate) fn with_pitch(width: i16, height: i16, pitch_px: usize) -> Self {
            Self {
                width,
                height,
                pitch_px,
                mem: UnsafeCell::new(vec![0; pitch_px * height as usize]),
            }
        }

        pub(crate) fn pixel(&self, x: usize, y: usize) -> u16 {
            // SAFETY: test-only; no concurrent access.
            unsafe { (&*self.mem.get())[y * self.pitch_px + x] }
        }
    }

    impl DisplayDevice for TestDevice {
        fn width(&self) -> i16 {
            self.width
        }

        fn height(&self) -> i16 {
            self.height
        }

        fn pitch(&self) -> usize {
            self.pitch_px * 2
        }

        fn framebuffer(&self) -> *mut u16 {
            // SAFETY: test-only; the device outlives every backend in tests.
            unsafe { (&mut *self.mem.get()).as_mut_ptr() }
        }
    }

    /// A device that reports no mapped framebuffer.
    pub(crate) struct UnmappedDevice;

    impl DisplayDevice for UnmappedDevice {
        fn width(&self) -> i16 {
            480
        }

        fn height(&self) -> i16 {
            272
        }

        fn pitch(&self) -> usize {
            960
        }

        fn framebuffer(&self) -> *mut u16 {
            std::ptr::null_mut()
        }
    }
}
