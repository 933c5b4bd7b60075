//! Shared test utilities.
//!
//! [`MemoryBackend`] is a plain `Vec<u16>` pixel store implementing only the
//! required half of [`PixelBackend`], so tests against it exercise the
//! default bulk implementations that backend overrides must match.

use lumen_types::Rgb565;

use crate::backend::PixelBackend;

/// In-memory pixel store for tests.
pub struct MemoryBackend {
    width: i16,
    height: i16,
    pixels: Vec<u16>,
    writes: u64,
}

impl MemoryBackend {
    pub fn new(width: i16, height: i16) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
            writes: 0,
        }
    }

    /// Number of pixels currently holding a non-zero color.
    pub fn painted(&self) -> usize {
        self.pixels.iter().filter(|&&p| p != 0).count()
    }

    /// Total accepted writes, including overwrites of the same pixel.
    pub fn writes(&self) -> u64 {
        self.writes
    }
}

impl PixelBackend for MemoryBackend {
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
        self.pixels[y as usize * self.width as usize + x as usize] = color.raw();
        self.writes += 1;
    }

    fn read_pixel(&self, x: i16, y: i16) -> Rgb565 {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return Rgb565(0);
        }
        Rgb565(self.pixels[y as usize * self.width as usize + x as usize])
    }
}
