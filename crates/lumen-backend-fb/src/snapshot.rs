//! Frame snapshots: dump a pixel buffer (or the current draw target) to PNG
//! for golden-image comparison and debugging.

use std::fs;
use std::io::BufWriter;
use std::path::Path;

use lumen_types::{GfxError, Result, Rgb565};

use crate::FbBackend;

/// Save packed RGB565 pixels as an opaque RGBA PNG.
pub fn save_png<P: AsRef<Path>>(path: P, width: u32, height: u32, pixels: &[u16]) -> Result<()> {
    if pixels.len() < (width * height) as usize {
        return Err(GfxError::Backend(format!(
            "snapshot needs {} pixels, got {}",
            width * height,
            pixels.len()
        )));
    }
    let file = fs::File::create(path.as_ref())?;
    let writer = BufWriter::new(file);
    let mut encoder = png::Encoder::new(writer, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder
        .write_header()
        .map_err(|e| GfxError::Backend(format!("png header: {e}")))?;

    let mut rgba = Vec::with_capacity(pixels.len() * 4);
    for &p in &pixels[..(width * height) as usize] {
        rgba.extend_from_slice(&Rgb565(p).to_rgba8());
    }
    writer
        .write_image_data(&rgba)
        .map_err(|e| GfxError::Backend(format!("png data: {e}")))?;
    log::debug!("snapshot written: {}", path.as_ref().display());
    Ok(())
}

impl FbBackend {
    /// Save the current draw target to a PNG file.
    pub fn save_snapshot<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let width = self.width as usize;
        let mut pixels = Vec::with_capacity(width * self.height as usize);
        for y in 0..self.height as usize {
            let row = self.draw_row(y).ok_or_else(|| {
                GfxError::Backend("no draw target to snapshot".into())
            })?;
            pixels.extend_from_slice(row);
        }
        save_png(path, self.width as u32, self.height as u32, &pixels)
    }
}
