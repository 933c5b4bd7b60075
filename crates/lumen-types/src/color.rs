//! Packed 16-bit RGB565 color.
//!
//! Every surface, buffer, and bitmap in LUMEN uses one fixed pixel format:
//! 5 bits red, 6 bits green, 5 bits blue, packed into a `u16`. The quad
//! backend expands it to 8-bit or normalized-float channels on the way out.

use serde::Deserialize;

use crate::error::{GfxError, Result};

/// A packed RGB565 pixel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb565(pub u16);

impl Rgb565 {
    pub const BLACK: Self = Self(0x0000);
    pub const WHITE: Self = Self(0xFFFF);
    pub const RED: Self = Self(0xF800);
    pub const GREEN: Self = Self(0x07E0);
    pub const BLUE: Self = Self(0x001F);

    /// Pack three 8-bit channels, truncating each to its field width.
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u16 & 0xF8) << 8) | ((g as u16 & 0xFC) << 3) | (b as u16 >> 3))
    }

    /// Pack a `0xRRGGBB` triple.
    pub const fn from_rgb888(rgb: u32) -> Self {
        Self::from_rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    /// The raw packed value.
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Expand to 8-bit channels with bit replication, alpha forced opaque.
    pub const fn to_rgba8(self) -> [u8; 4] {
        let r5 = ((self.0 >> 11) & 0x1F) as u8;
        let g6 = ((self.0 >> 5) & 0x3F) as u8;
        let b5 = (self.0 & 0x1F) as u8;
        [
            (r5 << 3) | (r5 >> 2),
            (g6 << 2) | (g6 >> 4),
            (b5 << 3) | (b5 >> 2),
            0xFF,
        ]
    }

    /// Expand to normalized float channels for quad submission.
    pub fn to_f32(self) -> [f32; 4] {
        let r5 = ((self.0 >> 11) & 0x1F) as f32;
        let g6 = ((self.0 >> 5) & 0x3F) as f32;
        let b5 = (self.0 & 0x1F) as f32;
        [r5 / 31.0, g6 / 63.0, b5 / 31.0, 1.0]
    }
}

impl From<u16> for Rgb565 {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

impl<'de> Deserialize<'de> for Rgb565 {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_hex_color(&s).map_err(serde::de::Error::custom)
    }
}

/// Parse a `#RRGGBB` hex string into a packed color.
pub fn parse_hex_color(s: &str) -> Result<Rgb565> {
    let hex = s
        .strip_prefix('#')
        .ok_or_else(|| GfxError::Config(format!("color must start with '#': {s}")))?;
    if hex.len() != 6 {
        return Err(GfxError::Config(format!("color must be #RRGGBB: {s}")));
    }
    let rgb = u32::from_str_radix(hex, 16)
        .map_err(|e| GfxError::Config(format!("invalid hex color {s}: {e}")))?;
    Ok(Rgb565::from_rgb888(rgb))
}
