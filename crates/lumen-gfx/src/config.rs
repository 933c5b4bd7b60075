//! Display configuration.
//!
//! A small TOML manifest fixes the initial surface state (rotation,
//! inversion, text defaults) and, optionally, the buffering mode a backend
//! should be put into. Every field has a default, so an empty manifest is
//! valid.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use lumen_types::{GfxError, Result, Rgb565};

use crate::backend::PixelBackend;
use crate::canvas::Canvas;

/// Declarative initial display state.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DisplayConfig {
    /// Rotation in quarter turns (0-3).
    #[serde(default)]
    pub rotation: u8,
    /// Display inversion flag.
    #[serde(default)]
    pub inverted: bool,
    /// Horizontal text magnification.
    #[serde(default = "default_text_size")]
    pub text_size_x: u8,
    /// Vertical text magnification.
    #[serde(default = "default_text_size")]
    pub text_size_y: u8,
    /// Wrap text at the right edge.
    #[serde(default = "default_text_wrap")]
    pub text_wrap: bool,
    /// Foreground text color as `"#RRGGBB"`.
    #[serde(default)]
    pub text_color: Option<Rgb565>,
    /// Background text color as `"#RRGGBB"`.
    #[serde(default)]
    pub text_background: Option<Rgb565>,
    /// Buffering mode, applied by backends that manage frame slots.
    #[serde(default)]
    pub buffering: Option<BufferingConfig>,
}

/// Frame-slot buffering parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BufferingConfig {
    /// Number of frame slots (1-3).
    #[serde(default = "default_buffers")]
    pub buffers: u8,
    /// Zero the new draw slot after each swap.
    #[serde(default = "default_auto_clear")]
    pub auto_clear: bool,
}

fn default_text_size() -> u8 {
    1
}

fn default_text_wrap() -> bool {
    true
}

fn default_buffers() -> u8 {
    2
}

fn default_auto_clear() -> bool {
    true
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            rotation: 0,
            inverted: false,
            text_size_x: default_text_size(),
            text_size_y: default_text_size(),
            text_wrap: default_text_wrap(),
            text_color: None,
            text_background: None,
            buffering: None,
        }
    }
}

impl DisplayConfig {
    /// Parse a manifest from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        if config.rotation > 3 {
            return Err(GfxError::Config(format!(
                "rotation must be 0-3, got {}",
                config.rotation
            )));
        }
        if let Some(b) = &config.buffering
            && !(1..=3).contains(&b.buffers)
        {
            return Err(GfxError::Config(format!(
                "buffers must be 1-3, got {}",
                b.buffers
            )));
        }
        Ok(config)
    }

    /// Load a manifest from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        log::debug!("loaded display config from {}", path.as_ref().display());
        Self::from_toml_str(&text)
    }

    /// Apply the surface-level settings to a canvas. Buffering settings are
    /// left to the backend owner, since not every backend has frame slots.
    pub fn apply<B: PixelBackend>(&self, canvas: &mut Canvas<B>) {
        canvas.set_rotation(self.rotation);
        canvas.invert_display(self.inverted);
        canvas.set_text_size_xy(self.text_size_x, self.text_size_y);
        canvas.set_text_wrap(self.text_wrap);
        match (self.text_color, self.text_background) {
            (Some(fg), Some(bg)) => canvas.set_text_color_bg(fg, bg),
            (Some(fg), None) => canvas.set_text_color(fg),
            (None, Some(bg)) => {
                let fg = Rgb565::WHITE;
                canvas.set_text_color_bg(fg, bg);
            }
            (None, None) => {}
        }
    }
}
