//! LUMEN core: an immediate-mode 2D rasterizer for small displays.
//!
//! All drawing goes through the [`backend::PixelBackend`] trait, which has
//! exactly two production implementations (a memory-mapped framebuffer and a
//! GPU quad compositor, in their own crates). The rasterizer, bitmap blits,
//! and text engine in this crate never branch on backend identity; they
//! decompose every primitive into bounded pixel and span writes.

pub mod backend;
pub mod canvas;
pub mod config;
pub mod font;

mod bitmap;
mod shapes;
mod text;

#[cfg(test)]
mod test_utils;

pub use backend::PixelBackend;
pub use canvas::Canvas;
pub use config::{BufferingConfig, DisplayConfig};
pub use font::{Font, Glyph};
pub use lumen_types::{GfxError, Result, Rgb565};
