//! Foundation types for LUMEN.
//!
//! The packed [`color::Rgb565`] pixel format shared by every backend, and the
//! [`error::GfxError`] type. This crate has no graphics logic of its own.

pub mod color;
pub mod error;

pub use color::Rgb565;
pub use error::{GfxError, Result};
