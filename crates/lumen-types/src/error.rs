//! Error types for LUMEN.

use std::io;

/// Errors produced by the LUMEN rendering engine.
///
/// Out-of-bounds geometry is never an error: spans clip and single pixels
/// drop silently. Errors are reserved for buffer management and
/// configuration, where the caller needs to know the operation was rejected.
#[derive(Debug, thiserror::Error)]
pub enum GfxError {
    #[error("backend error: {0}")]
    Backend(String),

    #[error("buffer error: {0}")]
    Buffer(String),

    #[error("allocation failed: {0}")]
    Alloc(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, GfxError>;
