//! Error types for the captcha pipeline.
//!
//! Errors fall into two groups: fatal setup failures (no surface, no glyph,
//! no worker thread) and precondition violations rejected before any
//! encoding starts. Steady-state flicker and verification never fail.

use thiserror::Error;

/// Errors produced while building or displaying a challenge.
#[derive(Error, Debug)]
pub enum Error {
    /// The backing raster surface could not be created or sized.
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// The font has no glyph for a character in the challenge.
    #[error("no glyph for {0:?} in the bitmap font")]
    GlyphMissing(char),

    /// The challenge text does not fit on the canvas even at the smallest scale.
    #[error("text of {chars} characters does not fit a {width}x{height} canvas")]
    TextTooLarge {
        /// Number of glyphs in the text.
        chars: usize,
        /// Canvas width in pixels.
        width: u16,
        /// Canvas height in pixels.
        height: u16,
    },

    /// The challenge string was empty.
    #[error("challenge text is empty")]
    EmptyChallenge,

    /// A mask, grid or buffer dimension was zero.
    #[error("{what} has a zero dimension ({width}x{height})")]
    ZeroDimension {
        /// What was being sized.
        what: &'static str,
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },

    /// Two buffers that must match in size do not.
    #[error("buffer size mismatch: {a:?} vs {b:?}")]
    BufferMismatch {
        /// Size of the first buffer.
        a: (u16, u16),
        /// Size of the second buffer.
        b: (u16, u16),
    },

    /// The challenge alphabet was empty.
    #[error("challenge alphabet is empty")]
    EmptyAlphabet,

    /// The periodic worker thread could not be spawned.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// Terminal I/O failed.
    #[error("terminal I/O failed: {0}")]
    Terminal(#[source] std::io::Error),

    /// The configuration file could not be read.
    #[error("failed to read config: {0}")]
    ConfigIo(#[source] std::io::Error),

    /// The configuration file could not be parsed.
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
