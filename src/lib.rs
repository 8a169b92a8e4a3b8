//! # Flicker
//!
//! A temporal visual-cryptography CAPTCHA.
//!
//! A short challenge string is rasterized to a binary mask, split into two
//! noise-like shares with a (2,2) visual secret-sharing encoding, and the two
//! shares are flickered on a single surface. A viewer fuses the alternating
//! frames into readable text; a still frame of either share shows nothing.
//!
//! ## Pipeline
//!
//! ```text
//! ┌────────────────┐  BinaryMask  ┌──────────────┐  SharePair  ┌───────────────┐
//! │ TextRasterizer │ ───────────▶ │ ShareEncoder │ ──────────▶ │ ShareRenderer │ ×2
//! └────────────────┘              └──────────────┘             └───────────────┘
//!                                                                     │ PixelBuffer A/B
//!                                                                     ▼
//!                                                           ┌───────────────────┐
//!                                                           │ FlickerCompositor │ ─▶ Surface
//!                                                           └───────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use flicker::{Captcha, Config, PixelBuffer};
//! use std::sync::{Arc, Mutex};
//!
//! let surface = Arc::new(Mutex::new(PixelBuffer::new(1, 1)));
//! let mut captcha = Captcha::new(Config::default(), surface)?;
//! captcha.regenerate("KX9P2")?;
//! assert!(captcha.verify("kx9p2 ").is_pass());
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod buffer;
pub mod captcha;
pub mod challenge;
pub mod config;
pub mod error;
pub mod layout;
pub mod raster;
pub mod render;
pub mod share;
pub mod terminal;

// Re-exports for convenience
pub use actor::{
    FlickerCompositor, InputActor, InputEvent, KeyCode, KeyModifiers, PeriodicTask, SessionId,
};
pub use buffer::{PixelBuffer, Rgb, Surface};
pub use captcha::{Captcha, Challenge};
pub use challenge::{verify, ChallengeSource, Verdict};
pub use config::Config;
pub use error::{Error, Result};
pub use layout::Rect;
pub use raster::{BinaryMask, TextRasterizer};
pub use render::{overlay, ShareRenderer};
pub use share::{
    BitSource, FixedBits, RngBits, ShareEncoder, ShareGrid, SharePair, SharePattern, SubPixels,
};
pub use terminal::TerminalSurface;
