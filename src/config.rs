//! Configuration for the captcha pipeline.
//!
//! Every struct can be deserialized from JSON and falls back to defaults for
//! any missing field. The defaults reproduce the classic browser layout: a
//! 150×60 mask, 40 px bold text, 2×2 sub-pixels at 2 device pixels each, and
//! a 50 ms flicker period.

use crate::buffer::Rgb;
use crate::error::{Error, Result};
use crate::raster::TextRasterizer;
use crate::share::SUBPIXEL;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Complete pipeline configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Mask (canvas) settings.
    pub mask: MaskConfig,
    /// Text rendering settings.
    pub font: FontConfig,
    /// Share rendering settings.
    pub render: RenderConfig,
    /// Flicker timing.
    pub flicker: FlickerConfig,
    /// Challenge string generation.
    pub challenge: ChallengeConfig,
}

/// Mask dimensions and the ink threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskConfig {
    /// Mask width in cells.
    pub width: u16,
    /// Mask height in cells.
    pub height: u16,
    /// Luminance below which a canvas pixel counts as text (0-255).
    pub threshold: u8,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            width: 150,
            height: 60,
            threshold: 128,
        }
    }
}

/// Font configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Largest line height in mask pixels. Text steps down from here
    /// through the shipped heights (32, 24, 20, 16) until it fits.
    pub size_px: u16,
    /// Use the bold face.
    pub bold: bool,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            size_px: 40,
            bold: true,
        }
    }
}

/// Share rendering configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Device pixels per sub-pixel edge.
    pub pixel_scale: u16,
    /// Background color.
    pub light: Rgb,
    /// Color of set sub-pixels.
    pub dark: Rgb,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            pixel_scale: 2,
            light: Rgb::WHITE,
            dark: Rgb::BLACK,
        }
    }
}

/// Flicker timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlickerConfig {
    /// Time each share stays on screen, in milliseconds.
    pub period_ms: u64,
}

impl Default for FlickerConfig {
    fn default() -> Self {
        Self { period_ms: 50 }
    }
}

/// Challenge generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChallengeConfig {
    /// Number of characters per challenge.
    pub length: usize,
    /// Characters to draw from. Excludes 0/O and 1/I by default.
    pub alphabet: String,
}

impl Default for ChallengeConfig {
    fn default() -> Self {
        Self {
            length: 5,
            alphabet: "ABCDEFGHJKLMNPQRSTUVWXYZ23456789".to_string(),
        }
    }
}

impl Config {
    /// A profile sized for a terminal, where each pixel is half a cell.
    ///
    /// Renders to 80×32 pixels, i.e. 80 columns by 16 rows, leaving room
    /// for a prompt in an 80×24 terminal.
    pub fn terminal() -> Self {
        Self {
            mask: MaskConfig {
                width: 40,
                height: 16,
                ..MaskConfig::default()
            },
            font: FontConfig {
                size_px: 16,
                ..FontConfig::default()
            },
            render: RenderConfig {
                pixel_scale: 1,
                ..RenderConfig::default()
            },
            ..Self::default()
        }
    }

    /// Load a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigIo`] if the file cannot be read and
    /// [`Error::ConfigParse`] if it is not valid JSON for this schema.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(Error::ConfigIo)?;
        Self::from_json(&text)
    }

    /// Parse a configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] on malformed input.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Check the preconditions every stage of the pipeline relies on.
    ///
    /// # Errors
    ///
    /// Returns a precondition error for zero dimensions, a zero scale, a zero
    /// period or an empty alphabet, [`Error::GlyphMissing`] for an alphabet
    /// character the font cannot draw, [`Error::TextTooLarge`] if a challenge
    /// of the configured length cannot fit the mask, and
    /// [`Error::SurfaceUnavailable`] if the rendered share would not fit a
    /// `u16` surface.
    pub fn validate(&self) -> Result<()> {
        if self.mask.width == 0 || self.mask.height == 0 {
            return Err(Error::ZeroDimension {
                what: "mask",
                width: self.mask.width.into(),
                height: self.mask.height.into(),
            });
        }
        if self.render.pixel_scale == 0 || self.flicker.period_ms == 0 {
            return Err(Error::ZeroDimension {
                what: "render scale or flicker period",
                width: self.render.pixel_scale.into(),
                height: usize::try_from(self.flicker.period_ms).unwrap_or(usize::MAX),
            });
        }
        if self.challenge.alphabet.is_empty() {
            return Err(Error::EmptyAlphabet);
        }
        if self.challenge.length == 0 {
            return Err(Error::EmptyChallenge);
        }

        let rasterizer = TextRasterizer::new(self);
        if let Some(ch) = rasterizer.font().first_missing(&self.challenge.alphabet) {
            return Err(Error::GlyphMissing(ch));
        }
        rasterizer.check_fits(self.challenge.length)?;

        self.share_size().map(|_| ())
    }

    /// Size in pixels of one rendered share.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SurfaceUnavailable`] on overflow.
    pub fn share_size(&self) -> Result<(u16, u16)> {
        let per_cell = SUBPIXEL.checked_mul(self.render.pixel_scale);
        let dims = per_cell.and_then(|p| {
            Some((self.mask.width.checked_mul(p)?, self.mask.height.checked_mul(p)?))
        });
        dims.ok_or_else(|| {
            Error::SurfaceUnavailable(format!(
                "{}x{} mask at scale {} overflows the surface",
                self.mask.width, self.mask.height, self.render.pixel_scale
            ))
        })
    }

    /// The flicker period as a [`Duration`].
    pub const fn period(&self) -> Duration {
        Duration::from_millis(self.flicker.period_ms)
    }
}
