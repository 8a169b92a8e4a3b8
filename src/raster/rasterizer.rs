//! `TextRasterizer`: renders a challenge string into a [`BinaryMask`].
//!
//! Text is drawn black-on-white onto a transient [`PixelBuffer`] strip in
//! Noto Sans Mono, then every pixel whose luminance falls below the threshold
//! becomes a foreground bit. The inked area is centered on the mask.

use super::font::MonoFont;
use super::mask::BinaryMask;
use crate::buffer::{PixelBuffer, Rgb};
use crate::config::Config;
use crate::error::{Error, Result};
use log::{debug, trace};
use noto_sans_mono_bitmap::RasterizedChar;
use unicode_segmentation::UnicodeSegmentation;

/// Renders strings to binary masks at a fixed canvas size.
#[derive(Debug, Clone)]
pub struct TextRasterizer {
    width: u16,
    height: u16,
    threshold: u8,
    size_px: u16,
    font: MonoFont,
}

impl TextRasterizer {
    /// Create a rasterizer for the mask and font settings in `config`.
    pub const fn new(config: &Config) -> Self {
        Self {
            width: config.mask.width,
            height: config.mask.height,
            threshold: config.mask.threshold,
            size_px: config.font.size_px,
            font: MonoFont::new(config.font.bold),
        }
    }

    /// Canvas size as `(width, height)`.
    pub const fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// The face text is drawn in.
    pub const fn font(&self) -> &MonoFont {
        &self.font
    }

    /// Render `text` to a mask.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyChallenge`] if `text` is empty.
    /// - [`Error::GlyphMissing`] if a character has no glyph.
    /// - [`Error::TextTooLarge`] if the text does not fit at the smallest line
    ///   height, which includes any canvas with a zero side.
    pub fn rasterize(&self, text: &str) -> Result<BinaryMask> {
        if text.is_empty() {
            return Err(Error::EmptyChallenge);
        }

        let chars = text
            .graphemes(true)
            .map(|g| {
                let ch = g.chars().next().unwrap_or(' ');
                if g.chars().count() > 1 || !self.font.has_glyph(ch) {
                    return Err(Error::GlyphMissing(ch));
                }
                Ok(ch)
            })
            .collect::<Result<Vec<_>>>()?;

        let line_height = self.line_height(chars.len())?;
        let glyphs = chars
            .iter()
            .map(|&ch| self.font.glyph(ch, line_height).ok_or(Error::GlyphMissing(ch)))
            .collect::<Result<Vec<_>>>()?;

        let strip = self.draw_line(&glyphs, line_height)?;
        let threshold = self.threshold;
        let Some((ink_x, ink_y, ink_w, ink_h)) = strip.dark_bounds(threshold) else {
            debug!("Text {text:?} has no ink");
            return BinaryMask::from_fn(self.width, self.height, |_, _| false);
        };

        // line_height() guarantees the strip, and so its ink, fits the canvas.
        let left = (self.width - ink_w) / 2;
        let top = (self.height - ink_h) / 2;
        debug!(
            "Rasterizing {} glyphs at line height {line_height}: ink {ink_w}x{ink_h} at ({left}, {top})",
            glyphs.len()
        );

        let mask = BinaryMask::from_fn(self.width, self.height, |x, y| {
            if x < left || y < top || x - left >= ink_w || y - top >= ink_h {
                return false;
            }
            strip
                .get(ink_x + (x - left), ink_y + (y - top))
                .is_some_and(|p| p.is_dark(threshold))
        })?;
        trace!("Rasterized mask:\n{mask}");
        Ok(mask)
    }

    /// Check that `chars` characters fit the canvas at some line height.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TextTooLarge`] if they do not.
    pub fn check_fits(&self, chars: usize) -> Result<()> {
        self.line_height(chars).map(|_| ())
    }

    /// The largest line height, up to the configured font size, at which a
    /// line of `chars` character cells fits the canvas.
    fn line_height(&self, chars: usize) -> Result<u16> {
        MonoFont::heights_for(self.size_px)
            .find(|&h| {
                let line_w = u32::from(self.font.advance(h)).saturating_mul(
                    u32::try_from(chars).unwrap_or(u32::MAX),
                );
                line_w <= u32::from(self.width) && h <= self.height
            })
            .ok_or_else(|| Error::TextTooLarge {
                chars,
                width: self.width,
                height: self.height,
            })
    }

    /// Draw glyphs left to right onto a white strip one line high.
    fn draw_line(&self, glyphs: &[RasterizedChar], line_height: u16) -> Result<PixelBuffer> {
        let advance = self.font.advance(line_height);
        // line_height() bounded the total width by the canvas width.
        let count = u16::try_from(glyphs.len()).unwrap_or(u16::MAX);
        let mut strip = PixelBuffer::try_filled(
            advance.saturating_mul(count),
            line_height,
            Rgb::WHITE,
        )?;

        let mut pen_x = 0u16;
        for glyph in glyphs {
            for (row, values) in (0u16..).zip(glyph.raster().iter()) {
                for (col, &ink) in (0u16..).zip(values.iter()) {
                    if ink > 0 {
                        let shade = 255 - ink;
                        strip.set(pen_x + col, row, Rgb::new(shade, shade, shade));
                    }
                }
            }
            pen_x = pen_x.saturating_add(advance);
        }
        Ok(strip)
    }
}
