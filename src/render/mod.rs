//! Render module: expands share grids into pixel buffers.
//!
//! Each grid cell becomes a 2×2 block of sub-pixels; each sub-pixel becomes a
//! `pixel_scale`×`pixel_scale` square. Set sub-pixels are painted dark on a
//! light background, so one share of a W×H grid is
//! `(W·2·scale) × (H·2·scale)` pixels.

use crate::buffer::{PixelBuffer, Rgb};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::layout::Rect;
use crate::share::{ShareGrid, SUBPIXEL};

/// Deterministic share-to-pixels renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShareRenderer {
    pixel_scale: u16,
    light: Rgb,
    dark: Rgb,
}

impl ShareRenderer {
    /// Create a renderer with the given scale and colors.
    pub const fn new(pixel_scale: u16, light: Rgb, dark: Rgb) -> Self {
        Self {
            pixel_scale,
            light,
            dark,
        }
    }

    /// Create a renderer from the render settings in `config`.
    pub const fn from_config(config: &Config) -> Self {
        Self::new(
            config.render.pixel_scale,
            config.render.light,
            config.render.dark,
        )
    }

    /// Device pixels per grid cell along each axis.
    #[inline]
    pub const fn cell_size(&self) -> u16 {
        SUBPIXEL * self.pixel_scale
    }

    /// Output buffer size for `grid`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroDimension`] for a zero scale and
    /// [`Error::SurfaceUnavailable`] if the size overflows.
    pub fn output_size(&self, grid: &ShareGrid) -> Result<(u16, u16)> {
        if self.pixel_scale == 0 {
            return Err(Error::ZeroDimension {
                what: "pixel scale",
                width: 0,
                height: 0,
            });
        }
        let cell = self.cell_size();
        grid.width()
            .checked_mul(cell)
            .zip(grid.height().checked_mul(cell))
            .ok_or_else(|| {
                Error::SurfaceUnavailable(format!(
                    "{}x{} grid at {cell} px per cell overflows",
                    grid.width(),
                    grid.height()
                ))
            })
    }

    /// Render one share.
    ///
    /// # Errors
    ///
    /// See [`ShareRenderer::output_size`].
    pub fn render(&self, grid: &ShareGrid) -> Result<PixelBuffer> {
        let (width, height) = self.output_size(grid)?;
        let mut buffer = PixelBuffer::try_filled(width, height, self.light)?;
        let scale = self.pixel_scale;

        for (y, row) in (0u16..).zip(grid.rows()) {
            for (x, pattern) in (0u16..).zip(row) {
                let sub = pattern.sub_pixels();
                for py in 0..SUBPIXEL {
                    for px in 0..SUBPIXEL {
                        if sub.is_set(px, py) {
                            let rect = Rect::square(
                                (x * SUBPIXEL + px) * scale,
                                (y * SUBPIXEL + py) * scale,
                                scale,
                            );
                            buffer.fill_rect(rect, self.dark);
                        }
                    }
                }
            }
        }

        Ok(buffer)
    }

    /// Render both shares of a pair as `(a, b)`.
    ///
    /// # Errors
    ///
    /// See [`ShareRenderer::output_size`].
    pub fn render_pair(&self, pair: &crate::share::SharePair) -> Result<(PixelBuffer, PixelBuffer)> {
        Ok((self.render(pair.first())?, self.render(pair.second())?))
    }
}

impl Default for ShareRenderer {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Logical-OR overlay of two equally sized buffers.
///
/// A pixel is `dark` if it is darker than `threshold` in either input and
/// `light` otherwise. This is what a viewer sees when the two frames fuse.
///
/// # Errors
///
/// Returns [`Error::BufferMismatch`] if the sizes differ.
pub fn overlay(
    a: &PixelBuffer,
    b: &PixelBuffer,
    threshold: u8,
    light: Rgb,
    dark: Rgb,
) -> Result<PixelBuffer> {
    if a.size() != b.size() {
        return Err(Error::BufferMismatch {
            a: a.size(),
            b: b.size(),
        });
    }
    let mut out = PixelBuffer::filled(a.width(), a.height(), light);
    for y in 0..a.height() {
        for x in 0..a.width() {
            let ink = |buf: &PixelBuffer| buf.get(x, y).is_some_and(|p| p.is_dark(threshold));
            if ink(a) || ink(b) {
                out.set(x, y, dark);
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::BinaryMask;
    use crate::share::{FixedBits, RngBits, ShareEncoder};

    fn dark_at(buffer: &PixelBuffer, x: u16, y: u16) -> bool {
        buffer.get(x, y).is_some_and(|p| p.is_dark(128))
    }

    #[test]
    fn test_output_size() {
        let mask = BinaryMask::from_fn(150, 60, |_, _| false).unwrap();
        let pair = ShareEncoder::new(RngBits::seeded(3)).encode(&mask);
        let (a, b) = ShareRenderer::default().render_pair(&pair).unwrap();
        assert_eq!(a.size(), (600, 240));
        assert_eq!(b.size(), (600, 240));
    }

    #[test]
    fn test_single_cell_pattern_footprint() {
        // P0 sets top-right and bottom-left sub-pixels, each 2x2 device pixels.
        let mask = BinaryMask::from_rows(&[[0u8]]).unwrap();
        let pair = ShareEncoder::new(FixedBits::new([0u8])).encode(&mask);
        let buffer = ShareRenderer::default().render(pair.first()).unwrap();

        assert_eq!(buffer.size(), (4, 4));
        for (x, y) in [(2, 0), (3, 0), (2, 1), (3, 1), (0, 2), (1, 2), (0, 3), (1, 3)] {
            assert!(dark_at(&buffer, x, y), "({x}, {y}) should be dark");
        }
        for (x, y) in [(0, 0), (1, 1), (2, 2), (3, 3)] {
            assert!(!dark_at(&buffer, x, y), "({x}, {y}) should be light");
        }
        assert_eq!(buffer.count_dark(128), 8);
    }

    #[test]
    fn test_render_is_deterministic() {
        let mask = BinaryMask::from_fn(20, 10, |x, _| x % 3 == 0).unwrap();
        let pair = ShareEncoder::new(RngBits::seeded(5)).encode(&mask);
        let renderer = ShareRenderer::new(3, Rgb::WHITE, Rgb::BLACK);
        assert_eq!(renderer.render(pair.first()).unwrap(), renderer.render(pair.first()).unwrap());
    }

    #[test]
    fn test_each_share_half_dark() {
        let mask = BinaryMask::from_fn(30, 12, |x, y| (x * y) % 5 == 0).unwrap();
        let pair = ShareEncoder::new(RngBits::seeded(8)).encode(&mask);
        let (a, b) = ShareRenderer::default().render_pair(&pair).unwrap();
        assert_eq!(a.count_dark(128), a.len() / 2);
        assert_eq!(b.count_dark(128), b.len() / 2);
    }

    #[test]
    fn test_overlay_recovers_mask_shape() {
        let mask = BinaryMask::from_fn(24, 10, |x, y| (4..12).contains(&x) && y > 2).unwrap();
        let pair = ShareEncoder::new(RngBits::seeded(11)).encode(&mask);
        let renderer = ShareRenderer::new(1, Rgb::WHITE, Rgb::BLACK);
        let (a, b) = renderer.render_pair(&pair).unwrap();
        let stacked = overlay(&a, &b, 128, Rgb::WHITE, Rgb::BLACK).unwrap();

        for y in 0..mask.height() {
            for x in 0..mask.width() {
                let block = (0..2)
                    .flat_map(|py| (0..2).map(move |px| (x * 2 + px, y * 2 + py)))
                    .filter(|&(px, py)| dark_at(&stacked, px, py))
                    .count();
                if mask.get(x, y).unwrap() {
                    assert_eq!(block, 4, "foreground cell ({x}, {y})");
                } else {
                    assert_eq!(block, 2, "background cell ({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn test_overlay_size_mismatch() {
        let a = PixelBuffer::new(4, 4);
        let b = PixelBuffer::new(4, 8);
        assert!(matches!(
            overlay(&a, &b, 128, Rgb::WHITE, Rgb::BLACK),
            Err(Error::BufferMismatch { .. })
        ));
    }

    #[test]
    fn test_zero_scale_rejected() {
        let mask = BinaryMask::from_rows(&[[1u8]]).unwrap();
        let pair = ShareEncoder::new(FixedBits::new([0u8])).encode(&mask);
        let renderer = ShareRenderer::new(0, Rgb::WHITE, Rgb::BLACK);
        assert!(matches!(renderer.render(pair.first()), Err(Error::ZeroDimension { .. })));
    }
}
