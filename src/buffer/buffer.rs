//! `PixelBuffer`: A grid of pixels used as canvas, rendered share and surface.
//!
//! The buffer uses contiguous memory allocation for cache efficiency.
//! Pixels are stored in row-major order.

use super::pixel::Rgb;
use super::surface::Surface;
use crate::error::{Error, Result};
use crate::layout::Rect;

/// A grid of RGB pixels.
///
/// The buffer stores pixels in a contiguous `Vec` for cache efficiency.
/// Access is in row-major order: `index = y * width + x`.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Contiguous pixel storage (row-major order).
    pixels: Vec<Rgb>,
    /// Width in pixels.
    width: u16,
    /// Height in pixels.
    height: u16,
}

impl PixelBuffer {
    /// Create a new white buffer with the given dimensions.
    ///
    /// # Panics
    /// Panics if width or height is 0.
    pub fn new(width: u16, height: u16) -> Self {
        Self::filled(width, height, Rgb::WHITE)
    }

    /// Create a new buffer filled with `color`.
    ///
    /// # Panics
    /// Panics if width or height is 0.
    pub fn filled(width: u16, height: u16, color: Rgb) -> Self {
        assert!(width > 0 && height > 0, "PixelBuffer dimensions must be non-zero");
        let size = (width as usize) * (height as usize);
        Self {
            pixels: vec![color; size],
            width,
            height,
        }
    }

    /// Fallible constructor for dimensions that come from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SurfaceUnavailable`] if either dimension is zero.
    pub fn try_filled(width: u16, height: u16, color: Rgb) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::SurfaceUnavailable(format!(
                "cannot allocate a {width}x{height} pixel buffer"
            )));
        }
        Ok(Self::filled(width, height, color))
    }

    /// Get the buffer width.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the buffer height.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Get `(width, height)`.
    #[inline]
    pub const fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Get the total number of pixels.
    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Check if the buffer is empty (should never be true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Get a reference to the underlying pixel slice.
    #[inline]
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Convert (x, y) coordinates to a linear index.
    ///
    /// Returns `None` if coordinates are out of bounds.
    #[inline]
    pub fn index_of(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some((y as usize) * (self.width as usize) + (x as usize))
        } else {
            None
        }
    }

    /// Get the pixel at (x, y).
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<Rgb> {
        self.index_of(x, y).map(|i| self.pixels[i])
    }

    /// Set the pixel at (x, y).
    ///
    /// Returns `false` if coordinates are out of bounds.
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, color: Rgb) -> bool {
        if let Some(idx) = self.index_of(x, y) {
            self.pixels[idx] = color;
            true
        } else {
            false
        }
    }

    /// Fill a rectangular region, clipped to the buffer.
    pub fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        let right = rect.right().min(self.width);
        let bottom = rect.bottom().min(self.height);
        if rect.x >= right {
            return;
        }
        let stride = self.width as usize;
        for row in rect.y..bottom {
            let start = (row as usize) * stride;
            self.pixels[start + rect.x as usize..start + right as usize].fill(color);
        }
    }

    /// Copy `source` into this buffer with its top-left corner at (x, y).
    ///
    /// Pixels falling outside this buffer are clipped.
    pub fn blit(&mut self, source: &Self, x: u16, y: u16) {
        if x >= self.width || y >= self.height {
            return;
        }
        let copy_width = source.width.min(self.width - x) as usize;
        let copy_height = source.height.min(self.height - y) as usize;
        let dst_stride = self.width as usize;
        let src_stride = source.width as usize;

        for row in 0..copy_height {
            let src_start = row * src_stride;
            let dst_start = (row + y as usize) * dst_stride + x as usize;
            self.pixels[dst_start..dst_start + copy_width]
                .copy_from_slice(&source.pixels[src_start..src_start + copy_width]);
        }
    }

    /// Resize the buffer, preserving content where possible.
    ///
    /// New pixels are initialized to white.
    pub fn resize(&mut self, new_width: u16, new_height: u16) {
        if new_width == self.width && new_height == self.height {
            return;
        }

        let new_size = (new_width as usize) * (new_height as usize);
        let mut new_pixels = vec![Rgb::WHITE; new_size];

        let copy_width = self.width.min(new_width) as usize;
        let copy_height = self.height.min(new_height) as usize;

        for y in 0..copy_height {
            let old_start = y * (self.width as usize);
            let new_start = y * (new_width as usize);
            new_pixels[new_start..new_start + copy_width]
                .copy_from_slice(&self.pixels[old_start..old_start + copy_width]);
        }

        self.pixels = new_pixels;
        self.width = new_width;
        self.height = new_height;
    }

    /// Get an iterator over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[Rgb]> {
        self.pixels.chunks(self.width as usize)
    }

    /// Count pixels darker than `threshold`.
    pub fn count_dark(&self, threshold: u8) -> usize {
        self.pixels.iter().filter(|p| p.is_dark(threshold)).count()
    }

    /// Bounding box `(x, y, width, height)` of pixels darker than `threshold`.
    pub fn dark_bounds(&self, threshold: u8) -> Option<(u16, u16, u16, u16)> {
        let mut bounds: Option<(u16, u16, u16, u16)> = None;
        for (y, row) in (0u16..).zip(self.rows()) {
            for (x, pixel) in (0u16..).zip(row) {
                if !pixel.is_dark(threshold) {
                    continue;
                }
                bounds = Some(match bounds {
                    None => (x, y, x, y),
                    Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                });
            }
        }
        bounds.map(|(x0, y0, x1, y1)| (x0, y0, x1 - x0 + 1, y1 - y0 + 1))
    }
}

impl Surface for PixelBuffer {
    fn width(&self) -> u16 {
        self.width
    }

    fn height(&self) -> u16 {
        self.height
    }

    fn resize(&mut self, width: u16, height: u16) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(Error::SurfaceUnavailable(format!(
                "cannot size surface to {width}x{height}"
            )));
        }
        Self::resize(self, width, height);
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        Self::fill_rect(self, rect, color);
    }

    fn blit(&mut self, source: &PixelBuffer, x: u16, y: u16) {
        Self::blit(self, source, x, y);
    }

    fn pixel(&self, x: u16, y: u16) -> Option<Rgb> {
        self.get(x, y)
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}
