//! Surface: the minimal drawing target the compositor writes frames to.

use super::{PixelBuffer, Rgb};
use crate::error::Result;
use crate::layout::Rect;

/// A drawable output surface.
///
/// Implemented by [`PixelBuffer`] for in-memory rendering and by
/// [`TerminalSurface`](crate::terminal::TerminalSurface) for a true-color
/// terminal. Nothing in the pipeline assumes a particular backend.
pub trait Surface {
    /// Current width in pixels.
    fn width(&self) -> u16;

    /// Current height in pixels.
    fn height(&self) -> u16;

    /// Resize the surface.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot provide a surface of this size.
    fn resize(&mut self, width: u16, height: u16) -> Result<()>;

    /// Fill a rectangle with a solid color.
    fn fill_rect(&mut self, rect: Rect, color: Rgb);

    /// Copy a whole buffer onto the surface at (x, y).
    fn blit(&mut self, source: &PixelBuffer, x: u16, y: u16);

    /// Read back one pixel.
    fn pixel(&self, x: u16, y: u16) -> Option<Rgb>;

    /// Make the drawn content visible.
    ///
    /// In-memory surfaces have nothing to do.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to flush.
    fn present(&mut self) -> Result<()> {
        Ok(())
    }
}
