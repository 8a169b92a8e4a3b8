//! Buffer module: Pixel storage and the drawing surface abstraction.
//!
//! This module contains:
//! - [`Rgb`]: True-color representation
//! - [`PixelBuffer`]: A row-major grid of pixels
//! - [`Surface`]: The trait every output target implements

mod pixel;
#[allow(clippy::module_inception)]
mod buffer;
mod surface;

pub use pixel::Rgb;
pub use buffer::PixelBuffer;
pub use surface::Surface;
