//! Raster module: turning challenge text into a binary mask.
//!
//! - [`MonoFont`]: Noto Sans Mono glyph rasters, regular or bold
//! - [`TextRasterizer`]: centers and thresholds text onto a canvas
//! - [`BinaryMask`]: the resulting immutable foreground/background grid

mod font;
mod mask;
mod rasterizer;

pub use font::{MonoFont, LINE_HEIGHTS};
pub use mask::BinaryMask;
pub use rasterizer::TextRasterizer;
