//! Share module: the (2,2) visual secret-sharing encoding.
//!
//! - [`SharePattern`] / [`SubPixels`]: the two complementary 2×2 blocks
//! - [`ShareGrid`] / [`SharePair`]: per-cell pattern grids
//! - [`ShareEncoder`]: mask → share pair, with injectable randomness

mod encoder;
mod grid;
mod pattern;

pub use encoder::{BitSource, FixedBits, RngBits, ShareEncoder};
pub use grid::{ShareGrid, SharePair};
pub use pattern::{SharePattern, SubPixels, SUBPIXEL};
