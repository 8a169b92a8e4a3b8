//! Rgb: True-color pixel representation.

use serde::{Deserialize, Serialize};

/// True-color RGB pixel.
///
/// Uses 3 bytes for 24-bit color depth. Share buffers only ever hold the
/// configured light and dark colors, but surfaces accept any value.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Black (0, 0, 0)
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// White (255, 255, 255)
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Create from a 24-bit hex color (e.g., 0xFF5500).
    #[inline]
    pub const fn from_u32(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }

    /// Perceived luminance (Rec. 601 weights), 0-255.
    #[inline]
    pub fn luminance(self) -> u8 {
        let y = 299 * u32::from(self.r) + 587 * u32::from(self.g) + 114 * u32::from(self.b);
        // Max is 255_000, so the quotient always fits.
        u8::try_from(y / 1000).unwrap_or(u8::MAX)
    }

    /// Whether this color reads as "ink" against a light background.
    #[inline]
    pub fn is_dark(self, threshold: u8) -> bool {
        self.luminance() < threshold
    }
}

impl std::fmt::Debug for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    #[inline]
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl From<u32> for Rgb {
    /// Convert from a 24-bit hex color (e.g., 0xFF5500)
    #[inline]
    fn from(hex: u32) -> Self {
        Self::from_u32(hex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_from_hex() {
        assert_eq!(Rgb::from(0x00FF_5500), Rgb::new(0xFF, 0x55, 0x00));
        assert_eq!(format!("{:?}", Rgb::new(1, 2, 255)), "#0102ff");
    }

    #[test]
    fn test_luminance_extremes() {
        assert_eq!(Rgb::BLACK.luminance(), 0);
        assert_eq!(Rgb::WHITE.luminance(), 255);
        assert!(Rgb::BLACK.is_dark(128));
        assert!(!Rgb::WHITE.is_dark(128));
    }

    #[test]
    fn test_luminance_weights_green() {
        // Pure green is brighter than pure blue.
        assert!(Rgb::new(0, 255, 0).luminance() > Rgb::new(0, 0, 255).luminance());
        assert!(Rgb::new(0, 0, 255).is_dark(128));
    }
}
