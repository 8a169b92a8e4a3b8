//! Rect: A rectangle primitive in pixel coordinates.

/// A rectangle defined by position and size.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// X coordinate of the top-left corner.
    pub x: u16,
    /// Y coordinate of the top-left corner.
    pub y: u16,
    /// Width in pixels.
    pub width: u16,
    /// Height in pixels.
    pub height: u16,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    /// A `side`×`side` square at (x, y).
    #[inline]
    pub const fn square(x: u16, y: u16, side: u16) -> Self {
        Self::new(x, y, side, side)
    }

    /// Zero-sized rectangle.
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    /// Check if the rectangle is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Get the right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// Get the bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }
}

impl std::fmt::Debug for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Rect({}, {} {}x{})", self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges_saturate() {
        let rect = Rect::new(u16::MAX - 1, 0, 10, 1);
        assert_eq!(rect.right(), u16::MAX);
        assert_eq!(rect.bottom(), 1);
    }

    #[test]
    fn test_rect_square() {
        let rect = Rect::square(2, 4, 3);
        assert_eq!((rect.right(), rect.bottom()), (5, 7));
        assert!(!rect.is_empty());
        assert!(Rect::ZERO.is_empty());
    }
}
