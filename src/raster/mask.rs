//! `BinaryMask`: the foreground/background bitmap of one challenge.

use crate::error::{Error, Result};

/// An immutable W×H grid of bits; `true` is text, `false` is background.
///
/// Bits are stored row-major, one `bool` per cell.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BinaryMask {
    bits: Vec<bool>,
    width: u16,
    height: u16,
}

impl BinaryMask {
    /// Build a mask by evaluating `f(x, y)` for every cell.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroDimension`] if either dimension is zero.
    pub fn from_fn(width: u16, height: u16, mut f: impl FnMut(u16, u16) -> bool) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::ZeroDimension {
                what: "mask",
                width: width.into(),
                height: height.into(),
            });
        }
        let mut bits = Vec::with_capacity(usize::from(width) * usize::from(height));
        for y in 0..height {
            for x in 0..width {
                bits.push(f(x, y));
            }
        }
        Ok(Self { bits, width, height })
    }

    /// Wrap already-validated row-major bits.
    pub(crate) fn from_bits(width: u16, height: u16, bits: Vec<bool>) -> Self {
        debug_assert!(width > 0 && height > 0);
        debug_assert_eq!(bits.len(), usize::from(width) * usize::from(height));
        Self { bits, width, height }
    }

    /// Build a mask from rows of `0`/`1` values. Any non-zero value is foreground.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroDimension`] for no rows or empty rows, and
    /// [`Error::BufferMismatch`] if rows differ in length.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self> {
        let height = u16::try_from(rows.len()).unwrap_or(u16::MAX);
        let width = rows
            .first()
            .map_or(0, |r| u16::try_from(r.as_ref().len()).unwrap_or(u16::MAX));

        if let Some(bad) = rows.iter().find(|r| r.as_ref().len() != usize::from(width)) {
            return Err(Error::BufferMismatch {
                a: (width, 1),
                b: (u16::try_from(bad.as_ref().len()).unwrap_or(u16::MAX), 1),
            });
        }

        Self::from_fn(width, height, |x, y| rows[usize::from(y)].as_ref()[usize::from(x)] != 0)
    }

    /// Mask width in cells.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Mask height in cells.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Always `false` for a constructed mask.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// The bit at (x, y), or `None` out of bounds.
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<bool> {
        if x < self.width && y < self.height {
            Some(self.bits[usize::from(y) * usize::from(self.width) + usize::from(x)])
        } else {
            None
        }
    }

    /// Row-major view of all bits.
    #[inline]
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Number of foreground cells.
    pub fn foreground_count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Tight bounding box of the foreground as `(x, y, width, height)`.
    pub fn foreground_bounds(&self) -> Option<(u16, u16, u16, u16)> {
        let mut bounds: Option<(u16, u16, u16, u16)> = None;
        for y in 0..self.height {
            for x in 0..self.width {
                if self.get(x, y) != Some(true) {
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

impl std::fmt::Debug for BinaryMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinaryMask")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("foreground", &self.foreground_count())
            .finish()
    }
}

/// ASCII art: `#` for text, `.` for background.
impl std::fmt::Display for BinaryMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.bits.chunks(usize::from(self.width)) {
            for &bit in row {
                f.write_str(if bit { "#" } else { "." })?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows() {
        let mask = BinaryMask::from_rows(&[[1u8, 0, 0], [0, 1, 1]]).unwrap();
        assert_eq!((mask.width(), mask.height()), (3, 2));
        assert_eq!(mask.get(0, 0), Some(true));
        assert_eq!(mask.get(1, 0), Some(false));
        assert_eq!(mask.get(2, 1), Some(true));
        assert_eq!(mask.get(3, 1), None);
        assert_eq!(mask.foreground_count(), 3);
        assert_eq!(mask.to_string(), "#..\n.##\n");
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let empty: [[u8; 0]; 0] = [];
        assert!(matches!(
            BinaryMask::from_rows(&empty),
            Err(Error::ZeroDimension { .. })
        ));
        assert!(BinaryMask::from_fn(4, 0, |_, _| true).is_err());
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let rows: [&[u8]; 2] = [&[1, 0], &[1]];
        assert!(matches!(
            BinaryMask::from_rows(&rows),
            Err(Error::BufferMismatch { .. })
        ));
    }

    #[test]
    fn test_foreground_bounds() {
        let mask = BinaryMask::from_fn(10, 10, |x, y| (3..6).contains(&x) && (2..4).contains(&y))
            .unwrap();
        assert_eq!(mask.foreground_bounds(), Some((3, 2, 3, 2)));

        let blank = BinaryMask::from_fn(2, 2, |_, _| false).unwrap();
        assert_eq!(blank.foreground_bounds(), None);
    }
}
