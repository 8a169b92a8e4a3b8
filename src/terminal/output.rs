//! `OutputBuffer`: Single-syscall output buffer for ANSI sequences.

use crate::buffer::Rgb;
use std::io::Write;

/// Upper half block. Foreground paints the top pixel, background the bottom.
pub const HALF_BLOCK: &str = "\u{2580}";

/// Pre-allocated buffer for building ANSI escape sequences.
///
/// A whole frame is accumulated here, then flushed in a single `write()`
/// syscall so a share is never shown half-drawn.
pub struct OutputBuffer {
    data: Vec<u8>,
    fg: Option<Rgb>,
    bg: Option<Rgb>,
}

impl OutputBuffer {
    /// Create a new output buffer with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            fg: None,
            bg: None,
        }
    }

    /// Create a buffer sized for a typical frame (64KB).
    pub fn new() -> Self {
        Self::with_capacity(64 * 1024)
    }

    /// Clear the buffer for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
        self.fg = None;
        self.bg = None;
    }

    /// Get the buffer contents.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Get the buffer length.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Write a string.
    #[inline]
    pub fn write_str(&mut self, s: &str) {
        self.data.extend_from_slice(s.as_bytes());
    }

    /// Move cursor to (x, y) position (1-indexed for ANSI).
    #[inline]
    pub fn cursor_move(&mut self, x: u16, y: u16) {
        // CSI row ; col H
        let _ = write!(self.data, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1);
    }

    /// Set foreground color (true color), skipped if already current.
    #[inline]
    pub fn set_fg(&mut self, color: Rgb) {
        if self.fg != Some(color) {
            let _ = write!(self.data, "\x1b[38;2;{};{};{}m", color.r, color.g, color.b);
            self.fg = Some(color);
        }
    }

    /// Set background color (true color), skipped if already current.
    #[inline]
    pub fn set_bg(&mut self, color: Rgb) {
        if self.bg != Some(color) {
            let _ = write!(self.data, "\x1b[48;2;{};{};{}m", color.r, color.g, color.b);
            self.bg = Some(color);
        }
    }

    /// Draw one terminal cell holding two vertically stacked pixels.
    #[inline]
    pub fn half_block(&mut self, top: Rgb, bottom: Rgb) {
        self.set_fg(top);
        self.set_bg(bottom);
        self.write_str(HALF_BLOCK);
    }

    /// Reset all attributes.
    #[inline]
    pub fn reset_attrs(&mut self) {
        self.data.extend_from_slice(b"\x1b[0m");
        self.fg = None;
        self.bg = None;
    }

    /// Clear the current line.
    #[inline]
    pub fn clear_line(&mut self) {
        self.data.extend_from_slice(b"\x1b[2K");
    }

    /// Flush to a writer in a single syscall.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn flush_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.data)?;
        writer.flush()
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}
