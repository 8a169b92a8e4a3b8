//! `TerminalSurface`: a true-color terminal as a pixel surface.
//!
//! Pixels are packed two per cell with the upper half block, so a
//! `W x H` pixel image occupies `W` columns and `ceil(H / 2)` rows.

use super::output::OutputBuffer;
use crate::buffer::{PixelBuffer, Rgb, Surface};
use crate::error::{Error, Result};
use crate::layout::Rect;
use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::debug;
use std::io::{self, Write};

/// A [`Surface`] backed by the controlling terminal.
pub struct TerminalSurface {
    /// Backing pixels; the last drawn frame.
    pixels: PixelBuffer,
    /// Top-left cell of the image.
    origin: (u16, u16),
    /// Lines drawn under the image.
    status: Vec<String>,
    /// Rows kept free for status lines, below a one-row gap.
    status_rows: u16,
    out: OutputBuffer,
    /// Whether raw mode and the alternate screen are active.
    active: bool,
}

impl TerminalSurface {
    /// Create a surface whose image starts at the given cell, with
    /// `status_rows` lines of text under it.
    ///
    /// The terminal is not touched until [`enter`](Self::enter).
    pub fn new(origin_col: u16, origin_row: u16, status_rows: u16) -> Self {
        Self {
            pixels: PixelBuffer::new(1, 1),
            origin: (origin_col, origin_row),
            status: Vec::new(),
            status_rows,
            out: OutputBuffer::new(),
            active: false,
        }
    }

    /// Switch the terminal to raw mode on the alternate screen.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Terminal`] if the terminal cannot be set up.
    pub fn enter(&mut self) -> Result<()> {
        if self.active {
            return Ok(());
        }
        terminal::enable_raw_mode().map_err(Error::Terminal)?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All)
        )
        .map_err(Error::Terminal)?;
        self.active = true;
        debug!("Terminal surface entered");
        Ok(())
    }

    /// Restore the terminal. Idempotent.
    pub fn leave(&mut self) {
        if !self.active {
            return;
        }
        let mut stdout = io::stdout();
        let _ = execute!(stdout, cursor::Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        self.active = false;
        debug!("Terminal surface left");
    }

    /// Whether the terminal is in raw mode.
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Replace the lines shown under the image. Visible on the next present.
    ///
    /// Lines past the reserved status rows are dropped.
    pub fn set_status<I, T>(&mut self, lines: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.status = lines
            .into_iter()
            .take(usize::from(self.status_rows))
            .map(Into::into)
            .collect();
    }

    /// Number of terminal rows the image occupies.
    pub const fn image_rows(&self) -> u16 {
        self.pixels.height().div_ceil(2)
    }

    /// Build the ANSI byte stream for the current frame.
    pub(crate) fn encode_frame(&mut self) -> &[u8] {
        let (col, row) = self.origin;
        let width = self.pixels.width();
        let height = self.pixels.height();
        self.out.clear();

        for cell_row in 0..self.image_rows() {
            self.out.cursor_move(col, row.saturating_add(cell_row));
            let y = cell_row * 2;
            for x in 0..width {
                let top = self.pixels.get(x, y).unwrap_or(Rgb::WHITE);
                let bottom = if y + 1 < height {
                    self.pixels.get(x, y + 1).unwrap_or(Rgb::WHITE)
                } else {
                    Rgb::WHITE
                };
                self.out.half_block(top, bottom);
            }
            self.out.reset_attrs();
        }

        let status_row = row.saturating_add(self.image_rows()).saturating_add(1);
        for (i, line) in self.status.iter().enumerate() {
            let offset = u16::try_from(i).unwrap_or(u16::MAX);
            self.out.cursor_move(col, status_row.saturating_add(offset));
            self.out.clear_line();
            self.out.write_str(line);
        }

        self.out.as_bytes()
    }

    /// Terminal `(columns, rows)` needed for a `width x height` pixel image
    /// plus the status area.
    pub fn required_cells(&self, width: u16, height: u16) -> (u16, u16) {
        let status = if self.status_rows == 0 {
            0
        } else {
            self.status_rows.saturating_add(1)
        };
        (
            self.origin.0.saturating_add(width),
            self.origin
                .1
                .saturating_add(height.div_ceil(2))
                .saturating_add(status),
        )
    }

    fn check_fits(&self, width: u16, height: u16) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        let (cols, rows) = terminal::size().map_err(Error::Terminal)?;
        let (need_cols, need_rows) = self.required_cells(width, height);
        if need_cols > cols || need_rows > rows {
            return Err(Error::SurfaceUnavailable(format!(
                "{width}x{height} px needs {need_cols}x{need_rows} cells, terminal is {cols}x{rows}"
            )));
        }
        Ok(())
    }
}

impl Surface for TerminalSurface {
    fn width(&self) -> u16 {
        self.pixels.width()
    }

    fn height(&self) -> u16 {
        self.pixels.height()
    }

    fn resize(&mut self, width: u16, height: u16) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(Error::SurfaceUnavailable(format!(
                "cannot size surface to {width}x{height}"
            )));
        }
        self.check_fits(width, height)?;
        self.pixels.resize(width, height);
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        self.pixels.fill_rect(rect, color);
    }

    fn blit(&mut self, source: &PixelBuffer, x: u16, y: u16) {
        self.pixels.blit(source, x, y);
    }

    fn pixel(&self, x: u16, y: u16) -> Option<Rgb> {
        self.pixels.get(x, y)
    }

    fn present(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.encode_frame();
        let mut stdout = io::stdout().lock();
        self.out.flush_to(&mut stdout).map_err(Error::Terminal)?;
        stdout.flush().map_err(Error::Terminal)
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        self.leave();
    }
}

impl std::fmt::Debug for TerminalSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalSurface")
            .field("size", &self.pixels.size())
            .field("origin", &self.origin)
            .field("status_rows", &self.status_rows)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}
