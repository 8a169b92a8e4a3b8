//! Terminal output: ANSI frame encoding and the terminal-backed surface.

mod output;
mod surface;

pub use output::{OutputBuffer, HALF_BLOCK};
pub use surface::TerminalSurface;
