//! Actor Model: thread-per-concern concurrency for the flicker pipeline.
//!
//! - **Periodic Task**: a fixed-period worker that can be stopped synchronously
//! - **Flicker Compositor**: owns the one active session and its periodic task
//! - **Input Actor**: polls terminal events and forwards them to the main loop
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     InputEvent      ┌──────────────┐
//! │ Input Thread │ ─────────────────▶  │              │
//! └──────────────┘                     │  Main Loop   │
//!                                      │  (Captcha)   │
//! ┌──────────────┐   start / stop      │              │
//! │Flicker Thread│ ◀────────────────── │              │
//! └──────────────┘                     └──────────────┘
//!        │ blit A / B
//!        ▼
//!   Arc<Mutex<Surface>>
//! ```

mod compositor;
mod input;
mod messages;
mod ticker;

pub use compositor::{Alternator, FlickerCompositor, SessionId};
pub use input::InputActor;
pub use messages::{InputEvent, KeyCode, KeyModifiers};
pub use ticker::{PeriodicTask, Tick};
