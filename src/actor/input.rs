//! Input Actor: Dedicated thread for polling terminal events.
//!
//! This actor runs in its own thread and uses crossterm's event polling
//! to capture keyboard and resize events without blocking the flicker
//! session or the application loop.

use super::messages::{InputEvent, KeyCode, KeyModifiers};
use crate::error::{Error, Result};
use crossbeam_channel::Sender;
use crossterm::event::{self, Event, KeyEventKind};
use log::{debug, warn};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Poll failures in a row before the input thread gives up.
pub const MAX_CONSECUTIVE_ERRORS: u32 = 5;

/// Base delay after a failed poll, multiplied by the failure count.
const ERROR_BACKOFF: Duration = Duration::from_millis(10);

/// Input actor that polls terminal events.
pub struct InputActor {
    /// Handle to the input thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
}

impl InputActor {
    /// Spawn the input actor thread.
    ///
    /// # Arguments
    ///
    /// * `sender` - Channel to send input events to the main loop.
    /// * `poll_timeout` - How long to wait for events before checking shutdown.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Spawn`] if the OS fails to spawn the thread.
    pub fn spawn(sender: Sender<InputEvent>, poll_timeout: Duration) -> Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let handle = thread::Builder::new()
            .name("flicker-input".to_string())
            .spawn(move || {
                Self::run_loop(&sender, &shutdown_clone, poll_timeout, poll_terminal);
            })
            .map_err(Error::Spawn)?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
        })
    }

    /// Signal the input thread to shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the input thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Main input polling loop.
    ///
    /// Consecutive poll failures back off linearly. After
    /// [`MAX_CONSECUTIVE_ERRORS`] in a row the loop sends `Shutdown` and exits.
    fn run_loop<F>(
        sender: &Sender<InputEvent>,
        shutdown: &AtomicBool,
        poll_timeout: Duration,
        mut next_event: F,
    ) where
        F: FnMut(Duration) -> io::Result<Option<Event>>,
    {
        let mut failures = 0u32;
        loop {
            if shutdown.load(Ordering::Relaxed) {
                let _ = sender.send(InputEvent::Shutdown);
                break;
            }

            match next_event(poll_timeout) {
                Ok(event) => {
                    failures = 0;
                    if let Some(input_event) = event.and_then(convert_event) {
                        if sender.send(input_event).is_err() {
                            // Receiver dropped, exit
                            break;
                        }
                    }
                }
                Err(e) => {
                    failures += 1;
                    warn!("Input poll failed ({failures}/{MAX_CONSECUTIVE_ERRORS}): {e}");
                    if sender.send(InputEvent::Error(e.to_string())).is_err() {
                        break;
                    }
                    if failures >= MAX_CONSECUTIVE_ERRORS {
                        let _ = sender.send(InputEvent::Shutdown);
                        break;
                    }
                    thread::sleep(ERROR_BACKOFF * failures);
                }
            }
        }
        debug!("Input actor exiting");
    }
}

/// Wait up to `timeout` for a terminal event.
fn poll_terminal(timeout: Duration) -> io::Result<Option<Event>> {
    if event::poll(timeout)? {
        event::read().map(Some)
    } else {
        Ok(None)
    }
}

impl Drop for InputActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Convert a crossterm event to our `InputEvent`.
pub(crate) fn convert_event(event: Event) -> Option<InputEvent> {
    match event {
        Event::Key(key_event) => {
            // Only process key press events (not release or repeat)
            if key_event.kind != KeyEventKind::Press {
                return None;
            }

            let code = convert_key_code(key_event.code)?;
            let modifiers = convert_modifiers(key_event.modifiers);

            Some(InputEvent::Key { code, modifiers })
        }

        Event::Resize(width, height) => Some(InputEvent::Resize { width, height }),

        Event::Paste(text) => Some(InputEvent::Paste(text)),

        _ => None,
    }
}

/// Convert crossterm `KeyCode` to our `KeyCode`.
fn convert_key_code(code: event::KeyCode) -> Option<KeyCode> {
    Some(match code {
        event::KeyCode::Char(c) => KeyCode::Char(c),
        event::KeyCode::F(n) => KeyCode::F(n),
        event::KeyCode::Backspace => KeyCode::Backspace,
        event::KeyCode::Enter => KeyCode::Enter,
        event::KeyCode::Esc => KeyCode::Esc,
        _ => return None, // Ignore other key codes
    })
}

/// Convert crossterm `KeyModifiers` to our `KeyModifiers`.
fn convert_modifiers(mods: event::KeyModifiers) -> KeyModifiers {
    KeyModifiers {
        shift: mods.contains(event::KeyModifiers::SHIFT),
        control: mods.contains(event::KeyModifiers::CONTROL),
        alt: mods.contains(event::KeyModifiers::ALT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use crossterm::event::{KeyEvent, KeyEventState};

    fn press(code: event::KeyCode, mods: event::KeyModifiers) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: mods,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn test_convert_char_press() {
        let event = convert_event(press(event::KeyCode::Char('k'), event::KeyModifiers::NONE));
        assert_eq!(event, Some(InputEvent::key(KeyCode::Char('k'))));
    }

    #[test]
    fn test_convert_ctrl_r() {
        let event = convert_event(press(event::KeyCode::Char('r'), event::KeyModifiers::CONTROL));
        assert_eq!(
            event,
            Some(InputEvent::Key {
                code: KeyCode::Char('r'),
                modifiers: KeyModifiers::CONTROL,
            })
        );
    }

    #[test]
    fn test_release_ignored() {
        let event = Event::Key(KeyEvent {
            code: event::KeyCode::Enter,
            modifiers: event::KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert_eq!(convert_event(event), None);
    }

    #[test]
    fn test_unsupported_key_ignored() {
        assert_eq!(
            convert_event(press(event::KeyCode::Left, event::KeyModifiers::NONE)),
            None
        );
        assert_eq!(
            convert_event(press(event::KeyCode::Tab, event::KeyModifiers::NONE)),
            None
        );
        assert_eq!(convert_event(Event::FocusGained), None);
    }

    #[test]
    fn test_resize_and_paste() {
        assert_eq!(
            convert_event(Event::Resize(120, 40)),
            Some(InputEvent::Resize { width: 120, height: 40 })
        );
        assert_eq!(
            convert_event(Event::Paste("KX9P2".into())),
            Some(InputEvent::Paste("KX9P2".into()))
        );
    }

    #[test_log::test]
    fn test_repeated_poll_errors_shut_down() {
        let (tx, rx) = unbounded();
        let shutdown = AtomicBool::new(false);
        let mut calls = 0u32;
        InputActor::run_loop(&tx, &shutdown, Duration::ZERO, |_| {
            calls += 1;
            Err(io::Error::other("terminal gone"))
        });

        assert_eq!(calls, MAX_CONSECUTIVE_ERRORS);
        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events.len(), MAX_CONSECUTIVE_ERRORS as usize + 1);
        assert!(events[..events.len() - 1]
            .iter()
            .all(|e| matches!(e, InputEvent::Error(msg) if msg == "terminal gone")));
        assert_eq!(events.last(), Some(&InputEvent::Shutdown));
    }

    #[test]
    fn test_successful_poll_resets_error_count() {
        let (tx, rx) = unbounded();
        let shutdown = AtomicBool::new(false);
        let mut calls = 0u32;
        InputActor::run_loop(&tx, &shutdown, Duration::ZERO, |_| {
            calls += 1;
            match calls {
                5 => Ok(Some(press(event::KeyCode::Enter, event::KeyModifiers::NONE))),
                10 => {
                    shutdown.store(true, Ordering::Relaxed);
                    Ok(None)
                }
                _ => Err(io::Error::other("flaky")),
            }
        });

        let events: Vec<_> = rx.try_iter().collect();
        let errors = events.iter().filter(|e| matches!(e, InputEvent::Error(_))).count();
        assert_eq!(errors, 8);
        assert_eq!(events[4], InputEvent::key(KeyCode::Enter));
        assert_eq!(events.last(), Some(&InputEvent::Shutdown));
    }
}
