//! `flicker-captcha`: run the flicker CAPTCHA in a true-color terminal.
//!
//! Usage: `flicker-captcha [config.json]`
//!
//! Type what you see and press Enter. F5 or Ctrl-R shows a new challenge,
//! Esc or Ctrl-C quits.

use anyhow::Context;
use crossbeam_channel::bounded;
use flicker::{Captcha, Config, InputActor, InputEvent, KeyCode, Surface, TerminalSurface, Verdict};
use log::{debug, info, warn};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Longest answer the prompt accepts.
const MAX_ANSWER: usize = 32;

/// Lines of prompt text drawn under the image.
const STATUS_ROWS: u16 = 5;

/// What the main loop should do after an input event.
enum Action {
    Continue,
    Regenerate,
    Submit,
    Quit,
}

struct App {
    captcha: Captcha<TerminalSurface>,
    answer: String,
    verdict: Option<Verdict>,
}

impl App {
    fn handle(&mut self, event: InputEvent) -> Action {
        match event {
            InputEvent::Key { code, modifiers } => match code {
                KeyCode::Esc => Action::Quit,
                KeyCode::Char('c') if modifiers.control => Action::Quit,
                KeyCode::Char('r') if modifiers.control => Action::Regenerate,
                KeyCode::F(5) => Action::Regenerate,
                KeyCode::Enter => Action::Submit,
                KeyCode::Backspace => {
                    self.answer.pop();
                    Action::Continue
                }
                KeyCode::Char(c) if !modifiers.control && !modifiers.alt => {
                    self.push(std::iter::once(c));
                    Action::Continue
                }
                _ => Action::Continue,
            },
            InputEvent::Paste(text) => {
                self.push(text.chars().filter(|c| !c.is_control()));
                Action::Continue
            }
            InputEvent::Resize { width, height } => {
                debug!("Terminal resized to {width}x{height}");
                Action::Continue
            }
            InputEvent::Error(e) => {
                warn!("Input error: {e}");
                Action::Continue
            }
            InputEvent::Shutdown => Action::Quit,
        }
    }

    fn push(&mut self, chars: impl Iterator<Item = char>) {
        for c in chars {
            if self.answer.chars().count() >= MAX_ANSWER {
                break;
            }
            self.answer.push(c);
        }
    }

    fn regenerate(&mut self) -> anyhow::Result<()> {
        self.captcha
            .regenerate_random()
            .context("Failed to generate a new challenge")?;
        self.answer.clear();
        self.verdict = None;
        Ok(())
    }

    fn submit(&mut self) {
        let verdict = self.captcha.verify(&self.answer);
        info!("Answer submitted: {verdict:?}");
        if verdict.is_pass() {
            self.captcha.stop();
        } else {
            self.answer.clear();
        }
        self.verdict = Some(verdict);
    }

    /// Redraw the prompt under the image.
    fn draw_status(&self) -> anyhow::Result<()> {
        let mut surface = self
            .captcha
            .surface()
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        surface.set_status([
            "Type the characters you see, then press Enter.".to_string(),
            "F5 / Ctrl-R: new challenge    Esc: quit".to_string(),
            String::new(),
            format!("> {}", self.answer),
            self.verdict.map(Verdict::message).unwrap_or_default().to_string(),
        ]);
        surface.present().context("Failed to draw to the terminal")
    }
}

fn run(config: Config, surface: Arc<Mutex<TerminalSurface>>) -> anyhow::Result<()> {
    let captcha = Captcha::new(config, surface).context("Invalid configuration")?;
    let mut app = App {
        captcha,
        answer: String::new(),
        verdict: None,
    };
    app.regenerate()?;
    app.draw_status()?;

    let (input_tx, input_rx) = bounded::<InputEvent>(64);
    let input = InputActor::spawn(input_tx, Duration::from_millis(50))
        .context("Failed to start the input thread")?;

    let result = loop {
        let Ok(event) = input_rx.recv() else {
            break Ok(());
        };
        let step = match app.handle(event) {
            Action::Continue => Ok(()),
            Action::Regenerate => app.regenerate(),
            Action::Submit => {
                app.submit();
                Ok(())
            }
            Action::Quit => break Ok(()),
        };
        if let Err(e) = step.and_then(|()| app.draw_status()) {
            break Err(e);
        }
    };

    app.captcha.stop();
    drop(input_rx);
    input.join();
    result
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            Config::load(&path).with_context(|| format!("Failed to load config from {path}"))?
        }
        None => Config::terminal(),
    };
    info!("Starting flicker-captcha with {config:?}");

    let surface = Arc::new(Mutex::new(TerminalSurface::new(0, 1, STATUS_ROWS)));
    surface
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .enter()
        .context("Failed to initialize the terminal")?;

    let result = run(config, Arc::clone(&surface));

    surface.lock().unwrap_or_else(PoisonError::into_inner).leave();
    result
}
