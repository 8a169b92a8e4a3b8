//! `Captcha`: the session manager tying the pipeline together.
//!
//! Owns the rasterizer, encoder, renderer and compositor, plus the single
//! current challenge. `regenerate` replaces the challenge and its flicker
//! session as a unit.

use crate::actor::{FlickerCompositor, SessionId};
use crate::buffer::Surface;
use crate::challenge::{verify, ChallengeSource, Verdict};
use crate::config::Config;
use crate::error::Result;
use crate::raster::{BinaryMask, TextRasterizer};
use crate::render::ShareRenderer;
use crate::share::{BitSource, RngBits, ShareEncoder, SharePair};
use log::{debug, info};
use rand::rngs::StdRng;
use std::sync::{Arc, Mutex};

/// The challenge currently on display.
#[derive(Debug, Clone)]
pub struct Challenge {
    text: String,
    mask: BinaryMask,
    shares: SharePair,
}

impl Challenge {
    /// The expected answer.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The rasterized text.
    pub const fn mask(&self) -> &BinaryMask {
        &self.mask
    }

    /// The two shares being flickered.
    pub const fn shares(&self) -> &SharePair {
        &self.shares
    }
}

/// A flickering visual-cryptography CAPTCHA on surface `S`.
pub struct Captcha<S, B = RngBits<StdRng>> {
    config: Config,
    rasterizer: TextRasterizer,
    encoder: ShareEncoder<B>,
    renderer: ShareRenderer,
    source: ChallengeSource,
    compositor: FlickerCompositor<S>,
    surface: Arc<Mutex<S>>,
    current: Option<Challenge>,
}

impl<S: Surface + Send + 'static> Captcha<S> {
    /// Create an idle captcha drawing to `surface`.
    ///
    /// # Errors
    ///
    /// Returns the first precondition `config` violates.
    pub fn new(config: Config, surface: Arc<Mutex<S>>) -> Result<Self> {
        Self::with_encoder(config, surface, ShareEncoder::from_entropy())
    }
}

impl<S: Surface + Send + 'static, B: BitSource> Captcha<S, B> {
    /// Create an idle captcha with a specific share encoder.
    ///
    /// # Errors
    ///
    /// Returns the first precondition `config` violates.
    pub fn with_encoder(
        config: Config,
        surface: Arc<Mutex<S>>,
        encoder: ShareEncoder<B>,
    ) -> Result<Self> {
        config.validate()?;
        let source = ChallengeSource::from_config(&config.challenge)?;

        Ok(Self {
            rasterizer: TextRasterizer::new(&config),
            renderer: ShareRenderer::from_config(&config),
            compositor: FlickerCompositor::new(config.period()),
            encoder,
            source,
            surface,
            current: None,
            config,
        })
    }

    /// Show `text` as the new challenge, replacing any current one.
    ///
    /// Text that cannot be rasterized is rejected before anything changes.
    /// If the new session fails to start, no challenge is current.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyChallenge`](crate::Error::EmptyChallenge) if `text` is empty.
    /// - [`Error::GlyphMissing`](crate::Error::GlyphMissing) or
    ///   [`Error::TextTooLarge`](crate::Error::TextTooLarge) from rasterizing.
    /// - Surface and thread errors from starting the flicker session.
    pub fn regenerate(&mut self, text: &str) -> Result<SessionId> {
        let mask = self.rasterizer.rasterize(text)?;
        let shares = self.encoder.encode(&mask);
        let (a, b) = self.renderer.render_pair(&shares)?;
        debug!(
            "Challenge rendered: {} foreground cells, {}x{} px per share",
            mask.foreground_count(),
            a.width(),
            a.height()
        );

        let id = match self.compositor.start(a, b, &self.surface) {
            Ok(id) => id,
            Err(e) => {
                self.current = None;
                return Err(e);
            }
        };

        info!("Regenerated challenge ({} chars), session {id}", text.chars().count());
        self.current = Some(Challenge {
            text: text.to_string(),
            mask,
            shares,
        });
        Ok(id)
    }

    /// Show a fresh random challenge.
    ///
    /// # Errors
    ///
    /// See [`Captcha::regenerate`].
    pub fn regenerate_random(&mut self) -> Result<SessionId> {
        let text = self.source.generate();
        self.regenerate(&text)
    }

    /// Check an answer against the current challenge.
    ///
    /// Fails when there is no challenge.
    pub fn verify(&self, input: &str) -> Verdict {
        let verdict = self
            .current
            .as_ref()
            .map_or(Verdict::Failed, |c| verify(input, &c.text));
        debug!("Answer checked: {verdict:?}");
        verdict
    }

    /// Stop flickering. The challenge stays current; the surface keeps its
    /// last frame.
    pub fn stop(&mut self) {
        self.compositor.stop();
    }

    /// Text of the current challenge.
    pub fn current_challenge(&self) -> Option<&str> {
        self.current.as_ref().map(|c| c.text.as_str())
    }

    /// The current challenge with its mask and shares.
    pub const fn challenge(&self) -> Option<&Challenge> {
        self.current.as_ref()
    }

    /// Whether a flicker session is running.
    pub const fn is_flickering(&self) -> bool {
        self.compositor.is_active()
    }

    /// Id of the running flicker session.
    pub fn active_session(&self) -> Option<SessionId> {
        self.compositor.active_session()
    }

    /// Frames drawn by the running session.
    pub fn frames_drawn(&self) -> u64 {
        self.compositor.frames_drawn()
    }

    /// The shared drawing surface.
    pub const fn surface(&self) -> &Arc<Mutex<S>> {
        &self.surface
    }

    /// The active configuration.
    pub const fn config(&self) -> &Config {
        &self.config
    }
}

impl<S, B> std::fmt::Debug for Captcha<S, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Captcha")
            .field("compositor", &self.compositor)
            .field("has_challenge", &self.current.is_some())
            .finish_non_exhaustive()
    }
}
