//! Flicker Compositor: alternates two share buffers on one surface.
//!
//! The compositor owns at most one session at a time. Starting a new session
//! stops and joins the previous worker before the surface is touched, so
//! frames of two challenges never interleave.
//!
//! ```text
//!  tick:   0   1   2   3   4  ...
//!  frame:  A   B   A   B   A  ...
//! ```

use super::ticker::PeriodicTask;
use crate::buffer::{PixelBuffer, Surface};
use crate::error::{Error, Result};
use log::{debug, info, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Identifies one flicker session. Ids increase monotonically per compositor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    /// The raw id.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Pure A/B alternation state: frame N shows A when N is even, B when odd.
#[derive(Debug, Clone)]
pub struct Alternator {
    a: PixelBuffer,
    b: PixelBuffer,
    frame: u64,
}

impl Alternator {
    /// Pair two buffers of equal size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferMismatch`] if the sizes differ.
    pub fn new(a: PixelBuffer, b: PixelBuffer) -> Result<Self> {
        if a.size() != b.size() {
            return Err(Error::BufferMismatch {
                a: a.size(),
                b: b.size(),
            });
        }
        Ok(Self { a, b, frame: 0 })
    }

    /// Size of both buffers.
    pub const fn size(&self) -> (u16, u16) {
        self.a.size()
    }

    /// Index of the next frame to draw.
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    /// The buffer shown at frame `n`.
    pub const fn buffer_for(&self, n: u64) -> &PixelBuffer {
        if n % 2 == 0 {
            &self.a
        } else {
            &self.b
        }
    }

    /// Blit the next frame onto `surface` and return its index.
    pub fn draw_next<S: Surface + ?Sized>(&mut self, surface: &mut S) -> u64 {
        let n = self.frame;
        surface.blit(self.buffer_for(n), 0, 0);
        self.frame += 1;
        n
    }
}

/// The running half of a session.
struct FlickerSession {
    id: SessionId,
    task: PeriodicTask,
    frames: Arc<AtomicU64>,
}

/// Owns the single active flicker session.
pub struct FlickerCompositor<S> {
    period: Duration,
    session: Option<FlickerSession>,
    next_id: u64,
    _surface: std::marker::PhantomData<fn(S)>,
}

impl<S: Surface + Send + 'static> FlickerCompositor<S> {
    /// Create an idle compositor that will redraw every `period`.
    pub const fn new(period: Duration) -> Self {
        Self {
            period,
            session: None,
            next_id: 0,
            _surface: std::marker::PhantomData,
        }
    }

    /// Redraw period.
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Start alternating `a` and `b` on `surface`, replacing any running session.
    ///
    /// The previous session is stopped and joined before the surface is
    /// resized, so no frame of it is drawn after this returns. The first
    /// frame (buffer `a`) is drawn one period after start.
    ///
    /// The caller must not hold the surface lock while calling this.
    ///
    /// # Errors
    ///
    /// - [`Error::BufferMismatch`] if `a` and `b` differ in size; the running
    ///   session, if any, is left untouched.
    /// - Any error from [`Surface::resize`] or [`PeriodicTask::spawn`]; the
    ///   compositor is idle afterwards.
    pub fn start(
        &mut self,
        a: PixelBuffer,
        b: PixelBuffer,
        surface: &Arc<Mutex<S>>,
    ) -> Result<SessionId> {
        let mut alternator = Alternator::new(a, b)?;

        self.stop();

        let (width, height) = alternator.size();
        surface
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .resize(width, height)?;

        self.next_id += 1;
        let id = SessionId(self.next_id);
        let frames = Arc::new(AtomicU64::new(0));

        let target = Arc::clone(surface);
        let drawn = Arc::clone(&frames);
        let task = PeriodicTask::spawn(format!("flicker-{}", id.0), self.period, move |_tick| {
            let mut surface = target.lock().unwrap_or_else(PoisonError::into_inner);
            alternator.draw_next(&mut *surface);
            if let Err(e) = surface.present() {
                warn!("Flicker session {id}: present failed: {e}");
            }
            drawn.fetch_add(1, Ordering::Release);
        })?;

        info!(
            "Started flicker session {id} ({width}x{height} px, period {:?})",
            self.period
        );
        self.session = Some(FlickerSession { id, task, frames });
        Ok(id)
    }

    /// Stop the running session, if any. The surface keeps its last frame.
    pub fn stop(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.task.stop();
            debug!(
                "Stopped flicker session {} after {} frames",
                session.id,
                session.frames.load(Ordering::Acquire)
            );
        }
    }

    /// Whether a session is running.
    pub const fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Id of the running session.
    pub fn active_session(&self) -> Option<SessionId> {
        self.session.as_ref().map(|s| s.id)
    }

    /// Frames drawn by the running session, or 0 when idle.
    pub fn frames_drawn(&self) -> u64 {
        self.session
            .as_ref()
            .map_or(0, |s| s.frames.load(Ordering::Acquire))
    }
}

impl<S> Drop for FlickerCompositor<S> {
    fn drop(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.task.stop();
        }
    }
}

impl<S> std::fmt::Debug for FlickerCompositor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlickerCompositor")
            .field("period", &self.period)
            .field("session", &self.session.as_ref().map(|s| s.id))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Rgb;
    use crate::layout::Rect;
    use std::thread;
    use std::time::Instant;

    const RED: Rgb = Rgb::new(255, 0, 0);
    const GREEN: Rgb = Rgb::new(0, 255, 0);
    const BLUE: Rgb = Rgb::new(0, 0, 255);
    const YELLOW: Rgb = Rgb::new(255, 255, 0);

    /// Pixel surface that logs the top-left color of every blit.
    struct RecordingSurface {
        pixels: PixelBuffer,
        blits: Vec<Rgb>,
    }

    impl RecordingSurface {
        fn shared() -> Arc<Mutex<Self>> {
            Arc::new(Mutex::new(Self {
                pixels: PixelBuffer::new(1, 1),
                blits: Vec::new(),
            }))
        }
    }

    impl Surface for RecordingSurface {
        fn width(&self) -> u16 {
            self.pixels.width()
        }
        fn height(&self) -> u16 {
            self.pixels.height()
        }
        fn resize(&mut self, width: u16, height: u16) -> Result<()> {
            Surface::resize(&mut self.pixels, width, height)
        }
        fn fill_rect(&mut self, rect: Rect, color: Rgb) {
            self.pixels.fill_rect(rect, color);
        }
        fn blit(&mut self, source: &PixelBuffer, x: u16, y: u16) {
            self.blits.push(source.get(0, 0).unwrap_or_default());
            self.pixels.blit(source, x, y);
        }
        fn pixel(&self, x: u16, y: u16) -> Option<Rgb> {
            self.pixels.get(x, y)
        }
    }

    fn solid(color: Rgb) -> PixelBuffer {
        PixelBuffer::filled(8, 4, color)
    }

    fn wait_for_frames(surface: &Arc<Mutex<RecordingSurface>>, n: usize) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while surface.lock().unwrap().blits.len() < n {
            assert!(Instant::now() < deadline, "timed out waiting for {n} frames");
            thread::sleep(Duration::from_millis(2));
        }
    }

    #[test]
    fn test_alternator_even_odd() {
        let mut alternator = Alternator::new(solid(RED), solid(GREEN)).unwrap();
        let mut surface = PixelBuffer::new(8, 4);

        for (n, expected) in [(0, RED), (1, GREEN), (2, RED), (3, GREEN)] {
            assert_eq!(alternator.draw_next(&mut surface), n);
            assert_eq!(surface.get(3, 2), Some(expected), "frame {n}");
        }
        assert_eq!(alternator.frame(), 4);
        assert_eq!(alternator.buffer_for(10).get(0, 0), Some(RED));
        assert_eq!(alternator.buffer_for(11).get(0, 0), Some(GREEN));
    }

    #[test]
    fn test_alternator_rejects_mismatch() {
        let err = Alternator::new(solid(RED), PixelBuffer::new(4, 4)).unwrap_err();
        assert!(matches!(err, Error::BufferMismatch { a: (8, 4), b: (4, 4) }));
    }

    #[test_log::test]
    fn test_session_alternates_from_a() {
        let surface = RecordingSurface::shared();
        let mut compositor = FlickerCompositor::new(Duration::from_millis(5));
        compositor.start(solid(RED), solid(GREEN), &surface).unwrap();

        wait_for_frames(&surface, 4);
        compositor.stop();

        let guard = surface.lock().unwrap();
        assert_eq!(guard.pixels.size(), (8, 4));
        assert_eq!(&guard.blits[..4], &[RED, GREEN, RED, GREEN]);
        for (n, color) in guard.blits.iter().enumerate() {
            assert_eq!(*color, if n % 2 == 0 { RED } else { GREEN }, "frame {n}");
        }
    }

    #[test_log::test]
    fn test_restart_replaces_session() {
        let surface = RecordingSurface::shared();
        let mut compositor = FlickerCompositor::new(Duration::from_millis(2));

        let first = compositor.start(solid(RED), solid(GREEN), &surface).unwrap();
        wait_for_frames(&surface, 3);

        let second = compositor.start(solid(BLUE), solid(YELLOW), &surface).unwrap();
        let marker = surface.lock().unwrap().blits.len();
        assert_ne!(first, second);
        assert!(second > first);
        assert_eq!(compositor.active_session(), Some(second));

        wait_for_frames(&surface, marker + 4);
        compositor.stop();

        let guard = surface.lock().unwrap();
        let is_new = |c: &Rgb| *c == BLUE || *c == YELLOW;
        let first_new = guard.blits.iter().position(is_new).unwrap();
        assert!(first_new <= marker);
        assert!(guard.blits[..first_new].iter().all(|c| *c == RED || *c == GREEN));

        let after = &guard.blits[first_new..];
        assert!(after.iter().all(is_new), "old frames leaked: {after:?}");
        assert_eq!(after[0], BLUE);
    }

    #[test]
    fn test_stop_keeps_last_frame() {
        let surface = RecordingSurface::shared();
        let mut compositor = FlickerCompositor::new(Duration::from_millis(3));
        compositor.start(solid(RED), solid(GREEN), &surface).unwrap();
        wait_for_frames(&surface, 3);

        compositor.stop();
        assert!(!compositor.is_active());
        assert_eq!(compositor.frames_drawn(), 0);

        let (count, last) = {
            let guard = surface.lock().unwrap();
            (guard.blits.len(), guard.pixels.get(0, 0))
        };
        thread::sleep(Duration::from_millis(20));

        let guard = surface.lock().unwrap();
        assert_eq!(guard.blits.len(), count);
        assert_eq!(guard.pixels.get(0, 0), last);
        assert_eq!(last, guard.blits.last().copied());
    }

    #[test]
    fn test_mismatch_leaves_running_session() {
        let surface = RecordingSurface::shared();
        let mut compositor = FlickerCompositor::new(Duration::from_millis(5));
        let id = compositor.start(solid(RED), solid(GREEN), &surface).unwrap();

        let result = compositor.start(solid(BLUE), PixelBuffer::new(2, 2), &surface);
        assert!(matches!(result, Err(Error::BufferMismatch { .. })));
        assert_eq!(compositor.active_session(), Some(id));
    }

    #[test]
    fn test_drop_stops_worker() {
        let surface = RecordingSurface::shared();
        {
            let mut compositor = FlickerCompositor::new(Duration::from_millis(2));
            compositor.start(solid(RED), solid(GREEN), &surface).unwrap();
            wait_for_frames(&surface, 2);
        }
        let count = surface.lock().unwrap().blits.len();
        thread::sleep(Duration::from_millis(15));
        assert_eq!(surface.lock().unwrap().blits.len(), count);
    }
}
