//! Periodic Task: Dedicated thread that runs a callback at a fixed period.
//!
//! This is the scheduling primitive behind flicker sessions. Each task owns
//! one named thread; stopping it is synchronous, so once [`PeriodicTask::stop`]
//! returns the callback will never run again.

use crate::error::{Error, Result};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use log::{trace, warn};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// A tick event delivered to the task callback.
#[derive(Debug, Clone, Copy)]
pub struct Tick {
    /// Tick number (monotonically increasing from 0).
    pub frame: u64,
    /// Time elapsed since the task was started.
    pub elapsed: Duration,
}

/// A cancellable fixed-period worker.
pub struct PeriodicTask {
    /// Handle to the worker thread.
    handle: Option<JoinHandle<()>>,
    /// Dropping this disconnects the worker's stop channel.
    stop_tx: Option<Sender<()>>,
    /// Thread name, for logs.
    name: String,
}

impl PeriodicTask {
    /// Spawn a task that calls `on_tick` every `interval`.
    ///
    /// The first tick fires one interval after spawn. Ticks that fall behind
    /// are dropped, not queued.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Spawn`] if the OS fails to spawn the thread.
    pub fn spawn<F>(name: impl Into<String>, interval: Duration, on_tick: F) -> Result<Self>
    where
        F: FnMut(Tick) + Send + 'static,
    {
        let name = name.into();
        // Nothing is ever sent; the worker exits when the sender disconnects.
        let (stop_tx, stop_rx) = bounded::<()>(0);

        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                Self::run_loop(&stop_rx, interval, on_tick);
            })
            .map_err(Error::Spawn)?;

        Ok(Self {
            handle: Some(handle),
            stop_tx: Some(stop_tx),
            name,
        })
    }

    /// Whether the worker is still owned by this task.
    pub const fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Stop the worker and wait for it to exit.
    ///
    /// Idempotent. Must not be called from inside the tick callback.
    pub fn stop(&mut self) {
        drop(self.stop_tx.take());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Periodic task '{}' panicked", self.name);
            }
        }
    }

    /// Main tick loop.
    fn run_loop<F: FnMut(Tick)>(stop_rx: &Receiver<()>, interval: Duration, mut on_tick: F) {
        let start = Instant::now();
        let mut frame = 0u64;
        let mut next_tick = start + interval;

        loop {
            // Sleep until the next tick, waking early on stop.
            match stop_rx.recv_deadline(next_tick) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }

            let now = Instant::now();
            on_tick(Tick {
                frame,
                elapsed: now - start,
            });

            frame += 1;
            next_tick += interval;

            // Handle case where we're behind (catch up without queuing)
            if next_tick < now {
                trace!("Tick {frame} late, re-anchoring schedule");
                next_tick = now + interval;
            }
        }
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for PeriodicTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PeriodicTask")
            .field("name", &self.name)
            .field("running", &self.is_running())
            .finish()
    }
}
