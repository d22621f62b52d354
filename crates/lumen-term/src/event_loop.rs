// SPDX-License-Identifier: MIT
//
// The render loop.
//
// Fixed-cadence frame driver: poll the terminal size, hand the frame's
// keys and the elapsed clock to the application callback, present, sleep.
// The callback's return value and Ctrl-C share one exit path — SIGINT
// only sets an atomic flag, and the loop folds it into the callback's
// verdict, so shutdown always walks the normal teardown (terminal
// restored, reader thread joined) rather than dying mid-frame.
//
// One loop per process: the terminal and the signal handler are process
// globals, so a second concurrent loop would fight over both.
//
// Safety: installing the SIGINT handler uses sigaction(2). The handler
// body is a single atomic store, which is async-signal-safe.
#![allow(unsafe_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::display::Display;
use crate::error::{Error, Result};
use crate::input::Key;
use crate::reader::InputEngine;

/// Whether a [`RenderLoop`] currently exists in this process.
static LOOP_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Set by the SIGINT handler; folded into the callback verdict each frame.
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

// ─── Config ──────────────────────────────────────────────────────────────────

/// Render loop tuning.
#[derive(Debug, Clone, Copy)]
pub struct LoopConfig {
    /// Sleep between frames. 50 ms ≈ 20 fps, plenty for terminal UIs.
    pub frame_interval: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_millis(50),
        }
    }
}

// ─── RenderLoop ──────────────────────────────────────────────────────────────

/// Owns the frame cadence and the process-wide singleton slot.
///
/// ```no_run
/// use lumen_term::event_loop::{LoopConfig, RenderLoop};
///
/// let render_loop = RenderLoop::new(LoopConfig::default())?;
/// render_loop.run(|_display, _keys, _elapsed_ms| {
///     // draw a frame, consume keys; return false to exit
///     true
/// })?;
/// # Ok::<(), lumen_term::error::Error>(())
/// ```
pub struct RenderLoop {
    config: LoopConfig,
}

impl RenderLoop {
    /// Claim the process's loop slot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyRunning`] when another `RenderLoop`
    /// exists and has not been dropped.
    pub fn new(config: LoopConfig) -> Result<Self> {
        if LOOP_ACTIVE.swap(true, Ordering::SeqCst) {
            return Err(Error::AlreadyRunning);
        }
        Ok(Self { config })
    }

    /// Run until the callback returns `false` or SIGINT arrives.
    ///
    /// The callback receives the display, the keys that arrived since
    /// the previous frame, and milliseconds elapsed since the loop
    /// started. Its frame is presented *after* it returns, including on
    /// the final iteration, so an exit message drawn on the way out is
    /// still shown.
    ///
    /// # Errors
    ///
    /// Propagates terminal setup and stdout write failures. The terminal
    /// is restored on every exit path.
    pub fn run<F>(self, mut callback: F) -> Result<()>
    where
        F: FnMut(&mut Display, Vec<Key>, u64) -> bool,
    {
        SHUTDOWN.store(false, Ordering::SeqCst);
        install_sigint_handler();

        let mut display = Display::new()?;
        let mut input = InputEngine::spawn();
        let started = Instant::now();

        let result = loop {
            display.update();
            let keys = input.drain();

            #[allow(clippy::cast_possible_truncation)]
            let elapsed_ms = started.elapsed().as_millis() as u64;
            let running =
                callback(&mut display, keys, elapsed_ms) && !SHUTDOWN.load(Ordering::SeqCst);

            if let Err(e) = display.draw() {
                break Err(e);
            }
            if !running {
                break Ok(());
            }

            std::thread::sleep(self.config.frame_interval);
        };

        // Explicit teardown order: stop reading before the terminal
        // leaves raw mode.
        input.stop();
        with_teardown(result, display.close())
    }
}

/// Combine the frame-loop outcome with the terminal teardown outcome.
/// A frame-loop error is the root cause and must not be shadowed by a
/// close failure that follows from it.
fn with_teardown(run: Result<()>, close: Result<()>) -> Result<()> {
    match run {
        Err(e) => Err(e),
        Ok(()) => close,
    }
}

impl Drop for RenderLoop {
    fn drop(&mut self) {
        LOOP_ACTIVE.store(false, Ordering::SeqCst);
    }
}

/// Whether a SIGINT has been received since the loop started.
#[must_use]
pub fn shutdown_requested() -> bool {
    SHUTDOWN.load(Ordering::SeqCst)
}

// ─── SIGINT ──────────────────────────────────────────────────────────────────

#[cfg(unix)]
extern "C" fn handle_sigint(_sig: libc::c_int) {
    SHUTDOWN.store(true, Ordering::SeqCst);
}

#[cfg(unix)]
fn install_sigint_handler() {
    unsafe {
        let mut action: libc::sigaction = std::mem::zeroed();
        action.sa_sigaction = handle_sigint as libc::sighandler_t;
        libc::sigemptyset(&raw mut action.sa_mask);
        // SA_RESTART keeps the reader thread's poll() from failing with
        // EINTR on every Ctrl-C.
        action.sa_flags = libc::SA_RESTART;
        libc::sigaction(libc::SIGINT, &raw const action, std::ptr::null_mut());
    }
}

#[cfg(not(unix))]
fn install_sigint_handler() {}

// ─── Tests ───────────────────────────────────────────────────────────────────
