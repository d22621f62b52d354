// SPDX-License-Identifier: MIT
//
// Stdin reader thread.
//
// Blocking reads can't be interrupted portably, so input runs on its own
// thread: poll(2) stdin with a short timeout, read whatever arrived, push
// the decoded keys onto the shared queue. The timeout serves double duty —
// it keeps the thread responsive to the stop flag, and it is the moment a
// dangling ESC gets resolved into a real Escape key (a sequence split
// across reads shows up as back-to-back readable polls, never a timeout).
//
// Safety: poll(2) and read(2) on the stdin fd require `unsafe`. Both
// blocks are single calls with checked results.
#![allow(unsafe_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::input::{EventQueue, Key, Parser};

/// Poll timeout. Also the time before a lone ESC resolves to Escape.
const POLL_TIMEOUT_MS: i32 = 50;

/// Read chunk size. Larger than any escape sequence and any realistic
/// paste burst between frames.
const READ_BUF_SIZE: usize = 4096;

/// Owns the reader thread and the shared key queue.
///
/// Spawn with [`spawn`](Self::spawn), consume with
/// [`drain`](Self::drain) once per frame. Dropping the engine stops the
/// thread.
pub struct InputEngine {
    queue: Arc<EventQueue>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl InputEngine {
    /// Start the reader thread.
    #[must_use]
    pub fn spawn() -> Self {
        let queue = Arc::new(EventQueue::new());
        let stop = Arc::new(AtomicBool::new(false));

        let thread_queue = Arc::clone(&queue);
        let thread_stop = Arc::clone(&stop);
        let handle = std::thread::Builder::new()
            .name("stdin-reader".into())
            .spawn(move || reader_loop(&thread_queue, &thread_stop))
            .ok();

        Self {
            queue,
            stop,
            handle,
        }
    }

    /// All keys received since the last drain, in arrival order.
    #[must_use]
    pub fn drain(&self) -> Vec<Key> {
        self.queue.drain()
    }

    /// Signal the thread to stop and wait for it to exit.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for InputEngine {
    fn drop(&mut self) {
        self.stop();
    }
}

// ─── Reader Loop ─────────────────────────────────────────────────────────────

#[cfg(unix)]
fn reader_loop(queue: &EventQueue, stop: &AtomicBool) {
    let mut parser = Parser::new();
    let mut buf = [0u8; READ_BUF_SIZE];

    while !stop.load(Ordering::SeqCst) {
        match poll_stdin(POLL_TIMEOUT_MS) {
            Poll::Readable => {
                let n = read_stdin(&mut buf);
                if n == 0 {
                    // EOF — stdin closed, nothing more will ever come.
                    queue.extend(parser.flush());
                    return;
                }
                queue.extend(parser.advance(&buf[..n]));
            }
            Poll::Timeout => {
                if parser.has_pending() {
                    queue.extend(parser.flush());
                }
            }
            Poll::Error => return,
        }
    }
}

#[cfg(unix)]
enum Poll {
    Readable,
    Timeout,
    Error,
}

#[cfg(unix)]
fn poll_stdin(timeout_ms: i32) -> Poll {
    let mut fds = libc::pollfd {
        fd: libc::STDIN_FILENO,
        events: libc::POLLIN,
        revents: 0,
    };

    let result = unsafe { libc::poll(&raw mut fds, 1, timeout_ms) };
    match result {
        0 => Poll::Timeout,
        1.. => {
            if fds.revents & (libc::POLLERR | libc::POLLHUP | libc::POLLNVAL) != 0 {
                Poll::Error
            } else {
                Poll::Readable
            }
        }
        _ => {
            // EINTR (e.g. SIGINT landing on this thread) is a retry, not
            // a failure.
            if std::io::Error::last_os_error().kind() == std::io::ErrorKind::Interrupted {
                Poll::Timeout
            } else {
                Poll::Error
            }
        }
    }
}

#[cfg(unix)]
fn read_stdin(buf: &mut [u8]) -> usize {
    let n = unsafe {
        libc::read(
            libc::STDIN_FILENO,
            buf.as_mut_ptr().cast::<libc::c_void>(),
            buf.len(),
        )
    };
    usize::try_from(n).unwrap_or(0)
}

/// Fallback for platforms without poll(2): plain blocking reads. The
/// thread may outlive its stop signal until one more byte arrives, and
/// lone ESC resolution degrades to the next keypress.
#[cfg(not(unix))]
fn reader_loop(queue: &EventQueue, stop: &AtomicBool) {
    use std::io::Read;

    let mut parser = Parser::new();
    let mut buf = [0u8; READ_BUF_SIZE];
    let mut stdin = std::io::stdin();

    while !stop.load(Ordering::SeqCst) {
        match stdin.read(&mut buf) {
            Ok(0) | Err(_) => {
                queue.extend(parser.flush());
                return;
            }
            Ok(n) => queue.extend(parser.advance(&buf[..n])),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
