// SPDX-License-Identifier: MIT
//
// Engine error kinds.
//
// The engine's failure surface is deliberately small. Drawing outside the
// buffer is not an error at all (primitives routinely compute coordinates
// slightly off-screen, so `set` clips). The named kinds cover the cases a
// caller can actually act on; terminal I/O failures propagate as `Io`
// because a terminal UI has no degraded mode without its terminal.

use std::io;

use thiserror::Error;

/// Convenience alias for engine results.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the engine.
#[derive(Debug, Error)]
pub enum Error {
    /// A coordinate lies outside the buffer extents.
    ///
    /// Only returned by the checked accessors; the drawing path clips
    /// silently instead.
    #[error("coordinates ({x}, {y}) outside buffer extents {width}x{height}")]
    OutOfBounds {
        /// Requested column.
        x: u16,
        /// Requested row.
        y: u16,
        /// Buffer width in columns.
        width: u16,
        /// Buffer height in rows.
        height: u16,
    },

    /// A byte sequence is not well-formed UTF-8.
    #[error("byte sequence is not well-formed UTF-8")]
    InvalidEncoding,

    /// A render loop already exists in this process.
    ///
    /// The loop owns the terminal (raw mode, alternate screen, signal
    /// handler); a second instance would fight the first for all three.
    #[error("a render loop is already running in this process")]
    AlreadyRunning,

    /// Terminal I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_message_names_coordinates() {
        let err = Error::OutOfBounds {
            x: 120,
            y: 3,
            width: 80,
            height: 24,
        };
        let msg = err.to_string();
        assert!(msg.contains("(120, 3)"));
        assert!(msg.contains("80x24"));
    }

    #[test]
    fn io_error_converts() {
        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "gone");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn already_running_message() {
        assert!(Error::AlreadyRunning.to_string().contains("already running"));
    }
}
