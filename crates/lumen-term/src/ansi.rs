// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write escape sequences to any `impl Write`. No state,
// no decisions about when to emit — that's the diff renderer's job. This
// module just knows the byte-level encoding of every terminal command we
// need.
//
// All cursor positions are 0-indexed in our API and converted to 1-indexed
// for the terminal (ANSI standard uses 1-based coordinates).
//
// All functions return `io::Result` propagated from the underlying writer.
// In practice they never fail when writing to `OutputBuffer` (backed by a Vec).

use std::io::{self, Write};

use crate::color::ResolvedColor;

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to `(x, y)` using the CUP (Cursor Position) sequence.
///
/// Our coordinates are 0-indexed; ANSI CUP is 1-indexed.
#[inline]
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", y + 1, x + 1)
}

/// Hide the cursor (DECTCEM reset).
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

/// Show the cursor (DECTCEM set).
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Clear the entire screen (ED 2).
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// Reset all SGR attributes to terminal defaults (SGR 0).
///
/// This clears **everything**: colors, italic, underline — all of it.
/// The renderer re-establishes the full style after calling this.
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

/// Enter the alternate screen buffer (DEC Private Mode 1049).
///
/// The alternate screen is a separate buffer that preserves the original
/// terminal content. On exit, the original content is restored — this is
/// what makes a full-screen app non-destructive.
#[inline]
pub fn enter_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049h")
}

/// Exit the alternate screen buffer and restore original content.
#[inline]
pub fn exit_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049l")
}

// ─── Colors ──────────────────────────────────────────────────────────────────

/// Set the foreground (text) color.
///
/// Uses compact SGR codes for the 16-color palette (30-37, 90-97), the
/// 256-color extended format for palette indices, and 24-bit codes for
/// true color.
pub fn fg(w: &mut impl Write, color: ResolvedColor) -> io::Result<()> {
    match color {
        ResolvedColor::TrueColor(r, g, b) => write!(w, "\x1b[38;2;{r};{g};{b}m"),
        ResolvedColor::Palette256(idx) => write!(w, "\x1b[38;5;{idx}m"),
        ResolvedColor::Palette16(idx) => {
            if idx < 8 {
                write!(w, "\x1b[{}m", 30 + u16::from(idx))
            } else {
                write!(w, "\x1b[{}m", 82 + u16::from(idx))
            }
        }
    }
}

/// Set the background color.
///
/// Same encoding strategy as [`fg`] but with BG-specific SGR codes
/// (40-47, 100-107, 48;5;N, 48;2;R;G;B).
pub fn bg(w: &mut impl Write, color: ResolvedColor) -> io::Result<()> {
    match color {
        ResolvedColor::TrueColor(r, g, b) => write!(w, "\x1b[48;2;{r};{g};{b}m"),
        ResolvedColor::Palette256(idx) => write!(w, "\x1b[48;5;{idx}m"),
        ResolvedColor::Palette16(idx) => {
            if idx < 8 {
                write!(w, "\x1b[{}m", 40 + u16::from(idx))
            } else {
                write!(w, "\x1b[{}m", 92 + u16::from(idx))
            }
        }
    }
}

// ─── Style Toggles ───────────────────────────────────────────────────────────

/// Switch italic on (SGR 3) or off (SGR 23).
#[inline]
pub fn italic(w: &mut impl Write, on: bool) -> io::Result<()> {
    w.write_all(if on { b"\x1b[3m" } else { b"\x1b[23m" })
}

/// Switch underline on (SGR 4) or off (SGR 24).
#[inline]
pub fn underline(w: &mut impl Write, on: bool) -> io::Result<()> {
    w.write_all(if on { b"\x1b[4m" } else { b"\x1b[24m" })
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Helper: run an ANSI function and return its output as a string.
    fn emit<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    // ── Cursor ──────────────────────────────────────────────────────────

    #[test]
    fn cursor_to_origin() {
        assert_eq!(emit(|w| cursor_to(w, 0, 0)), "\x1b[1;1H");
    }

    #[test]
    fn cursor_to_position() {
        assert_eq!(emit(|w| cursor_to(w, 10, 20)), "\x1b[21;11H");
    }

    #[test]
    fn cursor_hide_sequence() {
        assert_eq!(emit(|w| cursor_hide(w)), "\x1b[?25l");
    }

    #[test]
    fn cursor_show_sequence() {
        assert_eq!(emit(|w| cursor_show(w)), "\x1b[?25h");
    }

    // ── Screen ──────────────────────────────────────────────────────────

    #[test]
    fn clear_screen_sequence() {
        assert_eq!(emit(|w| clear_screen(w)), "\x1b[2J");
    }

    #[test]
    fn reset_sequence() {
        assert_eq!(emit(|w| reset(w)), "\x1b[0m");
    }

    #[test]
    fn alt_screen_sequences() {
        assert_eq!(emit(|w| enter_alt_screen(w)), "\x1b[?1049h");
        assert_eq!(emit(|w| exit_alt_screen(w)), "\x1b[?1049l");
    }

    // ── Foreground Color ────────────────────────────────────────────────

    #[test]
    fn fg_truecolor() {
        assert_eq!(
            emit(|w| fg(w, ResolvedColor::TrueColor(255, 128, 0))),
            "\x1b[38;2;255;128;0m"
        );
    }

    #[test]
    fn fg_palette256() {
        assert_eq!(
            emit(|w| fg(w, ResolvedColor::Palette256(42))),
            "\x1b[38;5;42m"
        );
    }

    #[test]
    fn fg_palette16_standard() {
        assert_eq!(emit(|w| fg(w, ResolvedColor::Palette16(0))), "\x1b[30m");
        assert_eq!(emit(|w| fg(w, ResolvedColor::Palette16(1))), "\x1b[31m");
        assert_eq!(emit(|w| fg(w, ResolvedColor::Palette16(7))), "\x1b[37m");
    }

    #[test]
    fn fg_palette16_bright() {
        assert_eq!(emit(|w| fg(w, ResolvedColor::Palette16(8))), "\x1b[90m");
        assert_eq!(emit(|w| fg(w, ResolvedColor::Palette16(9))), "\x1b[91m");
        assert_eq!(emit(|w| fg(w, ResolvedColor::Palette16(15))), "\x1b[97m");
    }

    // ── Background Color ────────────────────────────────────────────────

    #[test]
    fn bg_truecolor() {
        assert_eq!(
            emit(|w| bg(w, ResolvedColor::TrueColor(0, 100, 200))),
            "\x1b[48;2;0;100;200m"
        );
    }

    #[test]
    fn bg_palette256() {
        assert_eq!(
            emit(|w| bg(w, ResolvedColor::Palette256(200))),
            "\x1b[48;5;200m"
        );
    }

    #[test]
    fn bg_palette16_standard() {
        assert_eq!(emit(|w| bg(w, ResolvedColor::Palette16(2))), "\x1b[42m");
    }

    #[test]
    fn bg_palette16_bright() {
        assert_eq!(emit(|w| bg(w, ResolvedColor::Palette16(8))), "\x1b[100m");
        assert_eq!(emit(|w| bg(w, ResolvedColor::Palette16(15))), "\x1b[107m");
    }

    // ── Style Toggles ───────────────────────────────────────────────────

    #[test]
    fn italic_toggle() {
        assert_eq!(emit(|w| italic(w, true)), "\x1b[3m");
        assert_eq!(emit(|w| italic(w, false)), "\x1b[23m");
    }

    #[test]
    fn underline_toggle() {
        assert_eq!(emit(|w| underline(w, true)), "\x1b[4m");
        assert_eq!(emit(|w| underline(w, false)), "\x1b[24m");
    }

    // ── Composition ─────────────────────────────────────────────────────

    #[test]
    fn multiple_sequences_compose() {
        let mut buf = Vec::new();
        cursor_to(&mut buf, 5, 3).unwrap();
        fg(&mut buf, ResolvedColor::TrueColor(255, 0, 0)).unwrap();
        bg(&mut buf, ResolvedColor::Palette16(0)).unwrap();
        italic(&mut buf, true).unwrap();
        let s = String::from_utf8(buf).unwrap();
        assert_eq!(s, "\x1b[4;6H\x1b[38;2;255;0;0m\x1b[40m\x1b[3m");
    }
}
