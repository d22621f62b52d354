// SPDX-License-Identifier: MIT
//
// Color model and terminal-capability quantizer.
//
// Single-character variable names (r, g, b) are the standard convention in
// color code and match reference palettes.
#![allow(clippy::many_single_char_names)]
//
// The engine draws with plain 24-bit RGB. What the terminal can actually
// display varies: modern emulators take true color, most others take the
// 256-color palette, and a bare TERM gets the classic 16. The capability
// is detected once at startup from environment signals; every draw call
// then resolves its RGB values through that capability exactly once,
// producing a `ResolvedColor` that cells store and the renderer emits
// without further conversion.
//
// Quantization pipeline:
//
//   Rgb ──resolve──▶ ResolvedColor ──ansi::fg/bg──▶ SGR bytes
//
// The 256-color quantizer special-cases grays: a color whose channels all
// fall within the same tolerance band maps onto the 24-step grayscale ramp
// (indices 232-255) instead of the much coarser 6x6x6 cube.

use std::env;
use std::fmt;

// ─── Rgb ─────────────────────────────────────────────────────────────────────

/// A 24-bit RGB color — the engine's drawing currency.
///
/// # Examples
///
/// ```
/// use lumen_term::color::Rgb;
///
/// let orange = Rgb::new(255, 128, 0);
/// let same = Rgb::from_hex(0xff8000);
/// assert_eq!(orange, same);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Pure black.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Pure white.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Create a color from individual channels.
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from a packed `0xRRGGBB` value.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // Masked to 8 bits.
    pub const fn from_hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
        }
    }

    /// Squared Euclidean distance to another color.
    ///
    /// Squared is enough for nearest-match comparisons and avoids the
    /// square root in the palette-matching loop.
    #[must_use]
    pub fn distance_sq(self, other: Self) -> u32 {
        let dr = i32::from(self.r) - i32::from(other.r);
        let dg = i32::from(self.g) - i32::from(other.g);
        let db = i32::from(self.b) - i32::from(other.b);
        (dr * dr + dg * dg + db * db).unsigned_abs()
    }
}

impl fmt::Debug for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

// ─── Capability ──────────────────────────────────────────────────────────────

/// What the attached terminal can display, detected once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// 24-bit color via SGR 38;2 / 48;2.
    TrueColor,
    /// The xterm 256-color palette via SGR 38;5 / 48;5.
    Palette256,
    /// The classic 16 ANSI colors.
    Palette16,
}

impl Capability {
    /// Detect the terminal's color capability from the environment.
    ///
    /// Reads `TERM_PROGRAM`, `COLORTERM`, and `TERM` once; the result
    /// should be cached for the session.
    #[must_use]
    pub fn detect() -> Self {
        Self::from_env(
            env::var("TERM_PROGRAM").ok().as_deref(),
            env::var("COLORTERM").ok().as_deref(),
            env::var("TERM").ok().as_deref(),
        )
    }

    /// Capability from raw environment values. Split out for testability.
    #[must_use]
    pub fn from_env(
        term_program: Option<&str>,
        colorterm: Option<&str>,
        term: Option<&str>,
    ) -> Self {
        if term_program == Some("iTerm.app") {
            return Self::TrueColor;
        }
        if matches!(colorterm, Some("truecolor" | "24bit")) {
            return Self::TrueColor;
        }
        if term.is_some_and(|t| t.ends_with("256color")) {
            return Self::Palette256;
        }
        Self::Palette16
    }

    /// Resolve an RGB color to what this terminal can display.
    ///
    /// This is the quantizer. Call it once per draw call and store the
    /// result — never per emitted byte.
    #[must_use]
    pub fn resolve(self, color: Rgb) -> ResolvedColor {
        match self {
            Self::TrueColor => ResolvedColor::TrueColor(color.r, color.g, color.b),
            Self::Palette256 => ResolvedColor::Palette256(quantize_256(color)),
            Self::Palette16 => ResolvedColor::Palette16(nearest_ansi16(color)),
        }
    }
}

// ─── ResolvedColor ───────────────────────────────────────────────────────────

/// A terminal-representable color — the quantizer's output.
///
/// This is what cells store and what the renderer turns into SGR bytes.
/// Comparison is cheap, which matters in the diff loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolvedColor {
    /// 24-bit color, passed through unchanged.
    TrueColor(u8, u8, u8),
    /// Index into the xterm 256-color palette.
    Palette256(u8),
    /// Index 0-15 into the classic ANSI palette.
    Palette16(u8),
}

impl ResolvedColor {
    /// The SGR sequence selecting this color as the foreground.
    #[must_use]
    pub fn foreground_escape(self) -> String {
        let mut buf = Vec::new();
        // Writing to a Vec cannot fail.
        let _ = crate::ansi::fg(&mut buf, self);
        String::from_utf8(buf).unwrap_or_default()
    }

    /// The SGR sequence selecting this color as the background.
    #[must_use]
    pub fn background_escape(self) -> String {
        let mut buf = Vec::new();
        let _ = crate::ansi::bg(&mut buf, self);
        String::from_utf8(buf).unwrap_or_default()
    }
}

// ─── Quantizers ──────────────────────────────────────────────────────────────

/// The 16 fixed ANSI RGB triples (VGA defaults).
///
/// Individual terminals may theme these, but for nearest-match purposes
/// the classic values are the reference.
pub const ANSI16_RGB: [Rgb; 16] = [
    Rgb::from_hex(0x000000), // 0: black
    Rgb::from_hex(0xaa0000), // 1: red
    Rgb::from_hex(0x00aa00), // 2: green
    Rgb::from_hex(0xaa5500), // 3: yellow (brown)
    Rgb::from_hex(0x0000aa), // 4: blue
    Rgb::from_hex(0xaa00aa), // 5: magenta
    Rgb::from_hex(0x00aaaa), // 6: cyan
    Rgb::from_hex(0xaaaaaa), // 7: white
    Rgb::from_hex(0x555555), // 8: bright black
    Rgb::from_hex(0xff5555), // 9: bright red
    Rgb::from_hex(0x55ff55), // 10: bright green
    Rgb::from_hex(0xffff55), // 11: bright yellow
    Rgb::from_hex(0x5555ff), // 12: bright blue
    Rgb::from_hex(0xff55ff), // 13: bright magenta
    Rgb::from_hex(0x55ffff), // 14: bright cyan
    Rgb::from_hex(0xffffff), // 15: bright white
];

/// Nearest ANSI-16 index by Euclidean distance.
///
/// Ties break to the first match in enumeration order (strict `<` keeps
/// the earlier index).
#[must_use]
pub fn nearest_ansi16(color: Rgb) -> u8 {
    let mut best_idx: u8 = 0;
    let mut best_dist = u32::MAX;

    for (idx, candidate) in ANSI16_RGB.iter().enumerate() {
        let dist = color.distance_sq(*candidate);
        if dist < best_dist {
            best_dist = dist;
            #[allow(clippy::cast_possible_truncation)] // idx < 16.
            {
                best_idx = idx as u8;
            }
        }
    }

    best_idx
}

/// Quantize an RGB color to the 256-color palette.
///
/// Exact black maps to index 0. Grays (all channels within one tolerance
/// band of each other) map onto the 24-step grayscale ramp. Everything
/// else lands in the 6x6x6 color cube.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn quantize_256(color: Rgb) -> u8 {
    let Rgb { r, g, b } = color;

    if r == 0 && g == 0 && b == 0 {
        return 0;
    }

    if is_gray(r, g, b, 0.0) {
        let sum = u16::from(r) + u16::from(g) + u16::from(b);
        // 765 / 33 caps the ramp offset at 23 (index 255).
        return 232 + (f32::from(sum) / 33.0) as u8;
    }

    16 + (6 * u16::from(r) / 256) as u8 * 36
        + (6 * u16::from(g) / 256) as u8 * 6
        + (6 * u16::from(b) / 256) as u8
}

/// Gray detection by recursively widening a channel threshold.
///
/// Starting from 0, the threshold grows in steps of 42.5 until at least
/// one channel falls below it; the color is gray iff all three do at that
/// point — that is, iff all channels sit in the same tolerance band.
fn is_gray(r: u8, g: u8, b: u8, sep: f32) -> bool {
    let (rf, gf, bf) = (f32::from(r), f32::from(g), f32::from(b));
    if rf < sep || gf < sep || bf < sep {
        return rf < sep && gf < sep && bf < sep;
    }
    is_gray(r, g, b, sep + 42.5)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
