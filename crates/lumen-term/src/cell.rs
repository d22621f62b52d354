// SPDX-License-Identifier: MIT
//
// Cell — the atomic unit of terminal rendering.
//
// Every character position on screen is a Cell: resolved foreground and
// background colors, style flags, and the text to display (usually a
// single grapheme cluster). The rendering pipeline exists to produce,
// diff, and output these.
//
// Cells store *resolved* colors only. Quantization against the detected
// terminal capability happens in `Style`, once per draw call — the diff
// loop and the byte emitter never touch the quantizer.
//
// Equality is structural and defines dirtiness: a cell is repainted iff
// it compares unequal to the same position in the previous frame.

use crate::color::{Capability, Rgb, ResolvedColor};
use crate::text::GraphemeString;

// ─── Style Flags ─────────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// Per-cell text styling as a compact bitfield.
    ///
    /// These map directly to SGR parameters. Combine with bitwise OR:
    ///
    /// ```
    /// use lumen_term::cell::StyleFlags;
    ///
    /// let style = StyleFlags::ITALIC | StyleFlags::UNDERLINE;
    /// assert!(style.contains(StyleFlags::ITALIC));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct StyleFlags: u8 {
        /// SGR 3 / 23 — italic on/off.
        const ITALIC = 1 << 0;
        /// SGR 4 / 24 — underline on/off.
        const UNDERLINE = 1 << 1;
    }
}

// ─── Cell ────────────────────────────────────────────────────────────────────

/// A single terminal cell.
///
/// The default cell is a space in white-on-black with no styling — the
/// state every position returns to when a frame starts.
#[derive(Clone, PartialEq, Eq)]
pub struct Cell {
    /// Foreground (text) color.
    pub fg: ResolvedColor,
    /// Background color.
    pub bg: ResolvedColor,
    /// Displayed text, usually one grapheme cluster.
    pub text: GraphemeString,
    /// Italic / underline flags.
    pub flags: StyleFlags,
}

impl Cell {
    /// Create a cell with the given text and default white-on-black
    /// styling.
    #[must_use]
    pub fn new(text: impl Into<GraphemeString>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// The default cell under a specific terminal capability.
    ///
    /// White and black resolve differently per capability; buffers are
    /// filled with this so that default cells compare equal to what the
    /// draw path produces.
    #[must_use]
    pub fn default_for(capability: Capability) -> Self {
        Self {
            fg: capability.resolve(Rgb::WHITE),
            bg: capability.resolve(Rgb::BLACK),
            text: GraphemeString::from(" "),
            flags: StyleFlags::empty(),
        }
    }

    // ─── Builders ─────────────────────────────────────────────────────────

    /// Set the foreground color.
    #[inline]
    #[must_use]
    pub fn with_fg(self, fg: ResolvedColor) -> Self {
        Self { fg, ..self }
    }

    /// Set the background color.
    #[inline]
    #[must_use]
    pub fn with_bg(self, bg: ResolvedColor) -> Self {
        Self { bg, ..self }
    }

    /// Set the style flags.
    #[inline]
    #[must_use]
    pub fn with_flags(self, flags: StyleFlags) -> Self {
        Self { flags, ..self }
    }

    /// Replace the displayed text.
    #[inline]
    #[must_use]
    pub fn with_text(self, text: impl Into<GraphemeString>) -> Self {
        Self {
            text: text.into(),
            ..self
        }
    }

    // ─── Queries ──────────────────────────────────────────────────────────

    /// Whether the italic flag is set.
    #[inline]
    #[must_use]
    pub const fn is_italic(&self) -> bool {
        self.flags.contains(StyleFlags::ITALIC)
    }

    /// Whether the underline flag is set.
    #[inline]
    #[must_use]
    pub const fn is_underline(&self) -> bool {
        self.flags.contains(StyleFlags::UNDERLINE)
    }

    /// Whether two cells share colors and flags, ignoring text.
    ///
    /// The renderer uses this to decide whether moving from one cell to
    /// the next needs new SGR sequences.
    #[must_use]
    pub fn same_style(&self, other: &Self) -> bool {
        self.fg == other.fg && self.bg == other.bg && self.flags == other.flags
    }
}

impl Default for Cell {
    /// White-on-black space. Matches [`Cell::default_for`] on a
    /// true-color terminal.
    fn default() -> Self {
        Self::default_for(Capability::TrueColor)
    }
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cell({:?}", self.text.as_str())?;
        write!(f, ", fg={:?}, bg={:?}", self.fg, self.bg)?;
        if !self.flags.is_empty() {
            write!(f, ", {:?}", self.flags)?;
        }
        write!(f, ")")
    }
}

// ─── Style ───────────────────────────────────────────────────────────────────

/// A fluent style builder carrying quantized colors.
///
/// `fg`/`bg` resolve their RGB argument against the capability
/// immediately, so a style built once can stamp any number of cells
/// without re-running the quantizer. Unset fields leave the target
/// cell's existing value alone, which lets text overdraw keep the
/// background beneath it.
///
/// # Examples
///
/// ```
/// use lumen_term::cell::Style;
/// use lumen_term::color::{Capability, Rgb};
///
/// let style = Style::new(Capability::TrueColor)
///     .fg(Rgb::new(255, 200, 0))
///     .italic(true);
/// let cell = style.build_cell();
/// assert!(cell.is_italic());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Style {
    capability: Capability,
    fg: Option<ResolvedColor>,
    bg: Option<ResolvedColor>,
    italic: Option<bool>,
    underline: Option<bool>,
}

impl Style {
    /// A style with no fields set, bound to a capability.
    #[inline]
    #[must_use]
    pub const fn new(capability: Capability) -> Self {
        Self {
            capability,
            fg: None,
            bg: None,
            italic: None,
            underline: None,
        }
    }

    /// Set the foreground color (quantized now).
    #[inline]
    #[must_use]
    pub fn fg(mut self, color: Rgb) -> Self {
        self.fg = Some(self.capability.resolve(color));
        self
    }

    /// Set the background color (quantized now).
    #[inline]
    #[must_use]
    pub fn bg(mut self, color: Rgb) -> Self {
        self.bg = Some(self.capability.resolve(color));
        self
    }

    /// Set or clear italic.
    #[inline]
    #[must_use]
    pub const fn italic(mut self, on: bool) -> Self {
        self.italic = Some(on);
        self
    }

    /// Set or clear underline.
    #[inline]
    #[must_use]
    pub const fn underline(mut self, on: bool) -> Self {
        self.underline = Some(on);
        self
    }

    /// Apply the set fields onto an existing cell.
    pub fn apply(&self, cell: &mut Cell) {
        if let Some(fg) = self.fg {
            cell.fg = fg;
        }
        if let Some(bg) = self.bg {
            cell.bg = bg;
        }
        if let Some(on) = self.italic {
            cell.flags.set(StyleFlags::ITALIC, on);
        }
        if let Some(on) = self.underline {
            cell.flags.set(StyleFlags::UNDERLINE, on);
        }
    }

    /// Build a fresh cell: the capability's default with this style
    /// applied.
    #[must_use]
    pub fn build_cell(&self) -> Cell {
        let mut cell = Cell::default_for(self.capability);
        self.apply(&mut cell);
        cell
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
