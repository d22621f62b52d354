// SPDX-License-Identifier: MIT
//
// Differential renderer.
//
// Compares the frame being presented against the previously presented
// frame and emits ANSI bytes only for cells that changed. Contiguous dirty
// cells form runs; runs on the same row separated by a small gap of clean
// cells are merged, because re-emitting a handful of unchanged cells is
// cheaper than a cursor-position escape.
//
// Within a run, SGR state is tracked cell to cell: italic and underline
// are toggled only when they flip, colors re-emitted only when they
// differ from the previous cell in the run. Each run starts from a known
// state via SGR 0.

use std::io::{self, Write};

use crate::ansi;
use crate::buffer::FrameBuffer;
use crate::cell::Cell;

/// Maximum number of clean cells between two dirty runs that still get
/// absorbed into one run. A cursor-position escape costs at least 6
/// bytes; re-painting up to this many unchanged cells costs less.
const GAP_THRESHOLD: u16 = 4;

// ─── Render Stats ────────────────────────────────────────────────────────────

/// Counters from a single render pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Cells that compared unequal to the previous frame.
    pub dirty_cells: usize,
    /// Runs emitted after gap merging (one cursor move each).
    pub runs: usize,
    /// Rows containing at least one dirty cell.
    pub dirty_rows: usize,
}

// ─── DiffRenderer ────────────────────────────────────────────────────────────

/// Double-buffered diff engine.
///
/// Holds the last presented frame. When there is no previous frame (first
/// render, after a resize, or after [`force_redraw`](Self::force_redraw))
/// every cell is compared against the buffer's fill cell, so anything the
/// application drew gets painted onto the freshly cleared screen.
pub struct DiffRenderer {
    previous: Option<FrameBuffer>,
    pending_clear: bool,
}

impl DiffRenderer {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            previous: None,
            pending_clear: false,
        }
    }

    /// Drop the previous frame and clear the screen on the next render.
    ///
    /// Used on resize and on an explicit application redraw request, when
    /// whatever is on screen can no longer be trusted.
    pub fn force_redraw(&mut self) {
        self.previous = None;
        self.pending_clear = true;
    }

    /// Whether a previous frame is held.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    /// Diff `current` against the stored frame and write the delta to `w`.
    ///
    /// When nothing changed, nothing is written — not even a cursor move.
    /// Afterwards `current` is stored as the new previous frame.
    ///
    /// # Errors
    ///
    /// Propagates write errors from `w`.
    pub fn render(&mut self, current: &FrameBuffer, w: &mut impl Write) -> io::Result<RenderStats> {
        if self.pending_clear {
            ansi::clear_screen(w)?;
            self.pending_clear = false;
        }

        // A stored frame with different dimensions is useless.
        let previous = self.previous.take().filter(|p| {
            p.width() == current.width() && p.height() == current.height()
        });

        let mut stats = RenderStats::default();

        for y in 0..current.height() {
            let row = current.row(y);
            let runs = dirty_runs(row, previous.as_ref().map(|p| p.row(y)), current.fill_cell());
            if runs.is_empty() {
                continue;
            }
            stats.dirty_rows += 1;
            stats.runs += runs.len();

            for run in runs {
                stats.dirty_cells += run.dirty;
                emit_run(w, row, run.start, run.end, y)?;
            }
        }

        self.previous = Some(current.clone());
        Ok(stats)
    }
}

impl Default for DiffRenderer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Run Detection ───────────────────────────────────────────────────────────

struct Run {
    /// First column of the run (inclusive).
    start: u16,
    /// One past the last column.
    end: u16,
    /// Dirty cells inside the run (merged gaps are not dirty).
    dirty: usize,
}

/// Find dirty spans in a row and merge spans whose gap is at most
/// [`GAP_THRESHOLD`] clean cells.
fn dirty_runs(row: &[Cell], prev_row: Option<&[Cell]>, fill: &Cell) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();

    for (x, cell) in row.iter().enumerate() {
        let reference = prev_row.map_or(fill, |p| &p[x]);
        if cell == reference {
            continue;
        }

        #[allow(clippy::cast_possible_truncation)]
        let x = x as u16;
        match runs.last_mut() {
            Some(last) if x - last.end <= GAP_THRESHOLD => {
                last.end = x + 1;
                last.dirty += 1;
            }
            _ => runs.push(Run {
                start: x,
                end: x + 1,
                dirty: 1,
            }),
        }
    }

    runs
}

// ─── Emission ────────────────────────────────────────────────────────────────

/// Emit one run: reset SGR state, position the cursor, then write each
/// cell with style deltas relative to its predecessor in the run.
fn emit_run(w: &mut impl Write, row: &[Cell], start: u16, end: u16, y: u16) -> io::Result<()> {
    ansi::reset(w)?;
    ansi::cursor_to(w, start, y)?;

    let mut prev: Option<&Cell> = None;
    for cell in &row[usize::from(start)..usize::from(end)] {
        // After SGR 0 the implied state is: not italic, not underlined,
        // terminal default colors. Colors always need establishing for
        // the first cell; toggles only when they flip.
        if prev.is_some_and(Cell::is_italic) != cell.is_italic() {
            ansi::italic(w, cell.is_italic())?;
        }
        if prev.is_some_and(Cell::is_underline) != cell.is_underline() {
            ansi::underline(w, cell.is_underline())?;
        }
        if prev.is_none_or(|p| p.fg != cell.fg) {
            ansi::fg(w, cell.fg)?;
        }
        if prev.is_none_or(|p| p.bg != cell.bg) {
            ansi::bg(w, cell.bg)?;
        }

        write_cell_text(w, cell)?;
        prev = Some(cell);
    }

    Ok(())
}

/// Write a cell's text, substituting a Control Pictures glyph (U+2400
/// block) for a bare C0 control character so it can never corrupt the
/// byte stream.
fn write_cell_text(w: &mut impl Write, cell: &Cell) -> io::Result<()> {
    let bytes = cell.text.as_str().as_bytes();
    if let [c @ 0x00..=0x1f] = bytes {
        let pictured = char::from_u32(0x2400 + u32::from(*c)).unwrap_or('\u{fffd}');
        let mut utf8 = [0u8; 4];
        return w.write_all(pictured.encode_utf8(&mut utf8).as_bytes());
    }
    w.write_all(bytes)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
