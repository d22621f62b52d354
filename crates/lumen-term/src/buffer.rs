// SPDX-License-Identifier: MIT
//
// FrameBuffer — the virtual terminal grid.
//
// A flat row-major Vec of Cells. Out-of-bounds writes clip silently:
// drawing primitives routinely compute coordinates slightly off-screen
// (circle edges, line endpoints) and erroring on every one of them would
// push bounds checks into every caller.
//
// Dimensions are fixed at construction. A resize discards the buffer and
// allocates a new one — content loss is expected, the next frame repaints.

use crate::cell::Cell;
use crate::error::Error;

/// A width x height grid of cells, row-major.
#[derive(Clone)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    /// The cell every position resets to (white-on-black space, resolved
    /// for the session's capability).
    fill: Cell,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    /// Create a buffer filled with `fill`.
    #[must_use]
    pub fn new(width: u16, height: u16, fill: Cell) -> Self {
        let cells = vec![fill.clone(); usize::from(width) * usize::from(height)];
        Self {
            width,
            height,
            fill,
            cells,
        }
    }

    /// Buffer width in columns.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Buffer height in rows.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// The fill cell positions reset to.
    #[inline]
    #[must_use]
    pub const fn fill_cell(&self) -> &Cell {
        &self.fill
    }

    /// Whether `(x, y)` lies inside the buffer.
    #[inline]
    #[must_use]
    pub const fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> usize {
        usize::from(y) * usize::from(self.width) + usize::from(x)
    }

    /// The cell at `(x, y)`, or `None` when out of bounds.
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            self.cells.get(idx)
        } else {
            None
        }
    }

    /// The cell at `(x, y)`, with a named error for bad coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] when `(x, y)` lies outside the
    /// buffer. The drawing path uses [`set`](Self::set) and clips
    /// instead; this is for callers that want the failure surfaced.
    pub fn cell_at(&self, x: u16, y: u16) -> Result<&Cell, Error> {
        self.get(x, y).ok_or(Error::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        })
    }

    /// Write a cell at `(x, y)`. Out-of-bounds writes are clipped.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            self.cells[idx] = cell;
        }
    }

    /// One row of cells as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `y` is out of bounds — rows are iterated by the
    /// renderer which already knows the height.
    #[must_use]
    pub fn row(&self, y: u16) -> &[Cell] {
        assert!(y < self.height, "row {y} out of bounds");
        let start = self.index(0, y);
        &self.cells[start..start + usize::from(self.width)]
    }

    /// Reset every cell to the fill cell.
    pub fn clear(&mut self) {
        self.cells.fill(self.fill.clone());
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::StyleFlags;

    fn buffer(w: u16, h: u16) -> FrameBuffer {
        FrameBuffer::new(w, h, Cell::default())
    }

    // ── Construction ─────────────────────────────────────────────────────

    #[test]
    fn new_buffer_is_filled() {
        let buf = buffer(4, 3);
        assert_eq!(buf.width(), 4);
        assert_eq!(buf.height(), 3);
        for y in 0..3 {
            for x in 0..4 {
                assert_eq!(buf.get(x, y), Some(&Cell::default()));
            }
        }
    }

    #[test]
    fn zero_sized_buffer() {
        let buf = buffer(0, 0);
        assert!(buf.get(0, 0).is_none());
    }

    // ── Bounds ───────────────────────────────────────────────────────────

    #[test]
    fn in_bounds_edges() {
        let buf = buffer(10, 5);
        assert!(buf.in_bounds(0, 0));
        assert!(buf.in_bounds(9, 4));
        assert!(!buf.in_bounds(10, 4));
        assert!(!buf.in_bounds(9, 5));
    }

    #[test]
    fn set_out_of_bounds_clips_silently() {
        let mut buf = buffer(2, 2);
        buf.set(5, 5, Cell::new("x"));
        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(buf.get(x, y), Some(&Cell::default()));
            }
        }
    }

    #[test]
    fn get_out_of_bounds_is_none() {
        let buf = buffer(2, 2);
        assert!(buf.get(2, 0).is_none());
        assert!(buf.get(0, 2).is_none());
    }

    #[test]
    fn cell_at_reports_extents() {
        let buf = buffer(3, 2);
        let err = buf.cell_at(7, 1).unwrap_err();
        match err {
            Error::OutOfBounds {
                x,
                y,
                width,
                height,
            } => {
                assert_eq!((x, y), (7, 1));
                assert_eq!((width, height), (3, 2));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    // ── Set / Get ────────────────────────────────────────────────────────

    #[test]
    fn set_then_get() {
        let mut buf = buffer(3, 3);
        let cell = Cell::new("Q").with_flags(StyleFlags::ITALIC);
        buf.set(2, 1, cell.clone());
        assert_eq!(buf.get(2, 1), Some(&cell));
        assert_eq!(buf.get(1, 2), Some(&Cell::default()));
    }

    #[test]
    fn row_slices_are_row_major() {
        let mut buf = buffer(3, 2);
        buf.set(0, 1, Cell::new("a"));
        buf.set(2, 1, Cell::new("b"));

        let row = buf.row(1);
        assert_eq!(row.len(), 3);
        assert_eq!(row[0].text, "a");
        assert_eq!(row[1], Cell::default());
        assert_eq!(row[2].text, "b");
    }

    // ── Clear ────────────────────────────────────────────────────────────

    #[test]
    fn clear_restores_fill() {
        let mut buf = buffer(2, 2);
        buf.set(0, 0, Cell::new("x"));
        buf.set(1, 1, Cell::new("y"));
        buf.clear();
        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(buf.get(x, y), Some(&Cell::default()));
            }
        }
    }

    #[test]
    fn clear_keeps_custom_fill() {
        let fill = Cell::new("~").with_flags(StyleFlags::UNDERLINE);
        let mut buf = FrameBuffer::new(2, 1, fill.clone());
        buf.set(0, 0, Cell::new("x"));
        buf.clear();
        assert_eq!(buf.get(0, 0), Some(&fill));
    }
}
