// SPDX-License-Identifier: MIT
//
// Sub-cell plotting with braille patterns.
//
// The Unicode braille block (U+2800..U+28FF) encodes every combination of
// a 2x4 dot grid in a single character, giving 2x horizontal and 4x
// vertical resolution over plain cells. A `BrailleBuffer` is a plain dot
// bitmap; `to_lines` packs each 2x4 tile into its braille codepoint.
//
// Dot-to-bit mapping (Unicode braille numbering):
//
//   bit 0x01 0x08        row 0
//       0x02 0x10        row 1
//       0x04 0x20        row 2
//       0x40 0x80        row 3
//     col 0  col 1

use crate::primitives::{bresenham, circle_path};

/// Segments for braille-resolution circles. Dots are fine enough that 16
/// chords already read as round.
const CIRCLE_SEGMENTS: u16 = 16;

/// A monochrome dot bitmap rendered as braille characters.
///
/// Coordinates are in *dots*. A buffer covering `cols x rows` terminal
/// cells has `cols * 2` x `rows * 4` dots.
#[derive(Clone)]
pub struct BrailleBuffer {
    width: u16,
    height: u16,
    dots: Vec<bool>,
}

impl BrailleBuffer {
    /// Create an empty bitmap of `width` x `height` dots.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            dots: vec![false; usize::from(width) * usize::from(height)],
        }
    }

    /// Create a bitmap sized to cover a grid of terminal cells.
    #[must_use]
    pub fn from_cell_grid(cols: u16, rows: u16) -> Self {
        Self::new(cols * 2, rows * 4)
    }

    /// Bitmap width in dots.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Bitmap height in dots.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> usize {
        usize::from(y) * usize::from(self.width) + usize::from(x)
    }

    /// Set or clear the dot at `(x, y)`. Out-of-bounds dots are clipped.
    pub fn set(&mut self, x: u16, y: u16, on: bool) {
        if x < self.width && y < self.height {
            let idx = self.index(x, y);
            self.dots[idx] = on;
        }
    }

    /// Whether the dot at `(x, y)` is set. Out of bounds reads as unset.
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> bool {
        if x < self.width && y < self.height {
            self.dots[self.index(x, y)]
        } else {
            false
        }
    }

    /// Clear every dot.
    pub fn clear(&mut self) {
        self.dots.fill(false);
    }

    /// Plot a line of dots between two dot coordinates.
    pub fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        bresenham(x0, y0, x1, y1, |x, y| self.set(x, y, true));
    }

    /// Plot a circle of dots. Dots are square-ish, so the default aspect
    /// is 1.0 — no squash.
    pub fn circle(&mut self, cx: f32, cy: f32, radius: f32) {
        self.circle_with_aspect(cx, cy, radius, 1.0);
    }

    /// Plot a circle with an explicit y scale.
    pub fn circle_with_aspect(&mut self, cx: f32, cy: f32, radius: f32, aspect: f32) {
        circle_path(cx, cy, radius, CIRCLE_SEGMENTS, aspect, |x, y| {
            self.set(x, y, true);
        });
    }

    /// Pack the bitmap into lines of braille characters, one string per
    /// 4-dot row band. Partial tiles at odd edges pack with their missing
    /// dots unset.
    #[must_use]
    pub fn to_lines(&self) -> Vec<String> {
        let cols = usize::from(self.width).div_ceil(2);
        let bands = usize::from(self.height).div_ceil(4);
        let mut lines = Vec::with_capacity(bands);

        for band in 0..bands {
            let mut values = vec![0u8; cols];

            for yc in 0..4u16 {
                #[allow(clippy::cast_possible_truncation)]
                let y = band as u16 * 4 + yc;
                if y >= self.height {
                    break;
                }

                for x in 0..self.width {
                    if !self.get(x, y) {
                        continue;
                    }
                    let bit = if yc == 3 {
                        0x40 << (x % 2)
                    } else {
                        (1 << ((x % 2) * 3)) << yc
                    };
                    values[usize::from(x / 2)] |= bit as u8;
                }
            }

            lines.push(
                values
                    .into_iter()
                    .map(|v| {
                        // 0x2800 + v is always inside the braille block.
                        char::from_u32(0x2800 + u32::from(v)).unwrap_or('\u{2800}')
                    })
                    .collect(),
            );
        }

        lines
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ── Dots ────────────────────────────────────────────────────────────

    #[test]
    fn set_and_get() {
        let mut buf = BrailleBuffer::new(4, 4);
        assert!(!buf.get(1, 2));
        buf.set(1, 2, true);
        assert!(buf.get(1, 2));
        buf.set(1, 2, false);
        assert!(!buf.get(1, 2));
    }

    #[test]
    fn out_of_bounds_clips() {
        let mut buf = BrailleBuffer::new(2, 2);
        buf.set(10, 10, true);
        assert!(!buf.get(10, 10));
    }

    #[test]
    fn from_cell_grid_scales_dimensions() {
        let buf = BrailleBuffer::from_cell_grid(10, 5);
        assert_eq!(buf.width(), 20);
        assert_eq!(buf.height(), 20);
    }

    #[test]
    fn clear_resets_all_dots() {
        let mut buf = BrailleBuffer::new(4, 4);
        buf.set(0, 0, true);
        buf.set(3, 3, true);
        buf.clear();
        assert_eq!(buf.to_lines(), vec!["\u{2800}\u{2800}"]);
    }

    // ── Packing ─────────────────────────────────────────────────────────

    #[test]
    fn empty_tile_packs_to_blank_pattern() {
        let buf = BrailleBuffer::new(2, 4);
        assert_eq!(buf.to_lines(), vec!["\u{2800}"]);
    }

    #[test]
    fn full_tile_packs_to_full_pattern() {
        let mut buf = BrailleBuffer::new(2, 4);
        for y in 0..4 {
            for x in 0..2 {
                buf.set(x, y, true);
            }
        }
        assert_eq!(buf.to_lines(), vec!["\u{28ff}"]);
    }

    #[test]
    fn individual_dot_bits() {
        // (x, y, expected bit) for every dot in one tile.
        let cases = [
            (0, 0, 0x01),
            (0, 1, 0x02),
            (0, 2, 0x04),
            (1, 0, 0x08),
            (1, 1, 0x10),
            (1, 2, 0x20),
            (0, 3, 0x40),
            (1, 3, 0x80),
        ];
        for (x, y, bit) in cases {
            let mut buf = BrailleBuffer::new(2, 4);
            buf.set(x, y, true);
            let expected = char::from_u32(0x2800 + bit).unwrap().to_string();
            assert_eq!(buf.to_lines(), vec![expected], "dot ({x}, {y})");
        }
    }

    #[test]
    fn tiles_pack_independently() {
        let mut buf = BrailleBuffer::new(4, 8);
        buf.set(0, 0, true); // tile (0, 0): bit 0x01
        buf.set(3, 7, true); // tile (1, 1): col 1 row 3 -> 0x80
        assert_eq!(
            buf.to_lines(),
            vec!["\u{2801}\u{2800}".to_owned(), "\u{2800}\u{2880}".to_owned()]
        );
    }

    #[test]
    fn odd_width_rounds_up_to_partial_tile() {
        let mut buf = BrailleBuffer::new(3, 4);
        buf.set(2, 0, true); // third dot column: second char, col 0
        let lines = buf.to_lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].chars().count(), 2);
        assert_eq!(lines[0].chars().nth(1), Some('\u{2801}'));
    }

    #[test]
    fn odd_height_rounds_up_to_partial_band() {
        let mut buf = BrailleBuffer::new(2, 6);
        buf.set(0, 5, true); // second band, row 1 -> bit 0x02
        let lines = buf.to_lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "\u{2802}");
    }

    // ── Plotting ────────────────────────────────────────────────────────

    #[test]
    fn line_sets_dots_along_path() {
        let mut buf = BrailleBuffer::new(8, 4);
        buf.line(0, 0, 7, 0);
        for x in 0..8 {
            assert!(buf.get(x, 0));
        }
        for x in 0..8 {
            assert!(!buf.get(x, 1));
        }
    }

    #[test]
    fn diagonal_line_renders_as_expected_patterns() {
        let mut buf = BrailleBuffer::new(4, 4);
        buf.line(0, 0, 3, 3);
        // Dots (0,0) (1,1) (2,2) (3,3):
        //   char 0: 0x01 | 0x10 = 0x11
        //   char 1: 0x04 | 0x80 = 0x84
        assert_eq!(buf.to_lines(), vec!["\u{2811}\u{2884}"]);
    }

    #[test]
    fn circle_dots_stay_near_ring() {
        let mut buf = BrailleBuffer::new(40, 40);
        buf.circle(20.0, 20.0, 10.0);

        let mut set_count = 0;
        for y in 0..40 {
            for x in 0..40 {
                if buf.get(x, y) {
                    set_count += 1;
                    let dx = f32::from(x) - 20.0;
                    let dy = f32::from(y) - 20.0;
                    let dist = (dx * dx + dy * dy).sqrt();
                    assert!((dist - 10.0).abs() <= 1.8, "({x}, {y}) at {dist}");
                }
            }
        }
        assert!(set_count >= 20);
    }
}
