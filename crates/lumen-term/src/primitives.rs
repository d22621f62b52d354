// SPDX-License-Identifier: MIT
//
// Drawing primitives over a FrameBuffer.
//
// Path generation (Bresenham, circle approximation) is split out as free
// functions taking a callback, so the braille plotter can reuse the same
// math at dot resolution. The `Primitives` wrapper binds the paths to a
// buffer and a style.
//
// Shapes paint with the style's *background*: each plotted cell is the
// style's default cell (a styled space), so a line is a colored streak
// rather than a trail of glyphs. Text instead layers onto whatever is
// already in the buffer — drawing a label over a filled rect keeps the
// rect's background unless the style overrides it.

use crate::buffer::FrameBuffer;
use crate::cell::Style;
use crate::text::GraphemeString;

/// Segments used to approximate a circle outline at cell resolution.
const CIRCLE_SEGMENTS: u16 = 32;

/// Default vertical squash for cell-resolution circles. Terminal cells
/// are roughly twice as tall as wide, so a round circle needs its y
/// extent halved.
pub const CELL_ASPECT: f32 = 0.5;

// ─── Path Generation ─────────────────────────────────────────────────────────

/// Bresenham line from `(x0, y0)` to `(x1, y1)`, invoking `plot` for each
/// point. Coordinates may be negative; points in the negative quadrants
/// are skipped, positive overshoot is left to the plotting target to clip.
pub fn bresenham(mut x0: i32, mut y0: i32, mut x1: i32, mut y1: i32, mut plot: impl FnMut(u16, u16)) {
    // Normalize to a shallow left-to-right line, flagging the transposes.
    let steep = (x0 - x1).abs() < (y0 - y1).abs();
    if steep {
        std::mem::swap(&mut x0, &mut y0);
        std::mem::swap(&mut x1, &mut y1);
    }
    if x0 > x1 {
        std::mem::swap(&mut x0, &mut x1);
        std::mem::swap(&mut y0, &mut y1);
    }

    let dx = x1 - x0;
    let dy = y1 - y0;
    let derror = dy.abs() * 2;
    let step = if y1 > y0 { 1 } else { -1 };

    let mut error = 0;
    let mut y = y0;

    for x in x0..=x1 {
        if x >= 0 && y >= 0 {
            let (px, py) = if steep { (y, x) } else { (x, y) };
            #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
            plot(px as u16, py as u16);
        }

        error += derror;
        if error > dx {
            y += step;
            error -= dx * 2;
        }
    }
}

/// Approximate a circle as `segments` chords, tracing each with
/// [`bresenham`]. `aspect` scales the y radius (see [`CELL_ASPECT`]).
pub fn circle_path(
    cx: f32,
    cy: f32,
    radius: f32,
    segments: u16,
    aspect: f32,
    mut plot: impl FnMut(u16, u16),
) {
    let detail = f32::from(segments);
    for i in 0..segments {
        let a0 = f32::from(i) / detail * std::f32::consts::TAU;
        let a1 = f32::from(i + 1) / detail * std::f32::consts::TAU;

        let x0 = radius.mul_add(a0.cos(), cx);
        let y0 = (radius * aspect).mul_add(a0.sin(), cy);
        let x1 = radius.mul_add(a1.cos(), cx);
        let y1 = (radius * aspect).mul_add(a1.sin(), cy);

        #[allow(clippy::cast_possible_truncation)]
        bresenham(
            x0.round() as i32,
            y0.round() as i32,
            x1.round() as i32,
            y1.round() as i32,
            &mut plot,
        );
    }
}

// ─── Primitives ──────────────────────────────────────────────────────────────

/// Drawing operations bound to a frame buffer.
///
/// Obtained from [`Display::primitives`](crate::display::Display::primitives),
/// or constructed directly over a bare buffer in tests.
pub struct Primitives<'a> {
    buffer: &'a mut FrameBuffer,
}

impl<'a> Primitives<'a> {
    #[must_use]
    pub fn new(buffer: &'a mut FrameBuffer) -> Self {
        Self { buffer }
    }

    /// Write `text` starting at `(x, y)`, one column per grapheme
    /// cluster. Clips at the right edge and ignores rows off-screen.
    ///
    /// The style is applied on top of each existing cell, so unset style
    /// fields preserve whatever background or flags are already there.
    pub fn text(&mut self, x: u16, y: u16, text: &GraphemeString, style: Style) {
        if y >= self.buffer.height() {
            return;
        }

        for (i, cluster) in text.chars().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let col = x.saturating_add(i as u16);
            if col >= self.buffer.width() {
                return;
            }

            let Some(existing) = self.buffer.get(col, y) else {
                return;
            };
            let mut cell = existing.clone();
            style.apply(&mut cell);
            cell.text = cluster.into();
            self.buffer.set(col, y, cell);
        }
    }

    /// Draw a line of styled cells between two points. Endpoints may lie
    /// off-screen; the visible portion is drawn.
    pub fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, style: Style) {
        let cell = style.build_cell();
        bresenham(x0, y0, x1, y1, |x, y| {
            self.buffer.set(x, y, cell.clone());
        });
    }

    /// Draw a circle outline with the default terminal aspect
    /// ([`CELL_ASPECT`]).
    pub fn circle(&mut self, cx: u16, cy: u16, radius: f32, style: Style) {
        self.circle_with_aspect(cx, cy, radius, CELL_ASPECT, style);
    }

    /// Draw a circle outline with an explicit y squash factor.
    pub fn circle_with_aspect(&mut self, cx: u16, cy: u16, radius: f32, aspect: f32, style: Style) {
        let cell = style.build_cell();
        circle_path(
            f32::from(cx),
            f32::from(cy),
            radius,
            CIRCLE_SEGMENTS,
            aspect,
            |x, y| {
                self.buffer.set(x, y, cell.clone());
            },
        );
    }

    /// Draw a rectangle outline between two corners (any orientation).
    pub fn rect(&mut self, x0: u16, y0: u16, x1: u16, y1: u16, style: Style) {
        let cell = style.build_cell();
        let (x0, x1) = (x0.min(x1), x0.max(x1));
        let (y0, y1) = (y0.min(y1), y0.max(y1));

        for x in x0..=x1 {
            self.buffer.set(x, y0, cell.clone());
            self.buffer.set(x, y1, cell.clone());
        }
        for y in y0..=y1 {
            self.buffer.set(x0, y, cell.clone());
            self.buffer.set(x1, y, cell.clone());
        }
    }

    /// Fill a rectangle between two corners (any orientation).
    pub fn filled_rect(&mut self, x0: u16, y0: u16, x1: u16, y1: u16, style: Style) {
        let cell = style.build_cell();
        let (x0, x1) = (x0.min(x1), x0.max(x1));
        let (y0, y1) = (y0.min(y1), y0.max(y1));

        for y in y0..=y1 {
            for x in x0..=x1 {
                self.buffer.set(x, y, cell.clone());
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
