// SPDX-License-Identifier: MIT
//
// Display — the top of the rendering stack.
//
// Owns the terminal session, the frame buffer the application draws
// into, the diff renderer, and the output buffer. The flow per frame:
//
//   update()  — poll the terminal size, reallocate on resize
//   draw into buffer()/primitives()
//   draw()    — diff, assemble the byte stream, one write to stdout
//
// The frame buffer resets to the fill cell after every presented frame,
// so drawing is immediate-mode: the application paints the full scene
// each frame and the diff layer keeps the actual terminal traffic small.

use crate::ansi;
use crate::buffer::FrameBuffer;
use crate::cell::{Cell, Style};
use crate::color::Capability;
use crate::diff::{DiffRenderer, RenderStats};
use crate::error::Result;
use crate::output::OutputBuffer;
use crate::primitives::Primitives;
use crate::terminal::{Size, Terminal};

/// A full-screen terminal display.
///
/// Construction enters the alternate screen and raw mode; drop restores
/// the terminal, panic included (see [`terminal`](crate::terminal)).
pub struct Display {
    terminal: Terminal,
    capability: Capability,
    buffer: FrameBuffer,
    renderer: DiffRenderer,
    /// Scratch for the diff delta of the current frame.
    frame: OutputBuffer,
    /// The assembled byte stream flushed to stdout.
    out: OutputBuffer,
    cursor: (u16, u16),
    cursor_visible: bool,
}

impl Display {
    /// Take over the terminal: detect color capability, enter the
    /// alternate screen, enable raw input.
    ///
    /// # Errors
    ///
    /// Fails when the terminal cannot be switched into raw mode or the
    /// mode-change escapes cannot be written.
    pub fn new() -> Result<Self> {
        let mut terminal = Terminal::new()?;
        terminal.enter()?;

        let capability = Capability::detect();
        let size = terminal.size();
        let buffer = FrameBuffer::new(size.cols, size.rows, Cell::default_for(capability));

        Ok(Self {
            terminal,
            capability,
            buffer,
            renderer: DiffRenderer::new(),
            frame: OutputBuffer::new(),
            out: OutputBuffer::new(),
            cursor: (0, 0),
            cursor_visible: false,
        })
    }

    /// Detected color capability of this session.
    #[inline]
    #[must_use]
    pub const fn capability(&self) -> Capability {
        self.capability
    }

    /// Current size in cells.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.terminal.size()
    }

    /// Width in columns.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.buffer.width()
    }

    /// Height in rows.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.buffer.height()
    }

    /// Poll the terminal size; on a change, reallocate the frame buffer
    /// and schedule a full repaint. Called once per frame by the render
    /// loop — there is no SIGWINCH handler.
    pub fn update(&mut self) {
        let size = self.terminal.refresh_size();
        if size.cols != self.buffer.width() || size.rows != self.buffer.height() {
            self.buffer = FrameBuffer::new(size.cols, size.rows, Cell::default_for(self.capability));
            self.renderer.force_redraw();
        }
    }

    /// A style builder bound to this display's capability.
    #[inline]
    #[must_use]
    pub const fn style(&self) -> Style {
        Style::new(self.capability)
    }

    /// Drawing primitives over the current frame.
    #[inline]
    pub fn primitives(&mut self) -> Primitives<'_> {
        Primitives::new(&mut self.buffer)
    }

    /// Direct access to the frame buffer.
    #[inline]
    pub fn buffer(&mut self) -> &mut FrameBuffer {
        &mut self.buffer
    }

    // ─── Cursor ───────────────────────────────────────────────────────────

    /// Place the hardware cursor (takes effect at the next draw).
    pub fn set_cursor(&mut self, x: u16, y: u16) {
        self.cursor = (x, y);
    }

    /// Show the hardware cursor at its set position after each draw.
    pub fn show_cursor(&mut self) {
        self.cursor_visible = true;
    }

    /// Keep the hardware cursor hidden.
    pub fn hide_cursor(&mut self) {
        self.cursor_visible = false;
    }

    // ─── Presentation ─────────────────────────────────────────────────────

    /// Invalidate everything: clear the screen and repaint the whole
    /// next frame. Bound to Ctrl-L by convention.
    pub fn redraw(&mut self) {
        self.renderer.force_redraw();
    }

    /// Present the current frame.
    ///
    /// Diffs against the previous frame and, if anything changed, writes
    /// the delta to stdout in a single syscall: cursor hidden up front,
    /// the runs, then the cursor parked at its set position and shown if
    /// requested. When nothing changed, nothing at all is written. The
    /// frame buffer resets to the fill cell either way.
    ///
    /// # Errors
    ///
    /// Propagates stdout write failures.
    pub fn draw(&mut self) -> Result<RenderStats> {
        let stats = self.renderer.render(&self.buffer, &mut self.frame)?;

        if !self.frame.is_empty() {
            ansi::cursor_hide(&mut self.out)?;
            self.frame.flush_to(&mut self.out)?;
            ansi::cursor_to(&mut self.out, self.cursor.0, self.cursor.1)?;
            if self.cursor_visible {
                ansi::cursor_show(&mut self.out)?;
            }
            self.out.flush_stdout()?;
        }

        self.buffer.clear();
        Ok(stats)
    }

    /// Leave the alternate screen and restore the terminal now, instead
    /// of at drop time.
    ///
    /// # Errors
    ///
    /// Propagates terminal restore failures.
    pub fn close(&mut self) -> Result<()> {
        self.terminal.leave()?;
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
