// SPDX-License-Identifier: MIT
//
// lumen — interactive demo for the lumen-term rendering engine.
//
// A single-line editor with full cursor-key support, surrounded by
// animated shapes that exercise every drawing path: Bresenham lines,
// squashed circles, rectangles, and a braille sine plot. Colors cycle
// with the elapsed clock, so the diff renderer gets a realistic mix of
// churning and static regions every frame.
//
// Keys: type to insert, arrows/Home/End to move, Backspace/Delete to
// edit, Return to clear the line, Ctrl-L to force a repaint, Escape,
// Ctrl-X or Ctrl-C to quit.

use std::process::ExitCode;

use lumen_term::event_loop::{LoopConfig, RenderLoop};
use lumen_term::input::Key;
use lumen_term::text::GraphemeString;
use lumen_term::{BrailleBuffer, Display, Rgb};

/// Map a phase in turns (1.0 = full cycle) onto a color wheel.
fn wheel(phase: f32) -> Rgb {
    let angle = phase * std::f32::consts::TAU;
    let channel = |offset: f32| {
        let v = (angle + offset).sin().mul_add(0.5, 0.5);
        (v * 255.0) as u8
    };
    Rgb::new(
        channel(0.0),
        channel(std::f32::consts::TAU / 3.0),
        channel(2.0 * std::f32::consts::TAU / 3.0),
    )
}

/// A one-line editor over grapheme clusters.
#[derive(Default)]
struct Line {
    text: GraphemeString,
    cursor: usize,
}

impl Line {
    fn insert(&mut self, cluster: &GraphemeString) {
        let tail_len = self.text.len() - self.cursor;
        self.text = self.text.substr(0, self.cursor) + cluster
            + &self.text.substr(self.cursor, tail_len);
        self.cursor += 1;
    }

    fn backspace(&mut self) {
        if self.cursor > 0 {
            let tail_len = self.text.len() - self.cursor;
            self.text =
                self.text.substr(0, self.cursor - 1) + &self.text.substr(self.cursor, tail_len);
            self.cursor -= 1;
        }
    }

    fn delete(&mut self) {
        if self.cursor < self.text.len() {
            let tail_len = self.text.len() - self.cursor - 1;
            self.text = self.text.substr(0, self.cursor)
                + &self.text.substr(self.cursor + 1, tail_len);
        }
    }

    fn clear(&mut self) {
        self.text = GraphemeString::new();
        self.cursor = 0;
    }
}

fn handle_key(line: &mut Line, display: &mut Display, key: &Key) -> bool {
    match key {
        Key::Data(cluster) => line.insert(cluster),
        Key::Return => line.clear(),
        Key::Left => line.cursor = line.cursor.saturating_sub(1),
        Key::Right => line.cursor = (line.cursor + 1).min(line.text.len()),
        Key::Home => line.cursor = 0,
        Key::End => line.cursor = line.text.len(),
        Key::Backspace => line.backspace(),
        Key::Delete => line.delete(),
        Key::Redraw => display.redraw(),
        Key::Cancel | Key::Escape => return false,
        _ => {}
    }
    true
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn paint(display: &mut Display, line: &Line, elapsed_ms: u64) {
    let t = elapsed_ms as f32;
    let base = display.style();

    // Fan of lines sweeping through the color wheel.
    for i in 5..15i32 {
        let style = base.bg(wheel(t / 5000.0 + i as f32 / 20.0));
        display.primitives().line(i, 5, i + 10, 20, style);
    }

    // Concentric circles breathing at different rates.
    for r in 0..7 {
        let radius = (r * 3 + 1) as f32;
        let style = base.bg(wheel(t / (radius * 2000.0)));
        display.primitives().circle(100, 10, radius, style);
    }
    display
        .primitives()
        .filled_rect(95, 5, 105, 15, base.bg(wheel(t / 20000.0)));
    display
        .primitives()
        .rect(95, 5, 105, 15, base.bg(wheel(t / 50000.0)));

    // The editor line and its readouts.
    let text_style = base.fg(Rgb::WHITE).bg(Rgb::BLACK);
    display.primitives().text(5, 10, &line.text, text_style);

    let len_label = GraphemeString::from(format!("{} ", line.text.len()));
    display
        .primitives()
        .text(5, 11, &len_label, text_style.fg(wheel(t / 2000.0)));

    let clock = GraphemeString::from(format!("{elapsed_ms} ms "));
    display.primitives().text(5, 12, &clock, text_style);

    // Per-cluster UTF-8 byte readout, one cluster per row.
    let mut row = 0u16;
    for cluster in line.text.chars().take(16).map(GraphemeString::from) {
        let bytes: Vec<String> = cluster.as_str().bytes().map(|b| b.to_string()).collect();
        let readout = GraphemeString::from(bytes.join(" "));
        display
            .primitives()
            .text(30, row, &readout, text_style.fg(wheel(t / 10000.0)));
        row += 1;
    }

    // Braille sine plot under the shapes, redrawn from dots each frame.
    let mut plot = BrailleBuffer::from_cell_grid(40, 4);
    let height = f32::from(plot.height());
    let mut prev: Option<(i32, i32)> = None;
    for x in 0..plot.width() {
        let phase = f32::from(x) / f32::from(plot.width()) + t / 3000.0;
        let y = (phase * std::f32::consts::TAU).sin().mul_add(height / 2.2, height / 2.0);
        let point = (i32::from(x), y as i32);
        if let Some((px, py)) = prev {
            plot.line(px, py, point.0, point.1);
        }
        prev = Some(point);
    }
    for (i, text_line) in plot.to_lines().into_iter().enumerate() {
        let row_text = GraphemeString::from(text_line);
        display
            .primitives()
            .text(5, 22 + i as u16, &row_text, text_style.fg(wheel(t / 4000.0)));
    }

    display.set_cursor(5 + line.cursor as u16, 10);
    display.show_cursor();
}

fn run() -> lumen_term::Result<()> {
    let render_loop = RenderLoop::new(LoopConfig::default())?;
    let mut line = Line::default();

    render_loop.run(move |display, keys, elapsed_ms| {
        let mut running = true;
        for key in &keys {
            running &= handle_key(&mut line, display, key);
        }

        paint(display, &line, elapsed_ms);
        running
    })
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("lumen: {e}");
            ExitCode::FAILURE
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(line: &mut Line, s: &str) {
        for cluster in GraphemeString::from(s).chars() {
            line.insert(&cluster.into());
        }
    }

    #[test]
    fn insert_moves_cursor() {
        let mut line = Line::default();
        type_str(&mut line, "hej");
        assert_eq!(line.text, "hej");
        assert_eq!(line.cursor, 3);
    }

    #[test]
    fn insert_mid_line() {
        let mut line = Line::default();
        type_str(&mut line, "ab");
        line.cursor = 1;
        type_str(&mut line, "X");
        assert_eq!(line.text, "aXb");
        assert_eq!(line.cursor, 2);
    }

    #[test]
    fn backspace_removes_before_cursor() {
        let mut line = Line::default();
        type_str(&mut line, "abc");
        line.cursor = 2;
        line.backspace();
        assert_eq!(line.text, "ac");
        assert_eq!(line.cursor, 1);
    }

    #[test]
    fn backspace_at_start_is_noop() {
        let mut line = Line::default();
        type_str(&mut line, "a");
        line.cursor = 0;
        line.backspace();
        assert_eq!(line.text, "a");
    }

    #[test]
    fn delete_removes_at_cursor() {
        let mut line = Line::default();
        type_str(&mut line, "abc");
        line.cursor = 1;
        line.delete();
        assert_eq!(line.text, "ac");
        assert_eq!(line.cursor, 1);
    }

    #[test]
    fn delete_at_end_is_noop() {
        let mut line = Line::default();
        type_str(&mut line, "ab");
        line.delete();
        assert_eq!(line.text, "ab");
    }

    #[test]
    fn editing_respects_clusters() {
        let mut line = Line::default();
        type_str(&mut line, "åe\u{0301}ö");
        assert_eq!(line.cursor, 3);
        line.cursor = 2;
        line.backspace();
        assert_eq!(line.text, "åö");
    }

    #[test]
    fn wheel_is_in_range_everywhere() {
        for i in 0..100 {
            let _ = wheel(i as f32 / 7.0);
        }
    }
}
