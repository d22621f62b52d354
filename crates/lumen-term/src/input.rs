// SPDX-License-Identifier: MIT
//
// Key events and the escape-sequence parser.
//
// Raw-mode stdin delivers an undifferentiated byte stream: control bytes,
// CSI escape sequences (possibly split across reads), and UTF-8 text
// (also possibly split). `Parser` is a push-based state machine over that
// stream. Feed it chunks with `advance`; call `flush` when the stream has
// gone quiet to resolve a dangling ESC that will never become a sequence.
//
// The split matters: a cursor key whose `ESC [ A` bytes arrive in two
// reads must still parse as one `Key::Up`, while a human pressing the
// Escape key sends a lone ESC that only a timeout can disambiguate. The
// reader thread provides that timeout; the parser never guesses on its
// own.

use std::sync::Mutex;

use crate::text::GraphemeString;

// ─── Key ─────────────────────────────────────────────────────────────────────

/// A decoded input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// Printable text, one grapheme cluster per event.
    Data(GraphemeString),
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Backspace,
    Delete,
    Escape,
    Return,
    Tab,
    ShiftTab,
    /// Ctrl-X — conventional "abort the current operation".
    Cancel,
    /// Ctrl-L — ask the application for a full repaint.
    Redraw,
}

impl Key {
    /// The text payload, if this is a data key.
    #[must_use]
    pub const fn data(&self) -> Option<&GraphemeString> {
        match self {
            Self::Data(s) => Some(s),
            _ => None,
        }
    }
}

// ─── Parser ──────────────────────────────────────────────────────────────────

/// CSI parameter digits. Three is enough for every sequence we decode;
/// longer parameters mark the sequence as unknown.
const MAX_DIGITS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Plain bytes: controls and text.
    Normal,
    /// One or more consecutive ESC bytes seen, no `[` yet.
    Escapes(u8),
    /// Inside `ESC [`, collecting parameter digits.
    Bracket {
        /// ESC bytes that opened the sequence (`ESC ESC [ D` is Home).
        escapes: u8,
        digits: [u8; MAX_DIGITS],
        digit_count: u8,
        /// A parameter overflowed or contained junk; swallow to the
        /// terminator and emit nothing.
        broken: bool,
    },
}

/// Push-based decoder from raw bytes to [`Key`] events.
///
/// State survives across [`advance`](Self::advance) calls, so sequences
/// split across reads reassemble. [`flush`](Self::flush) resolves
/// whatever is pending into its read-boundary meaning — a bare ESC
/// becomes [`Key::Escape`].
pub struct Parser {
    state: State,
    /// Accumulated text bytes, possibly an incomplete UTF-8 tail.
    pending: Vec<u8>,
}

impl Parser {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: State::Normal,
            pending: Vec::new(),
        }
    }

    /// Whether an unresolved escape or incomplete text tail is held.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.state != State::Normal || !self.pending.is_empty()
    }

    /// Feed one chunk of raw bytes, returning the keys decoded so far.
    pub fn advance(&mut self, bytes: &[u8]) -> Vec<Key> {
        let mut keys = Vec::new();
        for &b in bytes {
            self.step(b, &mut keys);
        }
        self.commit_text(&mut keys);
        keys
    }

    /// Resolve pending escape state at a read-boundary timeout.
    ///
    /// A held ESC that never grew into a sequence was the Escape key;
    /// an unterminated `ESC [` is abandoned the same way. Incomplete
    /// UTF-8 text stays pending — its remaining bytes may still arrive.
    pub fn flush(&mut self) -> Vec<Key> {
        let mut keys = Vec::new();
        match self.state {
            State::Normal => {}
            State::Escapes(n) | State::Bracket { escapes: n, .. } => {
                for _ in 0..n {
                    keys.push(Key::Escape);
                }
            }
        }
        self.state = State::Normal;
        keys
    }

    fn step(&mut self, b: u8, keys: &mut Vec<Key>) {
        match self.state {
            State::Normal => self.step_normal(b, keys),
            State::Escapes(n) => self.step_escapes(n, b, keys),
            State::Bracket {
                escapes,
                digits,
                digit_count,
                broken,
            } => self.step_bracket(escapes, digits, digit_count, broken, b, keys),
        }
    }

    /// Single-byte controls recognized in every state, ahead of escape
    /// processing.
    const fn control_key(b: u8) -> Option<Key> {
        match b {
            0x7f => Some(Key::Backspace),
            0x0a | 0x0d => Some(Key::Return),
            0x09 => Some(Key::Tab),
            0x18 => Some(Key::Cancel),
            0x0c => Some(Key::Redraw),
            _ => None,
        }
    }

    fn step_normal(&mut self, b: u8, keys: &mut Vec<Key>) {
        if b == 0x1b {
            self.commit_text(keys);
            self.state = State::Escapes(1);
            return;
        }

        if let Some(key) = Self::control_key(b) {
            self.commit_text(keys);
            keys.push(key);
        } else {
            self.pending.push(b);
        }
    }

    fn step_escapes(&mut self, n: u8, b: u8, keys: &mut Vec<Key>) {
        match b {
            0x1b => self.state = State::Escapes(n.saturating_add(1)),
            b'[' => {
                self.state = State::Bracket {
                    escapes: n,
                    digits: [0; MAX_DIGITS],
                    digit_count: 0,
                    broken: false,
                };
            }
            _ => {
                // ESC followed by an unrelated byte: the escapes resolve
                // now, and the byte is reprocessed as plain input.
                for _ in 0..n {
                    keys.push(Key::Escape);
                }
                self.state = State::Normal;
                self.step(b, keys);
            }
        }
    }

    fn step_bracket(
        &mut self,
        escapes: u8,
        mut digits: [u8; MAX_DIGITS],
        digit_count: u8,
        broken: bool,
        b: u8,
        keys: &mut Vec<Key>,
    ) {
        // Controls stay recognizable even mid-sequence: a Return landing
        // inside an open `ESC [` abandons the sequence, it does not get
        // eaten by it. A fresh ESC likewise restarts escape parsing, so
        // an unterminated sequence cannot poison the one after it.
        if let Some(key) = Self::control_key(b) {
            self.state = State::Normal;
            self.commit_text(keys);
            keys.push(key);
            return;
        }
        if b == 0x1b {
            self.state = State::Escapes(1);
            return;
        }

        if b.is_ascii_digit() {
            let mut broken = broken;
            if usize::from(digit_count) < MAX_DIGITS {
                digits[usize::from(digit_count)] = b - b'0';
            } else {
                broken = true;
            }
            self.state = State::Bracket {
                escapes,
                digits,
                digit_count: digit_count.saturating_add(1).min(MAX_DIGITS as u8 + 1),
                broken,
            };
            return;
        }

        self.state = State::Normal;
        if broken {
            return;
        }

        self.commit_text(keys);
        let key = match b {
            b'A' => Some(Key::Up),
            b'B' => Some(Key::Down),
            // Doubled ESC before the bracket rebinds the horizontal
            // cursor keys to line extremes: ESC ESC [ D is Home,
            // ESC ESC [ C is End.
            b'C' => Some(if escapes == 2 { Key::End } else { Key::Right }),
            b'D' => Some(if escapes == 2 { Key::Home } else { Key::Left }),
            b'Z' => Some(Key::ShiftTab),
            b'~' => match param(&digits, digit_count) {
                Some(1) => Some(Key::Home),
                Some(3) => Some(Key::Delete),
                Some(4) => Some(Key::End),
                _ => None,
            },
            // Unknown terminator: swallow the sequence.
            _ => None,
        };

        if let Some(key) = key {
            keys.push(key);
        }
    }

    /// If the pending bytes form valid UTF-8, emit one `Data` key per
    /// grapheme cluster. An incomplete tail stays buffered.
    fn commit_text(&mut self, keys: &mut Vec<Key>) {
        if self.pending.is_empty() || !GraphemeString::is_valid_utf8(&self.pending) {
            return;
        }

        if let Ok(text) = GraphemeString::from_bytes(&self.pending) {
            for cluster in text.chars() {
                keys.push(Key::Data(cluster.into()));
            }
        }
        self.pending.clear();
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

fn param(digits: &[u8; MAX_DIGITS], digit_count: u8) -> Option<u16> {
    let count = usize::from(digit_count);
    if count == 0 || count > MAX_DIGITS {
        return None;
    }
    let mut value: u16 = 0;
    for &d in &digits[..count] {
        value = value * 10 + u16::from(d);
    }
    Some(value)
}

// ─── Event Queue ─────────────────────────────────────────────────────────────

/// Thread-safe key queue between the reader thread and the render loop.
///
/// The consumer drains by swapping the whole vector out under the lock,
/// so the critical section is a pointer swap regardless of queue depth.
#[derive(Default)]
pub struct EventQueue {
    keys: Mutex<Vec<Key>>,
}

impl EventQueue {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            keys: Mutex::new(Vec::new()),
        }
    }

    /// Append one key.
    pub fn push(&self, key: Key) {
        self.lock().push(key);
    }

    /// Append a batch of keys.
    pub fn extend(&self, keys: Vec<Key>) {
        if !keys.is_empty() {
            self.lock().extend(keys);
        }
    }

    /// Take everything queued since the last drain, in arrival order.
    #[must_use]
    pub fn drain(&self) -> Vec<Key> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Key>> {
        // A poisoned queue only means the reader thread panicked while
        // pushing; the data itself is still a valid Vec.
        self.keys.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(bytes: &[u8]) -> Vec<Key> {
        Parser::new().advance(bytes)
    }

    fn data(s: &str) -> Key {
        Key::Data(GraphemeString::from(s))
    }

    // ── Control Bytes ───────────────────────────────────────────────────

    #[test]
    fn control_bytes_decode_directly() {
        assert_eq!(keys(&[0x7f]), vec![Key::Backspace]);
        assert_eq!(keys(&[0x0a]), vec![Key::Return]);
        assert_eq!(keys(&[0x09]), vec![Key::Tab]);
        assert_eq!(keys(&[0x18]), vec![Key::Cancel]);
        assert_eq!(keys(&[0x0c]), vec![Key::Redraw]);
    }

    #[test]
    fn carriage_return_is_return() {
        assert_eq!(keys(&[0x0d]), vec![Key::Return]);
    }

    #[test]
    fn control_between_text_preserves_order() {
        assert_eq!(
            keys(b"a\x7fb"),
            vec![data("a"), Key::Backspace, data("b")]
        );
    }

    // ── CSI Sequences ───────────────────────────────────────────────────

    #[test]
    fn arrow_keys() {
        assert_eq!(keys(b"\x1b[A"), vec![Key::Up]);
        assert_eq!(keys(b"\x1b[B"), vec![Key::Down]);
        assert_eq!(keys(b"\x1b[C"), vec![Key::Right]);
        assert_eq!(keys(b"\x1b[D"), vec![Key::Left]);
    }

    #[test]
    fn shift_tab() {
        assert_eq!(keys(b"\x1b[Z"), vec![Key::ShiftTab]);
    }

    #[test]
    fn tilde_sequences() {
        assert_eq!(keys(b"\x1b[1~"), vec![Key::Home]);
        assert_eq!(keys(b"\x1b[3~"), vec![Key::Delete]);
        assert_eq!(keys(b"\x1b[4~"), vec![Key::End]);
    }

    #[test]
    fn unknown_tilde_parameter_is_swallowed() {
        assert_eq!(keys(b"\x1b[15~"), vec![]);
        assert_eq!(keys(b"\x1b[15~x"), vec![data("x")]);
    }

    #[test]
    fn unknown_terminator_is_swallowed() {
        assert_eq!(keys(b"\x1b[5Q"), vec![]);
    }

    #[test]
    fn overlong_parameter_is_swallowed() {
        assert_eq!(keys(b"\x1b[12345~"), vec![]);
    }

    #[test]
    fn double_escape_bracket_rebinds_horizontal() {
        assert_eq!(keys(b"\x1b\x1b[D"), vec![Key::Home]);
        assert_eq!(keys(b"\x1b\x1b[C"), vec![Key::End]);
    }

    #[test]
    fn double_escape_bracket_leaves_vertical_alone() {
        assert_eq!(keys(b"\x1b\x1b[A"), vec![Key::Up]);
    }

    #[test]
    fn control_byte_aborts_open_bracket() {
        assert_eq!(keys(b"\x1b[\x0a"), vec![Key::Return]);
        assert_eq!(keys(b"\x1b[\x7f"), vec![Key::Backspace]);
        assert_eq!(keys(b"\x1b[\x0c"), vec![Key::Redraw]);
    }

    #[test]
    fn control_byte_aborts_bracket_with_digits() {
        assert_eq!(keys(b"\x1b[3\x18"), vec![Key::Cancel]);
    }

    #[test]
    fn escape_restarts_an_open_bracket() {
        // An unterminated sequence must not poison the next one.
        assert_eq!(keys(b"\x1b[\x1b[A"), vec![Key::Up]);
        assert_eq!(keys(b"\x1b[1\x1b[3~"), vec![Key::Delete]);
    }

    #[test]
    fn consecutive_sequences() {
        assert_eq!(
            keys(b"\x1b[A\x1b[D\x1b[3~"),
            vec![Key::Up, Key::Left, Key::Delete]
        );
    }

    // ── Split Reads ─────────────────────────────────────────────────────

    #[test]
    fn csi_split_across_reads_parses_as_one_key() {
        let mut parser = Parser::new();
        assert_eq!(parser.advance(b"\x1b["), vec![]);
        assert_eq!(parser.advance(b"A"), vec![Key::Up]);
    }

    #[test]
    fn csi_split_byte_by_byte() {
        let mut parser = Parser::new();
        assert_eq!(parser.advance(b"\x1b"), vec![]);
        assert_eq!(parser.advance(b"["), vec![]);
        assert_eq!(parser.advance(b"3"), vec![]);
        assert_eq!(parser.advance(b"~"), vec![Key::Delete]);
    }

    #[test]
    fn lone_escape_resolves_on_flush() {
        let mut parser = Parser::new();
        assert_eq!(parser.advance(b"\x1b"), vec![]);
        assert!(parser.has_pending());
        assert_eq!(parser.flush(), vec![Key::Escape]);
        assert!(!parser.has_pending());
    }

    #[test]
    fn flush_with_nothing_pending_is_empty() {
        let mut parser = Parser::new();
        parser.advance(b"x");
        assert_eq!(parser.flush(), vec![]);
    }

    #[test]
    fn unterminated_bracket_flushes_to_escape() {
        let mut parser = Parser::new();
        assert_eq!(parser.advance(b"\x1b[1"), vec![]);
        assert_eq!(parser.flush(), vec![Key::Escape]);
    }

    #[test]
    fn escape_then_text_resolves_without_flush() {
        assert_eq!(keys(b"\x1bq"), vec![Key::Escape, data("q")]);
    }

    #[test]
    fn double_escape_then_text() {
        assert_eq!(
            keys(b"\x1b\x1bq"),
            vec![Key::Escape, Key::Escape, data("q")]
        );
    }

    // ── Text ────────────────────────────────────────────────────────────

    #[test]
    fn ascii_text_one_key_per_char() {
        assert_eq!(keys(b"abc"), vec![data("a"), data("b"), data("c")]);
    }

    #[test]
    fn multibyte_cluster_is_one_key() {
        assert_eq!(keys("å".as_bytes()), vec![data("å")]);
    }

    #[test]
    fn combining_mark_stays_with_base() {
        assert_eq!(keys("e\u{0301}".as_bytes()), vec![data("e\u{0301}")]);
    }

    #[test]
    fn utf8_split_across_reads_is_not_discarded() {
        let bytes = "å".as_bytes();
        let mut parser = Parser::new();
        assert_eq!(parser.advance(&bytes[..1]), vec![]);
        assert!(parser.has_pending());
        assert_eq!(parser.advance(&bytes[1..]), vec![data("å")]);
    }

    #[test]
    fn incomplete_utf8_survives_flush() {
        let bytes = "ä".as_bytes();
        let mut parser = Parser::new();
        parser.advance(&bytes[..1]);
        assert_eq!(parser.flush(), vec![]);
        assert_eq!(parser.advance(&bytes[1..]), vec![data("ä")]);
    }

    #[test]
    fn text_and_sequences_interleave() {
        assert_eq!(
            keys(b"ab\x1b[Dc"),
            vec![data("a"), data("b"), Key::Left, data("c")]
        );
    }

    // ── Editor Semantics ────────────────────────────────────────────────

    /// Minimal line editor driven by keys, mirroring how an application
    /// consumes the parser.
    fn edit(keys: Vec<Key>) -> (String, usize) {
        let mut line = String::new();
        let mut clusters: Vec<String> = Vec::new();
        let mut pos = 0usize;
        for key in keys {
            match key {
                Key::Data(s) => {
                    clusters.insert(pos, s.as_str().to_owned());
                    pos += 1;
                }
                Key::Left => pos = pos.saturating_sub(1),
                Key::Right => pos = (pos + 1).min(clusters.len()),
                Key::Backspace => {
                    if pos > 0 {
                        pos -= 1;
                        clusters.remove(pos);
                    }
                }
                Key::Delete => {
                    if pos < clusters.len() {
                        clusters.remove(pos);
                    }
                }
                Key::Home => pos = 0,
                Key::End => pos = clusters.len(),
                _ => {}
            }
        }
        for c in &clusters {
            line.push_str(c);
        }
        (line, pos)
    }

    #[test]
    fn typing_with_cursor_movement() {
        // a, b, Left, c  ->  "acb" with the cursor after the c.
        let (line, pos) = edit(keys(b"ab\x1b[Dc"));
        assert_eq!(line, "acb");
        assert_eq!(pos, 2);
    }

    #[test]
    fn home_end_and_delete() {
        let (line, pos) = edit(keys(b"abc\x1b[1~\x1b[3~"));
        assert_eq!(line, "bc");
        assert_eq!(pos, 0);

        let (line, pos) = edit(keys(b"abc\x1b[1~\x1b[4~"));
        assert_eq!(line, "abc");
        assert_eq!(pos, 3);
    }

    // ── Event Queue ─────────────────────────────────────────────────────

    #[test]
    fn queue_drains_in_order() {
        let queue = EventQueue::new();
        queue.push(Key::Up);
        queue.extend(vec![data("x"), Key::Return]);

        assert_eq!(queue.drain(), vec![Key::Up, data("x"), Key::Return]);
        assert_eq!(queue.drain(), vec![]);
    }

    #[test]
    fn queue_is_shared_across_threads() {
        use std::sync::Arc;

        let queue = Arc::new(EventQueue::new());
        let producer = Arc::clone(&queue);
        let handle = std::thread::spawn(move || {
            for _ in 0..100 {
                producer.push(Key::Up);
            }
        });
        handle.join().unwrap();
        assert_eq!(queue.drain().len(), 100);
    }
}
