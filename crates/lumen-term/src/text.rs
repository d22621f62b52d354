// SPDX-License-Identifier: MIT
//
// Grapheme-aware string type.
//
// Terminal cells hold user-perceived characters, not bytes or codepoints:
// "é" composed as `e` + U+0301 is one cell, and indexing must never split
// the base from its combining mark. `GraphemeString` wraps a UTF-8 buffer
// and exposes indexing, slicing, and iteration by extended grapheme
// cluster (UAX #29, via unicode-segmentation).
//
// Validation is separate from construction on purpose: the input engine
// accumulates raw bytes and needs to ask "is this valid yet?" without
// committing — a multi-byte sequence split across reads is incomplete,
// not broken.

use std::fmt;
use std::ops::Add;
use std::str;

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::error::Error;

/// An immutable string indexed by grapheme cluster.
///
/// # Examples
///
/// ```
/// use lumen_term::text::GraphemeString;
///
/// let s = GraphemeString::from("åäö");
/// assert_eq!(s.len(), 3);
/// assert_eq!(s.at(1), "ä");
///
/// // A base char plus combining acute is one cluster.
/// let composed = GraphemeString::from("e\u{0301}");
/// assert_eq!(composed.len(), 1);
/// ```
#[derive(Clone, PartialEq, Eq, Default, Hash)]
pub struct GraphemeString {
    inner: String,
}

impl GraphemeString {
    /// Create an empty string.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: String::new(),
        }
    }

    /// Construct from raw bytes, validating UTF-8.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEncoding`] when the bytes are not
    /// well-formed UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let s = str::from_utf8(bytes).map_err(|_| Error::InvalidEncoding)?;
        Ok(Self {
            inner: s.to_owned(),
        })
    }

    /// Whether a byte sequence is well-formed UTF-8.
    ///
    /// Callable without constructing anything, so a streaming consumer
    /// can hold an incomplete trailing sequence and retry as bytes
    /// arrive.
    #[inline]
    #[must_use]
    pub fn is_valid_utf8(bytes: &[u8]) -> bool {
        str::from_utf8(bytes).is_ok()
    }

    /// Number of grapheme clusters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.graphemes(true).count()
    }

    /// Whether the string holds no clusters.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// The cluster at `index`, or an empty string when out of range.
    #[must_use]
    pub fn at(&self, index: usize) -> Self {
        self.substr(index, 1)
    }

    /// A sub-string of `len` clusters starting at cluster `start`.
    ///
    /// Clamps to the available clusters; a `start` past the end yields
    /// an empty string. Never splits inside a cluster.
    #[must_use]
    pub fn substr(&self, start: usize, len: usize) -> Self {
        if len == 0 {
            return Self::new();
        }

        let mut indices = self.inner.grapheme_indices(true).skip(start);
        let Some((begin, _)) = indices.next() else {
            return Self::new();
        };

        let end = indices
            .nth(len - 1)
            .map_or(self.inner.len(), |(offset, _)| offset);

        Self {
            inner: self.inner[begin..end].to_owned(),
        }
    }

    /// Iterate over the clusters as `&str` slices.
    ///
    /// Lazy and restartable: each call starts a fresh pass.
    pub fn chars(&self) -> impl Iterator<Item = &str> {
        self.inner.graphemes(true)
    }

    /// The backing UTF-8 string.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Terminal display width in columns (wide CJK counts as two).
    ///
    /// Note that the drawing primitives advance one column per cluster
    /// regardless; this is a layout helper for callers.
    #[must_use]
    pub fn display_width(&self) -> usize {
        self.inner.width()
    }
}

impl From<&str> for GraphemeString {
    fn from(s: &str) -> Self {
        Self {
            inner: s.to_owned(),
        }
    }
}

impl From<String> for GraphemeString {
    fn from(inner: String) -> Self {
        Self { inner }
    }
}

impl Add<&Self> for GraphemeString {
    type Output = Self;

    fn add(mut self, other: &Self) -> Self {
        self.inner.push_str(&other.inner);
        self
    }
}

impl Add<&str> for GraphemeString {
    type Output = Self;

    fn add(mut self, other: &str) -> Self {
        self.inner.push_str(other);
        self
    }
}

impl PartialEq<&str> for GraphemeString {
    fn eq(&self, other: &&str) -> bool {
        self.inner == *other
    }
}

impl PartialEq<str> for GraphemeString {
    fn eq(&self, other: &str) -> bool {
        self.inner == other
    }
}

impl fmt::Display for GraphemeString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner)
    }
}

impl fmt::Debug for GraphemeString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{:?}", self.inner)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
