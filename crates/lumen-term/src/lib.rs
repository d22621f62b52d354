// SPDX-License-Identifier: MIT

//! Differential terminal rendering engine.
//!
//! A double-buffered cell grid with grapheme-cluster text, automatic
//! color quantization for the terminal's capability, escape-sequence
//! input decoding on a reader thread, drawing primitives (including
//! braille sub-cell plotting), and a fixed-cadence render loop with
//! cooperative Ctrl-C shutdown.
//!
//! The typical shape of an application:
//!
//! ```no_run
//! use lumen_term::event_loop::{LoopConfig, RenderLoop};
//! use lumen_term::input::Key;
//! use lumen_term::text::GraphemeString;
//!
//! let render_loop = RenderLoop::new(LoopConfig::default())?;
//! render_loop.run(|display, keys, _elapsed_ms| {
//!     let label = GraphemeString::from("press q to quit");
//!     let style = display.style();
//!     display.primitives().text(2, 1, &label, style);
//!
//!     !keys.iter().any(|k| matches!(k, Key::Data(d) if *d == "q"))
//! })?;
//! # Ok::<(), lumen_term::error::Error>(())
//! ```
//!
//! Every layer below the loop is usable on its own: a [`FrameBuffer`]
//! plus a [`DiffRenderer`](diff::DiffRenderer) render to any
//! `io::Write`, which is also how the tests drive the pipeline without
//! a terminal.

pub mod ansi;
pub mod braille;
pub mod buffer;
pub mod cell;
pub mod color;
pub mod diff;
pub mod display;
pub mod error;
pub mod event_loop;
pub mod input;
pub mod output;
pub mod primitives;
pub mod reader;
pub mod terminal;
pub mod text;

pub use braille::BrailleBuffer;
pub use buffer::FrameBuffer;
pub use cell::{Cell, Style, StyleFlags};
pub use color::{Capability, ResolvedColor, Rgb};
pub use display::Display;
pub use error::{Error, Result};
pub use event_loop::{LoopConfig, RenderLoop};
pub use input::Key;
pub use text::GraphemeString;
