//! Terminal renderer - the output layer.
//!
//! The renderer knows only about cells. Pages and layout fill a
//! [`FrameBuffer`]; [`DiffRenderer`] turns successive frames into the
//! minimal crossterm command stream.

mod buffer;
mod diff;
pub mod text;

pub use buffer::{Attr, Cell, FrameBuffer, Rect, Tone};
pub use diff::{tone_color, DiffRenderer, TerminalSession};
