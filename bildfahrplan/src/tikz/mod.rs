//! TikZ markup emission.
//!
//! Layout code describes what to draw as [`DrawingOp`]s; this module turns
//! them into TikZ source. Serialization is pure and has no error cases:
//! callers are expected to pass finite coordinates.

mod emit;
mod number;

pub use emit::{Corner, DrawingOp, escape, render, render_page};
pub use number::format_number;
