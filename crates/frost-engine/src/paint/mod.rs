//! Paint model shared by the tint stage and the software host.
//!
//! Colors are premultiplied. Pixels in bitmaps are 8-bit per channel; the
//! helpers here convert between the two and perform source-over blending.

pub mod color;

pub use color::Color;
