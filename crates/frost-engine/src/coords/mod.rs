//! Geometry shared by the capture pipeline and the software host.
//!
//! Layer space:
//! - logical points (multiply by a content scale to get pixels)
//! - origin top-left of the parent layer
//! - +X right, +Y down

mod rect;
mod vec2;

pub use rect::Rect;
pub use vec2::Vec2;
