//! CPU pixel storage.
//!
//! - [`PixelBuffer`]: interleaved 4 × 8-bit pixels with an explicit row stride
//! - [`Bitmap`]: a buffer plus the metadata the blur must preserve
//!   (channel order, alpha mode, color space, scale, orientation)

mod bitmap;
mod buffer;

pub use bitmap::{AlphaMode, Bitmap, ColorSpace, Orientation, PixelFormat};
pub use buffer::{PixelBuffer, Rgba8, BYTES_PER_PIXEL};
