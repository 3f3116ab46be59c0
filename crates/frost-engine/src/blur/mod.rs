//! Multi-pass box blur over CPU bitmaps.
//!
//! Pipeline for one [`BoxBlur::apply`] call:
//! - derive an odd box size from radius × bitmap scale ([`box_size`])
//! - allocate a working buffer, an alternate buffer and a scratch buffer
//! - copy the source in, then convolve working → alternate and swap, `iterations` times
//! - hand the last written buffer back as a bitmap with the source's metadata
//!
//! Channels are blurred as independent 8-bit values. Premultiplication is not
//! corrected, so straight-alpha content can show colour fringes.

mod convolve;
mod kernel;
mod tint;

pub use convolve::BoxConvolver;
pub use kernel::{box_size, EdgeMode};
pub use tint::apply_tint;

use crate::error::BlurError;
use crate::pixel::{Bitmap, PixelBuffer};

/// Default number of convolution passes per blur.
pub const DEFAULT_ITERATIONS: u32 = 3;

/// Box blur parameters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoxBlur {
    /// Radius in logical points; scaled by the bitmap's scale.
    pub radius: f32,
    /// Number of full 2D passes; values below 1 are treated as 1.
    pub iterations: u32,
    pub edge: EdgeMode,
}

impl BoxBlur {
    pub fn new(radius: f32, iterations: u32) -> Self {
        Self { radius, iterations, edge: EdgeMode::Extend }
    }

    pub fn edge(mut self, edge: EdgeMode) -> Self {
        self.edge = edge;
        self
    }

    /// Box size this blur uses for a bitmap at `scale`.
    #[inline]
    pub fn box_size_at(&self, scale: f32) -> u32 {
        box_size(self.radius, scale)
    }

    /// Blurs `src` into a new bitmap of identical geometry and metadata.
    ///
    /// Empty bitmaps are returned as an unmodified copy. Temporary buffers are
    /// released before returning; only the result buffer escapes.
    pub fn apply(&self, src: &Bitmap) -> Result<Bitmap, BlurError> {
        if src.is_empty() {
            return Ok(src.clone());
        }

        let (w, h) = (src.width(), src.height());
        let stride = src.pixels.row_stride();
        let convolver = BoxConvolver::new(self.box_size_at(src.scale), self.edge);
        let iterations = self.iterations.max(1);

        let mut buffers = [
            PixelBuffer::try_with_stride(w, h, stride)?,
            PixelBuffer::try_with_stride(w, h, stride)?,
        ];
        let scratch_len = convolver.scratch_len(w, h);
        let mut scratch = Vec::new();
        scratch
            .try_reserve_exact(scratch_len)
            .map_err(|_| BlurError::Allocation { width: w, height: h, bytes: scratch_len })?;
        scratch.resize(scratch_len, 0u8);

        buffers[0].as_bytes_mut().copy_from_slice(src.pixels.as_bytes());

        log::trace!(
            "box blur {w}x{h} @{}x: box {} x{iterations}",
            src.scale,
            convolver.box_size()
        );

        let mut working = 0usize;
        for _ in 0..iterations {
            let (front, back) = buffers.split_at_mut(1);
            let (from, to) = if working == 0 {
                (&front[0], &mut back[0])
            } else {
                (&back[0], &mut front[0])
            };
            convolver.convolve(from, to, &mut scratch);
            working ^= 1;
        }

        let [first, second] = buffers;
        let result = if working == 0 { first } else { second };
        Ok(src.with_pixels(result))
    }
}
