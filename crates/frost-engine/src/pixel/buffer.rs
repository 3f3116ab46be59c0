use bytemuck::{Pod, Zeroable};

use crate::error::BlurError;

/// Channels per pixel; every supported format is 4 × 8 bits.
pub const BYTES_PER_PIXEL: usize = 4;

/// One 4-channel pixel as stored in memory.
///
/// Channel meaning depends on the owning bitmap's [`PixelFormat`](super::PixelFormat);
/// the fields are named for the RGBA layout.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn from_array(c: [u8; 4]) -> Self {
        Self { r: c[0], g: c[1], b: c[2], a: c[3] }
    }

    #[inline]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Raw interleaved bitmap storage.
///
/// Invariants:
/// - `row_stride >= width * BYTES_PER_PIXEL`
/// - `data.len() == row_stride * height`
///
/// Padding bytes at the end of each row are carried along but never read by
/// the convolution.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    row_stride: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Allocates a zeroed buffer with tightly packed rows.
    pub fn try_new(width: u32, height: u32) -> Result<Self, BlurError> {
        Self::try_with_stride(width, height, width as usize * BYTES_PER_PIXEL)
    }

    /// Allocates a zeroed buffer with the given row stride.
    ///
    /// The stride is raised to the packed row size if it is smaller. Reservation
    /// failures are reported instead of aborting the process.
    pub fn try_with_stride(width: u32, height: u32, row_stride: usize) -> Result<Self, BlurError> {
        let row_stride = row_stride.max(width as usize * BYTES_PER_PIXEL);
        let alloc_err = |bytes| BlurError::Allocation { width, height, bytes };

        let len = row_stride
            .checked_mul(height as usize)
            .ok_or_else(|| alloc_err(usize::MAX))?;

        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|_| alloc_err(len))?;
        data.resize(len, 0);

        Ok(Self { width, height, row_stride, data })
    }

    /// Wraps existing bytes. Returns `None` if `data` is too short for the geometry.
    pub fn from_raw(width: u32, height: u32, row_stride: usize, data: Vec<u8>) -> Option<Self> {
        if row_stride < width as usize * BYTES_PER_PIXEL {
            return None;
        }
        if data.len() != row_stride.checked_mul(height as usize)? {
            return None;
        }
        Some(Self { width, height, row_stride, data })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn row_stride(&self) -> usize {
        self.row_stride
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Pixels of row `y`, excluding stride padding.
    pub fn row(&self, y: u32) -> &[Rgba8] {
        let start = y as usize * self.row_stride;
        let end = start + self.width as usize * BYTES_PER_PIXEL;
        bytemuck::cast_slice(&self.data[start..end])
    }

    pub fn row_mut(&mut self, y: u32) -> &mut [Rgba8] {
        let start = y as usize * self.row_stride;
        let end = start + self.width as usize * BYTES_PER_PIXEL;
        bytemuck::cast_slice_mut(&mut self.data[start..end])
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Rgba8 {
        self.row(y)[x as usize]
    }

    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, px: Rgba8) {
        self.row_mut(y)[x as usize] = px;
    }

    pub fn fill(&mut self, px: Rgba8) {
        for y in 0..self.height {
            self.row_mut(y).fill(px);
        }
    }

    /// Tightly packed copy of the pixel bytes, e.g. for image encoders.
    pub fn to_packed_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.width as usize * self.height as usize * BYTES_PER_PIXEL);
        for y in 0..self.height {
            out.extend_from_slice(bytemuck::cast_slice(self.row(y)));
        }
        out
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("row_stride", &self.row_stride)
            .field("bytes", &self.data.len())
            .finish()
    }
}
