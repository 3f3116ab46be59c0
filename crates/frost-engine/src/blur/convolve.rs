use crate::pixel::{PixelBuffer, BYTES_PER_PIXEL};

use super::EdgeMode;

/// Separable square box filter over 4 × 8-bit pixels.
///
/// One [`convolve`](Self::convolve) call is a full 2D pass: a horizontal moving
/// sum from the source into the scratch buffer, then a vertical moving sum from
/// the scratch buffer into the destination. Cost per pixel is independent of
/// the box size.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BoxConvolver {
    box_size: u32,
    edge: EdgeMode,
}

impl BoxConvolver {
    /// `box_size` must be odd; even sizes are widened by one.
    pub fn new(box_size: u32, edge: EdgeMode) -> Self {
        let box_size = box_size.max(1) | 1;
        Self { box_size, edge }
    }

    #[inline]
    pub fn box_size(&self) -> u32 {
        self.box_size
    }

    /// Bytes of temporary storage [`convolve`](Self::convolve) needs for a
    /// `width` × `height` image.
    pub fn scratch_len(&self, width: u32, height: u32) -> usize {
        width as usize * height as usize * BYTES_PER_PIXEL
    }

    /// Convolves `src` into `dst`. Both must share width and height; strides may differ.
    pub fn convolve(&self, src: &PixelBuffer, dst: &mut PixelBuffer, scratch: &mut [u8]) {
        debug_assert_eq!((src.width(), src.height()), (dst.width(), dst.height()));
        let w = src.width() as usize;
        let h = src.height() as usize;
        if w == 0 || h == 0 {
            return;
        }
        debug_assert!(scratch.len() >= self.scratch_len(src.width(), src.height()));

        let radius = (self.box_size / 2) as usize;
        let packed_row = w * BYTES_PER_PIXEL;

        let src_stride = src.row_stride();
        for y in 0..h {
            let from = Line { base: y * src_stride, step: BYTES_PER_PIXEL };
            let to = Line { base: y * packed_row, step: BYTES_PER_PIXEL };
            self.convolve_line(src.as_bytes(), from, scratch, to, w, radius);
        }

        let dst_stride = dst.row_stride();
        let dst_bytes = dst.as_bytes_mut();
        for x in 0..w {
            let from = Line { base: x * BYTES_PER_PIXEL, step: packed_row };
            let to = Line { base: x * BYTES_PER_PIXEL, step: dst_stride };
            self.convolve_line(scratch, from, dst_bytes, to, h, radius);
        }
    }

    fn convolve_line(&self, src: &[u8], from: Line, dst: &mut [u8], to: Line, len: usize, radius: usize) {
        match self.edge {
            EdgeMode::Extend => extend_line(src, from, dst, to, len, radius),
            EdgeMode::Truncate => truncate_line(src, from, dst, to, len, radius),
        }
    }
}

/// A strided run of pixels inside a byte slice.
#[derive(Copy, Clone)]
struct Line {
    base: usize,
    step: usize,
}

impl Line {
    #[inline]
    fn at(self, i: usize) -> usize {
        self.base + i * self.step
    }
}

#[inline]
fn write_avg(dst: &mut [u8], at: usize, sum: &[u64; 4], count: u64) {
    let half = count / 2;
    for c in 0..4 {
        dst[at + c] = ((sum[c] + half) / count) as u8;
    }
}

#[inline]
fn add_scaled(sum: &mut [u64; 4], src: &[u8], at: usize, times: u64) {
    for c in 0..4 {
        sum[c] += src[at + c] as u64 * times;
    }
}

/// Sums are `u64`: a window can span up to `u32::MAX` samples of 255.
fn extend_line(src: &[u8], from: Line, dst: &mut [u8], to: Line, len: usize, radius: usize) {
    let last = len - 1;
    let clamp = |i: isize| from.at(i.clamp(0, last as isize) as usize);
    let r = radius as isize;
    let count = 2 * radius as u64 + 1;

    // First window [-r, r]: r copies of the first pixel, the in-bounds run,
    // then copies of the last pixel for whatever reaches past the end.
    let mut sum = [0u64; 4];
    add_scaled(&mut sum, src, from.at(0), radius as u64);
    for i in 0..=radius.min(last) {
        add_scaled(&mut sum, src, from.at(i), 1);
    }
    add_scaled(&mut sum, src, from.at(last), radius.saturating_sub(last) as u64);

    for x in 0..len as isize {
        write_avg(dst, to.at(x as usize), &sum, count);
        let enter = clamp(x.saturating_add(r).saturating_add(1));
        let leave = clamp(x - r);
        for c in 0..4 {
            sum[c] = sum[c] + src[enter + c] as u64 - src[leave + c] as u64;
        }
    }
}

fn truncate_line(src: &[u8], from: Line, dst: &mut [u8], to: Line, len: usize, radius: usize) {
    let mut sum = [0u64; 4];
    let mut count = 0u64;
    for i in 0..=radius.min(len - 1) {
        add_scaled(&mut sum, src, from.at(i), 1);
        count += 1;
    }

    for x in 0..len {
        write_avg(dst, to.at(x), &sum, count);
        if radius < len - x - 1 {
            add_scaled(&mut sum, src, from.at(x + radius + 1), 1);
            count += 1;
        }
        if x >= radius {
            let p = from.at(x - radius);
            for c in 0..4 {
                sum[c] -= src[p + c] as u64;
            }
            count -= 1;
        }
    }
}
