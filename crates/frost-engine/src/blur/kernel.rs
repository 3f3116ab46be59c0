/// Boundary policy for the moving-sum convolution.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum EdgeMode {
    /// Replicate border pixels outward. No dark fringe at the edges.
    #[default]
    Extend,
    /// Average only the in-bounds part of the window.
    Truncate,
}

/// Side length of the square box kernel for `radius` points at `scale` pixels per point.
///
/// Always odd and at least 1: the scaled radius is truncated to whole pixels and
/// bumped by one when even. Negative and non-finite inputs behave like 0, so a
/// zero radius yields a 1-pixel box (identity).
pub fn box_size(radius: f32, scale: f32) -> u32 {
    let scaled = radius * scale;
    let px = if scaled.is_finite() && scaled > 0.0 {
        // Saturating float-to-int cast; u32::MAX is odd so the bump below never overflows.
        scaled.floor() as u32
    } else {
        0
    };
    if px % 2 == 0 { px + 1 } else { px }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_radius_is_identity_box() {
        assert_eq!(box_size(0.0, 1.0), 1);
        assert_eq!(box_size(0.0, 3.0), 1);
    }

    #[test]
    fn even_sizes_are_bumped() {
        assert_eq!(box_size(4.0, 1.0), 5);
        assert_eq!(box_size(5.0, 2.0), 11);
    }

    #[test]
    fn odd_sizes_are_kept() {
        assert_eq!(box_size(5.0, 1.0), 5);
        assert_eq!(box_size(3.5, 2.0), 7);
    }

    #[test]
    fn fractional_pixels_truncate() {
        assert_eq!(box_size(2.9, 1.0), 3);
        assert_eq!(box_size(0.4, 1.0), 1);
    }

    #[test]
    fn degenerate_inputs_behave_like_zero() {
        assert_eq!(box_size(-3.0, 2.0), 1);
        assert_eq!(box_size(f32::NAN, 2.0), 1);
        assert_eq!(box_size(5.0, f32::INFINITY), 1);
        assert_eq!(box_size(1e30, 1.0), u32::MAX);
    }
}
