use super::Vec2;

/// Axis-aligned rectangle in logical points (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        self.origin + self.size
    }

    /// `true` when either extent is zero, negative, or not a number.
    #[inline]
    pub fn is_empty(self) -> bool {
        !(self.size.x > 0.0 && self.size.y > 0.0)
    }

    /// Half-open containment: [min, max).
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        let max = self.max();
        p.x >= self.origin.x && p.y >= self.origin.y && p.x < max.x && p.y < max.y
    }

    /// Shifts the origin by `delta`, keeping the size.
    #[inline]
    pub fn translate(self, delta: Vec2) -> Self {
        Self { origin: self.origin + delta, size: self.size }
    }

    /// Pixel extent of this rect when rasterized at `scale` pixels per point.
    ///
    /// Rounds to the nearest pixel; empty or non-finite rects map to `(0, 0)`.
    pub fn pixel_size(self, scale: f32) -> (u32, u32) {
        if self.is_empty() || !self.size.is_finite() || !(scale > 0.0) {
            return (0, 0);
        }
        let px = self.size * scale;
        (px.x.round() as u32, px.y.round() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: f32, y: f32, w: f32, h: f32) -> Rect { Rect::new(x, y, w, h) }

    // ── contains ──────────────────────────────────────────────────────────

    #[test]
    fn contains_top_left_inclusive() {
        assert!(r(0.0, 0.0, 10.0, 10.0).contains(Vec2::new(0.0, 0.0)));
    }

    #[test]
    fn contains_bottom_right_exclusive() {
        assert!(!r(0.0, 0.0, 10.0, 10.0).contains(Vec2::new(10.0, 10.0)));
    }

    // ── translate ─────────────────────────────────────────────────────────

    #[test]
    fn translate_moves_origin_only() {
        let moved = r(2.0, 3.0, 4.0, 5.0).translate(Vec2::new(-2.0, 7.0));
        assert_eq!(moved, r(0.0, 10.0, 4.0, 5.0));
    }

    // ── pixel_size ────────────────────────────────────────────────────────

    #[test]
    fn pixel_size_scales_and_rounds() {
        assert_eq!(r(0.0, 0.0, 10.0, 4.5).pixel_size(2.0), (20, 9));
        assert_eq!(r(5.0, 5.0, 3.3, 3.0).pixel_size(1.0), (3, 3));
    }

    #[test]
    fn pixel_size_of_empty_rect_is_zero() {
        assert_eq!(r(0.0, 0.0, 0.0, 40.0).pixel_size(2.0), (0, 0));
        assert_eq!(r(0.0, 0.0, 40.0, -1.0).pixel_size(2.0), (0, 0));
    }

    #[test]
    fn pixel_size_rejects_bad_scale() {
        assert_eq!(r(0.0, 0.0, 10.0, 10.0).pixel_size(0.0), (0, 0));
        assert_eq!(r(0.0, 0.0, 10.0, 10.0).pixel_size(f32::NAN), (0, 0));
    }

    #[test]
    fn nan_size_is_empty() {
        assert!(r(0.0, 0.0, f32::NAN, 10.0).is_empty());
    }
}
