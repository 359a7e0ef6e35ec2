use core::ops::{Add, Sub};

use super::{CanvasPoint, CanvasSize};

/// Axis-aligned rectangle in pixels (top-left origin).
///
/// A negative width or height marks [`CanvasRect::NOCLIP`]: "use the full
/// bounds of whatever is being drawn into".
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct CanvasRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl CanvasRect {
    pub const NOCLIP: Self = Self::new(0, 0, -1, -1);

    /// Zero-area rectangle at the off-screen point.
    pub const OFFSCREEN: Self = Self::new(-1, -1, 0, 0);

    #[inline]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle of `size` at the origin.
    #[inline]
    pub const fn from_size(size: CanvasSize) -> Self {
        Self::new(0, 0, size.w, size.h)
    }

    #[inline]
    pub const fn from_origin_size(origin: CanvasPoint, size: CanvasSize) -> Self {
        Self::new(origin.x, origin.y, size.w, size.h)
    }

    #[inline]
    pub fn origin(self) -> CanvasPoint {
        CanvasPoint::new(self.x, self.y)
    }

    #[inline]
    pub fn size(self) -> CanvasSize {
        CanvasSize::new(self.w, self.h)
    }

    #[inline]
    pub fn center(self) -> CanvasPoint {
        CanvasPoint::new(self.x + self.w / 2, self.y + self.h / 2)
    }

    #[inline]
    pub fn is_noclip(self) -> bool {
        self.w < 0 || self.h < 0
    }

    #[inline]
    pub fn is_offscreen(self) -> bool {
        self == Self::OFFSCREEN
    }

    /// Replaces the `NOCLIP` sentinel with the full `bounds`.
    #[inline]
    pub fn resolve(self, bounds: CanvasSize) -> Self {
        if self.is_noclip() { Self::from_size(bounds) } else { self }
    }

    /// Half-open containment: [min, max).
    #[inline]
    pub fn contains(self, p: CanvasPoint) -> bool {
        p.x >= self.x && p.y >= self.y && p.x < self.x + self.w && p.y < self.y + self.h
    }

    /// Overlap of two real rectangles, or `None` when they do not overlap.
    pub fn intersect(self, other: CanvasRect) -> Option<CanvasRect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = (self.x + self.w).min(other.x + other.w);
        let y1 = (self.y + self.h).min(other.y + other.h);

        if x1 <= x0 || y1 <= y0 {
            None
        } else {
            Some(CanvasRect::new(x0, y0, x1 - x0, y1 - y0))
        }
    }

    /// Smallest rectangle covering both.
    pub fn union(self, other: CanvasRect) -> CanvasRect {
        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = (self.x + self.w).max(other.x + other.w);
        let y1 = (self.y + self.h).max(other.y + other.h);
        CanvasRect::new(x0, y0, x1 - x0, y1 - y0)
    }
}

impl Add<CanvasPoint> for CanvasRect {
    type Output = CanvasRect;
    #[inline]
    fn add(self, rhs: CanvasPoint) -> CanvasRect {
        CanvasRect::new(self.x + rhs.x, self.y + rhs.y, self.w, self.h)
    }
}

impl Sub<CanvasPoint> for CanvasRect {
    type Output = CanvasRect;
    #[inline]
    fn sub(self, rhs: CanvasPoint) -> CanvasRect {
        CanvasRect::new(self.x - rhs.x, self.y - rhs.y, self.w, self.h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: i32, y: i32, w: i32, h: i32) -> CanvasRect { CanvasRect::new(x, y, w, h) }

    // ── translation ───────────────────────────────────────────────────────

    #[test]
    fn translate_round_trip_keeps_size() {
        let rect = r(5, 6, 30, 40);
        for p in [CanvasPoint::new(-7, 3), CanvasPoint::ORIGIN, CanvasPoint::new(100, -100)] {
            let moved = rect + p;
            assert_eq!(moved.size(), rect.size());
            assert_eq!(moved - p, rect);
        }
    }

    // ── sentinels ─────────────────────────────────────────────────────────

    #[test]
    fn noclip_resolves_to_bounds() {
        let bounds = CanvasSize::new(64, 16);
        assert!(CanvasRect::NOCLIP.is_noclip());
        assert_eq!(CanvasRect::NOCLIP.resolve(bounds), r(0, 0, 64, 16));
        assert_eq!(r(1, 2, 3, 4).resolve(bounds), r(1, 2, 3, 4));
    }

    #[test]
    fn offscreen_has_zero_area() {
        assert_eq!(CanvasRect::OFFSCREEN.size(), CanvasSize::ZERO);
        assert_eq!(CanvasRect::OFFSCREEN.origin(), CanvasPoint::OFFSCREEN);
        assert!(!CanvasRect::OFFSCREEN.is_noclip());
    }

    // ── intersect / contains ──────────────────────────────────────────────

    #[test]
    fn intersect_overlapping() {
        assert_eq!(r(0, 0, 10, 10).intersect(r(5, 5, 10, 10)), Some(r(5, 5, 5, 5)));
    }

    #[test]
    fn intersect_touching_edge_is_none() {
        assert!(r(0, 0, 10, 10).intersect(r(10, 0, 10, 10)).is_none());
    }

    #[test]
    fn contains_is_half_open() {
        let rect = r(0, 0, 10, 10);
        assert!(rect.contains(CanvasPoint::new(0, 0)));
        assert!(rect.contains(CanvasPoint::new(9, 9)));
        assert!(!rect.contains(CanvasPoint::new(10, 10)));
    }

    #[test]
    fn union_covers_both() {
        assert_eq!(r(0, 0, 4, 4).union(r(10, 2, 2, 8)), r(0, 0, 12, 10));
    }
}
