/// Width and height in pixels. Valid sizes are never negative.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct CanvasSize {
    pub w: i32,
    pub h: i32,
}

impl CanvasSize {
    pub const ZERO: Self = Self::new(0, 0);

    #[inline]
    pub const fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }

    /// True when there is nothing to draw on.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Width and height exchanged (horizontal ↔ vertical layouts).
    #[inline]
    #[must_use]
    pub fn swapped(self) -> Self {
        Self::new(self.h, self.w)
    }

    #[inline]
    #[must_use]
    pub fn scaled(self, factor: i32) -> Self {
        Self::new(self.w * factor, self.h * factor)
    }

    /// Componentwise maximum.
    #[inline]
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        Self::new(self.w.max(other.w), self.h.max(other.h))
    }

    /// Negative components clamped to zero.
    #[inline]
    #[must_use]
    pub fn clamped(self) -> Self {
        Self::new(self.w.max(0), self.h.max(0))
    }
}
