use core::ops::{Add, Div, Mul, Neg, Sub};

use super::CanvasSize;

/// Screen offset in pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct CanvasPoint {
    pub x: i32,
    pub y: i32,
}

impl CanvasPoint {
    pub const ORIGIN: Self = Self::new(0, 0);

    /// Sentinel for a point that cannot be shown, e.g. behind the camera.
    pub const OFFSCREEN: Self = Self::new(-1, -1);

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The point at the far corner of `size`.
    #[inline]
    pub const fn from_size(size: CanvasSize) -> Self {
        Self { x: size.w, y: size.h }
    }

    #[inline]
    pub fn is_offscreen(self) -> bool {
        self == Self::OFFSCREEN
    }
}

impl Add for CanvasPoint {
    type Output = CanvasPoint;
    #[inline]
    fn add(self, rhs: CanvasPoint) -> CanvasPoint {
        CanvasPoint::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for CanvasPoint {
    type Output = CanvasPoint;
    #[inline]
    fn sub(self, rhs: CanvasPoint) -> CanvasPoint {
        CanvasPoint::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<i32> for CanvasPoint {
    type Output = CanvasPoint;
    #[inline]
    fn mul(self, rhs: i32) -> CanvasPoint {
        CanvasPoint::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<i32> for CanvasPoint {
    type Output = CanvasPoint;
    #[inline]
    fn div(self, rhs: i32) -> CanvasPoint {
        CanvasPoint::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for CanvasPoint {
    type Output = CanvasPoint;
    #[inline]
    fn neg(self) -> CanvasPoint {
        CanvasPoint::new(-self.x, -self.y)
    }
}
