use glam::Vec3;
use serde::{Deserialize, Serialize};

use gloam_engine::paint::Color;

/// One interpolated value owned by an effect.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChannelValue {
    Scalar(f32),
    Vector(Vec3),
    Color(Color),
}

impl ChannelValue {
    pub fn kind(&self) -> &'static str {
        match self {
            ChannelValue::Scalar(_) => "scalar",
            ChannelValue::Vector(_) => "vector",
            ChannelValue::Color(_) => "color",
        }
    }

    #[inline]
    pub fn same_kind(&self, other: &ChannelValue) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Value at `t` between `start` (t = 0) and `end` (t = 1).
    ///
    /// Mismatched kinds yield `start`.
    pub fn interpolate(start: ChannelValue, end: ChannelValue, t: f32) -> ChannelValue {
        match (start, end) {
            (ChannelValue::Scalar(a), ChannelValue::Scalar(b)) => ChannelValue::Scalar(a + t * (b - a)),
            (ChannelValue::Vector(a), ChannelValue::Vector(b)) => ChannelValue::Vector(a.lerp(b, t)),
            (ChannelValue::Color(a), ChannelValue::Color(b)) => ChannelValue::Color(Color::interpolate(a, b, t)),
            (start, _) => start,
        }
    }

    pub fn as_scalar(&self) -> Option<f32> {
        match *self {
            ChannelValue::Scalar(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<Vec3> {
        match *self {
            ChannelValue::Vector(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match *self {
            ChannelValue::Color(c) => Some(c),
            _ => None,
        }
    }
}

impl From<f32> for ChannelValue {
    fn from(v: f32) -> Self {
        ChannelValue::Scalar(v)
    }
}

impl From<Vec3> for ChannelValue {
    fn from(v: Vec3) -> Self {
        ChannelValue::Vector(v)
    }
}

impl From<Color> for ChannelValue {
    fn from(c: Color) -> Self {
        ChannelValue::Color(c)
    }
}

/// Start and target of one channel as an effect proposes them.
///
/// A missing end keeps the channel at its start.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ChannelPair {
    pub start: ChannelValue,
    pub end: Option<ChannelValue>,
}

impl ChannelPair {
    pub fn new(start: impl Into<ChannelValue>, end: Option<ChannelValue>) -> Self {
        Self { start: start.into(), end }
    }

    pub fn to(start: impl Into<ChannelValue>, end: impl Into<ChannelValue>) -> Self {
        Self { start: start.into(), end: Some(end.into()) }
    }

    /// Holds `start` for the whole transition.
    pub fn hold(start: impl Into<ChannelValue>) -> Self {
        Self { start: start.into(), end: None }
    }
}

/// A resolved channel, as stored in a running transition.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub start: ChannelValue,
    pub end: ChannelValue,
}

impl Channel {
    #[inline]
    pub fn at(&self, t: f32) -> ChannelValue {
        ChannelValue::interpolate(self.start, self.end, t)
    }
}
