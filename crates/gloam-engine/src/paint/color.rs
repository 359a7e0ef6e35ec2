use serde::{Deserialize, Serialize};

/// 8-bit RGB color as the host renders it.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const RED: Self = Self::new(255, 0, 0);
    pub const YELLOW: Self = Self::new(255, 255, 0);
    pub const GREEN: Self = Self::new(0, 255, 0);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channel-wise blend from `a` (t = 0) to `b` (t = 1).
    ///
    /// `t` is clamped to [0, 1]; each channel is rounded to the nearest byte.
    pub fn interpolate(a: Color, b: Color, t: f32) -> Color {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let mix = |from: u8, to: u8| -> u8 {
            let v = f32::from(from) + t * (f32::from(to) - f32::from(from));
            v.round().clamp(0.0, 255.0) as u8
        };
        Color::new(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b))
    }

    /// Parses parameter text: `#rrggbb`, `r,g,b`, or a basic color name.
    pub fn parse(raw: &str) -> Option<Color> {
        let raw = raw.trim();
        if let Some(hex) = raw.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return None;
            }
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            return Some(Color::new(channel(0)?, channel(2)?, channel(4)?));
        }

        if raw.contains(',') {
            let mut parts = raw.split(',').map(|p| p.trim().parse::<u8>());
            let r = parts.next()?.ok()?;
            let g = parts.next()?.ok()?;
            let b = parts.next()?.ok()?;
            if parts.next().is_some() {
                return None;
            }
            return Some(Color::new(r, g, b));
        }

        match raw.to_ascii_lowercase().as_str() {
            "black" => Some(Self::BLACK),
            "white" => Some(Self::WHITE),
            "red" => Some(Self::RED),
            "yellow" => Some(Self::YELLOW),
            "green" => Some(Self::GREEN),
            "blue" => Some(Self::new(0, 0, 255)),
            "gray" | "grey" => Some(Self::new(128, 128, 128)),
            _ => None,
        }
    }
}
