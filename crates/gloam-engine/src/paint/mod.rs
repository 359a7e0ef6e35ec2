//! Paint model shared between HUD elements and transitions.
//!
//! The host draws opaque 8-bit RGB; translucency is a per-overlay opacity
//! applied at composite time, never a per-color alpha.

pub mod color;

pub use color::Color;
