//! Concrete HUD elements.

pub mod marker;
pub mod sight;
pub mod stat_meter;
pub mod subtitle;
