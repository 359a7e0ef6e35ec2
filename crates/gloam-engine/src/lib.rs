//! Gloam engine crate.
//!
//! This crate owns the host-facing pieces shared by the HUD and transition
//! layers: the canvas vocabulary, the rendering-backend contract, timers,
//! parameters, persistence and the world query.

pub mod backend;
pub mod config;
pub mod coords;
pub mod error;
pub mod ids;
pub mod logging;
pub mod paint;
pub mod params;
pub mod persist;
pub mod time;
pub mod world;
