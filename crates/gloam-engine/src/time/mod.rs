//! Time subsystem.
//!
//! - `TimerService`: the host's one-shot wake-up messages, tagged by caller
//! - `ManualTimers`: deterministic, serializable service for tests and headless runs
//! - `FrameClock`: per-loop frame timing with clamped deltas

mod frame_clock;
mod timers;

pub use frame_clock::{FrameClock, FrameTime};
pub use timers::{ManualTimers, TimerHandle, TimerService, WakeUp};
