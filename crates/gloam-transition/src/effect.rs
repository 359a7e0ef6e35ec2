use gloam_engine::params::ParamScope;

use crate::channel::ChannelPair;
use crate::record::Step;

/// Default spacing between ticks.
pub const DEFAULT_TICK_MS: u32 = 50;

/// What happens to a running transition after a save is restored.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum ResumePolicy {
    /// Pick up at the saved remaining time.
    #[default]
    Continue,
    /// Jump straight to the end values.
    Complete,
}

/// An on/off effect whose channels ramp between two states.
pub trait TransitionHost {
    /// Captures the live values as starts and resolves targets for a
    /// trigger in direction `on`. `None` means there is nothing to do.
    fn prepare(&mut self, on: bool, params: &ParamScope<'_>) -> Option<Vec<ChannelPair>>;

    /// Applies one tick. Returning `false` stops the transition.
    fn step(&mut self, step: &Step) -> bool;

    fn tick_ms(&self) -> u32 {
        DEFAULT_TICK_MS
    }

    fn resume_policy(&self) -> ResumePolicy {
        ResumePolicy::Continue
    }
}
