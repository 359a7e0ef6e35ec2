//! Gloam transitions: on/off effects that ramp smoothly between two states.
//!
//! An effect implements [`TransitionHost`](effect::TransitionHost). On a
//! trigger the [`TransitionEngine`](engine::TransitionEngine) asks it for
//! start/end values, then ticks it on one-shot timers until the remaining
//! time reaches zero. Remaining time is the only persisted truth, so a
//! saved arena resumes exactly where it stopped.
//!
//! ```rust,ignore
//! let mut ctx = TransitionCtx::new(&mut timers, &params);
//! engine.trigger(FOG, room, true, &mut fog, &mut ctx);
//!
//! // In the host's message dispatch:
//! if TransitionEngine::target(&wake) == Some(FOG) {
//!     engine.on_timer(&wake, &mut fog, &mut ctx);
//! }
//! ```

pub mod channel;
pub mod curve;
pub mod effect;
pub mod engine;
pub mod error;
pub mod record;

pub mod prelude {
    pub use crate::channel::{Channel, ChannelPair, ChannelValue};
    pub use crate::curve::Curve;
    pub use crate::effect::{DEFAULT_TICK_MS, ResumePolicy, TransitionHost};
    pub use crate::engine::{EffectId, TransitionCtx, TransitionEngine};
    pub use crate::error::TransitionError;
    pub use crate::record::{Step, TransitionRecord};
}
