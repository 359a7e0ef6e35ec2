use serde::{Deserialize, Serialize};

use gloam_engine::ids::ObjectId;
use gloam_engine::time::TimerHandle;

use crate::channel::{Channel, ChannelValue};
use crate::curve::Curve;

/// Persisted state of one running transition.
///
/// `remaining_ms` is the source of truth for progress; nothing else about
/// the transition lives outside this record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Object whose parameters configured the transition.
    pub owner: ObjectId,
    /// Direction of the trigger that started it.
    pub on: bool,
    pub total_ms: u32,
    pub remaining_ms: u32,
    pub tick_ms: u32,
    pub curve: Curve,
    pub channels: Vec<Channel>,
    /// Pending wake-up, if one is scheduled.
    pub timer: Option<TimerHandle>,
}

impl TransitionRecord {
    /// Linear completion in [0, 1]; an instantaneous transition is complete.
    pub fn progress(&self) -> f32 {
        if self.total_ms == 0 || self.remaining_ms == 0 {
            return 1.0;
        }
        let remaining = self.remaining_ms.min(self.total_ms);
        (self.total_ms - remaining) as f32 / self.total_ms as f32
    }

    /// Interpolated values at the current progress.
    pub fn step(&self) -> Step {
        let progress = self.progress();
        let shaped = self.curve.apply(progress);
        Step {
            on: self.on,
            progress,
            shaped,
            remaining_ms: self.remaining_ms,
            values: self.channels.iter().map(|ch| ch.at(shaped)).collect(),
        }
    }
}

/// What an effect applies on one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub on: bool,
    /// Linear completion.
    pub progress: f32,
    /// Completion after the curve; the values below use this.
    pub shaped: f32,
    pub remaining_ms: u32,
    /// One value per channel, in the order `prepare` returned them.
    pub values: Vec<ChannelValue>,
}

impl Step {
    /// True on the tick that lands exactly on the end values.
    #[inline]
    pub fn is_final(&self) -> bool {
        self.remaining_ms == 0
    }

    pub fn value(&self, channel: usize) -> Option<ChannelValue> {
        self.values.get(channel).copied()
    }

    pub fn scalar(&self, channel: usize) -> Option<f32> {
        self.value(channel)?.as_scalar()
    }

    pub fn vector(&self, channel: usize) -> Option<glam::Vec3> {
        self.value(channel)?.as_vector()
    }

    pub fn color(&self, channel: usize) -> Option<gloam_engine::paint::Color> {
        self.value(channel)?.as_color()
    }
}
