use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use gloam_engine::ids::ObjectId;
use gloam_engine::params::{ParamScope, ParamSource};
use gloam_engine::persist::{Persistence, Slot};
use gloam_engine::time::{TimerService, WakeUp};

use crate::channel::{Channel, ChannelPair};
use crate::curve::Curve;
use crate::effect::{ResumePolicy, TransitionHost};
use crate::error::TransitionError;
use crate::record::TransitionRecord;

/// Name of the wake-up message that drives ticks.
pub const TIMER_NAME: &str = "Increment";
/// Slot holding the saved arena, owned by [`ObjectId::NONE`].
pub const SAVE_SLOT: &str = "transitions";
/// Time parameter giving the transition length.
pub const DURATION_PARAM: &str = "transition";
pub const CURVE_PARAM: &str = "curve";

/// Identity of one effect within a [`TransitionEngine`].
///
/// Echoed back as the tag of every wake-up the engine schedules.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EffectId(pub u64);

impl std::fmt::Display for EffectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "effect {}", self.0)
    }
}

/// Host services a transition needs while it runs.
pub struct TransitionCtx<'a> {
    pub timers: &'a mut dyn TimerService,
    pub params: &'a dyn ParamSource,
}

impl<'a> TransitionCtx<'a> {
    pub fn new(timers: &'a mut dyn TimerService, params: &'a dyn ParamSource) -> Self {
        Self { timers, params }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SavedTransition {
    effect: EffectId,
    record: TransitionRecord,
}

// ── TransitionEngine ──────────────────────────────────────────────────────

/// Arena of running transitions keyed by effect.
///
/// An effect with no record is idle. Each record owns at most one pending
/// wake-up; a new trigger cancels it before scheduling its own.
#[derive(Debug, Default)]
pub struct TransitionEngine {
    records: BTreeMap<EffectId, TransitionRecord>,
}

impl TransitionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Effects with a transition in progress, in id order.
    pub fn running(&self) -> impl Iterator<Item = EffectId> + '_ {
        self.records.keys().copied()
    }

    pub fn record(&self, id: EffectId) -> Option<&TransitionRecord> {
        self.records.get(&id)
    }

    #[inline]
    pub fn is_running(&self, id: EffectId) -> bool {
        self.records.contains_key(&id)
    }

    /// Linear completion of `id`'s transition. Idle effects report 1.0.
    pub fn progress(&self, id: EffectId) -> f32 {
        self.records.get(&id).map_or(1.0, TransitionRecord::progress)
    }

    /// The effect a wake-up is addressed to, if it is one of ours.
    pub fn target(wake: &WakeUp) -> Option<EffectId> {
        (wake.name == TIMER_NAME).then_some(EffectId(wake.tag))
    }

    // ── driving ───────────────────────────────────────────────────────────

    /// Starts a transition for `effect` in direction `on`, replacing any
    /// transition it already has. The first tick is applied immediately.
    ///
    /// Returns `false` when the effect has nothing to transition; any
    /// running transition is then left alone.
    pub fn trigger(
        &mut self,
        id: EffectId,
        owner: ObjectId,
        on: bool,
        effect: &mut dyn TransitionHost,
        ctx: &mut TransitionCtx<'_>,
    ) -> bool {
        let scope = ParamScope::new(ctx.params, owner);
        let Some(pairs) = effect.prepare(on, &scope) else {
            log::debug!("{owner}: {id} declined to transition");
            return false;
        };
        if pairs.iter().all(|p| p.end.is_none()) {
            log::debug!("{owner}: {id} has no target values");
            return false;
        }

        let channels = pairs.iter().enumerate().map(|(i, pair)| resolve(owner, i, pair)).collect();
        let total_ms = scope.get_time(DURATION_PARAM, 0);
        let curve = read_curve(&scope);

        self.cancel(id, ctx.timers);
        self.records.insert(
            id,
            TransitionRecord {
                owner,
                on,
                total_ms,
                remaining_ms: total_ms,
                tick_ms: effect.tick_ms().max(1),
                curve,
                channels,
                timer: None,
            },
        );
        log::debug!("{owner}: {id} transitioning {} over {total_ms}ms", if on { "on" } else { "off" });
        self.increment(id, effect, ctx.timers);
        true
    }

    /// Delivers a wake-up. `effect` must be the one [`target`](Self::target)
    /// names. Wake-ups with a foreign name, an unknown tag or a superseded
    /// handle are ignored and return `false`.
    pub fn on_timer(&mut self, wake: &WakeUp, effect: &mut dyn TransitionHost, ctx: &mut TransitionCtx<'_>) -> bool {
        let Some(id) = Self::target(wake) else {
            return false;
        };
        let Some(record) = self.records.get_mut(&id) else {
            log::trace!("{id}: wake-up after the transition ended");
            return false;
        };
        if record.timer != Some(wake.handle) {
            log::trace!("{id}: ignoring stale wake-up {:?}", wake.handle);
            return false;
        }
        record.timer = None;
        self.increment(id, effect, ctx.timers);
        true
    }

    /// Stops `id`'s transition where it is. Returns whether one was running.
    pub fn cancel(&mut self, id: EffectId, timers: &mut dyn TimerService) -> bool {
        let Some(record) = self.records.remove(&id) else {
            return false;
        };
        if let Some(timer) = record.timer {
            timers.cancel(timer);
        }
        true
    }

    fn increment(&mut self, id: EffectId, effect: &mut dyn TransitionHost, timers: &mut dyn TimerService) {
        let Some(record) = self.records.get_mut(&id) else {
            return;
        };
        let step = record.step();
        if effect.step(&step) && record.remaining_ms > 0 {
            record.remaining_ms = record.remaining_ms.saturating_sub(record.tick_ms);
            record.timer = Some(timers.schedule(TIMER_NAME, record.tick_ms, id.0));
        } else {
            self.cancel(id, timers);
        }
    }

    // ── save / restore ────────────────────────────────────────────────────

    /// Writes every running transition to [`SAVE_SLOT`].
    pub fn save(&self, store: &mut dyn Persistence) -> Result<(), TransitionError> {
        if self.records.is_empty() {
            store.clear(ObjectId::NONE, SAVE_SLOT);
            return Ok(());
        }
        let saved: Vec<SavedTransition> = self
            .records
            .iter()
            .map(|(&effect, record)| SavedTransition { effect, record: record.clone() })
            .collect();
        store.set(ObjectId::NONE, SAVE_SLOT, Slot::Text(ron::to_string(&saved)?));
        Ok(())
    }

    /// Rebuilds the arena from [`SAVE_SLOT`]. No timers are touched; call
    /// [`after_restore`](Self::after_restore) for each effect once it exists.
    pub fn restore(store: &dyn Persistence) -> Result<Self, TransitionError> {
        let Some(text) = store.get_text(ObjectId::NONE, SAVE_SLOT)? else {
            return Ok(Self::new());
        };
        let saved: Vec<SavedTransition> = ron::from_str(&text)?;
        let records = saved
            .into_iter()
            .map(|SavedTransition { effect, mut record }| {
                record.remaining_ms = record.remaining_ms.min(record.total_ms);
                record.tick_ms = record.tick_ms.max(1);
                (effect, record)
            })
            .collect();
        Ok(Self { records })
    }

    /// Resumes `id` according to its effect's [`ResumePolicy`].
    ///
    /// Any wake-up saved with the record is replaced, so it does not matter
    /// whether the timer service was restored too.
    pub fn after_restore(&mut self, id: EffectId, effect: &mut dyn TransitionHost, ctx: &mut TransitionCtx<'_>) -> bool {
        let Some(record) = self.records.get_mut(&id) else {
            return false;
        };
        if let Some(timer) = record.timer.take() {
            ctx.timers.cancel(timer);
        }
        match effect.resume_policy() {
            ResumePolicy::Continue => {
                record.timer = Some(ctx.timers.schedule(TIMER_NAME, record.tick_ms, id.0));
                log::debug!("{id}: resuming with {}ms left", record.remaining_ms);
            }
            ResumePolicy::Complete => {
                record.remaining_ms = 0;
                log::debug!("{id}: completing on restore");
                self.increment(id, effect, ctx.timers);
            }
        }
        true
    }
}

/// Missing or mismatched ends hold the channel at its start.
fn resolve(owner: ObjectId, index: usize, pair: &ChannelPair) -> Channel {
    let end = match pair.end {
        Some(end) if end.same_kind(&pair.start) => end,
        Some(end) => {
            log::warn!(
                "{owner}: transition channel {index} goes from a {} to a {}; holding it",
                pair.start.kind(),
                end.kind()
            );
            pair.start
        }
        None => pair.start,
    };
    Channel { start: pair.start, end }
}

fn read_curve(scope: &ParamScope<'_>) -> Curve {
    let raw = scope.get_string(CURVE_PARAM, "");
    raw.parse().unwrap_or_else(|e| {
        log::warn!("{}: {e}, using linear", scope.host());
        Curve::Linear
    })
}
