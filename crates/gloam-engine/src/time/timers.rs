use serde::{Deserialize, Serialize};

/// Identifies one scheduled wake-up.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerHandle(pub u64);

/// A delivered wake-up message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WakeUp {
    pub handle: TimerHandle,
    pub name: String,
    /// Caller-chosen identity, echoed back unchanged.
    pub tag: u64,
}

/// One-shot timed messages, as provided by the host's dispatcher.
pub trait TimerService {
    /// Schedules `name` to be delivered after `delay_ms`.
    fn schedule(&mut self, name: &str, delay_ms: u32, tag: u64) -> TimerHandle;

    /// Cancels a pending wake-up. Unknown or already-fired handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Pending {
    due_ms: u64,
    wake: WakeUp,
}

/// Deterministic timer service driven by explicit [`advance`](Self::advance) calls.
///
/// Serializable, so pending wake-ups survive a snapshot/restore together with
/// whatever scheduled them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualTimers {
    now_ms: u64,
    next_handle: u64,
    pending: Vec<Pending>,
}

impl ManualTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|p| p.wake.handle == handle)
    }

    /// Moves time forward and returns every wake-up now due, earliest first.
    ///
    /// Wake-ups due at the same instant keep scheduling order.
    pub fn advance(&mut self, ms: u64) -> Vec<WakeUp> {
        self.now_ms += ms;
        let now = self.now_ms;

        let mut due: Vec<Pending> = Vec::new();
        self.pending.retain(|p| {
            if p.due_ms <= now {
                due.push(p.clone());
                false
            } else {
                true
            }
        });
        due.sort_by_key(|p| (p.due_ms, p.wake.handle.0));
        due.into_iter().map(|p| p.wake).collect()
    }
}

impl TimerService for ManualTimers {
    fn schedule(&mut self, name: &str, delay_ms: u32, tag: u64) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.pending.push(Pending {
            due_ms: self.now_ms + u64::from(delay_ms),
            wake: WakeUp { handle, name: name.to_owned(), tag },
        });
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.pending.retain(|p| p.wake.handle != handle);
    }
}
