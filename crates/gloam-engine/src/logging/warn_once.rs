use std::collections::HashSet;

use crate::ids::ObjectId;

/// Remembers which `(owner, key)` diagnostics were already reported.
///
/// Post-simulation checks run every step; a misconfigured element should
/// produce one warning, not one per step.
#[derive(Debug, Clone, Default)]
pub struct WarnOnce {
    seen: HashSet<(ObjectId, &'static str)>,
}

impl WarnOnce {
    pub fn new() -> Self {
        Self::default()
    }

    /// Logs `message` at warn level unless it was already logged for this pair.
    /// Returns whether it was logged.
    pub fn warn(&mut self, owner: ObjectId, key: &'static str, message: impl FnOnce() -> String) -> bool {
        if !self.seen.insert((owner, key)) {
            return false;
        }
        log::warn!("{owner}: {}", message());
        true
    }

    /// Forgets `key` for `owner` so the next failure is reported again.
    pub fn reset(&mut self, owner: ObjectId, key: &'static str) {
        self.seen.remove(&(owner, key));
    }

    /// Forgets everything reported for `owner`.
    pub fn reset_owner(&mut self, owner: ObjectId) {
        self.seen.retain(|(o, _)| *o != owner);
    }
}
