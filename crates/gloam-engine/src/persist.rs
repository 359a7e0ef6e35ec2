//! Named slots that survive save and restore.
//!
//! The host owns the real save game; [`MemoryStore`] stands in for it and
//! can snapshot itself to RON text.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::PersistError;
use crate::ids::ObjectId;

/// One persisted value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Slot {
    Bool(bool),
    Int(i32),
    Float(f32),
    Vector([f32; 3]),
    Text(String),
}

/// Per-owner named slot storage.
pub trait Persistence {
    fn get(&self, owner: ObjectId, name: &str) -> Option<Slot>;
    fn set(&mut self, owner: ObjectId, name: &str, value: Slot);
    fn clear(&mut self, owner: ObjectId, name: &str);

    fn exists(&self, owner: ObjectId, name: &str) -> bool {
        self.get(owner, name).is_some()
    }

    /// Reads a `Text` slot. Other kinds are reported as an error.
    fn get_text(&self, owner: ObjectId, name: &str) -> Result<Option<String>, PersistError> {
        match self.get(owner, name) {
            None => Ok(None),
            Some(Slot::Text(text)) => Ok(Some(text)),
            Some(_) => Err(PersistError::WrongSlotKind { owner, name: name.to_owned() }),
        }
    }

    fn get_bool(&self, owner: ObjectId, name: &str) -> Option<bool> {
        match self.get(owner, name)? {
            Slot::Bool(b) => Some(b),
            Slot::Int(i) => Some(i != 0),
            _ => None,
        }
    }
}

// ── MemoryStore ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
struct SlotEntry {
    owner: ObjectId,
    name: String,
    value: Slot,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    slots: Vec<SlotEntry>,
}

/// In-memory [`Persistence`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    slots: BTreeMap<(ObjectId, String), Slot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Encodes every slot as RON text.
    pub fn save_ron(&self) -> Result<String, PersistError> {
        let snapshot = Snapshot {
            slots: self
                .slots
                .iter()
                .map(|((owner, name), value)| SlotEntry { owner: *owner, name: name.clone(), value: value.clone() })
                .collect(),
        };
        Ok(ron::ser::to_string_pretty(&snapshot, ron::ser::PrettyConfig::default())?)
    }

    /// Rebuilds a store from text produced by [`save_ron`](Self::save_ron).
    pub fn load_ron(text: &str) -> Result<Self, PersistError> {
        let snapshot: Snapshot = ron::from_str(text)?;
        let slots = snapshot.slots.into_iter().map(|e| ((e.owner, e.name), e.value)).collect();
        Ok(Self { slots })
    }
}

impl Persistence for MemoryStore {
    fn get(&self, owner: ObjectId, name: &str) -> Option<Slot> {
        self.slots.get(&(owner, name.to_owned())).cloned()
    }

    fn set(&mut self, owner: ObjectId, name: &str, value: Slot) {
        self.slots.insert((owner, name.to_owned()), value);
    }

    fn clear(&mut self, owner: ObjectId, name: &str) {
        self.slots.remove(&(owner, name.to_owned()));
    }
}
