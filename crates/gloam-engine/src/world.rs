//! Read-only queries against the host's world database.

use std::collections::{BTreeMap, HashMap};

use glam::Vec3;

use crate::ids::ObjectId;

/// A property field read from the host.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int(i32),
    Float(f32),
    Vector(Vec3),
    Text(String),
}

impl FieldValue {
    /// Numeric view of int and float fields.
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            FieldValue::Int(i) => Some(*i as f32),
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

/// World queries used by HUD elements.
///
/// An empty `field` names the property's whole value.
pub trait World {
    fn quest_var(&self, name: &str) -> Option<i32>;

    fn property_exists(&self, object: ObjectId, property: &str) -> bool;

    fn property_field(&self, object: ObjectId, property: &str, field: &str) -> Option<FieldValue>;

    /// World-space position of the object's origin.
    fn object_location(&self, object: ObjectId) -> Option<Vec3>;

    /// World-space axis-aligned bounds as `(min, max)`.
    fn object_bounds(&self, object: ObjectId) -> Option<(Vec3, Vec3)>;

    fn object_name(&self, object: ObjectId) -> Option<String>;

    fn object_description(&self, object: ObjectId) -> Option<String>;

    /// Looks `key` up in the localized string table `table`.
    fn localized(&self, table: &str, key: &str) -> Option<String>;

    fn find_object(&self, name: &str) -> Option<ObjectId>;
}

// ── MemoryWorld ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
struct ObjectRecord {
    name: Option<String>,
    description: Option<String>,
    location: Option<Vec3>,
    bounds: Option<(Vec3, Vec3)>,
    properties: BTreeMap<String, BTreeMap<String, FieldValue>>,
}

/// In-memory [`World`].
#[derive(Debug, Clone, Default)]
pub struct MemoryWorld {
    quest_vars: HashMap<String, i32>,
    objects: BTreeMap<ObjectId, ObjectRecord>,
    strings: HashMap<(String, String), String>,
}

impl MemoryWorld {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, object: ObjectId) -> &mut ObjectRecord {
        self.objects.entry(object).or_default()
    }

    pub fn set_quest_var(&mut self, name: &str, value: i32) {
        self.quest_vars.insert(name.to_ascii_lowercase(), value);
    }

    pub fn clear_quest_var(&mut self, name: &str) {
        self.quest_vars.remove(&name.to_ascii_lowercase());
    }

    /// Sets the object's name. Names are looked up case-insensitively.
    pub fn set_name(&mut self, object: ObjectId, name: &str) {
        self.record(object).name = Some(name.to_owned());
    }

    pub fn set_description(&mut self, object: ObjectId, description: &str) {
        self.record(object).description = Some(description.to_owned());
    }

    /// Places the object; bounds become a unit box around `location` unless set.
    pub fn set_location(&mut self, object: ObjectId, location: Vec3) {
        self.record(object).location = Some(location);
    }

    pub fn set_bounds(&mut self, object: ObjectId, min: Vec3, max: Vec3) {
        self.record(object).bounds = Some((min.min(max), min.max(max)));
    }

    pub fn set_field(&mut self, object: ObjectId, property: &str, field: &str, value: FieldValue) {
        self.record(object)
            .properties
            .entry(property.to_owned())
            .or_default()
            .insert(field.to_owned(), value);
    }

    pub fn remove_property(&mut self, object: ObjectId, property: &str) {
        self.record(object).properties.remove(property);
    }

    pub fn set_string(&mut self, table: &str, key: &str, text: &str) {
        self.strings
            .insert((table.to_ascii_lowercase(), key.to_ascii_lowercase()), text.to_owned());
    }
}

impl World for MemoryWorld {
    fn quest_var(&self, name: &str) -> Option<i32> {
        self.quest_vars.get(&name.to_ascii_lowercase()).copied()
    }

    fn property_exists(&self, object: ObjectId, property: &str) -> bool {
        self.objects.get(&object).is_some_and(|o| o.properties.contains_key(property))
    }

    fn property_field(&self, object: ObjectId, property: &str, field: &str) -> Option<FieldValue> {
        self.objects.get(&object)?.properties.get(property)?.get(field).cloned()
    }

    fn object_location(&self, object: ObjectId) -> Option<Vec3> {
        self.objects.get(&object)?.location
    }

    fn object_bounds(&self, object: ObjectId) -> Option<(Vec3, Vec3)> {
        let record = self.objects.get(&object)?;
        record
            .bounds
            .or_else(|| record.location.map(|l| (l - Vec3::splat(0.5), l + Vec3::splat(0.5))))
    }

    fn object_name(&self, object: ObjectId) -> Option<String> {
        self.objects.get(&object)?.name.clone()
    }

    fn object_description(&self, object: ObjectId) -> Option<String> {
        self.objects.get(&object)?.description.clone()
    }

    fn localized(&self, table: &str, key: &str) -> Option<String> {
        self.strings
            .get(&(table.to_ascii_lowercase(), key.to_ascii_lowercase()))
            .cloned()
    }

    fn find_object(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .find(|(_, o)| o.name.as_deref().is_some_and(|n| n.eq_ignore_ascii_case(name)))
            .map(|(id, _)| *id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOX: ObjectId = ObjectId(12);

    #[test]
    fn quest_vars_are_case_insensitive() {
        let mut w = MemoryWorld::new();
        w.set_quest_var("Loot_Total", 40);
        assert_eq!(w.quest_var("loot_total"), Some(40));
        w.clear_quest_var("LOOT_TOTAL");
        assert_eq!(w.quest_var("loot_total"), None);
    }

    #[test]
    fn property_fields() {
        let mut w = MemoryWorld::new();
        w.set_field(BOX, "HitPoints", "", FieldValue::Int(7));
        w.set_field(BOX, "Light", "brightness", FieldValue::Float(0.5));
        assert!(w.property_exists(BOX, "HitPoints"));
        assert!(!w.property_exists(BOX, "MAX_HP"));
        assert_eq!(w.property_field(BOX, "HitPoints", ""), Some(FieldValue::Int(7)));
        assert_eq!(w.property_field(BOX, "Light", "brightness").and_then(|f| f.as_f32()), Some(0.5));
        assert_eq!(w.property_field(BOX, "Light", "radius"), None);
        w.remove_property(BOX, "Light");
        assert!(!w.property_exists(BOX, "Light"));
    }

    #[test]
    fn bounds_default_around_location() {
        let mut w = MemoryWorld::new();
        w.set_location(BOX, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(w.object_bounds(BOX), Some((Vec3::new(0.5, 1.5, 2.5), Vec3::new(1.5, 2.5, 3.5))));
        w.set_bounds(BOX, Vec3::ONE, Vec3::ZERO);
        assert_eq!(w.object_bounds(BOX), Some((Vec3::ZERO, Vec3::ONE)));
        assert_eq!(w.object_bounds(ObjectId(99)), None);
    }

    #[test]
    fn names_and_strings() {
        let mut w = MemoryWorld::new();
        w.set_name(BOX, "LootChest");
        w.set_description(BOX, "A heavy chest");
        w.set_string("hud", "Health", "Health");
        assert_eq!(w.find_object("lootchest"), Some(BOX));
        assert_eq!(w.find_object("nothing"), None);
        assert_eq!(w.object_description(BOX).as_deref(), Some("A heavy chest"));
        assert_eq!(w.localized("HUD", "health").as_deref(), Some("Health"));
    }
}
