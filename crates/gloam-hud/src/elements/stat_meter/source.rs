//! Where a stat meter's value, range and label come from.

use gloam_engine::ids::ObjectId;
use gloam_engine::world::{FieldValue, World};

/// String table that labels are looked up in.
pub const LABEL_TABLE: &str = "hud";

/// Vector component to read from a vector-valued property field.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Component {
    #[default]
    None,
    X,
    Y,
    Z,
}

impl Component {
    pub fn parse(raw: &str) -> Option<Component> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Some(Component::None),
            "x" => Some(Component::X),
            "y" => Some(Component::Y),
            "z" => Some(Component::Z),
            _ => None,
        }
    }
}

/// A quest variable, or a field of a property on some object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueSource {
    pub quest_var: String,
    pub property: String,
    pub field: String,
    pub component: Component,
    pub object: ObjectId,
}

impl ValueSource {
    /// Current raw value. An existing quest variable wins over the property.
    pub fn read(&self, world: &dyn World) -> Option<f32> {
        if !self.quest_var.is_empty() {
            if let Some(value) = world.quest_var(&self.quest_var) {
                return Some(value as f32);
            }
        }
        if self.property.is_empty() || !world.property_exists(self.object, &self.property) {
            return None;
        }
        match world.property_field(self.object, &self.property, &self.field)? {
            FieldValue::Int(i) => Some(i as f32),
            FieldValue::Float(f) => Some(f),
            FieldValue::Vector(v) => match self.component {
                Component::X => Some(v.x),
                Component::Y => Some(v.y),
                Component::Z => Some(v.z),
                Component::None => None,
            },
            FieldValue::Text(_) => None,
        }
    }

    /// Value range. Configured bounds win; with neither configured, some
    /// well-known properties supply their natural range.
    pub fn range(&self, min: Option<f32>, max: Option<f32>, world: &dyn World) -> (f32, f32) {
        if min.is_none() && max.is_none() && self.quest_var.is_empty() {
            if self.property == "AI_Visibility" && self.field == "Level" {
                return (0.0, 100.0);
            }
            if self.property == "HitPoints" {
                if let Some(max_hp) = world.property_field(self.object, "MAX_HP", "").and_then(|f| f.as_f32()) {
                    return (0.0, max_hp);
                }
            }
        }
        (min.unwrap_or(0.0), max.unwrap_or(1.0))
    }

    /// Resolves a label source: a `hud` string key, `@name`, `@description` or `@none`.
    ///
    /// `Err` carries a configuration warning; the label is then empty.
    pub fn label(&self, text: &str, world: &dyn World) -> Result<String, String> {
        let text = text.trim();
        if text.is_empty() || text == "@none" {
            return Ok(String::new());
        }
        if !text.starts_with('@') {
            return Ok(world.localized(LABEL_TABLE, text).unwrap_or_else(|| text.to_owned()));
        }
        match text {
            "@name" if !self.object.is_none() => Ok(world.object_name(self.object).unwrap_or_default()),
            "@name" => Ok(world.localized(LABEL_TABLE, &self.quest_var).unwrap_or_default()),
            "@description" if !self.object.is_none() => {
                Ok(world.object_description(self.object).unwrap_or_default())
            }
            "@description" => Err("\"@description\" is not a valid label for a quest variable statistic".into()),
            other => Err(format!("{other:?} is not a valid stat meter text source")),
        }
    }
}
