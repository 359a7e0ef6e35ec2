//! Named configuration parameters attached to host objects.
//!
//! Parameters are text in the host's object database (the "design note"),
//! resolved through archetype inheritance and converted on read. A value
//! that fails to convert logs a warning and yields the caller's default.

use std::collections::{BTreeMap, HashMap};

use glam::Vec3;

use crate::error::ParamError;
use crate::ids::ObjectId;
use crate::paint::Color;

/// Raw parameter storage with inheritance.
pub trait ParamSource {
    /// Raw text of `name` on `host` or the nearest ancestor that defines it.
    fn raw(&self, host: ObjectId, name: &str) -> Option<String>;

    /// Sets `name` directly on `host`.
    fn set_raw(&mut self, host: ObjectId, name: &str, value: String);

    /// Removes `name` from `host` (inherited values become visible again).
    fn clear(&mut self, host: ObjectId, name: &str);

    // ── settable subset ───────────────────────────────────────────────────

    fn set_bool(&mut self, host: ObjectId, name: &str, value: bool) {
        self.set_raw(host, name, value.to_string());
    }

    fn set_int(&mut self, host: ObjectId, name: &str, value: i32) {
        self.set_raw(host, name, value.to_string());
    }

    fn set_float(&mut self, host: ObjectId, name: &str, value: f32) {
        self.set_raw(host, name, value.to_string());
    }

    fn set_string(&mut self, host: ObjectId, name: &str, value: &str) {
        self.set_raw(host, name, value.to_owned());
    }
}

/// Conversion from parameter text.
pub trait FromParam: Sized {
    /// Human-readable kind, used in warnings.
    const KIND: &'static str;
    fn from_param(raw: &str) -> Option<Self>;
}

impl FromParam for bool {
    const KIND: &'static str = "boolean";
    fn from_param(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        }
    }
}

impl FromParam for i32 {
    const KIND: &'static str = "integer";
    fn from_param(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }
}

impl FromParam for f32 {
    const KIND: &'static str = "number";
    fn from_param(raw: &str) -> Option<Self> {
        raw.trim().parse::<f32>().ok().filter(|v| v.is_finite())
    }
}

impl FromParam for String {
    const KIND: &'static str = "string";
    fn from_param(raw: &str) -> Option<Self> {
        Some(raw.to_owned())
    }
}

impl FromParam for Color {
    const KIND: &'static str = "color";
    fn from_param(raw: &str) -> Option<Self> {
        Color::parse(raw)
    }
}

impl FromParam for Vec3 {
    const KIND: &'static str = "vector";
    fn from_param(raw: &str) -> Option<Self> {
        let mut parts = raw.split(',').map(|p| p.trim().parse::<f32>());
        let x = parts.next()?.ok()?;
        let y = parts.next()?.ok()?;
        let z = parts.next()?.ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Vec3::new(x, y, z))
    }
}

/// Parses a duration: plain milliseconds, or with an `ms`, `s` or `m` suffix.
pub fn parse_time_ms(raw: &str) -> Option<u32> {
    let raw = raw.trim().to_ascii_lowercase();
    let (number, scale) = if let Some(n) = raw.strip_suffix("ms") {
        (n, 1.0)
    } else if let Some(n) = raw.strip_suffix('s') {
        (n, 1000.0)
    } else if let Some(n) = raw.strip_suffix('m') {
        (n, 60_000.0)
    } else {
        (raw.as_str(), 1.0)
    };
    let value: f64 = number.trim().parse().ok()?;
    let ms = value * scale;
    if !ms.is_finite() || ms < 0.0 || ms > f64::from(u32::MAX) {
        return None;
    }
    Some(ms.round() as u32)
}

// ── ParamScope ────────────────────────────────────────────────────────────

/// Read access to one host object's parameters.
#[derive(Clone, Copy)]
pub struct ParamScope<'a> {
    source: &'a dyn ParamSource,
    host: ObjectId,
}

impl<'a> ParamScope<'a> {
    pub fn new(source: &'a dyn ParamSource, host: ObjectId) -> Self {
        Self { source, host }
    }

    #[inline]
    pub fn host(&self) -> ObjectId {
        self.host
    }

    pub fn exists(&self, name: &str) -> bool {
        self.source.raw(self.host, name).is_some()
    }

    /// Typed value, or `None` when absent or malformed (malformed values warn).
    pub fn get_opt<T: FromParam>(&self, name: &str) -> Option<T> {
        let raw = self.source.raw(self.host, name)?;
        let value = T::from_param(&raw);
        if value.is_none() {
            log::warn!("{}: parameter {name} = {raw:?} is not a valid {}", self.host, T::KIND);
        }
        value
    }

    pub fn get<T: FromParam>(&self, name: &str, default: T) -> T {
        self.get_opt(name).unwrap_or(default)
    }

    pub fn get_bool(&self, name: &str, default: bool) -> bool {
        self.get(name, default)
    }

    pub fn get_int(&self, name: &str, default: i32) -> i32 {
        self.get(name, default)
    }

    pub fn get_float(&self, name: &str, default: f32) -> f32 {
        self.get(name, default)
    }

    pub fn get_string(&self, name: &str, default: &str) -> String {
        self.source.raw(self.host, name).unwrap_or_else(|| default.to_owned())
    }

    pub fn get_color(&self, name: &str, default: Color) -> Color {
        self.get(name, default)
    }

    pub fn get_vector(&self, name: &str, default: Vec3) -> Vec3 {
        self.get(name, default)
    }

    /// Object reference: `self`, a numeric id, or a name passed to `resolve`.
    pub fn get_object(
        &self,
        name: &str,
        default: ObjectId,
        resolve: impl FnOnce(&str) -> Option<ObjectId>,
    ) -> ObjectId {
        let Some(raw) = self.source.raw(self.host, name) else {
            return default;
        };
        let text = raw.trim();
        if text.is_empty() || text.eq_ignore_ascii_case("self") {
            return self.host;
        }
        if let Ok(id) = text.parse::<i32>() {
            return ObjectId(id);
        }
        resolve(text).unwrap_or_else(|| {
            log::warn!("{}: parameter {name} names unknown object {text:?}", self.host);
            default
        })
    }

    /// Duration in milliseconds.
    pub fn get_time(&self, name: &str, default_ms: u32) -> u32 {
        let Some(raw) = self.source.raw(self.host, name) else {
            return default_ms;
        };
        parse_time_ms(&raw).unwrap_or_else(|| {
            log::warn!("{}: parameter {name} = {raw:?} is not a valid duration", self.host);
            default_ms
        })
    }
}

// ── DesignNoteParams ──────────────────────────────────────────────────────

/// Inheritance chains deeper than this are treated as cycles.
const MAX_INHERITANCE_DEPTH: usize = 32;

/// In-memory parameter source fed from design-note text.
///
/// Names are case-insensitive. Each object may name one archetype; lookups
/// walk the archetype chain until a definition is found.
#[derive(Debug, Clone, Default)]
pub struct DesignNoteParams {
    notes: HashMap<ObjectId, BTreeMap<String, String>>,
    archetypes: HashMap<ObjectId, ObjectId>,
}

impl DesignNoteParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `object` inherit parameters from `archetype`.
    pub fn set_archetype(&mut self, object: ObjectId, archetype: ObjectId) {
        self.archetypes.insert(object, archetype);
    }

    /// Replaces every parameter set directly on `host` with those in `note`.
    pub fn set_design_note(&mut self, host: ObjectId, note: &str) -> Result<(), ParamError> {
        let parsed = parse_design_note(note)?;
        self.notes.insert(host, parsed.into_iter().map(|(k, v)| (k.to_ascii_lowercase(), v)).collect());
        Ok(())
    }

    /// Encodes the parameters set directly on `host` back to design-note text.
    pub fn design_note(&self, host: ObjectId) -> String {
        let Some(values) = self.notes.get(&host) else {
            return String::new();
        };
        values
            .iter()
            .map(|(k, v)| {
                if v.contains(';') || v.contains('=') || v.trim() != v {
                    format!("{k}=\"{v}\"")
                } else {
                    format!("{k}={v}")
                }
            })
            .collect::<Vec<_>>()
            .join(";")
    }
}

impl ParamSource for DesignNoteParams {
    fn raw(&self, host: ObjectId, name: &str) -> Option<String> {
        let key = name.to_ascii_lowercase();
        let mut current = host;
        for _ in 0..MAX_INHERITANCE_DEPTH {
            if let Some(value) = self.notes.get(&current).and_then(|n| n.get(&key)) {
                return Some(value.clone());
            }
            current = *self.archetypes.get(&current)?;
        }
        log::warn!("{host}: archetype chain too deep while resolving {name}");
        None
    }

    fn set_raw(&mut self, host: ObjectId, name: &str, value: String) {
        self.notes.entry(host).or_default().insert(name.to_ascii_lowercase(), value);
    }

    fn clear(&mut self, host: ObjectId, name: &str) {
        if let Some(values) = self.notes.get_mut(&host) {
            values.remove(&name.to_ascii_lowercase());
        }
    }
}

/// Splits `key=value;key2="quoted; value"` into pairs, in order.
pub fn parse_design_note(note: &str) -> Result<Vec<(String, String)>, ParamError> {
    let mut entries = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in note.chars() {
        match quote {
            Some(q) if c == q => {
                quote = None;
                current.push(c);
            }
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                current.push(c);
            }
            None if c == ';' => entries.push(std::mem::take(&mut current)),
            None => current.push(c),
        }
    }
    if quote.is_some() {
        return Err(ParamError::UnterminatedQuote(current.trim().to_owned()));
    }
    entries.push(current);

    let mut pairs = Vec::new();
    for entry in entries {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let Some((name, value)) = entry.split_once('=') else {
            return Err(ParamError::MissingSeparator(entry.to_owned()));
        };
        let name = name.trim();
        if name.is_empty() {
            return Err(ParamError::EmptyName(entry.to_owned()));
        }
        pairs.push((name.to_owned(), unquote(value.trim()).to_owned()));
    }
    Ok(pairs)
}

fn unquote(value: &str) -> &str {
    for q in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(q) && value.ends_with(q) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOST: ObjectId = ObjectId(10);
    const ARCHETYPE: ObjectId = ObjectId(-5);

    fn params(note: &str) -> DesignNoteParams {
        let mut p = DesignNoteParams::new();
        p.set_design_note(HOST, note).unwrap();
        p
    }

    // ── parsing ───────────────────────────────────────────────────────────

    #[test]
    fn parse_pairs_and_quotes() {
        let pairs = parse_design_note(r#"a=1; b = two ;c="x;y=z"; d='q'"#).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("a".into(), "1".into()),
                ("b".into(), "two".into()),
                ("c".into(), "x;y=z".into()),
                ("d".into(), "q".into()),
            ]
        );
    }

    #[test]
    fn parse_errors() {
        assert_eq!(parse_design_note("novalue"), Err(ParamError::MissingSeparator("novalue".into())));
        assert_eq!(parse_design_note("=3"), Err(ParamError::EmptyName("=3".into())));
        assert!(matches!(parse_design_note("a=\"open"), Err(ParamError::UnterminatedQuote(_))));
    }

    #[test]
    fn parse_ignores_empty_entries() {
        assert_eq!(parse_design_note(";;a=1;").unwrap().len(), 1);
        assert!(parse_design_note("").unwrap().is_empty());
    }

    // ── typed access ──────────────────────────────────────────────────────

    #[test]
    fn typed_getters_with_defaults() {
        let p = params("flag=yes;count=7;ratio=0.25;tint=#00ff00;wind=1,2,3;name=hello");
        let scope = ParamScope::new(&p, HOST);
        assert!(scope.get_bool("flag", false));
        assert_eq!(scope.get_int("count", 0), 7);
        assert_eq!(scope.get_float("ratio", 0.0), 0.25);
        assert_eq!(scope.get_color("tint", Color::BLACK), Color::GREEN);
        assert_eq!(scope.get_vector("wind", Vec3::ZERO), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(scope.get_string("name", ""), "hello");
        assert_eq!(scope.get_int("missing", -1), -1);
    }

    #[test]
    fn malformed_value_falls_back_to_default() {
        let p = params("count=seven;flag=maybe");
        let scope = ParamScope::new(&p, HOST);
        assert_eq!(scope.get_int("count", 3), 3);
        assert!(scope.get_bool("flag", true));
        assert!(scope.exists("count"));
    }

    #[test]
    fn names_are_case_insensitive() {
        let p = params("Stat_Meter_Style=units");
        assert_eq!(ParamScope::new(&p, HOST).get_string("stat_meter_style", ""), "units");
    }

    #[test]
    fn time_values() {
        assert_eq!(parse_time_ms("250"), Some(250));
        assert_eq!(parse_time_ms("40ms"), Some(40));
        assert_eq!(parse_time_ms("1.5s"), Some(1500));
        assert_eq!(parse_time_ms("2m"), Some(120_000));
        assert_eq!(parse_time_ms("-1"), None);
        assert_eq!(parse_time_ms("soon"), None);

        let p = params("transition=3s;bad=later");
        let scope = ParamScope::new(&p, HOST);
        assert_eq!(scope.get_time("transition", 0), 3000);
        assert_eq!(scope.get_time("bad", 7), 7);
        assert_eq!(scope.get_time("missing", 9), 9);
    }

    #[test]
    fn object_references() {
        let p = params("a=self;b=42;c=Lamp;d=Ghost");
        let scope = ParamScope::new(&p, HOST);
        let lookup = |n: &str| (n == "Lamp").then_some(ObjectId(7));
        assert_eq!(scope.get_object("a", ObjectId::NONE, lookup), HOST);
        assert_eq!(scope.get_object("b", ObjectId::NONE, lookup), ObjectId(42));
        assert_eq!(scope.get_object("c", ObjectId::NONE, lookup), ObjectId(7));
        assert_eq!(scope.get_object("d", ObjectId(1), lookup), ObjectId(1));
        assert_eq!(scope.get_object("missing", ObjectId(2), lookup), ObjectId(2));
    }

    // ── inheritance / setters ─────────────────────────────────────────────

    #[test]
    fn inherits_from_archetype_and_overrides() {
        let mut p = DesignNoteParams::new();
        p.set_design_note(ARCHETYPE, "color=red;size=4").unwrap();
        p.set_design_note(HOST, "size=9").unwrap();
        p.set_archetype(HOST, ARCHETYPE);

        let scope = ParamScope::new(&p, HOST);
        assert_eq!(scope.get_color("color", Color::BLACK), Color::RED);
        assert_eq!(scope.get_int("size", 0), 9);

        p.clear(HOST, "size");
        assert_eq!(ParamScope::new(&p, HOST).get_int("size", 0), 4);
    }

    #[test]
    fn archetype_cycle_terminates() {
        let mut p = DesignNoteParams::new();
        p.set_archetype(ObjectId(1), ObjectId(2));
        p.set_archetype(ObjectId(2), ObjectId(1));
        assert_eq!(p.raw(ObjectId(1), "anything"), None);
    }

    #[test]
    fn settable_subset_round_trips() {
        let mut p = DesignNoteParams::new();
        p.set_bool(HOST, "on", true);
        p.set_int(HOST, "n", -4);
        p.set_float(HOST, "f", 1.5);
        p.set_string(HOST, "s", "a;b");

        let scope = ParamScope::new(&p, HOST);
        assert!(scope.get_bool("on", false));
        assert_eq!(scope.get_int("n", 0), -4);
        assert_eq!(scope.get_float("f", 0.0), 1.5);

        let note = p.design_note(HOST);
        let mut again = DesignNoteParams::new();
        again.set_design_note(HOST, &note).unwrap();
        assert_eq!(ParamScope::new(&again, HOST).get_string("s", ""), "a;b");
    }
}
