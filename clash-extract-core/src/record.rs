//! Data model for converted tables.
//!
//! Rows come straight from the CSV reader; entities, levels and town-hall
//! records are what gets written out as JSON. Field order inside levels and
//! town-hall counts is significant, so those use [`FieldMap`] rather than a
//! hash map.

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ── Row ─────────────────────────────────────────────────────────────────────

/// One data line of a table, keyed by column name. Values are already trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: HashMap<String, String>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a cell value. A later value for the same column replaces the earlier one.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.cells.insert(column.into(), value.into());
    }

    /// Raw cell lookup; `None` when the column is not part of the table.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    /// Trimmed cell value, or `""` for absent columns.
    pub fn cell(&self, column: &str) -> &str {
        self.get(column).map(str::trim).unwrap_or("")
    }

    /// The `Name` column. A blank name marks a continuation row.
    pub fn name(&self) -> &str {
        self.cell("Name")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.set(k, v);
        }
        row
    }
}

// ── FieldMap ────────────────────────────────────────────────────────────────

/// Insertion-ordered string-keyed map, serialized as a JSON object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for FieldMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> FieldMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value. Replacing an existing key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<V: Serialize> Serialize for FieldMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for FieldMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldMapVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for FieldMapVisitor<V> {
            type Value = FieldMap<V>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = FieldMap::new();
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    map.insert(key, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(FieldMapVisitor(PhantomData))
    }
}

// ── Levels ──────────────────────────────────────────────────────────────────

/// A single value inside a level record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LevelValue {
    Int(i64),
    Text(String),
}

impl LevelValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            LevelValue::Int(n) => Some(*n),
            LevelValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            LevelValue::Text(s) => Some(s),
            LevelValue::Int(_) => None,
        }
    }
}

impl From<i64> for LevelValue {
    fn from(n: i64) -> Self {
        LevelValue::Int(n)
    }
}

impl From<String> for LevelValue {
    fn from(s: String) -> Self {
        LevelValue::Text(s)
    }
}

impl From<&str> for LevelValue {
    fn from(s: &str) -> Self {
        LevelValue::Text(s.to_string())
    }
}

/// One upgrade/build tier of an entity. The first field is always `level`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelRecord {
    fields: FieldMap<LevelValue>,
}

impl LevelRecord {
    pub fn new(level: i64) -> Self {
        let mut fields = FieldMap::new();
        fields.insert("level", LevelValue::Int(level));
        Self { fields }
    }

    pub fn level(&self) -> Option<i64> {
        self.fields.get("level").and_then(LevelValue::as_int)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<LevelValue>) {
        self.fields.insert(key, value.into());
    }

    pub fn get(&self, key: &str) -> Option<&LevelValue> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> &FieldMap<LevelValue> {
        &self.fields
    }
}

// ── Entities ────────────────────────────────────────────────────────────────

/// A game object aggregated from one named row and its continuation rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub internal_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building_class: Option<String>,
    #[serde(default)]
    pub levels: Vec<LevelRecord>,
}

impl EntityRecord {
    pub fn new(internal_name: impl Into<String>) -> Self {
        Self {
            id: None,
            internal_name: internal_name.into(),
            tid: None,
            building_class: None,
            levels: Vec::new(),
        }
    }
}

// ── Town hall ───────────────────────────────────────────────────────────────

/// Per-town-hall-level building counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TownHallLevel {
    pub town_hall_level: i64,
    pub counts: FieldMap<i64>,
}
