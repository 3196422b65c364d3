//! Persisted internal-name → display metadata maps.
//!
//! A name map is a JSON object keyed by an entity's internal name. Humans
//! edit display names by hand between runs, so merging new entities in must
//! never overwrite a field that is already present. Files are kept in their
//! existing key order; new keys are appended.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ExtractError;
use crate::json::write_json;
use crate::record::EntityRecord;

pub const DISPLAY_NAME: &str = "displayName";
pub const INTERNAL_NAME: &str = "internalName";
pub const ID: &str = "id";

/// In-memory name map, in file order.
pub type NameMap = Map<String, Value>;

/// How entities are merged into an existing name map.
///
/// Both behaviours exist in the exported data's history: one copy of the
/// pipeline fills in missing fields on known keys, the other only ever adds
/// new keys and never writes `displayName`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergePolicy {
    /// Insert `{displayName, internalName, id}` for new keys and fill in any
    /// of those fields that are missing on existing keys.
    #[default]
    #[serde(alias = "fill-missing")]
    FillMissingFields,
    /// Insert `{internalName, id}` for new keys; existing keys are untouched.
    InsertOnly,
}

impl fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergePolicy::FillMissingFields => f.write_str("fill-missing-fields"),
            MergePolicy::InsertOnly => f.write_str("insert-only"),
        }
    }
}

impl FromStr for MergePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fill-missing" | "fill-missing-fields" => Ok(MergePolicy::FillMissingFields),
            "insert-only" => Ok(MergePolicy::InsertOnly),
            other => Err(format!(
                "unknown merge policy '{other}' (expected fill-missing or insert-only)"
            )),
        }
    }
}

/// Counts from one merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
}

/// Load a name map, treating a missing, unreadable or malformed file as empty.
pub fn load_name_map(path: &Path) -> NameMap {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return NameMap::new(),
        Err(e) => {
            log::warn!(
                "Could not read name map {}: {e}; starting from an empty map",
                path.display()
            );
            return NameMap::new();
        }
    };

    match serde_json::from_str::<Value>(&contents) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            log::warn!(
                "Name map {} is not a JSON object; starting from an empty map",
                path.display()
            );
            NameMap::new()
        }
        Err(e) => {
            log::warn!(
                "Name map {} is not valid JSON ({e}); starting from an empty map",
                path.display()
            );
            NameMap::new()
        }
    }
}

fn new_entry(name: &str, id: Option<i64>, policy: MergePolicy) -> Value {
    let mut fields = Map::new();
    if policy == MergePolicy::FillMissingFields {
        fields.insert(DISPLAY_NAME.to_string(), Value::from(name));
    }
    fields.insert(INTERNAL_NAME.to_string(), Value::from(name));
    if let Some(id) = id {
        fields.insert(ID.to_string(), Value::from(id));
    }
    Value::Object(fields)
}

fn fill_missing(fields: &mut Map<String, Value>, key: &str, value: Value) -> bool {
    if fields.contains_key(key) {
        return false;
    }
    fields.insert(key.to_string(), value);
    true
}

/// Merge entities into `map` according to `policy`.
///
/// Entities with a blank internal name are ignored. Entries that are not
/// JSON objects are left as they are.
pub fn merge_entities(
    map: &mut NameMap,
    entities: &[EntityRecord],
    policy: MergePolicy,
) -> MergeStats {
    let mut stats = MergeStats::default();

    for entity in entities {
        let name = entity.internal_name.trim();
        if name.is_empty() {
            continue;
        }

        if !map.contains_key(name) {
            map.insert(name.to_string(), new_entry(name, entity.id, policy));
            stats.inserted += 1;
            continue;
        }

        let fields = match (policy, map.get_mut(name).and_then(Value::as_object_mut)) {
            (MergePolicy::FillMissingFields, Some(fields)) => fields,
            _ => {
                stats.unchanged += 1;
                continue;
            }
        };

        let mut changed = fill_missing(fields, DISPLAY_NAME, Value::from(name));
        changed |= fill_missing(fields, INTERNAL_NAME, Value::from(name));
        if let Some(id) = entity.id {
            changed |= fill_missing(fields, ID, Value::from(id));
        }

        if changed {
            stats.updated += 1;
        } else {
            stats.unchanged += 1;
        }
    }

    stats
}

/// Load the map at `path`, merge `entities` into it and write it back.
pub fn update_name_map(
    path: &Path,
    entities: &[EntityRecord],
    policy: MergePolicy,
) -> Result<MergeStats, ExtractError> {
    let mut map = load_name_map(path);
    let stats = merge_entities(&mut map, entities, policy);
    write_json(path, &map)?;
    log::debug!(
        "Name map {}: {} inserted, {} updated, {} unchanged ({policy})",
        path.display(),
        stats.inserted,
        stats.updated,
        stats.unchanged,
    );
    Ok(stats)
}

/// Exchange `displayName` and `internalName` on every entry of the map at
/// `path`. Returns the number of entries swapped.
///
/// A field missing on one side becomes `null` on the other.
pub fn swap_names(path: &Path) -> Result<usize, ExtractError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ExtractError::missing_map(path.display().to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    let mut map = match serde_json::from_str::<Value>(&contents)? {
        Value::Object(map) => map,
        _ => {
            return Err(ExtractError::invalid_map(format!(
                "expected a top-level JSON object in {}",
                path.display()
            )));
        }
    };

    let mut swapped = 0;
    for entry in map.values_mut() {
        let Some(fields) = entry.as_object_mut() else {
            continue;
        };
        let display = fields.get(DISPLAY_NAME).cloned().unwrap_or(Value::Null);
        let internal = fields.get(INTERNAL_NAME).cloned().unwrap_or(Value::Null);
        fields.insert(DISPLAY_NAME.to_string(), internal);
        fields.insert(INTERNAL_NAME.to_string(), display);
        swapped += 1;
    }

    write_json(path, &map)?;
    Ok(swapped)
}

#[cfg(test)]
#[path = "tests/name_map_tests.rs"]
mod tests;
