//! Entity grouping: folding one-row-per-level tables into entities.
//!
//! Exported tables repeat an entity's `Name` only on the first row of its
//! group. Every following row with a blank name is another level of that
//! entity. Rows that appear before the first named row belong to nothing and
//! are dropped.

use serde::{Deserialize, Serialize};

use crate::coerce::{self, BuildTimeFields, UpgradeTimeFields, coerce_int};
use crate::record::{EntityRecord, LevelRecord, Row};

/// Multiplier that places each category's ids in its own numeric namespace.
pub const ID_NAMESPACE: i64 = 1_000_000;

/// Id prefix used by the buildings table.
pub const BUILDING_ID_PREFIX: u32 = 1;

/// Synthetic id for the `index`-th named row of a table.
pub fn entity_id(prefix: u32, index: usize) -> i64 {
    i64::from(prefix) * ID_NAMESPACE + index as i64
}

// ── Cursor ──────────────────────────────────────────────────────────────────

/// Where the grouping fold currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    /// No named row seen yet.
    #[default]
    NoCurrentEntity,
    /// Rows attach to the entity at this index.
    HasCurrentEntity(usize),
}

/// What to do with a row after advancing the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    /// The row starts the entity at this index and is its first level.
    Start(usize),
    /// The row is another level of the entity at this index.
    Continue(usize),
    /// The row precedes every named row.
    Drop,
}

impl Cursor {
    /// Advance past one row. `named` is whether the row's `Name` is non-blank.
    pub fn advance(&mut self, named: bool) -> RowAction {
        match (*self, named) {
            (Cursor::NoCurrentEntity, false) => RowAction::Drop,
            (Cursor::NoCurrentEntity, true) => {
                *self = Cursor::HasCurrentEntity(0);
                RowAction::Start(0)
            }
            (Cursor::HasCurrentEntity(index), true) => {
                *self = Cursor::HasCurrentEntity(index + 1);
                RowAction::Start(index + 1)
            }
            (Cursor::HasCurrentEntity(index), false) => RowAction::Continue(index),
        }
    }
}

/// Shared fold behind every grouping variant.
///
/// `start` creates an entity from its named row and zero-based index;
/// `level` builds a level from a row and its one-based position within the
/// current entity.
fn fold_entities<S, L>(rows: &[Row], mut start: S, mut level: L) -> Vec<EntityRecord>
where
    S: FnMut(&Row, usize) -> EntityRecord,
    L: FnMut(&Row, i64) -> LevelRecord,
{
    let mut entities: Vec<EntityRecord> = Vec::new();
    let mut cursor = Cursor::default();

    for row in rows {
        let index = match cursor.advance(!row.name().is_empty()) {
            RowAction::Drop => continue,
            RowAction::Start(index) => {
                entities.push(start(row, index));
                index
            }
            RowAction::Continue(index) => index,
        };

        let entity = &mut entities[index];
        let ordinal = entity.levels.len() as i64 + 1;
        entity.levels.push(level(row, ordinal));
    }

    entities
}

// ── Generic grouping ────────────────────────────────────────────────────────

fn default_true() -> bool {
    true
}

/// How to turn the rows of one table into entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSpec {
    /// Id namespace; entities get no id when unset.
    #[serde(default)]
    pub id_prefix: Option<u32>,
    /// Column holding the level number. Levels are numbered 1, 2, 3... per
    /// entity when unset.
    #[serde(default)]
    pub level_field: Option<String>,
    /// Columns copied verbatim (as strings) into every level.
    #[serde(default)]
    pub level_fields: Vec<String>,
    /// Adds `upgradeTimeSeconds` to every level.
    #[serde(default)]
    pub upgrade_time: Option<UpgradeTimeFields>,
    /// Adds `buildTimeSeconds` to every level.
    #[serde(default)]
    pub build_time: Option<BuildTimeFields>,
    /// Copy the `TID` column onto the entity.
    #[serde(default = "default_true")]
    pub include_tid: bool,
}

impl Default for GroupSpec {
    fn default() -> Self {
        Self {
            id_prefix: None,
            level_field: None,
            level_fields: Vec::new(),
            upgrade_time: None,
            build_time: None,
            include_tid: true,
        }
    }
}

impl GroupSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id_prefix(mut self, prefix: u32) -> Self {
        self.id_prefix = Some(prefix);
        self
    }

    pub fn level_field(mut self, column: impl Into<String>) -> Self {
        self.level_field = Some(column.into());
        self
    }

    pub fn level_fields<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.level_fields = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn upgrade_time(mut self, hours: impl Into<String>, minutes: Option<&str>) -> Self {
        self.upgrade_time = Some(UpgradeTimeFields {
            hours: hours.into(),
            minutes: minutes.map(str::to_string),
        });
        self
    }

    pub fn build_time(mut self, fields: BuildTimeFields) -> Self {
        self.build_time = Some(fields);
        self
    }

    pub fn include_tid(mut self, include: bool) -> Self {
        self.include_tid = include;
        self
    }

    fn start_entity(&self, row: &Row, index: usize) -> EntityRecord {
        let mut entity = EntityRecord::new(row.name());
        if self.include_tid {
            entity.tid = Some(row.cell("TID").to_string());
        }
        entity.id = self.id_prefix.map(|prefix| entity_id(prefix, index));
        entity
    }

    fn build_level(&self, row: &Row, ordinal: i64) -> LevelRecord {
        let number = match &self.level_field {
            Some(column) => coerce_int(row.cell(column)),
            None => ordinal,
        };

        let mut level = LevelRecord::new(number);
        for column in &self.level_fields {
            level.insert(column.as_str(), row.cell(column));
        }
        if let Some(upgrade) = &self.upgrade_time {
            let minutes = upgrade.minutes.as_deref().map(|c| row.cell(c));
            level.insert(
                "upgradeTimeSeconds",
                coerce::upgrade_time_seconds(row.cell(&upgrade.hours), minutes),
            );
        }
        if let Some(build) = &self.build_time {
            level.insert("buildTimeSeconds", coerce::build_time_seconds(row, build));
        }
        level
    }
}

/// Group rows into entities according to `spec`.
pub fn group_rows(rows: &[Row], spec: &GroupSpec) -> Vec<EntityRecord> {
    fold_entities(
        rows,
        |row, index| spec.start_entity(row, index),
        |row, ordinal| spec.build_level(row, ordinal),
    )
}

// ── Buildings ───────────────────────────────────────────────────────────────

/// Group the buildings table.
///
/// Buildings always carry an id, `tid` and `buildingClass`, and every level
/// has a fixed, typed field set with the build duration folded into seconds.
pub fn group_buildings(rows: &[Row]) -> Vec<EntityRecord> {
    let build_time = BuildTimeFields::default();
    fold_entities(
        rows,
        |row, index| {
            let mut entity = EntityRecord::new(row.name());
            entity.id = Some(entity_id(BUILDING_ID_PREFIX, index));
            entity.tid = Some(row.cell("TID").to_string());
            entity.building_class = Some(row.cell("BuildingClass").to_string());
            entity
        },
        |row, _| {
            let mut level = LevelRecord::new(coerce_int(row.cell("BuildingLevel")));
            level.insert("exportName", row.cell("ExportName"));
            level.insert(
                "buildTimeSeconds",
                coerce::build_time_seconds(row, &build_time),
            );
            level.insert("buildResource", row.cell("BuildResource"));
            level.insert("buildCost", coerce_int(row.cell("BuildCost")));
            level.insert("townHallLevel", coerce_int(row.cell("TownHallLevel")));
            level
        },
    )
}

#[cfg(test)]
#[path = "tests/grouping_tests.rs"]
mod tests;
