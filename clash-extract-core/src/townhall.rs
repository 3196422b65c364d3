//! Town-hall unlock counts.
//!
//! The town-hall table has one row per town-hall level and one column per
//! building, starting at `Troop Housing`. A blank cell means "same as the
//! previous level", so counts are carried forward row to row.

use crate::coerce::coerce_int;
use crate::record::{FieldMap, TownHallLevel};
use crate::table::Table;

/// First count column of the town-hall table.
pub const FIRST_COUNT_COLUMN: &str = "Troop Housing";

/// Build per-level counts. Returns nothing when the table has no
/// `Troop Housing` column.
pub fn townhall_levels(table: &Table) -> Vec<TownHallLevel> {
    let Some(start) = table.column_index(FIRST_COUNT_COLUMN) else {
        log::debug!("No '{FIRST_COUNT_COLUMN}' column, skipping town-hall counts");
        return Vec::new();
    };
    let count_columns = &table.headers[start..];

    let mut levels: Vec<TownHallLevel> = Vec::new();
    for row in &table.rows {
        let town_hall_level = match row.name().parse::<i64>() {
            Ok(n) if n > 0 => n,
            _ => continue,
        };

        let previous = levels.last().map(|l| &l.counts);
        let mut counts = FieldMap::new();
        for column in count_columns {
            let raw = row.cell(column);
            let value = if raw.is_empty() {
                previous.and_then(|p| p.get(column)).copied().unwrap_or(0)
            } else {
                coerce_int(raw)
            };
            counts.insert(column.as_str(), value);
        }

        levels.push(TownHallLevel {
            town_hall_level,
            counts,
        });
    }

    levels
}
