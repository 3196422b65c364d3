//! Lenient scalar conversions for spreadsheet cells.
//!
//! Exported tables are full of blank or dirty numeric cells. None of these
//! helpers fail: anything that is not a plain base-10 integer counts as zero,
//! and duration sums saturate at the `i64` bounds instead of overflowing.

use serde::{Deserialize, Serialize};

use crate::record::Row;

const SECONDS_PER_DAY: i64 = 86_400;
const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_MINUTE: i64 = 60;

/// Parse a base-10 integer, returning 0 on any failure.
pub fn coerce_int(s: &str) -> i64 {
    s.trim().parse::<i64>().unwrap_or(0)
}

/// Column names for the four components of a build duration.
///
/// A `None` (or empty) component always contributes zero. Components left
/// out of a config file fall back to the standard `BuildTime*` columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildTimeFields {
    pub days: Option<String>,
    pub hours: Option<String>,
    pub minutes: Option<String>,
    pub seconds: Option<String>,
}

impl Default for BuildTimeFields {
    fn default() -> Self {
        Self {
            days: Some("BuildTimeD".to_string()),
            hours: Some("BuildTimeH".to_string()),
            minutes: Some("BuildTimeM".to_string()),
            seconds: Some("BuildTimeS".to_string()),
        }
    }
}

impl BuildTimeFields {
    /// The standard columns without a seconds component.
    pub fn without_seconds() -> Self {
        Self {
            seconds: None,
            ..Self::default()
        }
    }
}

/// Column names for an upgrade duration given in hours and optional minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeTimeFields {
    pub hours: String,
    #[serde(default)]
    pub minutes: Option<String>,
}

/// Total build duration in seconds from a row's day/hour/minute/second cells.
pub fn build_time_seconds(row: &Row, fields: &BuildTimeFields) -> i64 {
    let part = |column: &Option<String>| {
        column
            .as_deref()
            .filter(|c| !c.is_empty())
            .map(|c| coerce_int(row.cell(c)))
            .unwrap_or(0)
    };
    part(&fields.days)
        .saturating_mul(SECONDS_PER_DAY)
        .saturating_add(part(&fields.hours).saturating_mul(SECONDS_PER_HOUR))
        .saturating_add(part(&fields.minutes).saturating_mul(SECONDS_PER_MINUTE))
        .saturating_add(part(&fields.seconds))
}

/// Upgrade duration in seconds from an hours value and an optional minutes value.
pub fn upgrade_time_seconds(hours: &str, minutes: Option<&str>) -> i64 {
    let minutes = minutes.map(coerce_int).unwrap_or(0);
    coerce_int(hours)
        .saturating_mul(SECONDS_PER_HOUR)
        .saturating_add(minutes.saturating_mul(SECONDS_PER_MINUTE))
}
