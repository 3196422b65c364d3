//! Conversion of exported game-data CSV tables into grouped JSON documents
//! and incrementally merged name maps.
//!
//! The pipeline for one table is: [`table::read_table`] → a grouping
//! transform ([`grouping::group_rows`], [`grouping::group_buildings`] or
//! [`townhall::townhall_levels`]) → [`json::write_json`], with the entity list
//! also merged into a name map by [`name_map::update_name_map`].
//! [`pipeline::convert_all`] runs that for every row of a [`Category`] table.

pub mod category;
pub mod coerce;
pub mod error;
pub mod grouping;
pub mod json;
pub mod name_map;
pub mod pipeline;
pub mod record;
pub mod settings;
pub mod table;
pub mod townhall;

pub use category::{Category, TableLayout, default_categories, load_categories};
pub use coerce::{BuildTimeFields, UpgradeTimeFields, coerce_int};
pub use error::ExtractError;
pub use grouping::{GroupSpec, group_buildings, group_rows};
pub use name_map::{MergePolicy, MergeStats, NameMap};
pub use pipeline::{CategoryReport, Paths, convert_all, convert_category};
pub use record::{EntityRecord, FieldMap, LevelRecord, LevelValue, Row, TownHallLevel};
pub use settings::{PathKey, PathOverrides, Settings};
pub use table::Table;
