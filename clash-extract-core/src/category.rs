//! The per-category conversion table.
//!
//! Each exported CSV is converted according to one [`Category`] row: which
//! file to read, how to group it, and whether (and how) to merge its entities
//! into a name map. [`default_categories`] is the built-in table; the same
//! table can be supplied as TOML:
//!
//! ```toml
//! [[category]]
//! name = "characters"
//! csv = "characters.csv"
//! merge_policy = "insert-only"
//!
//! [category.layout]
//! kind = "grouped"
//! id_prefix = 4
//! level_field = "VisualLevel"
//! level_fields = ["TID", "UpgradeCost"]
//! upgrade_time = { hours = "UpgradeTimeH", minutes = "UpgradeTimeM" }
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::coerce::BuildTimeFields;
use crate::error::ExtractError;
use crate::grouping::GroupSpec;
use crate::name_map::MergePolicy;

/// How a table's rows are turned into output records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TableLayout {
    /// The fixed buildings layout.
    Buildings,
    /// Generic entity grouping.
    Grouped(GroupSpec),
    /// Town-hall unlock counts (no entities, no name map).
    TownHall,
}

fn default_true() -> bool {
    true
}

/// One row of the conversion table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Output stem: `<name>.json` and `<name>_json_map.json`.
    pub name: String,
    /// CSV file name inside the input directory.
    pub csv: String,
    pub layout: TableLayout,
    /// Merge entities into a name map. Ignored for town-hall tables.
    #[serde(default = "default_true")]
    pub name_map: bool,
    #[serde(default)]
    pub merge_policy: MergePolicy,
}

impl Category {
    pub fn new(name: impl Into<String>, layout: TableLayout) -> Self {
        let name = name.into();
        Self {
            csv: format!("{name}.csv"),
            name,
            layout,
            name_map: true,
            merge_policy: MergePolicy::default(),
        }
    }

    pub fn grouped(name: impl Into<String>, spec: GroupSpec) -> Self {
        Self::new(name, TableLayout::Grouped(spec))
    }

    pub fn merge_policy(mut self, policy: MergePolicy) -> Self {
        self.merge_policy = policy;
        self
    }

    pub fn output_file(&self) -> String {
        format!("{}.json", self.name)
    }

    pub fn map_file(&self) -> String {
        format!("{}_json_map.json", self.name)
    }

    /// Whether this category writes a name map.
    pub fn writes_name_map(&self) -> bool {
        self.name_map && self.layout != TableLayout::TownHall
    }
}

/// The built-in conversion table.
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new("buildings", TableLayout::Buildings),
        Category::grouped(
            "characters",
            GroupSpec::new()
                .id_prefix(4)
                .level_field("VisualLevel")
                .level_fields([
                    "TID",
                    "BarrackLevel",
                    "LaboratoryLevel",
                    "UpgradeTimeH",
                    "UpgradeTimeM",
                    "UpgradeResource",
                    "UpgradeCost",
                ])
                .upgrade_time("UpgradeTimeH", Some("UpgradeTimeM")),
        ),
        Category::grouped(
            "pets",
            GroupSpec::new()
                .id_prefix(73)
                .level_field("TroopLevel")
                .level_fields([
                    "TID",
                    "LaboratoryLevel",
                    "UpgradeTimeH",
                    "UpgradeResource",
                    "UpgradeCost",
                ])
                .upgrade_time("UpgradeTimeH", Some("UpgradeTimeM")),
        ),
        Category::grouped(
            "spells",
            GroupSpec::new()
                .id_prefix(26)
                .level_field("Level")
                .level_fields([
                    "TID",
                    "LaboratoryLevel",
                    "UpgradeTimeH",
                    "UpgradeResource",
                    "UpgradeCost",
                ])
                .upgrade_time("UpgradeTimeH", None),
        ),
        Category::grouped(
            "heroes",
            GroupSpec::new()
                .id_prefix(28)
                .level_field("VisualLevel")
                .level_fields([
                    "TID",
                    "UpgradeTimeH",
                    "UpgradeResource",
                    "UpgradeCost",
                    "RequiredTownHallLevel",
                    "RequiredHeroTavernLevel",
                ])
                .upgrade_time("UpgradeTimeH", None),
        ),
        Category::grouped(
            "traps",
            GroupSpec::new()
                .id_prefix(12)
                .level_field("Level")
                .level_fields([
                    "TID",
                    "ExportName",
                    "BuildTimeD",
                    "BuildTimeH",
                    "BuildTimeM",
                    "BuildResource",
                    "BuildCost",
                    "TownHallLevel",
                ])
                .build_time(BuildTimeFields::without_seconds()),
        ),
        Category::grouped(
            "mini_levels",
            GroupSpec::new()
                .level_field("Level")
                .level_fields([
                    "RequiredTownHallLevel",
                    "BuildTimeD",
                    "BuildTimeH",
                    "BuildTimeM",
                    "BuildTimeS",
                    "BuildResource",
                    "BuildCost",
                ])
                .build_time(BuildTimeFields::default())
                .include_tid(false),
        ),
        Category::grouped(
            "seasonal_defense_modules",
            GroupSpec::new()
                .id_prefix(102)
                .level_fields([
                    "BuildTimeD",
                    "BuildTimeH",
                    "BuildTimeM",
                    "BuildTimeS",
                    "BuildResource",
                    "BuildCost",
                ])
                .build_time(BuildTimeFields::default())
                .include_tid(false),
        ),
        Category::grouped(
            "villager_apprentices",
            GroupSpec::new()
                .level_fields([
                    "RequiredTownHallLevel",
                    "Type",
                    "BoostMultiplier",
                    "CostResource",
                    "Cost",
                ])
                .include_tid(false),
        ),
        Category::grouped(
            "guardians",
            GroupSpec::new().id_prefix(107).level_field("Level"),
        ),
        Category::grouped(
            "weapons",
            GroupSpec::new()
                .level_field("Level")
                .level_fields([
                    "BuildTimeD",
                    "BuildTimeH",
                    "BuildTimeM",
                    "BuildResource",
                    "BuildCost",
                ])
                .build_time(BuildTimeFields::without_seconds())
                .include_tid(false),
        ),
        Category::new("townhall_levels", TableLayout::TownHall),
    ]
}

#[derive(Debug, Deserialize)]
struct CategoryFile {
    #[serde(rename = "category", default)]
    categories: Vec<Category>,
}

/// Parse a conversion table from TOML text.
pub fn parse_categories(contents: &str, origin: &str) -> Result<Vec<Category>, ExtractError> {
    let file: CategoryFile = toml::from_str(contents).map_err(|e| ExtractError::TomlParse {
        path: origin.to_string(),
        source: e,
    })?;
    validate_categories(&file.categories)?;
    Ok(file.categories)
}

/// Load a conversion table from a TOML file.
pub fn load_categories(path: &Path) -> Result<Vec<Category>, ExtractError> {
    let contents = std::fs::read_to_string(path)?;
    parse_categories(&contents, &path.display().to_string())
}

/// Reject tables with blank or duplicate category names.
pub fn validate_categories(categories: &[Category]) -> Result<(), ExtractError> {
    let mut seen = HashSet::new();
    for category in categories {
        if category.name.trim().is_empty() {
            return Err(ExtractError::config("category with an empty name"));
        }
        if !seen.insert(category.name.as_str()) {
            return Err(ExtractError::config(format!(
                "duplicate category '{}'",
                category.name
            )));
        }
    }
    Ok(())
}
