//! Per-table conversion and the batch runner.

use std::path::{Path, PathBuf};

use crate::category::{Category, TableLayout};
use crate::error::ExtractError;
use crate::grouping::{group_buildings, group_rows};
use crate::json::write_json;
use crate::name_map::{MergeStats, update_name_map};
use crate::settings::PathOverrides;
use crate::table::read_table_file;
use crate::townhall::townhall_levels;

/// Where tables are read from and outputs are written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub input_dir: PathBuf,
    pub parsed_dir: PathBuf,
    pub maps_dir: PathBuf,
}

impl Paths {
    /// The standard layout under a project root.
    pub fn under(root: &Path) -> Self {
        let upgrade_info = root.join("clash_widgets").join("upgrade_info");
        Self {
            input_dir: root.join("data_extraction").join("extraxted_data"),
            parsed_dir: upgrade_info.join("parsed_json_files"),
            maps_dir: upgrade_info.join("json_maps"),
        }
    }

    /// Apply overrides: a pinned directory wins, everything else follows the
    /// standard layout under the pinned root or, failing that, under `cwd`.
    pub fn resolve(overrides: &PathOverrides, cwd: &Path) -> Self {
        let standard = Self::under(overrides.root.as_deref().unwrap_or(cwd));
        Self {
            input_dir: overrides.input_dir.clone().unwrap_or(standard.input_dir),
            parsed_dir: overrides.parsed_dir.clone().unwrap_or(standard.parsed_dir),
            maps_dir: overrides.maps_dir.clone().unwrap_or(standard.maps_dir),
        }
    }
}

/// Outcome of converting one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryReport {
    pub name: String,
    /// Entities (or town-hall levels) written.
    pub entities: usize,
    /// Total level records across all entities.
    pub levels: usize,
    pub output: PathBuf,
    pub map: Option<MergeStats>,
}

/// Convert one table: read its CSV, write its JSON and update its name map.
pub fn convert_category(category: &Category, paths: &Paths) -> Result<CategoryReport, ExtractError> {
    let input = paths.input_dir.join(&category.csv);
    let output = paths.parsed_dir.join(category.output_file());
    let table = read_table_file(&input)?;

    let entities = match &category.layout {
        TableLayout::TownHall => {
            let levels = townhall_levels(&table);
            write_json(&output, &levels)?;
            log::info!(
                "{}: {} town-hall levels -> {}",
                category.name,
                levels.len(),
                output.display()
            );
            return Ok(CategoryReport {
                name: category.name.clone(),
                entities: levels.len(),
                levels: levels.len(),
                output,
                map: None,
            });
        }
        TableLayout::Buildings => group_buildings(&table.rows),
        TableLayout::Grouped(spec) => group_rows(&table.rows, spec),
    };

    write_json(&output, &entities)?;
    let level_count: usize = entities.iter().map(|e| e.levels.len()).sum();
    log::info!(
        "{}: {} entities, {} levels -> {}",
        category.name,
        entities.len(),
        level_count,
        output.display()
    );

    let map = if category.writes_name_map() {
        let map_path = paths.maps_dir.join(category.map_file());
        let stats = update_name_map(&map_path, &entities, category.merge_policy)?;
        log::info!(
            "{}: name map {} ({} new, {} filled)",
            category.name,
            map_path.display(),
            stats.inserted,
            stats.updated
        );
        Some(stats)
    } else {
        None
    };

    Ok(CategoryReport {
        name: category.name.clone(),
        entities: entities.len(),
        levels: level_count,
        output,
        map,
    })
}

/// Convert every category. A failing table is logged and skipped; the rest
/// of the batch still runs.
pub fn convert_all(
    categories: &[Category],
    paths: &Paths,
) -> Vec<(String, Result<CategoryReport, ExtractError>)> {
    categories
        .iter()
        .map(|category| {
            let result = convert_category(category, paths);
            if let Err(e) = &result {
                log::error!("{}: conversion failed: {e}", category.name);
            }
            (category.name.clone(), result)
        })
        .collect()
}
