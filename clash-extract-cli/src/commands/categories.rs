use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use clash_extract_core::{Category, TableLayout};

use super::resolve_categories;
use crate::error::CliError;

fn describe_layout(category: &Category) -> String {
    match &category.layout {
        TableLayout::Buildings => "buildings, id prefix 1".to_string(),
        TableLayout::TownHall => "town-hall counts".to_string(),
        TableLayout::Grouped(spec) => {
            let prefix = spec
                .id_prefix
                .map(|p| format!("id prefix {p}"))
                .unwrap_or_else(|| "no ids".to_string());
            let level = spec.level_field.as_deref().unwrap_or("row order");
            format!("grouped, {prefix}, level from {level}")
        }
    }
}

/// List the configured categories.
pub(crate) fn run_categories(path: Option<PathBuf>) -> Result<(), CliError> {
    let categories = resolve_categories(path)?;

    log::info!(
        "{}",
        "Categories:".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("");

    for category in &categories {
        log::info!(
            "  {} [{}]",
            category.name.if_supports_color(Stdout, |t| t.bold()),
            describe_layout(category).if_supports_color(Stdout, |t| t.cyan()),
        );
        log::info!("    Input: {}", category.csv);
        if category.writes_name_map() {
            log::info!(
                "    Name map: {} ({})",
                category.map_file(),
                category.merge_policy
            );
        }
        if let TableLayout::Grouped(spec) = &category.layout {
            if !spec.level_fields.is_empty() {
                log::info!("    Fields: {}", spec.level_fields.join(", "));
            }
        }
    }
    Ok(())
}
