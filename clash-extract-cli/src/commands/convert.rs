use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use clash_extract_core::settings::load_settings;
use clash_extract_core::{Category, MergePolicy, PathOverrides, Paths, convert_all};

use super::resolve_categories;
use crate::error::CliError;

/// Options for the convert command, straight from the command line.
pub(crate) struct ConvertOptions {
    pub(crate) dirs: PathOverrides,
    pub(crate) only: Option<Vec<String>>,
    pub(crate) merge_policy: Option<MergePolicy>,
    pub(crate) categories: Option<PathBuf>,
}

/// Narrow the table to the `only` list and apply a policy override.
fn select_categories(
    all: Vec<Category>,
    only: Option<&[String]>,
    policy: Option<MergePolicy>,
) -> Result<Vec<Category>, CliError> {
    let mut selected = match only {
        Some(names) => {
            if let Some(unknown) = names.iter().find(|n| !all.iter().any(|c| &c.name == *n)) {
                return Err(CliError::config(format!("unknown category '{unknown}'")));
            }
            all.into_iter()
                .filter(|c| names.contains(&c.name))
                .collect()
        }
        None => all,
    };

    if let Some(policy) = policy {
        for category in &mut selected {
            category.merge_policy = policy;
        }
    }
    Ok(selected)
}

/// Run the convert command.
pub(crate) fn run_convert(opts: ConvertOptions) -> Result<(), CliError> {
    let saved = load_settings()?.paths;
    let paths = Paths::resolve(&opts.dirs.over(saved), &std::env::current_dir()?);

    let categories = select_categories(
        resolve_categories(opts.categories)?,
        opts.only.as_deref(),
        opts.merge_policy,
    )?;

    log::info!(
        "Converting {} tables from {}",
        categories.len(),
        paths.input_dir.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    log::info!("");

    let results = convert_all(&categories, &paths);
    let total = results.len();
    let mut failed = 0;

    log::info!("");
    for (name, result) in &results {
        match result {
            Ok(report) => {
                let map = match &report.map {
                    Some(stats) => format!(", map +{} ~{}", stats.inserted, stats.updated),
                    None => String::new(),
                };
                log::info!(
                    "{} {} ({} entities, {} levels{})",
                    "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                    name.if_supports_color(Stdout, |t| t.bold()),
                    report.entities,
                    report.levels,
                    map,
                );
            }
            Err(e) => {
                failed += 1;
                log::warn!(
                    "{} {}: {}",
                    "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                    name.if_supports_color(Stdout, |t| t.bold()),
                    e,
                );
            }
        }
    }

    if failed > 0 {
        return Err(CliError::BatchFailed { failed, total });
    }
    Ok(())
}
