pub(crate) mod categories;
pub(crate) mod config;
pub(crate) mod convert;
pub(crate) mod swap;

use std::path::PathBuf;

use clash_extract_core::{Category, default_categories, load_categories};

use crate::error::CliError;

/// Load the category table from `path`, or the built-in table.
pub(crate) fn resolve_categories(path: Option<PathBuf>) -> Result<Vec<Category>, CliError> {
    match path {
        Some(p) => {
            log::debug!("Loading categories from {}", p.display());
            Ok(load_categories(&p)?)
        }
        None => Ok(default_categories()),
    }
}
