use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use clash_extract_core::settings::{Settings, settings_path};
use clash_extract_core::{PathKey, PathOverrides, Paths};

use crate::error::CliError;

/// Show the saved directories and the paths `convert` would resolve to.
pub(crate) fn run_config_show() -> Result<(), CliError> {
    let path = settings_path();
    let status = if path.exists() {
        "(exists)".if_supports_color(Stdout, |t| t.green()).to_string()
    } else {
        "(not found)".if_supports_color(Stdout, |t| t.dimmed()).to_string()
    };
    log::info!(
        "Settings file: {} {}",
        path.display().if_supports_color(Stdout, |t| t.cyan()),
        status,
    );

    let saved = Settings::load(&path)?.paths;
    log::info!("");
    if saved.is_empty() {
        log::info!("No saved directories");
    } else {
        log::info!("Saved:");
        for key in PathKey::ALL {
            if let Some(dir) = saved.get(key) {
                log::info!("  {:<12} {}", key, dir.display());
            }
        }
    }

    let cwd = std::env::current_dir()?;
    let paths = Paths::resolve(&PathOverrides::default().over(saved), &cwd);
    log::info!("");
    log::info!("Effective:");
    log::info!("  {:<12} {}", PathKey::InputDir, paths.input_dir.display());
    log::info!("  {:<12} {}", PathKey::ParsedDir, paths.parsed_dir.display());
    log::info!("  {:<12} {}", PathKey::MapsDir, paths.maps_dir.display());
    Ok(())
}

/// Print the settings file path.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    log::info!("{}", settings_path().display());
    Ok(())
}

/// Pin one directory in the settings file.
pub(crate) fn run_config_set(key: PathKey, dir: &Path) -> Result<(), CliError> {
    // Output directories are created on demand; the others must already exist.
    let must_exist = matches!(key, PathKey::Root | PathKey::InputDir);
    if must_exist && !dir.is_dir() {
        return Err(CliError::config(format!(
            "{} is not a directory",
            dir.display()
        )));
    }
    let absolute = std::path::absolute(dir)?;

    let path = settings_path();
    let mut settings = Settings::load(&path)?;
    settings.paths.set(key, Some(absolute.clone()));
    settings.save(&path)?;

    log::info!(
        "{} Saved {} = {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        key,
        absolute.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    Ok(())
}

/// Remove one pinned directory from the settings file.
pub(crate) fn run_config_unset(key: PathKey) -> Result<(), CliError> {
    let path = settings_path();
    let mut settings = Settings::load(&path)?;
    if settings.paths.set(key, None).is_none() {
        log::info!("{key} was not set");
        return Ok(());
    }
    settings.save(&path)?;

    log::info!(
        "{} Cleared {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        key,
    );
    Ok(())
}
