use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use clash_extract_core::name_map::swap_names;

use crate::error::CliError;

/// Swap display and internal names in a name map, in place.
pub(crate) fn run_swap_names(map: &Path) -> Result<(), CliError> {
    let swapped = swap_names(map)?;
    log::info!(
        "{} Swapped names on {} entries in {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        swapped,
        map.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    Ok(())
}
