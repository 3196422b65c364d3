//! clash-extract CLI
//!
//! Converts exported game-data CSV tables into grouped JSON and name maps.

mod commands;
mod error;

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use clash_extract_core::{MergePolicy, PathKey, PathOverrides};

use crate::commands::categories::run_categories;
use crate::commands::config::{run_config_path, run_config_set, run_config_show, run_config_unset};
use crate::commands::convert::{ConvertOptions, run_convert};
use crate::commands::swap::run_swap_names;

#[derive(Parser)]
#[command(name = "clash-extract")]
#[command(about = "Convert exported game-data CSV tables to grouped JSON", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Arguments shared by commands that read the category table.
#[derive(Args, Clone)]
struct CategoryArgs {
    /// TOML file with the category table (defaults to the built-in table)
    #[arg(long)]
    categories: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every configured table
    Convert {
        /// Project root; saved directories are ignored when set (defaults to the saved root, then the current directory)
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Directory holding the exported CSV files
        #[arg(long)]
        input_dir: Option<PathBuf>,

        /// Directory for the grouped JSON files
        #[arg(long)]
        parsed_dir: Option<PathBuf>,

        /// Directory for the name maps
        #[arg(long)]
        maps_dir: Option<PathBuf>,

        /// Only convert these categories (e.g., buildings,characters)
        #[arg(long, value_delimiter = ',')]
        only: Option<Vec<String>>,

        /// Override every category's name-map merge policy (fill-missing, insert-only)
        #[arg(long)]
        merge_policy: Option<MergePolicy>,

        #[command(flatten)]
        table: CategoryArgs,
    },

    /// List the configured categories
    Categories {
        #[command(flatten)]
        table: CategoryArgs,
    },

    /// Swap displayName and internalName in a name map
    SwapNames {
        /// Name map file to rewrite in place
        map: PathBuf,
    },

    /// Manage saved settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show saved directories and the paths `convert` would use
    Show,

    /// Print the settings file path
    Path,

    /// Pin a directory (root, input-dir, parsed-dir, maps-dir)
    Set {
        /// Which directory
        key: PathKey,
        /// Directory to save
        path: PathBuf,
    },

    /// Forget a pinned directory
    Unset {
        /// Which directory
        key: PathKey,
    },
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            root,
            input_dir,
            parsed_dir,
            maps_dir,
            only,
            merge_policy,
            table,
        } => run_convert(ConvertOptions {
            dirs: PathOverrides {
                root,
                input_dir,
                parsed_dir,
                maps_dir,
            },
            only,
            merge_policy,
            categories: table.categories,
        }),
        Commands::Categories { table } => run_categories(table.categories),
        Commands::SwapNames { map } => run_swap_names(&map),
        Commands::Config { action } => match action {
            ConfigAction::Show => run_config_show(),
            ConfigAction::Path => run_config_path(),
            ConfigAction::Set { key, path } => run_config_set(key, &path),
            ConfigAction::Unset { key } => run_config_unset(key),
        },
    };

    if let Err(e) = result {
        log::error!(
            "{} {}",
            "\u{2718}".if_supports_color(Stderr, |t| t.red()),
            e
        );
        std::process::exit(1);
    }
}
