//! Saved directory overrides.
//!
//! `~/.config/clash-extract/settings.toml` can pin the project root and any of
//! the three working directories, so `convert` runs the same from anywhere:
//!
//! ```toml
//! [paths]
//! root = "/home/me/clash"
//! maps_dir = "/home/me/clash-maps"
//! ```
//!
//! Anything left out falls back to the standard layout (see
//! [`Paths::resolve`](crate::pipeline::Paths::resolve)).

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExtractError;
use crate::json::write_atomic;

/// Location of the settings file.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("clash-extract").join("settings.toml")
}

/// Everything stored in the settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub paths: PathOverrides,
}

impl Settings {
    /// Read settings from `path`. A missing file is the same as an empty one.
    pub fn load(path: &Path) -> Result<Self, ExtractError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        toml::from_str(&contents).map_err(|source| ExtractError::TomlParse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Write settings to `path`, creating its directory if needed.
    pub fn save(&self, path: &Path) -> Result<(), ExtractError> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| ExtractError::config(format!("cannot serialize settings: {e}")))?;
        write_atomic(path, &contents)?;
        log::debug!("Saved settings to {}", path.display());
        Ok(())
    }
}

/// Load the settings file from its standard location.
pub fn load_settings() -> Result<Settings, ExtractError> {
    Settings::load(&settings_path())
}

// ── Overrides ───────────────────────────────────────────────────────────────

/// Optional replacements for the project root and its working directories.
///
/// Used both for the `[paths]` table and for the matching CLI flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parsed_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maps_dir: Option<PathBuf>,
}

impl PathOverrides {
    /// Layer these overrides on top of `saved`.
    ///
    /// An explicit `root` here discards every saved entry: directories pinned
    /// for one project never leak into another.
    pub fn over(self, saved: PathOverrides) -> Self {
        if self.root.is_some() {
            return self;
        }
        Self {
            root: saved.root,
            input_dir: self.input_dir.or(saved.input_dir),
            parsed_dir: self.parsed_dir.or(saved.parsed_dir),
            maps_dir: self.maps_dir.or(saved.maps_dir),
        }
    }

    pub fn get(&self, key: PathKey) -> Option<&Path> {
        match key {
            PathKey::Root => self.root.as_deref(),
            PathKey::InputDir => self.input_dir.as_deref(),
            PathKey::ParsedDir => self.parsed_dir.as_deref(),
            PathKey::MapsDir => self.maps_dir.as_deref(),
        }
    }

    /// Set or clear one entry, returning the previous value.
    pub fn set(&mut self, key: PathKey, value: Option<PathBuf>) -> Option<PathBuf> {
        let slot = match key {
            PathKey::Root => &mut self.root,
            PathKey::InputDir => &mut self.input_dir,
            PathKey::ParsedDir => &mut self.parsed_dir,
            PathKey::MapsDir => &mut self.maps_dir,
        };
        std::mem::replace(slot, value)
    }

    pub fn is_empty(&self) -> bool {
        PathKey::ALL.iter().all(|&key| self.get(key).is_none())
    }
}

/// One entry of [`PathOverrides`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKey {
    Root,
    InputDir,
    ParsedDir,
    MapsDir,
}

impl PathKey {
    pub const ALL: [PathKey; 4] = [
        PathKey::Root,
        PathKey::InputDir,
        PathKey::ParsedDir,
        PathKey::MapsDir,
    ];

    /// Key name inside the `[paths]` table.
    pub fn as_str(self) -> &'static str {
        match self {
            PathKey::Root => "root",
            PathKey::InputDir => "input_dir",
            PathKey::ParsedDir => "parsed_dir",
            PathKey::MapsDir => "maps_dir",
        }
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for PathKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_ascii_lowercase().replace('-', "_");
        PathKey::ALL
            .into_iter()
            .find(|key| key.as_str() == normalized)
            .ok_or_else(|| {
                format!("unknown path key '{s}' (expected root, input-dir, parsed-dir or maps-dir)")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_default() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(&tmp.path().join("settings.toml")).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(settings.paths.is_empty());
    }

    #[test]
    fn save_then_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cfg").join("settings.toml");

        let mut settings = Settings::default();
        settings.paths.set(PathKey::Root, Some(PathBuf::from("/data/clash")));
        settings.paths.set(PathKey::MapsDir, Some(PathBuf::from("/data/maps")));
        settings.save(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("[paths]"));
        assert!(!text.contains("input_dir"));
        assert!(!path.with_extension("toml.tmp").exists());
        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let settings: Settings =
            toml::from_str("[paths]\nparsed_dir = \"out\"\n\n[other]\nkeep = true\n").unwrap();
        assert_eq!(settings.paths.parsed_dir, Some(PathBuf::from("out")));
    }

    #[test]
    fn malformed_file_reports_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.toml");
        std::fs::write(&path, "[paths\nroot = ").unwrap();
        let err = Settings::load(&path).unwrap_err();
        assert!(matches!(err, ExtractError::TomlParse { .. }));
        assert!(err.to_string().contains("settings.toml"));
    }

    #[test]
    fn cli_root_replaces_saved_entries() {
        let saved = PathOverrides {
            root: Some(PathBuf::from("/saved")),
            maps_dir: Some(PathBuf::from("/saved-maps")),
            ..Default::default()
        };
        let cli = PathOverrides {
            root: Some(PathBuf::from("/cli")),
            ..Default::default()
        };
        assert_eq!(cli.clone().over(saved), cli);
    }

    #[test]
    fn cli_dirs_layer_over_saved_entries() {
        let saved = PathOverrides {
            root: Some(PathBuf::from("/saved")),
            maps_dir: Some(PathBuf::from("/saved-maps")),
            parsed_dir: Some(PathBuf::from("/saved-parsed")),
            ..Default::default()
        };
        let cli = PathOverrides {
            parsed_dir: Some(PathBuf::from("/cli-parsed")),
            ..Default::default()
        };
        let merged = cli.over(saved);
        assert_eq!(merged.get(PathKey::Root), Some(Path::new("/saved")));
        assert_eq!(merged.get(PathKey::MapsDir), Some(Path::new("/saved-maps")));
        assert_eq!(merged.get(PathKey::ParsedDir), Some(Path::new("/cli-parsed")));
        assert_eq!(merged.get(PathKey::InputDir), None);
    }

    #[test]
    fn path_key_accepts_flag_spelling() {
        assert_eq!("maps-dir".parse::<PathKey>(), Ok(PathKey::MapsDir));
        assert_eq!("input_dir".parse::<PathKey>(), Ok(PathKey::InputDir));
        assert_eq!("ROOT".parse::<PathKey>(), Ok(PathKey::Root));
        assert!("output".parse::<PathKey>().is_err());
    }

    #[test]
    fn set_returns_previous_value() {
        let mut overrides = PathOverrides::default();
        assert_eq!(overrides.set(PathKey::InputDir, Some(PathBuf::from("a"))), None);
        assert_eq!(
            overrides.set(PathKey::InputDir, None),
            Some(PathBuf::from("a"))
        );
        assert!(overrides.is_empty());
    }
}
