//! JSON output: two-space indentation, literal non-ASCII, trailing newline.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::ExtractError;

/// Render a value the way every output file is written.
pub fn to_json_string<T: Serialize + ?Sized>(value: &T) -> Result<String, ExtractError> {
    let mut out = serde_json::to_string_pretty(value)?;
    out.push('\n');
    Ok(out)
}

/// Write a value to `path`, creating parent directories as needed.
///
/// The file is written to a `.tmp` sibling first and renamed into place, so
/// a failed write never leaves a truncated output behind.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ExtractError> {
    let contents = to_json_string(value)?;
    write_atomic(path, &contents)?;
    log::debug!("Wrote {}", path.display());
    Ok(())
}

/// Write `contents` through a `<path>.tmp` sibling and a rename.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{EntityRecord, LevelRecord};

    #[test]
    fn pretty_with_trailing_newline() {
        let out = to_json_string(&vec![1, 2]).unwrap();
        assert_eq!(out, "[\n  1,\n  2\n]\n");
    }

    #[test]
    fn non_ascii_is_literal() {
        let out = to_json_string("Bâtiment").unwrap();
        assert_eq!(out, "\"Bâtiment\"\n");
    }

    #[test]
    fn write_creates_directories() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("a").join("b").join("out.json");
        write_json(&path, &Vec::<u8>::new()).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]\n");
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn entities_round_trip() {
        let mut entity = EntityRecord::new("Cannon");
        entity.id = Some(1_000_000);
        entity.tid = Some("TID_CANNON".to_string());
        entity.building_class = Some("Defense".to_string());
        let mut level = LevelRecord::new(1);
        level.insert("exportName", "cannon_lvl1");
        level.insert("buildCost", 250_i64);
        level.insert("buildResource", "");
        entity.levels.push(level);
        let entities = vec![entity, EntityRecord::new("Mortar")];

        let text = to_json_string(&entities).unwrap();
        let back: Vec<EntityRecord> = serde_json::from_str(&text).unwrap();
        assert_eq!(back, entities);
    }
}
