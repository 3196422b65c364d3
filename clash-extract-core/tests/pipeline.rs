use std::fs;
use std::path::Path;

use clash_extract_core::name_map::load_name_map;
use clash_extract_core::*;
use serde_json::{Value, json};
use tempfile::TempDir;

fn write_csv(dir: &Path, name: &str, content: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(name), content).unwrap();
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

const BUILDINGS_CSV: &str = "\
Name,TID,BuildingClass,BuildingLevel,ExportName,BuildTimeD,BuildTimeH,BuildTimeM,BuildTimeS,BuildResource,BuildCost,TownHallLevel
String,String,String,int,String,int,int,int,int,String,int,int
Cannon,TID_CANNON,Defense,1,cannon1,,,1,0,Gold,250,1
,,,2,cannon2,,1,,,Gold,1000,1
Barracks,TID_BARRACKS,Army,1,barracks1,,,,10,Elixir,100,1
";

const CHARACTERS_CSV: &str = "\
Name,TID,VisualLevel,BarrackLevel,LaboratoryLevel,UpgradeTimeH,UpgradeTimeM,UpgradeResource,UpgradeCost
String,String,int,int,int,int,int,String,int
Barbarian,TID_BARBARIAN,1,1,,,,Elixir,
,,2,,1,5,30,Elixir,20000
Archer,TID_ARCHER,1,2,,,,Elixir,
";

const TOWNHALL_CSV: &str = "\
Name,Notes,Troop Housing,Archer Tower
String,String,int,int
1,,1,0
2,,2,
";

#[test]
fn converts_tables_and_continues_past_missing_inputs() {
    let tmp = TempDir::new().unwrap();
    let paths = Paths::under(tmp.path());
    write_csv(&paths.input_dir, "buildings.csv", BUILDINGS_CSV);
    write_csv(&paths.input_dir, "characters.csv", CHARACTERS_CSV);
    write_csv(&paths.input_dir, "townhall_levels.csv", TOWNHALL_CSV);

    let results = convert_all(&default_categories(), &paths);
    assert_eq!(results.len(), 12);

    let ok: Vec<_> = results
        .iter()
        .filter(|(_, r)| r.is_ok())
        .map(|(name, _)| name.as_str())
        .collect();
    assert_eq!(ok, vec!["buildings", "characters", "townhall_levels"]);
    assert!(
        results
            .iter()
            .filter(|(_, r)| r.is_err())
            .all(|(_, r)| matches!(r, Err(ExtractError::Io(_))))
    );

    let buildings = read_json(&paths.parsed_dir.join("buildings.json"));
    assert_eq!(buildings[0]["id"], json!(1_000_000));
    assert_eq!(buildings[0]["buildingClass"], json!("Defense"));
    assert_eq!(buildings[0]["levels"][1]["buildTimeSeconds"], json!(3_600));
    assert_eq!(buildings[1]["internalName"], json!("Barracks"));
    assert_eq!(buildings[1]["levels"][0]["buildTimeSeconds"], json!(10));

    let characters = read_json(&paths.parsed_dir.join("characters.json"));
    assert_eq!(characters[1]["id"], json!(4_000_001));
    assert_eq!(characters[0]["levels"][1]["upgradeTimeSeconds"], json!(19_800));
    assert_eq!(characters[0]["levels"][0]["UpgradeCost"], json!(""));

    let townhall = read_json(&paths.parsed_dir.join("townhall_levels.json"));
    assert_eq!(
        townhall,
        json!([
            {"townHallLevel": 1, "counts": {"Troop Housing": 1, "Archer Tower": 0}},
            {"townHallLevel": 2, "counts": {"Troop Housing": 2, "Archer Tower": 0}}
        ])
    );

    let map = load_name_map(&paths.maps_dir.join("buildings_json_map.json"));
    assert_eq!(
        map["Cannon"],
        json!({"displayName": "Cannon", "internalName": "Cannon", "id": 1_000_000})
    );
    assert!(!paths.maps_dir.join("townhall_levels_json_map.json").exists());
}

#[test]
fn rerun_preserves_hand_edited_names() {
    let tmp = TempDir::new().unwrap();
    let paths = Paths::under(tmp.path());
    write_csv(&paths.input_dir, "buildings.csv", BUILDINGS_CSV);
    let category = Category::new("buildings", TableLayout::Buildings);

    convert_category(&category, &paths).unwrap();
    let map_path = paths.maps_dir.join("buildings_json_map.json");
    let edited = fs::read_to_string(&map_path)
        .unwrap()
        .replace("\"displayName\": \"Cannon\"", "\"displayName\": \"Cannon Tower\"");
    fs::write(&map_path, &edited).unwrap();

    let report = convert_category(&category, &paths).unwrap();
    assert_eq!(report.entities, 2);
    assert_eq!(report.levels, 3);
    assert_eq!(report.map.map(|m| m.inserted), Some(0));
    assert_eq!(fs::read_to_string(&map_path).unwrap(), edited);
}

#[test]
fn insert_only_policy_writes_lean_entries() {
    let tmp = TempDir::new().unwrap();
    let paths = Paths::under(tmp.path());
    write_csv(&paths.input_dir, "buildings.csv", BUILDINGS_CSV);
    let category =
        Category::new("buildings", TableLayout::Buildings).merge_policy(MergePolicy::InsertOnly);

    convert_category(&category, &paths).unwrap();
    let map = load_name_map(&paths.maps_dir.join("buildings_json_map.json"));
    assert_eq!(
        map["Barracks"],
        json!({"internalName": "Barracks", "id": 1_000_001})
    );
}

#[test]
fn output_round_trips_through_records() {
    let tmp = TempDir::new().unwrap();
    let paths = Paths::under(tmp.path());
    write_csv(&paths.input_dir, "characters.csv", CHARACTERS_CSV);
    let category = default_categories()
        .into_iter()
        .find(|c| c.name == "characters")
        .unwrap();

    convert_category(&category, &paths).unwrap();
    let text = fs::read_to_string(paths.parsed_dir.join("characters.json")).unwrap();
    assert!(text.ends_with("]\n"));
    let parsed: Vec<EntityRecord> = serde_json::from_str(&text).unwrap();

    let table = clash_extract_core::table::read_table(CHARACTERS_CSV.as_bytes()).unwrap();
    let TableLayout::Grouped(spec) = &category.layout else {
        panic!("characters should be grouped");
    };
    assert_eq!(parsed, group_rows(&table.rows, spec));
}

#[test]
fn saved_directories_redirect_conversion() {
    let tmp = TempDir::new().unwrap();
    let project = tmp.path().join("project");
    let maps = tmp.path().join("shared-maps");
    write_csv(&Paths::under(&project).input_dir, "buildings.csv", BUILDINGS_CSV);

    let settings_file = tmp.path().join("settings.toml");
    let mut settings = Settings::default();
    settings.paths.set(PathKey::Root, Some(project.clone()));
    settings.paths.set(PathKey::MapsDir, Some(maps.clone()));
    settings.save(&settings_file).unwrap();

    let saved = Settings::load(&settings_file).unwrap().paths;
    let paths = Paths::resolve(&PathOverrides::default().over(saved), tmp.path());
    assert_eq!(paths.input_dir, Paths::under(&project).input_dir);
    assert_eq!(paths.maps_dir, maps);

    convert_category(&Category::new("buildings", TableLayout::Buildings), &paths).unwrap();
    assert!(Paths::under(&project).parsed_dir.join("buildings.json").exists());
    assert!(maps.join("buildings_json_map.json").exists());
    assert!(!Paths::under(&project).maps_dir.exists());
}

#[test]
fn no_overrides_means_layout_under_cwd() {
    let cwd = Path::new("/work");
    assert_eq!(
        Paths::resolve(&PathOverrides::default(), cwd),
        Paths::under(cwd)
    );
}
