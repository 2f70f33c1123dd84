/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use serde_json::json;
use std::fs;
use std::path::Path;

use rpgtl::file_utils::{DocumentFamily, FileManager};

use crate::common;

/// Families are decided from the file name alone
#[test]
fn test_detect_family_withDataFileNames_shouldClassify() {
    assert_eq!(DocumentFamily::detect("Map001.json"), Some(DocumentFamily::Map));
    assert_eq!(DocumentFamily::detect("map042.JSON"), Some(DocumentFamily::Map));
    assert_eq!(DocumentFamily::detect("CommonEvents.json"), Some(DocumentFamily::CommonEvents));
    assert_eq!(DocumentFamily::detect("GalleryList.json"), Some(DocumentFamily::Gallery));
    assert_eq!(DocumentFamily::detect("RubiList.json"), Some(DocumentFamily::Rubi));
    assert_eq!(DocumentFamily::detect("Items.json"), Some(DocumentFamily::Records));
    assert_eq!(DocumentFamily::detect("Actors.json"), Some(DocumentFamily::Records));
}

/// Files without translatable text are never selected
#[test]
fn test_detect_family_withSkippedFiles_shouldReturnNone() {
    assert_eq!(DocumentFamily::detect("MapInfos.json"), None);
    assert_eq!(DocumentFamily::detect("System.json"), None);
    assert_eq!(DocumentFamily::detect("Tilesets.json"), None);
    assert_eq!(DocumentFamily::detect("Animations.json"), None);
    assert_eq!(DocumentFamily::detect("notes.txt"), None);
}

/// The output folder is a sibling named after the target language
#[test]
fn test_output_dir_for_withInputDir_shouldAppendLanguage() {
    let output = FileManager::output_dir_for(Path::new("/games/demo/data"), "en");
    assert_eq!(output, Path::new("/games/demo/data_en"));
}

/// Only JSON files directly inside the folder are listed, sorted
#[test]
fn test_find_json_files_withMixedFolder_shouldListJsonOnly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_test_file(dir, "Map002.json", "{}")?;
    common::create_test_file(dir, "Items.json", "[]")?;
    common::create_test_file(dir, "readme.txt", "hello")?;
    fs::create_dir(dir.join("nested"))?;
    common::create_test_file(&dir.join("nested"), "Map003.json", "{}")?;

    let files = FileManager::find_json_files(dir)?;
    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["Items.json", "Map002.json"]);
    Ok(())
}

/// A byte-order mark at the start of a file is ignored
#[test]
fn test_read_json_withBom_shouldParse() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "Items.json", "\u{feff}[null, {\"name\": \"Pozione\"}]")?;

    let document = FileManager::read_json(&path)?;
    assert_eq!(document, json!([null, {"name": "Pozione"}]));
    Ok(())
}

/// Pretty output uses four spaces, keeps key order and non-ASCII text
#[test]
fn test_to_json_string_withPrettyOutput_shouldMatchGameFormat() -> Result<()> {
    let document = json!({"zeta": "città", "alpha": [1, 2]});

    let pretty = FileManager::to_json_string(&document, true)?;
    assert_eq!(pretty, "{\n    \"zeta\": \"città\",\n    \"alpha\": [\n        1,\n        2\n    ]\n}");

    let compact = FileManager::to_json_string(&document, false)?;
    assert_eq!(compact, "{\"zeta\":\"città\",\"alpha\":[1,2]}");
    Ok(())
}

/// Written files never start with a byte-order mark
#[test]
fn test_write_json_withNestedPath_shouldCreateDirsWithoutBom() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("out").join("Items.json");

    FileManager::write_json(&path, &json!([null]), true)?;
    let bytes = fs::read(&path)?;
    assert!(!bytes.starts_with(&[0xEF, 0xBB, 0xBF]));
    assert_eq!(String::from_utf8(bytes)?, "[\n    null\n]");
    Ok(())
}
