use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

const UTF8_BOM: char = '\u{feff}';

/// Map files are `Map001.json` etc; `MapInfos.json` is not one of them
static MAP_FILE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^Map\d+\.json$").expect("valid map file pattern")
});

/// Project files with no player-facing text worth sending out
const SKIPPED_FILES: &[&str] = &["MapInfos.json", "Tilesets.json", "Animations.json", "System.json"];

/// Shape of a data file, decided from its name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFamily {
    /// `{ events: [null | { pages: [{ list: [node] }] }] }`
    Map,
    /// `[null | { list: [node] }]`
    CommonEvents,
    /// Keyed fields anywhere in the tree
    Gallery,
    /// Every string inside arrays
    Rubi,
    /// Flat database table such as Items.json or Actors.json
    Records,
}

impl DocumentFamily {
    // @returns: Family for a file name, None for files that are never translated
    pub fn detect(file_name: &str) -> Option<Self> {
        if !file_name.to_lowercase().ends_with(".json") {
            return None;
        }
        if SKIPPED_FILES.iter().any(|f| f.eq_ignore_ascii_case(file_name)) {
            return None;
        }
        if MAP_FILE_REGEX.is_match(file_name) {
            return Some(Self::Map);
        }

        match file_name.to_lowercase().as_str() {
            "commonevents.json" => Some(Self::CommonEvents),
            "gallerylist.json" => Some(Self::Gallery),
            "rubilist.json" => Some(Self::Rubi),
            _ => Some(Self::Records),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Map => "map",
            Self::CommonEvents => "common events",
            Self::Gallery => "gallery",
            Self::Rubi => "rubi",
            Self::Records => "records",
        }
    }
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @generates: Sibling output folder `<input>_<lang>`
    pub fn output_dir_for<P: AsRef<Path>>(input_dir: P, target_language: &str) -> PathBuf {
        let input_dir = input_dir.as_ref();
        let name = input_dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "data".to_string());
        let output_name = format!("{}_{}", name, target_language);

        match input_dir.parent() {
            Some(parent) => parent.join(output_name),
            None => PathBuf::from(output_name),
        }
    }

    /// JSON files directly inside a directory, sorted by name
    pub fn find_json_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).min_depth(1).max_depth(1) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("json"))
            {
                result.push(path.to_path_buf());
            }
        }

        result.sort();
        Ok(result)
    }

    /// Read a file to a string, dropping a leading byte-order mark
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))?;
        Ok(match content.strip_prefix(UTF8_BOM) {
            Some(stripped) => stripped.to_string(),
            None => content,
        })
    }

    /// Parse a JSON document, tolerating a byte-order mark
    pub fn read_json<P: AsRef<Path>>(path: P) -> Result<Value> {
        let content = Self::read_to_string(&path)?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON: {:?}", path.as_ref()))
    }

    /// Serialize a document the way the game expects it: UTF-8 without BOM,
    /// non-ASCII kept verbatim, four-space indentation when pretty
    pub fn to_json_string(document: &Value, pretty: bool) -> Result<String> {
        if !pretty {
            return serde_json::to_string(document).context("Failed to serialize document");
        }

        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        document
            .serialize(&mut serializer)
            .context("Failed to serialize document")?;
        String::from_utf8(buffer).context("Serialized document is not UTF-8")
    }

    /// Write a JSON document to a file
    pub fn write_json<P: AsRef<Path>>(path: P, document: &Value, pretty: bool) -> Result<()> {
        let content = Self::to_json_string(document, pretty)?;
        Self::write_to_file(path, &content)
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }
}
