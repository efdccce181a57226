//! Manual image metadata.
//!
//! Descriptions and credits can't be derived from the files themselves, so
//! they live in an optional JSON document keyed by image key:
//!
//! ```json
//! {
//!   "nature/b.png": { "description": "Heron at dawn", "credits": { "by": "A. Photographer" } },
//!   "a.jpg": { "description": "Self portrait" }
//! }
//! ```
//!
//! The file is optional. A missing, unreadable, or malformed file loads as an
//! empty map and is not reported. Absent fields default to an empty
//! description and null credits.

use crate::types::Image;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Default location of the metadata file, relative to the working directory.
pub const DEFAULT_METADATA_PATH: &str = "_data/image_metadata.json";

/// Manual overrides for one image.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ImageMetadata {
    pub description: String,
    pub credits: Option<serde_json::Value>,
}

pub type MetadataMap = HashMap<String, ImageMetadata>;

/// Read the metadata file at `path`.
///
/// Never fails: anything short of a well-formed key→record object yields an
/// empty map.
pub fn load(path: &Path) -> MetadataMap {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|content| serde_json::from_str(&content).ok())
        .unwrap_or_default()
}

/// Merge the record matching `image.key` exactly, if there is one.
pub fn apply(mut image: Image, metadata: &MetadataMap) -> Image {
    if let Some(entry) = metadata.get(&image.key) {
        image.description = entry.description.clone();
        image.credits = entry.credits.clone();
    }
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::image;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    // =========================================================================
    // load() tests
    // =========================================================================

    #[test]
    fn load_reads_records() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("meta.json");
        fs::write(
            &path,
            r#"{"nature/b.png": {"description": "Heron", "credits": {"by": "Ana"}}}"#,
        )
        .unwrap();

        let map = load(&path);
        let entry = &map["nature/b.png"];
        assert_eq!(entry.description, "Heron");
        assert_eq!(entry.credits, Some(json!({"by": "Ana"})));
    }

    #[test]
    fn load_defaults_missing_fields() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("meta.json");
        fs::write(&path, r#"{"a.jpg": {}, "b.jpg": {"credits": "Ben"}}"#).unwrap();

        let map = load(&path);
        assert_eq!(map["a.jpg"], ImageMetadata::default());
        assert_eq!(map["b.jpg"].description, "");
        assert_eq!(map["b.jpg"].credits, Some(json!("Ben")));
    }

    #[test]
    fn load_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(load(&tmp.path().join("nope.json")).is_empty());
    }

    #[test]
    fn load_malformed_json_is_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("meta.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(load(&path).is_empty());
    }

    #[test]
    fn load_non_object_document_is_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("meta.json");
        fs::write(&path, r#"["a.jpg"]"#).unwrap();
        assert!(load(&path).is_empty());
    }

    #[test]
    fn load_directory_path_is_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(load(tmp.path()).is_empty());
    }

    // =========================================================================
    // apply() tests
    // =========================================================================

    #[test]
    fn apply_merges_exact_key_match() {
        let mut map = MetadataMap::new();
        map.insert(
            "nature/b.png".into(),
            ImageMetadata {
                description: "Heron".into(),
                credits: Some(json!({"by": "Ana"})),
            },
        );

        let merged = apply(image("nature/b.png"), &map);
        assert_eq!(merged.description, "Heron");
        assert_eq!(merged.credits, Some(json!({"by": "Ana"})));
    }

    #[test]
    fn apply_leaves_defaults_without_match() {
        let mut map = MetadataMap::new();
        map.insert(
            "Nature/b.png".into(),
            ImageMetadata {
                description: "wrong case".into(),
                credits: None,
            },
        );

        let merged = apply(image("nature/b.png"), &map);
        assert_eq!(merged.description, "");
        assert_eq!(merged.credits, None);
    }
}
