//! Shared types handed to page templates.
//!
//! Both source modes produce the same [`Image`] record, and the tag index
//! derives [`TagGroup`]s from it. Serialization uses camelCase field names
//! because the consumers are JSON-driven templates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One catalogued image file.
///
/// Records are built once per load and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    /// Forward-slash path relative to the source root, e.g. `nature/b.png`.
    pub key: String,
    /// Public URL, signed URL, or absolute local path depending on the source.
    pub url: String,
    pub last_modified: DateTime<Utc>,
    /// Size in bytes.
    pub size: u64,
    /// Derived from the containing folder; empty for images at the root.
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub credits: Option<serde_json::Value>,
}

/// All images carrying a given tag, in discovery order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagGroup {
    pub tag_name: String,
    pub images: Vec<Image>,
}
