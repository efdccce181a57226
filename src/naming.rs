//! Key and tag conventions shared by both image sources.
//!
//! Every image is identified by its **key**: the path relative to the source
//! root, always with forward slashes. Bucket object keys already have this
//! shape; local paths are normalized into it.
//!
//! ## Tags
//!
//! An image's tag is its containing folder, taken whole:
//! - `a.jpg` → no tags
//! - `nature/b.png` → `["nature"]`
//! - `travel/japan/tokyo.jpg` → `["travel/japan"]`

use std::path::{Component, Path};

/// Extensions accepted as gallery images (compared case-insensitively).
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "avif", "gif"];

/// Whether a file name or key ends in one of [`IMAGE_EXTENSIONS`].
pub fn is_image_name(name: &str) -> bool {
    let file_name = name.rsplit('/').next().unwrap_or(name);
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => IMAGE_EXTENSIONS
            .iter()
            .any(|allowed| ext.eq_ignore_ascii_case(allowed)),
        _ => false,
    }
}

/// Build a key from a path relative to the source root.
///
/// Only normal components are kept, joined with `/` regardless of platform.
pub fn key_from_relative(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// The folder part of a key, or `None` for keys at the root.
pub fn folder_tag(key: &str) -> Option<&str> {
    key.rsplit_once('/')
        .map(|(folder, _)| folder)
        .filter(|folder| !folder.is_empty())
}

/// Tags for a key: its folder, if any.
pub fn tags_for_key(key: &str) -> Vec<String> {
    folder_tag(key).map(str::to_string).into_iter().collect()
}
