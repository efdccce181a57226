//! Image enumeration from a local directory tree.
//!
//! Walks the source root recursively and keeps regular files whose names pass
//! the image filter:
//!
//! ```text
//! photos/                  # Source root
//! ├── a.jpg                # key "a.jpg", no tags
//! ├── nature/
//! │   ├── b.png            # key "nature/b.png", tags ["nature"]
//! │   └── c.txt            # skipped: not an image
//! └── travel/japan/
//!     └── tokyo.jpg        # key "travel/japan/tokyo.jpg", tags ["travel/japan"]
//! ```
//!
//! Each kept file is stat'ed for size and modification time. The stat calls
//! run in parallel on the rayon pool and are collected all-or-nothing: one
//! failing file fails the scan. The image URL is the file's absolute path;
//! turning it into a servable asset is left to the page templates.

use crate::metadata::{self, MetadataMap};
use crate::naming;
use crate::types::Image;
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("source directory {path} is not accessible: {source}")]
    Inaccessible {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("source path {0} is not a directory")]
    NotADirectory(PathBuf),
    #[error("walking source directory failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("reading {path} failed: {source}")]
    Stat {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A local image directory, already resolved to an absolute path.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalSource {
    pub root: PathBuf,
}

impl LocalSource {
    /// Resolve `configured` against `working_dir` unless it is already absolute.
    ///
    /// `.` and `..` segments are folded away lexically, so image URLs never
    /// carry them.
    pub fn resolve(configured: &Path, working_dir: &Path) -> Self {
        Self {
            root: normalize(&working_dir.join(configured)),
        }
    }

    /// Enumerate every image under the root, in walk order.
    pub fn list_entries(&self, metadata: &MetadataMap) -> Result<Vec<Image>, ScanError> {
        let root_meta = fs::metadata(&self.root).map_err(|source| ScanError::Inaccessible {
            path: self.root.clone(),
            source,
        })?;
        if !root_meta.is_dir() {
            return Err(ScanError::NotADirectory(self.root.clone()));
        }

        let files = collect_image_files(&self.root)?;

        files
            .par_iter()
            .map(|path| self.build_image(path))
            .collect::<Result<Vec<_>, _>>()
            .map(|images| {
                images
                    .into_iter()
                    .map(|image| metadata::apply(image, metadata))
                    .collect()
            })
    }

    fn build_image(&self, path: &Path) -> Result<Image, ScanError> {
        let stat_error = |source| ScanError::Stat {
            path: path.to_path_buf(),
            source,
        };
        let meta = fs::metadata(path).map_err(stat_error)?;
        let modified = meta.modified().map_err(stat_error)?;

        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let key = naming::key_from_relative(relative);

        Ok(Image {
            tags: naming::tags_for_key(&key),
            key,
            url: path.to_string_lossy().to_string(),
            last_modified: DateTime::<Utc>::from(modified),
            size: meta.len(),
            description: String::new(),
            credits: None,
        })
    }
}

/// Lexically drop `.` and resolve `..` against the preceding segment.
///
/// Symlinks are not followed. A `..` with nothing left to pop is kept when the
/// path is relative and dropped at the filesystem root.
fn normalize(path: &Path) -> PathBuf {
    path.components().fold(PathBuf::new(), |mut out, component| {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
        out
    })
}

fn collect_image_files(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file()
            && naming::is_image_name(&entry.file_name().to_string_lossy())
        {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
