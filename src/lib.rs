//! # Gallery Index
//!
//! Build-time image inventory for static gallery sites. Images are read from
//! a local directory tree or a Cloudflare R2 bucket, tagged by folder,
//! enriched with optional hand-written metadata, and exposed to page
//! templates as three read-only views:
//!
//! ```text
//! images()      →  [Image]                 shuffled display order
//! tags()        →  ["nature", "travel"]    distinct, code-point order
//! tag_groups()  →  [{tagName, images}]     grouped, Unicode collation order
//! ```
//!
//! The inventory is loaded once per process by a [`loader::GalleryLoader`]
//! and cached; failed loads yield an empty list and are retried on the next
//! call.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`loader`] | Cache slot and load orchestration: settings → metadata → source → shuffle |
//! | [`source`] | Chooses local or R2 mode; the load error taxonomy |
//! | [`scan`] | Local directory enumeration with parallel stat |
//! | [`bucket`] | R2 listing with continuation tokens and URL resolution |
//! | [`storage`] | `ObjectStore` seam and the `aws-sdk-s3` R2 client |
//! | [`tags`] | Tag list and tag group views |
//! | [`metadata`] | Optional manual description/credits file |
//! | [`naming`] | Image extension filter, key normalization, folder tags |
//! | [`config`] | Layered settings: defaults → `gallery.toml` → environment |
//! | [`types`] | `Image` and `TagGroup`, serialized for templates |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## One Source Per Load
//!
//! Configuration is resolved into a single [`source::Source`] value before
//! any I/O happens. The rest of the load never checks settings again, so local
//! and R2 mode share one pipeline after enumeration.
//!
//! ## Never Cache Failures
//!
//! A build that starts before credentials are exported, or before a mounted
//! photo directory appears, should recover on the next call. Only a
//! successful load fills the cache.
//!
//! ## All-Or-Nothing Batches
//!
//! Per-image work (local stat calls, R2 URL signing) fans out and is joined as
//! a single batch. One failure fails the load rather than publishing a gallery
//! with silently missing images.

pub mod bucket;
pub mod config;
pub mod loader;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod scan;
pub mod source;
pub mod storage;
pub mod tags;
pub mod types;

pub use loader::GalleryLoader;
pub use types::{Image, TagGroup};

#[cfg(test)]
pub(crate) mod test_helpers;
