//! Process-lifetime image cache.
//!
//! [`GalleryLoader`] owns the single cache slot. The first successful load is
//! kept for the life of the loader and every later call returns the same
//! `Arc`. Failed loads are logged, return an empty list, and leave the slot
//! empty so the next call tries again.
//!
//! Each uncached load re-resolves settings, re-reads the metadata file, picks
//! a [`Source`], enumerates it, and shuffles the result for display.
//!
//! ```text
//! images()  ──cached?──► Arc<Vec<Image>>
//!              │ no
//!              ▼
//!   settings → metadata → Source → list_entries → shuffle → cache
//! ```

use crate::config::{self, ConfigError, Settings};
use crate::metadata;
use crate::source::{LoadError, Source};
use crate::storage::{R2Connector, StoreConnector};
use crate::tags;
use crate::types::{Image, TagGroup};
use rand::seq::SliceRandom;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{error, info, warn};

/// Produces settings for one load, given the loader's working directory.
type SettingsProvider = dyn Fn(&Path) -> Result<Settings, ConfigError> + Send + Sync;

pub struct GalleryLoader {
    settings: Box<SettingsProvider>,
    connector: Arc<dyn StoreConnector>,
    /// Base for every relative path (config file, metadata, local source);
    /// the process working directory when `None`.
    working_dir: Option<PathBuf>,
    cache: OnceCell<Arc<Vec<Image>>>,
}

impl std::fmt::Debug for GalleryLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GalleryLoader")
            .field("working_dir", &self.working_dir)
            .field("cached", &self.is_cached())
            .finish_non_exhaustive()
    }
}

impl GalleryLoader {
    pub fn new<F>(settings: F, connector: Arc<dyn StoreConnector>) -> Self
    where
        F: Fn(&Path) -> Result<Settings, ConfigError> + Send + Sync + 'static,
    {
        Self {
            settings: Box::new(settings),
            connector,
            working_dir: None,
            cache: OnceCell::new(),
        }
    }

    /// Loader reading `config_file` (or `gallery.toml` in the working
    /// directory) and the environment, connecting to R2.
    pub fn from_env(config_file: Option<PathBuf>) -> Self {
        Self::new(
            move |base| config::from_env(config_file.as_deref(), base),
            Arc::new(R2Connector),
        )
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn is_cached(&self) -> bool {
        self.cache.initialized()
    }

    /// The gallery's images in display order.
    ///
    /// Never fails; see the module docs for the caching contract.
    pub async fn images(&self) -> Arc<Vec<Image>> {
        let loaded = self
            .cache
            .get_or_try_init(|| async { self.load().await.map(Arc::new) })
            .await;
        match loaded {
            Ok(images) => Arc::clone(images),
            Err(err) if err.is_missing_config() => {
                warn!(error = %err, "gallery source not configured, no images loaded");
                Arc::new(Vec::new())
            }
            Err(err) => {
                error!(error = %err, "failed to load gallery images");
                Arc::new(Vec::new())
            }
        }
    }

    /// Distinct tags in code-point order.
    pub async fn tags(&self) -> Vec<String> {
        tags::list_tags(&self.images().await)
    }

    /// Tag groups in Unicode collation order.
    pub async fn tag_groups(&self) -> Vec<TagGroup> {
        tags::list_tag_groups(&self.images().await)
    }

    async fn load(&self) -> Result<Vec<Image>, LoadError> {
        let working_dir = match &self.working_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().map_err(LoadError::WorkingDir)?,
        };

        let settings = (self.settings)(&working_dir)?;
        let metadata = metadata::load(&working_dir.join(&settings.metadata_path));
        let source = Source::from_settings(&settings, &working_dir, self.connector.as_ref())?;

        let mut images = source.list_entries(metadata).await?;
        images.shuffle(&mut rand::thread_rng());

        info!(mode = source.mode(), count = images.len(), "loaded gallery images");
        Ok(images)
    }
}
