//! Source selection.
//!
//! Settings are turned into exactly one [`Source`] per load: local mode when
//! a local directory is configured, the R2 bucket otherwise. Everything after
//! that point goes through [`Source::list_entries`] without looking at
//! configuration again.

use crate::bucket::RemoteSource;
use crate::config::{ConfigError, Settings};
use crate::metadata::MetadataMap;
use crate::scan::{LocalSource, ScanError};
use crate::storage::{StoreConnector, StoreError};
use crate::types::Image;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("cannot determine working directory: {0}")]
    WorkingDir(std::io::Error),
    #[error("local source error: {0}")]
    Scan(#[from] ScanError),
    #[error("object storage error: {0}")]
    Store(#[from] StoreError),
    #[error("background scan task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl LoadError {
    /// Required settings are absent, as opposed to present but broken.
    pub fn is_missing_config(&self) -> bool {
        matches!(self, LoadError::Config(ConfigError::Missing(_)))
    }
}

#[derive(Debug)]
pub enum Source {
    Local(LocalSource),
    Remote(RemoteSource),
}

impl Source {
    /// Pick the source mode. Connects to storage in remote mode.
    pub fn from_settings(
        settings: &Settings,
        working_dir: &Path,
        connector: &dyn StoreConnector,
    ) -> Result<Self, LoadError> {
        if let Some(local) = settings.local_source() {
            return Ok(Source::Local(LocalSource::resolve(local, working_dir)));
        }

        let credentials = settings.r2.credentials()?;
        let bucket = settings.r2.bucket()?.to_string();
        Ok(Source::Remote(RemoteSource {
            store: connector.connect(&credentials),
            bucket,
            public_domain: settings.r2.public_domain().map(str::to_string),
        }))
    }

    pub fn mode(&self) -> &'static str {
        match self {
            Source::Local(_) => "local",
            Source::Remote(_) => "r2",
        }
    }

    /// Enumerate images with metadata merged, in source order.
    pub async fn list_entries(&self, metadata: MetadataMap) -> Result<Vec<Image>, LoadError> {
        match self {
            Source::Local(local) => {
                let local = local.clone();
                let images =
                    tokio::task::spawn_blocking(move || local.list_entries(&metadata)).await??;
                Ok(images)
            }
            Source::Remote(remote) => Ok(remote.list_entries(&metadata).await?),
        }
    }
}
