//! Image enumeration from an R2 bucket.
//!
//! The whole bucket is listed page by page, following continuation tokens
//! until none is returned. Objects whose keys pass the image filter become
//! [`Image`] records with a display URL:
//!
//! - a public domain is configured (and is not R2's private endpoint) →
//!   `{domain}/{key}`
//! - otherwise → a presigned GET URL valid for [`SIGNED_URL_TTL`]
//!
//! URL resolution for all objects is joined as one batch. If any single
//! signing request fails, the whole listing fails.

use crate::config::R2_PRIVATE_DOMAIN;
use crate::metadata::{self, MetadataMap};
use crate::naming;
use crate::storage::{ObjectStore, ObjectSummary, StoreError};
use crate::types::Image;
use futures::future::try_join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Lifetime of presigned URLs.
pub const SIGNED_URL_TTL: Duration = Duration::from_secs(60 * 60);

/// A connected bucket plus the URL policy for its objects.
pub struct RemoteSource {
    pub store: Arc<dyn ObjectStore>,
    pub bucket: String,
    /// Public domain, trailing slash already stripped.
    pub public_domain: Option<String>,
}

impl std::fmt::Debug for RemoteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteSource")
            .field("bucket", &self.bucket)
            .field("public_domain", &self.public_domain)
            .finish_non_exhaustive()
    }
}

impl RemoteSource {
    /// Every object in the bucket, across all listing pages.
    pub async fn list_all(&self) -> Result<Vec<ObjectSummary>, StoreError> {
        let mut objects = Vec::new();
        let mut token = None;
        let mut pages = 0usize;
        loop {
            let page = self.store.list_page(&self.bucket, token).await?;
            pages += 1;
            objects.extend(page.objects);
            match page.next_continuation_token {
                Some(next) => token = Some(next),
                None => break,
            }
        }
        debug!(bucket = %self.bucket, pages, objects = objects.len(), "listed bucket");
        Ok(objects)
    }

    /// Public domain to build URLs from, unless it points at the private endpoint.
    fn usable_public_domain(&self) -> Option<&str> {
        self.public_domain
            .as_deref()
            .filter(|domain| !domain.contains(R2_PRIVATE_DOMAIN))
    }

    async fn display_url(&self, key: &str) -> Result<String, StoreError> {
        match self.usable_public_domain() {
            Some(domain) => Ok(format!("{domain}/{key}")),
            None => {
                self.store
                    .signed_url(&self.bucket, key, SIGNED_URL_TTL)
                    .await
            }
        }
    }

    async fn resolve(
        &self,
        object: ObjectSummary,
        metadata: &MetadataMap,
    ) -> Result<Image, StoreError> {
        let url = self.display_url(&object.key).await?;
        let image = Image {
            tags: naming::tags_for_key(&object.key),
            key: object.key,
            url,
            last_modified: object.last_modified,
            size: object.size,
            description: String::new(),
            credits: None,
        };
        Ok(metadata::apply(image, metadata))
    }

    /// List the bucket and resolve every image object, in listing order.
    pub async fn list_entries(&self, metadata: &MetadataMap) -> Result<Vec<Image>, StoreError> {
        let objects = self.list_all().await?;
        let pending = objects
            .into_iter()
            .filter(|object| naming::is_image_name(&object.key))
            .map(|object| self.resolve(object, metadata));
        try_join_all(pending).await
    }
}
