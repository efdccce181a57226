//! Shared test utilities for the gallery-index test suite.
//!
//! Provides record builders, temporary directory trees, and an in-memory
//! [`ObjectStore`] so bucket listing can be exercised without a network.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_tree(&["a.jpg", "nature/b.png"]);
//!
//! let store = Arc::new(FakeStore::with_pages(vec![
//!     vec![summary("a.jpg", 10)],
//!     vec![summary("nature/b.png", 20)],
//! ]));
//! let connector = FakeConnector::new(store.clone());
//! ```

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

use crate::config::{R2Credentials, R2Settings};
use crate::naming;
use crate::storage::{ObjectPage, ObjectStore, ObjectSummary, StoreConnector, StoreError};
use crate::types::Image;

// =========================================================================
// Record builders
// =========================================================================

fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

/// An image with tags derived from `key`, as a source would build it.
pub fn image(key: &str) -> Image {
    Image {
        key: key.to_string(),
        url: format!("https://img.test/{key}"),
        last_modified: fixed_time(),
        size: 1,
        tags: naming::tags_for_key(key),
        description: String::new(),
        credits: None,
    }
}

/// An image with explicit tags, for tag-index edge cases.
pub fn image_with_tags(key: &str, tags: &[&str]) -> Image {
    Image {
        tags: tags.iter().map(|t| t.to_string()).collect(),
        ..image(key)
    }
}

pub fn summary(key: &str, size: u64) -> ObjectSummary {
    ObjectSummary {
        key: key.to_string(),
        last_modified: fixed_time(),
        size,
    }
}

/// Complete R2 settings for bucket `gallery`.
pub fn r2_settings(public_domain: Option<&str>) -> R2Settings {
    R2Settings {
        account_id: Some("acct".into()),
        access_key_id: Some("key".into()),
        secret_access_key: Some("secret".into()),
        bucket_name: Some("gallery".into()),
        public_domain: public_domain.map(String::from),
    }
}

// =========================================================================
// Filesystem fixtures
// =========================================================================

/// Write `contents` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, contents: &[u8]) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
}

/// A temp directory holding one small file per relative path.
pub fn setup_tree(files: &[&str]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for file in files {
        write_file(tmp.path(), file, b"image");
    }
    tmp
}

// =========================================================================
// In-memory object store
// =========================================================================

/// Serves fixed listing pages, chained with tokens `page-1`, `page-2`, ...
///
/// Signed URLs look like `https://signed.test/{bucket}/{key}?ttl={secs}`.
#[derive(Default)]
pub struct FakeStore {
    pages: Vec<Vec<ObjectSummary>>,
    fail_listing: bool,
    fail_signing: Option<String>,
    list_calls: Mutex<Vec<Option<String>>>,
    signed: Mutex<Vec<String>>,
}

impl FakeStore {
    pub fn with_pages(pages: Vec<Vec<ObjectSummary>>) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }

    pub fn fail_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    pub fn fail_signing(mut self, key: &str) -> Self {
        self.fail_signing = Some(key.to_string());
        self
    }

    /// Continuation tokens received, in call order.
    pub fn list_calls(&self) -> Vec<Option<String>> {
        self.list_calls.lock().unwrap().clone()
    }

    /// Keys signed so far, in completion order.
    pub fn signed_keys(&self) -> Vec<String> {
        self.signed.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for FakeStore {
    async fn list_page(
        &self,
        bucket: &str,
        continuation_token: Option<String>,
    ) -> Result<ObjectPage, StoreError> {
        self.list_calls
            .lock()
            .unwrap()
            .push(continuation_token.clone());
        if self.fail_listing {
            return Err(StoreError::List {
                bucket: bucket.to_string(),
                message: "access denied".into(),
            });
        }

        let index = match continuation_token {
            None => 0,
            Some(token) => token
                .strip_prefix("page-")
                .and_then(|n| n.parse::<usize>().ok())
                .unwrap_or_else(|| panic!("unexpected continuation token {token}")),
        };
        let objects = self.pages.get(index).cloned().unwrap_or_default();
        let next_continuation_token =
            (index + 1 < self.pages.len()).then(|| format!("page-{}", index + 1));
        Ok(ObjectPage {
            objects,
            next_continuation_token,
        })
    }

    async fn signed_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, StoreError> {
        if self.fail_signing.as_deref() == Some(key) {
            return Err(StoreError::Sign {
                key: key.to_string(),
                message: "signature rejected".into(),
            });
        }
        self.signed.lock().unwrap().push(key.to_string());
        Ok(format!(
            "https://signed.test/{bucket}/{key}?ttl={}",
            expires_in.as_secs()
        ))
    }
}

/// Hands out one shared [`FakeStore`] and records each connection.
#[derive(Clone)]
pub struct FakeConnector {
    store: Arc<FakeStore>,
    accounts: Arc<Mutex<Vec<String>>>,
}

impl FakeConnector {
    pub fn new(store: Arc<FakeStore>) -> Self {
        Self {
            store,
            accounts: Arc::default(),
        }
    }

    pub fn connections(&self) -> usize {
        self.accounts.lock().unwrap().len()
    }

    pub fn last_account(&self) -> Option<String> {
        self.accounts.lock().unwrap().last().cloned()
    }
}

impl StoreConnector for FakeConnector {
    fn connect(&self, credentials: &R2Credentials) -> Arc<dyn ObjectStore> {
        self.accounts
            .lock()
            .unwrap()
            .push(credentials.account_id.clone());
        self.store.clone()
    }
}
