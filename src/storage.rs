//! Object-storage client seam.
//!
//! The bucket source only needs three things from storage: one page of a
//! listing, the continuation token for the next page, and a presigned GET
//! URL. [`ObjectStore`] captures exactly that, so the listing logic in
//! [`bucket`](crate::bucket) runs unchanged against R2 or an in-memory fake.
//!
//! [`R2Store`] is the production implementation over `aws-sdk-s3`, pointed at
//! the account's R2 endpoint with region `auto`.

use crate::config::R2Credentials;
use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("listing bucket {bucket} failed: {message}")]
    List { bucket: String, message: String },
    #[error("signing URL for {key} failed: {message}")]
    Sign { key: String, message: String },
}

/// One object from a bucket listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSummary {
    pub key: String,
    pub last_modified: DateTime<Utc>,
    pub size: u64,
}

/// One page of a bucket listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectPage {
    pub objects: Vec<ObjectSummary>,
    /// Token for the next page; `None` once the listing is exhausted.
    pub next_continuation_token: Option<String>,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch the listing page that starts at `continuation_token`.
    async fn list_page(
        &self,
        bucket: &str,
        continuation_token: Option<String>,
    ) -> Result<ObjectPage, StoreError>;

    /// Presigned GET URL for `key`, valid for `expires_in`.
    async fn signed_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, StoreError>;
}

/// Builds a store from credentials.
///
/// The loader connects on every uncached load, after it has confirmed that
/// all credentials are present.
pub trait StoreConnector: Send + Sync {
    fn connect(&self, credentials: &R2Credentials) -> Arc<dyn ObjectStore>;
}

/// Connects to Cloudflare R2.
#[derive(Debug, Clone, Copy, Default)]
pub struct R2Connector;

impl StoreConnector for R2Connector {
    fn connect(&self, credentials: &R2Credentials) -> Arc<dyn ObjectStore> {
        Arc::new(R2Store::new(credentials))
    }
}

/// `aws-sdk-s3` client configured for an R2 account.
#[derive(Debug, Clone)]
pub struct R2Store {
    client: aws_sdk_s3::Client,
}

impl R2Store {
    pub fn new(credentials: &R2Credentials) -> Self {
        let creds = Credentials::new(
            credentials.access_key_id.clone(),
            credentials.secret_access_key.clone(),
            None,
            None,
            "gallery-index",
        );
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("auto"))
            .endpoint_url(credentials.endpoint())
            .credentials_provider(creds)
            .force_path_style(true)
            .build();
        Self {
            client: aws_sdk_s3::Client::from_conf(config),
        }
    }
}

fn to_utc(timestamp: Option<&aws_sdk_s3::primitives::DateTime>) -> DateTime<Utc> {
    timestamp
        .and_then(|t| DateTime::from_timestamp(t.secs(), t.subsec_nanos()))
        .unwrap_or_default()
}

#[async_trait]
impl ObjectStore for R2Store {
    async fn list_page(
        &self,
        bucket: &str,
        continuation_token: Option<String>,
    ) -> Result<ObjectPage, StoreError> {
        let output = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .set_continuation_token(continuation_token)
            .send()
            .await
            .map_err(|e| StoreError::List {
                bucket: bucket.to_string(),
                message: DisplayErrorContext(e).to_string(),
            })?;

        let objects = output
            .contents()
            .iter()
            .filter_map(|object| {
                let key = object.key()?;
                Some(ObjectSummary {
                    key: key.to_string(),
                    last_modified: to_utc(object.last_modified()),
                    size: object.size().unwrap_or(0).max(0) as u64,
                })
            })
            .collect();

        Ok(ObjectPage {
            objects,
            next_continuation_token: output.next_continuation_token().map(str::to_string),
        })
    }

    async fn signed_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, StoreError> {
        let sign_error = |message: String| StoreError::Sign {
            key: key.to_string(),
            message,
        };
        let presigning = PresigningConfig::expires_in(expires_in)
            .map_err(|e| sign_error(e.to_string()))?;
        let request = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| sign_error(DisplayErrorContext(e).to_string()))?;
        Ok(request.uri().to_string())
    }
}
