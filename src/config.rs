//! Loader configuration.
//!
//! Settings are layered, later layers winning:
//!
//! 1. Stock defaults
//! 2. `gallery.toml` in the working directory, or the file given with `--config`
//! 3. Environment variables
//!
//! ```toml
//! # All options are optional
//! local_source = "photos"                      # LOCAL_SOURCE
//! metadata_path = "_data/image_metadata.json"  # GALLERY_METADATA
//!
//! [r2]
//! account_id = "..."                           # R2_ACCOUNT_ID
//! access_key_id = "..."                        # R2_ACCESS_KEY_ID
//! secret_access_key = "..."                    # R2_SECRET_ACCESS_KEY
//! bucket_name = "gallery"                      # R2_BUCKET_NAME
//! public_domain = "https://img.example.com"    # R2_PUBLIC_DOMAIN
//! ```
//!
//! Setting `local_source` selects local mode; otherwise the R2 bucket is used.
//! Empty values count as unset in every layer. Unknown keys are rejected to
//! catch typos early.

use crate::metadata::DEFAULT_METADATA_PATH;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ENV_LOCAL_SOURCE: &str = "LOCAL_SOURCE";
pub const ENV_METADATA_PATH: &str = "GALLERY_METADATA";
pub const ENV_ACCOUNT_ID: &str = "R2_ACCOUNT_ID";
pub const ENV_ACCESS_KEY_ID: &str = "R2_ACCESS_KEY_ID";
pub const ENV_SECRET_ACCESS_KEY: &str = "R2_SECRET_ACCESS_KEY";
pub const ENV_BUCKET_NAME: &str = "R2_BUCKET_NAME";
pub const ENV_PUBLIC_DOMAIN: &str = "R2_PUBLIC_DOMAIN";

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "gallery.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("missing required setting {0}")]
    Missing(&'static str),
}

/// Fully resolved loader settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Local image directory, relative to the working directory. Selects local mode.
    pub local_source: Option<PathBuf>,
    /// Manual metadata JSON file.
    pub metadata_path: PathBuf,
    /// Object-storage mode settings.
    pub r2: R2Settings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            local_source: None,
            metadata_path: PathBuf::from(DEFAULT_METADATA_PATH),
            r2: R2Settings::default(),
        }
    }
}

/// Cloudflare R2 bucket settings.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct R2Settings {
    pub account_id: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub bucket_name: Option<String>,
    pub public_domain: Option<String>,
}

impl fmt::Debug for R2Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("R2Settings")
            .field("account_id", &self.account_id)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &self.secret_access_key.as_ref().map(|_| "***"))
            .field("bucket_name", &self.bucket_name)
            .field("public_domain", &self.public_domain)
            .finish()
    }
}

/// The three values needed to build a storage client.
#[derive(Clone, PartialEq)]
pub struct R2Credentials {
    pub account_id: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl R2Credentials {
    /// S3-compatible endpoint for the account.
    pub fn endpoint(&self) -> String {
        format!("https://{}.{}", self.account_id, R2_PRIVATE_DOMAIN)
    }
}

impl fmt::Debug for R2Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("R2Credentials")
            .field("account_id", &self.account_id)
            .field("access_key_id", &self.access_key_id)
            .finish_non_exhaustive()
    }
}

/// Domain of R2's private S3 endpoint. Never usable for public URLs.
pub const R2_PRIVATE_DOMAIN: &str = "r2.cloudflarestorage.com";

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl R2Settings {
    /// Credentials, or the first missing variable.
    pub fn credentials(&self) -> Result<R2Credentials, ConfigError> {
        let account_id = non_empty(&self.account_id).ok_or(ConfigError::Missing(ENV_ACCOUNT_ID))?;
        let access_key_id =
            non_empty(&self.access_key_id).ok_or(ConfigError::Missing(ENV_ACCESS_KEY_ID))?;
        let secret_access_key = non_empty(&self.secret_access_key)
            .ok_or(ConfigError::Missing(ENV_SECRET_ACCESS_KEY))?;
        Ok(R2Credentials {
            account_id: account_id.to_string(),
            access_key_id: access_key_id.to_string(),
            secret_access_key: secret_access_key.to_string(),
        })
    }

    pub fn bucket(&self) -> Result<&str, ConfigError> {
        non_empty(&self.bucket_name).ok_or(ConfigError::Missing(ENV_BUCKET_NAME))
    }

    /// Public domain with trailing slashes stripped, if set.
    pub fn public_domain(&self) -> Option<&str> {
        non_empty(&self.public_domain)
            .map(|d| d.trim_end_matches('/'))
            .filter(|d| !d.is_empty())
    }
}

impl Settings {
    /// Local source directory, if local mode is configured.
    pub fn local_source(&self) -> Option<&Path> {
        self.local_source
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// Overlay variables from `lookup` (usually the process environment).
    pub fn with_vars<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if let Some(v) = get(ENV_LOCAL_SOURCE) {
            self.local_source = Some(PathBuf::from(v));
        }
        if let Some(v) = get(ENV_METADATA_PATH) {
            self.metadata_path = PathBuf::from(v);
        }
        let r2 = &mut self.r2;
        for (name, slot) in [
            (ENV_ACCOUNT_ID, &mut r2.account_id),
            (ENV_ACCESS_KEY_ID, &mut r2.access_key_id),
            (ENV_SECRET_ACCESS_KEY, &mut r2.secret_access_key),
            (ENV_BUCKET_NAME, &mut r2.bucket_name),
            (ENV_PUBLIC_DOMAIN, &mut r2.public_domain),
        ] {
            if let Some(v) = get(name) {
                *slot = Some(v);
            }
        }
        self
    }
}

/// Parse a settings file. Keys missing from the file keep their defaults.
pub fn load_file(path: &Path) -> Result<Settings, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Resolve settings from a config file and a variable lookup.
///
/// With `file = None`, [`DEFAULT_CONFIG_FILE`] in `base_dir` is read if it
/// exists. An explicitly named file must exist; a relative one is taken
/// against `base_dir` too.
pub fn resolve<F>(file: Option<&Path>, base_dir: &Path, lookup: F) -> Result<Settings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let base = match file {
        Some(path) => load_file(&base_dir.join(path))?,
        None => {
            let default = base_dir.join(DEFAULT_CONFIG_FILE);
            if default.is_file() {
                load_file(&default)?
            } else {
                Settings::default()
            }
        }
    };
    Ok(base.with_vars(lookup))
}

/// [`resolve`] against the process environment.
pub fn from_env(file: Option<&Path>, base_dir: &Path) -> Result<Settings, ConfigError> {
    resolve(file, base_dir, |name| std::env::var(name).ok())
}

/// Returns a fully-commented stock `gallery.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Gallery Index Configuration
# ===========================
# All settings are optional. Environment variables override this file.
# Unknown keys will cause an error.

# Local image directory, relative to the working directory.
# When set, images are read from disk and the [r2] section is ignored.
# Env: LOCAL_SOURCE
# local_source = "photos"

# Manual descriptions and credits, keyed by image key.
# A missing or malformed file is treated as empty.
# Env: GALLERY_METADATA
metadata_path = "_data/image_metadata.json"

# ---------------------------------------------------------------------------
# Cloudflare R2 (used when local_source is not set)
# ---------------------------------------------------------------------------
[r2]
# Account ID, access key and secret are all required to connect.
# Env: R2_ACCOUNT_ID, R2_ACCESS_KEY_ID, R2_SECRET_ACCESS_KEY
# account_id = ""
# access_key_id = ""
# secret_access_key = ""

# Bucket holding the gallery images.
# Env: R2_BUCKET_NAME
# bucket_name = ""

# Public domain serving the bucket, e.g. "https://img.example.com".
# When unset, images get presigned URLs valid for one hour.
# Env: R2_PUBLIC_DOMAIN
# public_domain = ""
"##
}
