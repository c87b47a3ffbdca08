//! On-device key-value persistence.
//!
//! A single JSON file maps string keys to JSON values. Each `put` rewrites
//! the whole file; each key holds one self-contained value, so there is no
//! cross-key consistency to maintain.

use anyhow::{Context, Result};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::warn;

/// Key for the last successfully viewed city (JSON string).
pub const KEY_CITY: &str = "city";
/// Key for the favorites list (JSON array of city names).
pub const KEY_FAVORITES: &str = "favorites";

/// JSON file-backed store. Missing keys read back as `None`, never an error.
#[derive(Debug)]
pub struct KvStore {
    path: PathBuf,
    cache: RwLock<HashMap<String, Value>>,
}

impl KvStore {
    /// Open the store at `path`, loading existing contents. A missing file
    /// means a first run and yields an empty store; an unreadable file is
    /// treated the same way after a diagnostic.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let data = match fs::read_to_string(&path).await {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(map) => map,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "store file unreadable, starting empty");
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };

        Ok(Self { path, cache: RwLock::new(data) })
    }

    /// Open the store at its platform data-directory location.
    pub async fn open_default() -> Result<Self> {
        let dirs = crate::config::project_dirs()?;
        let dir = dirs.data_dir();

        fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;

        Self::open(dir.join("store.json")).await
    }

    /// Read and deserialize the value under `key`. Absent keys are `Ok(None)`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let cache = self.cache.read().await;

        match cache.get(key) {
            Some(value) => {
                let parsed = serde_json::from_value(value.clone())
                    .with_context(|| format!("Stored value under key '{key}' has unexpected shape"))?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    /// Serialize `value` under `key` and flush the store to disk. The write
    /// has completed durably by the time this returns; callers that need a
    /// subsequent read to reflect it must await it.
    pub async fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_value(value)
            .with_context(|| format!("Failed to serialize value for key '{key}'"))?;

        {
            let mut cache = self.cache.write().await;
            cache.insert(key.to_string(), json);
        }

        self.save().await
    }

    /// Write-replace: temp file, flush, atomic rename. A crash mid-write
    /// leaves the previous file intact.
    async fn save(&self) -> Result<()> {
        let cache = self.cache.read().await;
        let json = serde_json::to_string_pretty(&*cache).context("Failed to serialize store")?;
        drop(cache);

        let temp_path = self.path.with_extension("json.tmp");

        let mut file = fs::File::create(&temp_path)
            .await
            .with_context(|| format!("Failed to create temp store file: {}", temp_path.display()))?;
        file.write_all(json.as_bytes())
            .await
            .with_context(|| format!("Failed to write temp store file: {}", temp_path.display()))?;
        file.sync_all()
            .await
            .with_context(|| format!("Failed to flush temp store file: {}", temp_path.display()))?;
        drop(file);

        fs::rename(&temp_path, &self.path)
            .await
            .with_context(|| format!("Failed to replace store file: {}", self.path.display()))?;

        Ok(())
    }
}
