//! JSON file backed key-value store
//!
//! All keys live in a single JSON object on disk. The file is read once, the
//! map is cached, and every write replaces the whole file through a sibling
//! temp file and a rename, so a crash never leaves a half-written document.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use watertime_core::KeyValueStore;
use watertime_domain::Result;

use crate::errors::InfraError;

type Document = BTreeMap<String, String>;

/// Key-value store persisted as one JSON object.
pub struct JsonFileStore {
    path: PathBuf,
    cache: Mutex<Option<Document>>,
}

impl JsonFileStore {
    /// Store backed by `path`. Nothing is read until first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), cache: Mutex::new(None) }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> std::result::Result<Document, InfraError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) if raw.trim().is_empty() => Ok(Document::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Store file does not exist yet");
                Ok(Document::new())
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn write(&self, document: &Document) -> std::result::Result<(), InfraError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(document)?;
        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, json).await?;
        tokio::fs::rename(&staging, &self.path).await?;
        Ok(())
    }

    /// Run `f` against the cached document, loading it on first use.
    async fn with_document<T>(
        &self,
        f: impl FnOnce(&mut Document) -> T,
    ) -> std::result::Result<T, InfraError> {
        let mut guard = self.cache.lock().await;
        if guard.is_none() {
            *guard = Some(self.load().await?);
        }
        let document = guard.get_or_insert_with(Document::new);
        Ok(f(document))
    }

    /// Apply `f` to a copy of the document; the cache only takes the copy
    /// once it is on disk.
    async fn update(&self, f: impl FnOnce(&mut Document)) -> Result<()> {
        let mut guard = self.cache.lock().await;
        let mut document = match guard.as_ref() {
            Some(document) => document.clone(),
            None => self.load().await.unwrap_or_else(|err| {
                warn!(path = %self.path.display(), error = %err, "Overwriting unreadable store file");
                Document::new()
            }),
        };
        f(&mut document);

        self.write(&document).await?;
        *guard = Some(document);
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.with_document(|document| document.get(key).cloned()).await.map_err(Into::into)
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.update(|document| {
            document.insert(key.to_string(), value);
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.update(|document| {
            document.remove(key);
        })
        .await
    }
}
