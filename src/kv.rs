//! Persistence collaborator
//!
//! The watcher persists its alert history through a key-value blob store:
//! one `get` at startup, one `set` per successful append. Backends are
//! expected to write whole values atomically.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;

/// Key-value blob store seam
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Reads the blob stored under `key`, if any
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous blob
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store, used in tests and for sessions that don't need
/// persistence across restarts
#[derive(Default)]
pub struct MemoryKvStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryKvStore {
    /// Creates an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed store: one file per key under a base directory
///
/// Values are written to a temporary sibling file and renamed into place,
/// so a crash mid-write leaves the previous blob intact.
pub struct FileKvStore {
    dir: PathBuf,
}

impl FileKvStore {
    /// Creates a store rooted at `dir` (created on first write)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl KvStore for FileKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_round_trip() {
        let store = MemoryKvStore::new();
        assert_eq!(store.get("alerts").await.unwrap(), None);

        store.set("alerts", "[]").await.unwrap();
        assert_eq!(store.get("alerts").await.unwrap(), Some("[]".to_string()));

        store.set("alerts", "[1]").await.unwrap();
        assert_eq!(store.get("alerts").await.unwrap(), Some("[1]".to_string()));
    }

    #[tokio::test]
    async fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKvStore::new(dir.path());

        assert_eq!(store.get("alerts").await.unwrap(), None);
        store.set("alerts", r#"[{"listingId":"x"}]"#).await.unwrap();
        assert_eq!(
            store.get("alerts").await.unwrap(),
            Some(r#"[{"listingId":"x"}]"#.to_string())
        );
    }

    #[tokio::test]
    async fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileKvStore::new(dir.path());
            store.set("alerts", "persisted").await.unwrap();
        }
        let reopened = FileKvStore::new(dir.path());
        assert_eq!(
            reopened.get("alerts").await.unwrap(),
            Some("persisted".to_string())
        );
    }
}
