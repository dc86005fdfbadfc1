//! JSON-file backed local store.

use super::{LocalStore, StoreError};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

/// A [`LocalStore`] persisted as one JSON object on disk.
///
/// Every write rewrites the whole file through a temporary file and a
/// rename, so a crash mid-write leaves either the old or the new contents.
/// The in-memory map only changes once the file write succeeded.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`, creating it empty if the file does not exist.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let values = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Local state file missing, starting empty");
                BTreeMap::new()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, values: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(values)?;
        let temp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, json).await?;
        tokio::fs::rename(&temp_path, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl LocalStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), StoreError> {
        let mut values = self.values.lock().await;
        let mut next = values.clone();
        for (key, value) in entries {
            next.insert(key.to_string(), value.to_string());
        }
        self.persist(&next).await?;
        *values = next;
        Ok(())
    }

    async fn remove(&self, keys: &[&str]) -> Result<(), StoreError> {
        let mut values = self.values.lock().await;
        if !keys.iter().any(|key| values.contains_key(*key)) {
            return Ok(());
        }
        let mut next = values.clone();
        for key in keys {
            next.remove(*key);
        }
        self.persist(&next).await?;
        *values = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("bookpay-{name}-{}.json", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let path = temp_path("reopen");

        let store = FileStore::open(&path).await.unwrap();
        assert_eq!(store.get("orderCode").await.unwrap(), None);
        store.set("orderCode", "ABC").await.unwrap();
        store.set("amount", "100000").await.unwrap();
        drop(store);

        let store = FileStore::open(&path).await.unwrap();
        assert_eq!(store.get("orderCode").await.unwrap().as_deref(), Some("ABC"));

        store.remove(&["orderCode", "missing"]).await.unwrap();
        drop(store);

        let store = FileStore::open(&path).await.unwrap();
        assert_eq!(store.get("orderCode").await.unwrap(), None);
        assert_eq!(store.get("amount").await.unwrap().as_deref(), Some("100000"));

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_failed_write_leaves_memory_unchanged() {
        let dir = std::env::temp_dir().join(format!("bookpay-gone-{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir(&dir).await.unwrap();
        let store = FileStore::open(dir.join("state.json")).await.unwrap();
        store.set("orderCode", "ABC").await.unwrap();
        tokio::fs::remove_dir_all(&dir).await.unwrap();

        let result = store
            .set_many(&[("orderCode", "XYZ"), ("amount", "5")])
            .await;
        assert!(matches!(result, Err(StoreError::Io(_))));
        assert_eq!(store.get("orderCode").await.unwrap().as_deref(), Some("ABC"));
        assert_eq!(store.get("amount").await.unwrap(), None);

        assert!(store.remove(&["orderCode"]).await.is_err());
        assert_eq!(store.get("orderCode").await.unwrap().as_deref(), Some("ABC"));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported() {
        let path = temp_path("corrupt");
        tokio::fs::write(&path, b"{not json").await.unwrap();

        let result = FileStore::open(&path).await;
        assert!(matches!(result, Err(StoreError::Json(_))));

        let _ = tokio::fs::remove_file(&path).await;
    }
}
