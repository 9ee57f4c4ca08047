use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::PathBuf;

use log::{debug, info};
use tokio::fs;
use tokio::sync::Mutex;

use crate::error::StoreError;

/// File-backed set of subscriber chat ids.
///
/// The JSON file is the sole source of truth across restarts: it is read once
/// at load and rewritten on every mutation. Writes go to a sibling temp file
/// and are renamed into place, so the visible file is always a complete
/// array.
pub struct SubscriberStore {
    path: PathBuf,
    subscribers: Mutex<HashSet<u64>>,
}

impl SubscriberStore {
    /// Load the store from `path`.
    ///
    /// A missing file is a first run and yields an empty set. A file that
    /// exists but does not parse is a hard error; starting with an empty set
    /// would silently drop every subscriber.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let subscribers: HashSet<u64> = match fs::read(&path).await {
            Ok(bytes) => {
                let ids: Vec<u64> = serde_json::from_slice(&bytes).map_err(|source| {
                    StoreError::Corrupt {
                        path: path.clone(),
                        source,
                    }
                })?;
                ids.into_iter().collect()
            }
            Err(e) if e.kind() == ErrorKind::NotFound => HashSet::new(),
            Err(e) => return Err(StoreError::Storage(e)),
        };

        info!(
            "subscriber store loaded path={} count={}",
            path.display(),
            subscribers.len()
        );

        Ok(Self {
            path,
            subscribers: Mutex::new(subscribers),
        })
    }

    /// Load the store from environment variables.
    /// Reads SUBSCRIBERS_FILE, defaulting to `subscribers.json`.
    pub async fn from_env() -> Result<Self, StoreError> {
        let path = std::env::var("SUBSCRIBERS_FILE")
            .unwrap_or_else(|_| "subscribers.json".to_string());

        Self::load(path).await
    }

    /// Subscribe a chat id.
    /// Returns true if it was newly added.
    ///
    /// The in-memory set is updated before the file; if the write fails the
    /// membership change survives in memory and the error is reported to the
    /// caller.
    pub async fn add(&self, id: u64) -> Result<bool, StoreError> {
        let mut subscribers = self.subscribers.lock().await;

        let added = subscribers.insert(id);
        if added {
            self.persist(&subscribers).await?;
            debug!("subscriber added id={} count={}", id, subscribers.len());
        }

        Ok(added)
    }

    /// Unsubscribe a chat id.
    /// Returns true if it existed; removing an absent id is a no-op.
    pub async fn remove(&self, id: u64) -> Result<bool, StoreError> {
        let mut subscribers = self.subscribers.lock().await;

        let removed = subscribers.remove(&id);
        if removed {
            self.persist(&subscribers).await?;
            debug!("subscriber removed id={} count={}", id, subscribers.len());
        }

        Ok(removed)
    }

    /// Snapshot of all subscribed ids.
    pub async fn list(&self) -> Vec<u64> {
        self.subscribers.lock().await.iter().copied().collect()
    }

    /// Total number of subscribers.
    pub async fn len(&self) -> usize {
        self.subscribers.lock().await.len()
    }

    /// Returns true if nobody is subscribed.
    pub async fn is_empty(&self) -> bool {
        self.subscribers.lock().await.is_empty()
    }

    // Callers hold the set lock, so temp file writes never interleave.
    async fn persist(&self, subscribers: &HashSet<u64>) -> Result<(), StoreError> {
        let mut ids: Vec<u64> = subscribers.iter().copied().collect();
        ids.sort_unstable();

        let json = serde_json::to_vec(&ids).map_err(|e| StoreError::Storage(e.into()))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, &json).await?;
        fs::rename(&tmp, &self.path).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_path(dir: &TempDir) -> PathBuf {
        dir.path().join("subscribers.json")
    }

    #[tokio::test]
    async fn add_then_list_contains_id() {
        let dir = TempDir::new().unwrap();
        let store = SubscriberStore::load(store_path(&dir)).await.unwrap();

        assert!(store.is_empty().await);
        assert!(store.add(42).await.unwrap());

        assert_eq!(store.list().await, vec![42]);
    }

    #[tokio::test]
    async fn add_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = SubscriberStore::load(store_path(&dir)).await.unwrap();

        assert!(store.add(42).await.unwrap());
        assert!(!store.add(42).await.unwrap());

        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn remove_drops_only_the_given_id() {
        let dir = TempDir::new().unwrap();
        let store = SubscriberStore::load(store_path(&dir)).await.unwrap();

        store.add(42).await.unwrap();
        store.add(7).await.unwrap();

        assert!(store.remove(42).await.unwrap());
        assert_eq!(store.list().await, vec![7]);
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = SubscriberStore::load(store_path(&dir)).await.unwrap();

        store.add(42).await.unwrap();

        assert!(store.remove(42).await.unwrap());
        assert!(!store.remove(42).await.unwrap());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn round_trips_across_instances() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);

        {
            let store = SubscriberStore::load(&path).await.unwrap();
            store.add(3).await.unwrap();
            store.add(1).await.unwrap();
            store.add(2).await.unwrap();
        }

        let reloaded = SubscriberStore::load(&path).await.unwrap();
        let mut ids = reloaded.list().await;
        ids.sort_unstable();

        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn missing_file_yields_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = SubscriberStore::load(store_path(&dir)).await.unwrap();

        assert!(store.is_empty().await);
        assert_eq!(store.list().await, Vec::<u64>::new());
    }

    #[tokio::test]
    async fn malformed_file_fails_to_load() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);
        std::fs::write(&path, b"{ definitely not a subscriber list").unwrap();

        let result = SubscriberStore::load(&path).await;

        assert!(matches!(result, Err(StoreError::Corrupt { .. })));
    }

    #[tokio::test]
    async fn persisted_file_is_a_sorted_json_array() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);
        let store = SubscriberStore::load(&path).await.unwrap();

        store.add(9).await.unwrap();
        store.add(1).await.unwrap();
        store.add(5).await.unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let ids: Vec<u64> = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(ids, vec![1, 5, 9]);
    }
}
