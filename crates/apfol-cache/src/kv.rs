//! Key-value store wrapper with automatic serialization.

use crate::{CacheError, FileBackend, MemoryBackend, StoreBackend};
use serde::{de::DeserializeOwned, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Type-safe cache over a [`StoreBackend`].
///
/// Provides automatic JSON serialization for any type that implements
/// `Serialize` and `DeserializeOwned`. Cloning is cheap and clones share
/// the same backend.
#[derive(Debug, Clone)]
pub struct Cache {
    backend: Arc<dyn StoreBackend>,
}

impl Cache {
    /// Wrap an existing backend.
    pub fn with_backend(backend: Arc<dyn StoreBackend>) -> Self {
        Self { backend }
    }

    /// Open a cache that lives only in this process.
    pub fn in_memory() -> Self {
        Self::with_backend(Arc::new(MemoryBackend::new()))
    }

    /// Open a cache persisted to a JSON file.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cache = Cache::open_file(data_dir.join("storage.json"))?;
    /// ```
    pub fn open_file(path: impl Into<PathBuf>) -> Result<Self, CacheError> {
        Ok(Self::with_backend(Arc::new(FileBackend::open(path)?)))
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cart: Option<Cart> = cache.get("apfol_local_cart")?;
    /// ```
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.backend.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Set a value in the cache.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let raw = serde_json::to_string(value)?;
        self.backend.set(key, raw)
    }

    /// Delete a value from the cache.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.backend.delete(key)
    }

    /// Check if a key exists in the cache.
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.backend.exists(key)
    }

    /// Get all keys in the cache.
    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        self.backend.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Snapshot {
        items: Vec<String>,
        count: i64,
    }

    #[test]
    fn test_set_get_delete() {
        let cache = Cache::in_memory();
        let value = Snapshot {
            items: vec!["a".into(), "b".into()],
            count: 2,
        };

        cache.set("snap", &value).unwrap();
        assert!(cache.exists("snap").unwrap());
        assert_eq!(cache.get::<Snapshot>("snap").unwrap(), Some(value));

        cache.delete("snap").unwrap();
        assert_eq!(cache.get::<Snapshot>("snap").unwrap(), None);
    }

    #[test]
    fn test_clones_share_backend() {
        let cache = Cache::in_memory();
        let other = cache.clone();
        cache.set("pointer", "cart-1").unwrap();
        assert_eq!(other.get::<String>("pointer").unwrap().as_deref(), Some("cart-1"));
    }

    #[test]
    fn test_type_mismatch_is_serialize_error() {
        let cache = Cache::in_memory();
        cache.set("n", &42).unwrap();
        assert!(matches!(
            cache.get::<Snapshot>("n"),
            Err(CacheError::SerializeError(_))
        ));
    }

    #[test]
    fn test_file_cache_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        Cache::open_file(&path).unwrap().set("k", &vec![1, 2, 3]).unwrap();
        let reopened = Cache::open_file(&path).unwrap();
        assert_eq!(reopened.get::<Vec<i32>>("k").unwrap(), Some(vec![1, 2, 3]));
        assert_eq!(reopened.keys().unwrap(), vec!["k".to_string()]);
    }
}
