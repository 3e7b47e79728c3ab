//! In-memory object storage
//!
//! Backs unit tests; keeps objects in a map and can be told to fail the
//! next uploads matching a path fragment, to exercise batch-abort and
//! best-effort-removal behavior.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Mutex;

use super::traits::{ObjectStorage, StorageError};

#[derive(Default)]
pub struct InMemoryObjectStorage {
    objects: DashMap<String, Vec<u8>>,
    fail_put_containing: Mutex<Option<String>>,
    fail_delete_containing: Mutex<Option<String>>,
}

impl InMemoryObjectStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `put` whose path contains `fragment` fail
    pub fn fail_puts_containing(&self, fragment: &str) {
        *self.fail_put_containing.lock().unwrap() = Some(fragment.to_string());
    }

    /// Make every `delete` whose path contains `fragment` fail
    pub fn fail_deletes_containing(&self, fragment: &str) {
        *self.fail_delete_containing.lock().unwrap() = Some(fragment.to_string());
    }

    pub fn contains(&self, path: &str) -> bool {
        self.objects.contains_key(path)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }
}

#[async_trait]
impl ObjectStorage for InMemoryObjectStorage {
    async fn put(&self, path: &str, bytes: &[u8]) -> Result<(), StorageError> {
        if let Some(fragment) = self.fail_put_containing.lock().unwrap().as_deref() {
            if path.contains(fragment) {
                return Err(StorageError::Io(format!("injected upload failure: {path}")));
            }
        }
        self.objects.insert(path.to_string(), bytes.to_vec());
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("memory://{path}")
    }

    async fn get(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        self.objects
            .get(path)
            .map(|bytes| bytes.clone())
            .ok_or_else(|| StorageError::NotFound(path.to_string()))
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        if let Some(fragment) = self.fail_delete_containing.lock().unwrap().as_deref() {
            if path.contains(fragment) {
                return Err(StorageError::Io(format!("injected delete failure: {path}")));
            }
        }
        self.objects.remove(path);
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stores_and_fetches_objects() {
        let storage = InMemoryObjectStorage::new();
        storage.put("events/ev-1/a.txt", b"abc").await.unwrap();
        assert_eq!(storage.get("events/ev-1/a.txt").await.unwrap(), b"abc");
        assert!(storage.contains("events/ev-1/a.txt"));
    }

    #[tokio::test]
    async fn injected_put_failure_only_hits_matching_paths() {
        let storage = InMemoryObjectStorage::new();
        storage.fail_puts_containing("bad");
        assert!(storage.put("events/ev-1/bad.txt", b"x").await.is_err());
        assert!(storage.put("events/ev-1/good.txt", b"x").await.is_ok());
    }
}
