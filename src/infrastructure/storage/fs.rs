//! Filesystem-backed object storage
//!
//! Stores objects as plain files under `<root_dir>/<bucket>/<path>`.
//! Suitable for single-node deployments; the trait boundary keeps a
//! hosted object store swappable in later.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use log::debug;

use super::traits::{ObjectStorage, StorageError};

pub struct FsObjectStorage {
    bucket_dir: PathBuf,
    public_base_url: String,
}

impl FsObjectStorage {
    pub fn new(root_dir: impl Into<PathBuf>, bucket: &str, public_base_url: &str) -> Self {
        Self {
            bucket_dir: root_dir.into().join(bucket),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Resolve a bucket-relative path, rejecting traversal components.
    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(path);
        let traversal = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if traversal || path.is_empty() {
            return Err(StorageError::Io(format!("invalid object path: {path}")));
        }
        Ok(self.bucket_dir.join(relative))
    }
}

#[async_trait]
impl ObjectStorage for FsObjectStorage {
    async fn put(&self, path: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::Io(e.to_string()))?;
        }
        debug!("Storing object {} ({} bytes)", path, bytes.len());
        tokio::fs::write(&target, bytes)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.public_base_url, path)
    }

    async fn get(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let target = self.resolve(path)?;
        match tokio::fs::read(&target).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.to_string()))
            }
            Err(e) => Err(StorageError::Io(e.to_string())),
        }
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        let target = self.resolve(path)?;
        match tokio::fs::remove_file(&target).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e.to_string())),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> FsObjectStorage {
        let dir = std::env::temp_dir().join(format!("vb-storage-{}", uuid::Uuid::new_v4()));
        FsObjectStorage::new(dir, "event-files", "http://localhost:8080/files")
    }

    #[tokio::test]
    async fn put_get_delete_roundtrip() {
        let storage = storage();
        storage.put("events/ev-1/contract.pdf", b"pdf").await.unwrap();
        assert_eq!(storage.get("events/ev-1/contract.pdf").await.unwrap(), b"pdf");

        storage.delete("events/ev-1/contract.pdf").await.unwrap();
        assert_eq!(
            storage.get("events/ev-1/contract.pdf").await,
            Err(StorageError::NotFound("events/ev-1/contract.pdf".to_string()))
        );
    }

    #[tokio::test]
    async fn deleting_missing_object_is_ok() {
        let storage = storage();
        assert!(storage.delete("events/ev-9/ghost.txt").await.is_ok());
    }

    #[tokio::test]
    async fn traversal_paths_are_rejected() {
        let storage = storage();
        assert!(storage.put("../outside.txt", b"x").await.is_err());
        assert!(storage.get("/etc/passwd").await.is_err());
    }

    #[test]
    fn public_url_joins_base_and_path() {
        let storage = storage();
        assert_eq!(
            storage.public_url("events/ev-1/contract.pdf"),
            "http://localhost:8080/files/events/ev-1/contract.pdf"
        );
    }
}
