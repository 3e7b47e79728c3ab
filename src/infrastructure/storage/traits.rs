//! Object storage trait definitions
//!
//! Event attachments live in external object storage, scoped to a single
//! configured bucket. The service only ever sees bucket-relative paths.

use async_trait::async_trait;
use thiserror::Error;

/// Object storage errors, surfaced to the user as plain messages —
/// never fatal to the surrounding form session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("storage error: {0}")]
    Io(String),
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store an object under a bucket-relative path
    async fn put(&self, path: &str, bytes: &[u8]) -> Result<(), StorageError>;

    /// Public URL under which the object is reachable
    fn public_url(&self, path: &str) -> String;

    /// Fetch an object's bytes
    async fn get(&self, path: &str) -> Result<Vec<u8>, StorageError>;

    /// Delete an object; deleting a missing object is not an error
    async fn delete(&self, path: &str) -> Result<(), StorageError>;
}
