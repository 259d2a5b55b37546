//! Storage abstraction trait

use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Rename failed: {0}")]
    RenameFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// File store used by the photo lifecycle.
///
/// Keys are relative, `/`-separated paths such as `photos/12.jpg`.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write `data` at `key`, replacing any existing file
    async fn write(&self, key: &str, data: &[u8]) -> StorageResult<()>;

    async fn read(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Delete the file at `key`. Deleting a missing file succeeds.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Move a file to a new key. `NotFound` if `from` does not exist.
    async fn rename(&self, from: &str, to: &str) -> StorageResult<()>;

    /// Public URL the file at `key` is served from
    fn url(&self, key: &str) -> String;
}
