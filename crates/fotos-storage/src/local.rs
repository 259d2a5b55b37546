use crate::keys::public_url;
use crate::traits::{Storage, StorageError, StorageResult};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "./media")
    /// * `base_url` - Base URL the root is served from (e.g., "/media")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    /// Convert storage key to filesystem path, rejecting keys that could
    /// escape the base directory.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if storage_key.is_empty() {
            return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
        }

        let relative = Path::new(storage_key);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(StorageError::InvalidKey(format!(
                "Storage key contains invalid components: {}",
                storage_key
            )));
        }

        Ok(self.base_path.join(relative))
    }

    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn write(&self, key: &str, data: &[u8]) -> StorageResult<()> {
        let path = self.key_to_path(key)?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(data).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage write successful"
        );

        Ok(())
    }

    async fn read(&self, key: &str) -> StorageResult<Vec<u8>> {
        let path = self.key_to_path(key)?;

        if !fs::try_exists(&path).await? {
            return Err(StorageError::NotFound(key.to_string()));
        }

        let data = fs::read(&path).await.map_err(|e| {
            StorageError::ReadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        tracing::debug!(key = %key, size_bytes = data.len(), "Local storage read");

        Ok(data)
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let path = self.key_to_path(key)?;

        if !fs::try_exists(&path).await? {
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        tracing::info!(path = %path.display(), key = %key, "Local storage delete successful");

        Ok(())
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(key)?;
        Ok(fs::try_exists(&path).await?)
    }

    async fn rename(&self, from: &str, to: &str) -> StorageResult<()> {
        let from_path = self.key_to_path(from)?;
        let to_path = self.key_to_path(to)?;

        if !fs::try_exists(&from_path).await? {
            return Err(StorageError::NotFound(from.to_string()));
        }

        self.ensure_parent_dir(&to_path).await?;

        fs::rename(&from_path, &to_path).await.map_err(|e| {
            StorageError::RenameFailed(format!(
                "Failed to rename {} to {}: {}",
                from_path.display(),
                to_path.display(),
                e
            ))
        })?;

        tracing::info!(from_key = %from, to_key = %to, "Local storage rename successful");

        Ok(())
    }

    fn url(&self, key: &str) -> String {
        public_url(&self.base_url, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn storage(dir: &Path) -> LocalStorage {
        LocalStorage::new(dir, "/media".to_string()).await.unwrap()
    }

    #[tokio::test]
    async fn test_write_read_creates_collection_dirs() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        storage.write("photos/1.jpg", b"jpeg bytes").await.unwrap();

        assert!(dir.path().join("photos").is_dir());
        assert_eq!(storage.read("photos/1.jpg").await.unwrap(), b"jpeg bytes");
        assert!(storage.exists("photos/1.jpg").await.unwrap());
    }

    #[tokio::test]
    async fn test_read_missing_is_not_found() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        let err = storage.read("photos/404.jpg").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_file_is_ok() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        storage.write("photos/2.jpg", b"x").await.unwrap();
        storage.delete("photos/2.jpg").await.unwrap();
        assert!(!storage.exists("photos/2.jpg").await.unwrap());

        storage.delete("photos/2.jpg").await.unwrap();
    }

    #[tokio::test]
    async fn test_rename_moves_file() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        storage.write("photos/temp_abc.jpg", b"data").await.unwrap();
        storage
            .rename("photos/temp_abc.jpg", "photos/9.jpg")
            .await
            .unwrap();

        assert!(!storage.exists("photos/temp_abc.jpg").await.unwrap());
        assert_eq!(storage.read("photos/9.jpg").await.unwrap(), b"data");

        let err = storage
            .rename("photos/temp_abc.jpg", "photos/10.jpg")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_exists_reports_io_errors() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;
        storage.write("photos/1.jpg", b"x").await.unwrap();

        // A regular file used as a directory is an error, not a missing file
        let err = storage.exists("photos/1.jpg/nested.jpg").await.unwrap_err();
        assert!(matches!(err, StorageError::IoError(_)));

        let err = storage
            .rename("photos/1.jpg/nested.jpg", "photos/2.jpg")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::IoError(_)));
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        for key in ["../escape.jpg", "/etc/passwd", "photos/../../x.jpg", ""] {
            let err = storage.write(key, b"x").await.unwrap_err();
            assert!(matches!(err, StorageError::InvalidKey(_)), "key {:?}", key);
        }
    }

    #[tokio::test]
    async fn test_url() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "/media/".to_string())
            .await
            .unwrap();
        assert_eq!(storage.url("photos/1.jpg"), "/media/photos/1.jpg");
    }
}
