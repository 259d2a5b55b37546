use async_trait::async_trait;
use fotos_core::models::{Photo, PhotoFiles, PhotoInsert, PhotoPatch};
use fotos_core::AppError;

/// Row operations the photo lifecycle depends on
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Insert a new row; the store assigns the id and timestamps
    async fn insert(&self, photo: PhotoInsert) -> Result<Photo, AppError>;

    async fn get(&self, id: i64) -> Result<Option<Photo>, AppError>;

    /// One page of photos in id order
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Photo>, AppError>;

    async fn count(&self) -> Result<i64, AppError>;

    async fn list_all(&self) -> Result<Vec<Photo>, AppError>;

    /// Point the row at new files. `RecordNotFound` if the row is gone.
    async fn update_paths(&self, id: i64, files: &PhotoFiles) -> Result<Photo, AppError>;

    /// Apply a partial title/description update. `RecordNotFound` if the row is gone.
    async fn update_fields(&self, id: i64, patch: &PhotoPatch) -> Result<Photo, AppError>;

    /// Delete the row, returning whether it existed
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}
