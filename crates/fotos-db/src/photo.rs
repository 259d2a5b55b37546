use async_trait::async_trait;
use chrono::Utc;
use fotos_core::models::{Photo, PhotoFiles, PhotoInsert, PhotoPatch};
use fotos_core::AppError;
use sqlx::{Sqlite, SqlitePool};

use crate::store::PhotoStore;

/// Photo repository backed by SQLite
#[derive(Clone)]
pub struct PhotoRepository {
    pool: SqlitePool,
}

impl PhotoRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PhotoStore for PhotoRepository {
    #[tracing::instrument(skip(self, photo), fields(db.table = "photos", db.operation = "insert"))]
    async fn insert(&self, photo: PhotoInsert) -> Result<Photo, AppError> {
        let now = Utc::now();

        let row = sqlx::query_as::<Sqlite, Photo>(
            r#"
            INSERT INTO photos (title, description, image_path, thumbnail_path,
                                width, height, file_size, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&photo.title)
        .bind(&photo.description)
        .bind(&photo.image_path)
        .bind(&photo.thumbnail_path)
        .bind(photo.width)
        .bind(photo.height)
        .bind(photo.file_size)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(photo_id = row.id, image_path = %row.image_path, "Photo row inserted");

        Ok(row)
    }

    #[tracing::instrument(skip(self), fields(db.table = "photos", db.operation = "select", db.record_id = id))]
    async fn get(&self, id: i64) -> Result<Option<Photo>, AppError> {
        let row = sqlx::query_as::<Sqlite, Photo>("SELECT * FROM photos WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    #[tracing::instrument(skip(self), fields(db.table = "photos", db.operation = "select"))]
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Photo>, AppError> {
        let rows = sqlx::query_as::<Sqlite, Photo>(
            "SELECT * FROM photos ORDER BY id ASC LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    #[tracing::instrument(skip(self), fields(db.table = "photos", db.operation = "count"))]
    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM photos")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    #[tracing::instrument(skip(self), fields(db.table = "photos", db.operation = "select"))]
    async fn list_all(&self) -> Result<Vec<Photo>, AppError> {
        let rows = sqlx::query_as::<Sqlite, Photo>("SELECT * FROM photos ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    #[tracing::instrument(skip(self, files), fields(db.table = "photos", db.operation = "update", db.record_id = id))]
    async fn update_paths(&self, id: i64, files: &PhotoFiles) -> Result<Photo, AppError> {
        let row = sqlx::query_as::<Sqlite, Photo>(
            r#"
            UPDATE photos
            SET image_path = ?, thumbnail_path = ?, width = ?, height = ?,
                file_size = ?, updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(&files.image_path)
        .bind(&files.thumbnail_path)
        .bind(files.width)
        .bind(files.height)
        .bind(files.file_size)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(AppError::RecordNotFound(id))
    }

    #[tracing::instrument(skip(self, patch), fields(db.table = "photos", db.operation = "update", db.record_id = id))]
    async fn update_fields(&self, id: i64, patch: &PhotoPatch) -> Result<Photo, AppError> {
        let row = sqlx::query_as::<Sqlite, Photo>(
            r#"
            UPDATE photos
            SET title = COALESCE(?, title),
                description = COALESCE(?, description),
                updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(&patch.title)
        .bind(&patch.description)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(AppError::RecordNotFound(id))
    }

    #[tracing::instrument(skip(self), fields(db.table = "photos", db.operation = "delete", db.record_id = id))]
    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM photos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
