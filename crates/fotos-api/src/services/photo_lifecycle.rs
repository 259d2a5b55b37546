//! Photo record lifecycle: keeps database rows and stored files consistent.
//!
//! The row is authoritative. Files are written before the row that references
//! them and removed after the row that referenced them is gone or repointed, so
//! a failure between the two can leak a file but never leave a row pointing at
//! a missing one.

use fotos_core::models::{Photo, PhotoFiles, PhotoInsert, PhotoPatch};
use fotos_core::AppError;
use fotos_db::PhotoStore;
use fotos_storage::{Collection, PathResolver, Storage};
use std::sync::Arc;

/// Encoded files and metadata for a photo that does not exist yet
#[derive(Debug, Clone)]
pub struct NewPhoto {
    pub image: Vec<u8>,
    pub thumbnail: Option<Vec<u8>>,
    pub title: String,
    pub description: String,
    pub width: u32,
    pub height: u32,
}

/// Replacement files for an existing photo
#[derive(Debug, Clone)]
pub struct NewImage {
    pub image: Vec<u8>,
    pub thumbnail: Option<Vec<u8>>,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone)]
pub struct PhotoLifecycle {
    store: Arc<dyn PhotoStore>,
    storage: Arc<dyn Storage>,
    resolver: PathResolver,
}

impl PhotoLifecycle {
    pub fn new(
        store: Arc<dyn PhotoStore>,
        storage: Arc<dyn Storage>,
        resolver: PathResolver,
    ) -> Self {
        Self {
            store,
            storage,
            resolver,
        }
    }

    /// Public URL of a stored file
    pub fn url(&self, path: &str) -> String {
        self.storage.url(path)
    }

    pub async fn get(&self, id: i64) -> Result<Photo, AppError> {
        self.store
            .get(id)
            .await?
            .ok_or(AppError::RecordNotFound(id))
    }

    /// One 1-based page in id order, with the total row count
    pub async fn list(&self, page: i64, per_page: i64) -> Result<(Vec<Photo>, i64), AppError> {
        let offset = (page.max(1) - 1).saturating_mul(per_page);
        let photos = self.store.list(per_page, offset).await?;
        let total = self.store.count().await?;
        Ok((photos, total))
    }

    pub async fn list_all(&self) -> Result<Vec<Photo>, AppError> {
        self.store.list_all().await
    }

    /// Persist a new photo under id-keyed file names.
    ///
    /// Files go to temporary names first, the row is inserted to obtain the
    /// id, then files are renamed and the row repointed. Any failure removes
    /// the row and every file written, so callers never see a partial record.
    /// A row that cannot be removed keeps its files under the names it holds.
    #[tracing::instrument(skip(self, new), fields(image_bytes = new.image.len(), has_thumbnail = new.thumbnail.is_some()))]
    pub async fn create(&self, new: NewPhoto) -> Result<Photo, AppError> {
        let temp_image = self.resolver.resolve(Collection::Photos, None);
        let temp_thumbnail = new
            .thumbnail
            .as_ref()
            .map(|_| self.resolver.resolve(Collection::Thumbnails, None));

        self.write_files(
            &temp_image,
            &new.image,
            temp_thumbnail.as_deref(),
            new.thumbnail.as_deref(),
        )
        .await?;

        let insert = PhotoInsert {
            title: new.title,
            description: new.description,
            image_path: temp_image.clone(),
            thumbnail_path: temp_thumbnail.clone(),
            width: i64::from(new.width),
            height: i64::from(new.height),
            file_size: new.image.len() as i64,
        };

        let photo = match self.store.insert(insert).await {
            Ok(photo) => photo,
            Err(e) => {
                tracing::warn!(error = %e, "Photo insert failed, removing written files");
                self.remove_files(&[Some(temp_image), temp_thumbnail]).await;
                return Err(e);
            }
        };

        let final_image = self.resolver.resolve(Collection::Photos, Some(photo.id));
        let final_thumbnail = temp_thumbnail
            .as_ref()
            .map(|_| self.resolver.resolve(Collection::Thumbnails, Some(photo.id)));

        match self
            .promote(
                &photo,
                &temp_image,
                &final_image,
                temp_thumbnail.as_deref(),
                final_thumbnail.as_deref(),
            )
            .await
        {
            Ok(persisted) => {
                tracing::info!(
                    photo_id = persisted.id,
                    image_path = %persisted.image_path,
                    "Photo created"
                );
                Ok(persisted)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    photo_id = photo.id,
                    "Failed to finalize photo, rolling back"
                );
                let pairs = [
                    (Some(temp_image), Some(final_image)),
                    (temp_thumbnail, final_thumbnail),
                ];
                match self.store.delete(photo.id).await {
                    Ok(_) => {
                        let paths: Vec<Option<String>> =
                            pairs.into_iter().flat_map(|(temp, fin)| [temp, fin]).collect();
                        self.remove_files(&paths).await;
                    }
                    Err(delete_err) => {
                        // The row survives on its temporary paths; put the files back under them.
                        tracing::error!(
                            error = %delete_err,
                            photo_id = photo.id,
                            "Failed to delete photo row during rollback, keeping its files"
                        );
                        for (temp, fin) in pairs {
                            if let (Some(temp), Some(fin)) = (temp, fin) {
                                self.restore_file(&fin, &temp).await;
                            }
                        }
                    }
                }
                Err(e)
            }
        }
    }

    async fn promote(
        &self,
        photo: &Photo,
        temp_image: &str,
        final_image: &str,
        temp_thumbnail: Option<&str>,
        final_thumbnail: Option<&str>,
    ) -> Result<Photo, AppError> {
        self.storage.rename(temp_image, final_image).await?;
        if let (Some(from), Some(to)) = (temp_thumbnail, final_thumbnail) {
            self.storage.rename(from, to).await?;
        }

        let files = PhotoFiles {
            image_path: final_image.to_string(),
            thumbnail_path: final_thumbnail.map(str::to_string),
            width: photo.width,
            height: photo.height,
            file_size: photo.file_size,
        };
        self.store.update_paths(photo.id, &files).await
    }

    /// Swap a photo's image and thumbnail for new files under the same
    /// id-keyed names.
    ///
    /// New files land under temporary names and the row is repointed at them
    /// before the displaced files are removed. The new bytes are then written
    /// to the id-keyed names and the row repointed again. If that last step
    /// fails the row stays on the temporary names, which still exist.
    #[tracing::instrument(skip(self, new), fields(photo_id = id, image_bytes = new.image.len()))]
    pub async fn replace_image(&self, id: i64, new: NewImage) -> Result<Photo, AppError> {
        let current = self.get(id).await?;

        let temp_image = self.resolver.resolve(Collection::Photos, None);
        let temp_thumbnail = new
            .thumbnail
            .as_ref()
            .map(|_| self.resolver.resolve(Collection::Thumbnails, None));

        self.write_files(
            &temp_image,
            &new.image,
            temp_thumbnail.as_deref(),
            new.thumbnail.as_deref(),
        )
        .await?;

        let staged = PhotoFiles {
            image_path: temp_image.clone(),
            thumbnail_path: temp_thumbnail.clone(),
            width: i64::from(new.width),
            height: i64::from(new.height),
            file_size: new.image.len() as i64,
        };

        if let Err(e) = self.store.update_paths(id, &staged).await {
            tracing::warn!(error = %e, photo_id = id, "Photo update failed, removing new files");
            self.remove_files(&[Some(temp_image), temp_thumbnail]).await;
            return Err(e);
        }

        self.remove_files(&[Some(current.image_path), current.thumbnail_path])
            .await;

        let final_image = self.resolver.resolve(Collection::Photos, Some(id));
        let final_thumbnail = temp_thumbnail
            .as_ref()
            .map(|_| self.resolver.resolve(Collection::Thumbnails, Some(id)));

        self.write_files(
            &final_image,
            &new.image,
            final_thumbnail.as_deref(),
            new.thumbnail.as_deref(),
        )
        .await?;

        let settled = PhotoFiles {
            image_path: final_image.clone(),
            thumbnail_path: final_thumbnail.clone(),
            ..staged
        };

        let updated = match self.store.update_paths(id, &settled).await {
            Ok(updated) => updated,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    photo_id = id,
                    image_path = %temp_image,
                    "Failed to settle replaced image, row keeps temporary paths"
                );
                self.remove_files(&[Some(final_image), final_thumbnail]).await;
                return Err(e);
            }
        };

        self.remove_files(&[Some(temp_image), temp_thumbnail]).await;

        tracing::info!(photo_id = id, image_path = %updated.image_path, "Photo image replaced");

        Ok(updated)
    }

    #[tracing::instrument(skip(self, patch), fields(photo_id = id))]
    pub async fn edit_fields(&self, id: i64, patch: PhotoPatch) -> Result<Photo, AppError> {
        let updated = self.store.update_fields(id, &patch).await?;
        tracing::info!(photo_id = id, "Photo fields updated");
        Ok(updated)
    }

    /// Remove a photo's row, then its files
    #[tracing::instrument(skip(self), fields(photo_id = id))]
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let photo = self.get(id).await?;

        if !self.store.delete(id).await? {
            return Err(AppError::RecordNotFound(id));
        }

        self.remove_files(&[Some(photo.image_path), photo.thumbnail_path])
            .await;

        tracing::info!(photo_id = id, "Photo deleted");
        Ok(())
    }

    /// Write the image and optional thumbnail. On failure nothing written survives.
    async fn write_files(
        &self,
        image_path: &str,
        image: &[u8],
        thumbnail_path: Option<&str>,
        thumbnail: Option<&[u8]>,
    ) -> Result<(), AppError> {
        self.storage.write(image_path, image).await?;

        if let (Some(path), Some(data)) = (thumbnail_path, thumbnail) {
            if let Err(e) = self.storage.write(path, data).await {
                self.remove_files(&[Some(image_path.to_string()), Some(path.to_string())])
                    .await;
                return Err(e.into());
            }
        }

        Ok(())
    }

    /// Move a file back to `to` if it only exists at `from`
    async fn restore_file(&self, from: &str, to: &str) {
        match self.storage.exists(to).await {
            Ok(true) => return,
            Ok(false) => {}
            Err(e) => {
                tracing::error!(error = %e, path = %to, "Failed to check file during rollback");
                return;
            }
        }
        if let Err(e) = self.storage.rename(from, to).await {
            tracing::error!(error = %e, from = %from, to = %to, "Failed to restore file during rollback");
        }
    }

    /// Best-effort removal; failures are logged and swallowed
    async fn remove_files(&self, paths: &[Option<String>]) {
        for path in paths.iter().flatten() {
            if let Err(e) = self.storage.delete(path).await {
                tracing::error!(error = %e, path = %path, "Failed to delete file from storage");
            }
        }
    }
}
