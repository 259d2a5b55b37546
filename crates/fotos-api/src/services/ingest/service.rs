use base64::{engine::general_purpose::STANDARD, Engine as _};
use fotos_core::constants::TITLE_MAX_LENGTH;
use fotos_core::models::{InlineUploadRequest, Photo, PhotoPatch};
use fotos_core::{AppError, ErrorMetadata};
use fotos_processing::{
    normalize, thumbnail, NormalizedImage, ProcessingError, ThumbnailOptions, UploadValidator,
};
use validator::Validate;

use super::types::{BatchReport, BatchStats, IngestConfig, InlineResult, UploadedFile};
use crate::auth::CallerContext;
use crate::services::photo_lifecycle::{NewImage, NewPhoto, PhotoLifecycle};

/// Normalized original plus its preview, when one could be made
struct ProcessedImage {
    normalized: NormalizedImage,
    thumbnail: Option<Vec<u8>>,
}

type Thumbnailer = fn(&[u8], &ThumbnailOptions) -> Result<Vec<u8>, ProcessingError>;

#[derive(Clone)]
pub struct IngestService {
    lifecycle: PhotoLifecycle,
    config: IngestConfig,
    validator: UploadValidator,
    thumbnailer: Thumbnailer,
}

impl IngestService {
    pub fn new(lifecycle: PhotoLifecycle, config: IngestConfig) -> Self {
        let validator = UploadValidator::new(config.max_file_size);
        Self {
            lifecycle,
            config,
            validator,
            thumbnailer: thumbnail,
        }
    }

    #[cfg(test)]
    fn with_thumbnailer(mut self, thumbnailer: Thumbnailer) -> Self {
        self.thumbnailer = thumbnailer;
        self
    }

    pub fn lifecycle(&self) -> &PhotoLifecycle {
        &self.lifecycle
    }

    /// Store every acceptable file of a multipart batch.
    ///
    /// Files are handled independently: a rejected file is reported in
    /// `errors` and does not stop the rest of the batch.
    #[tracing::instrument(skip(self, files, description), fields(file_count = files.len()))]
    pub async fn ingest_batch(
        &self,
        caller: &CallerContext,
        files: Vec<UploadedFile>,
        title: String,
        description: String,
    ) -> Result<BatchReport, AppError> {
        caller.require_admin()?;

        if files.is_empty() {
            return Err(AppError::Validation("No files provided".to_string()));
        }
        if files.len() > self.config.max_batch_files {
            return Err(AppError::Validation(format!(
                "Too many files: {} (max: {})",
                files.len(),
                self.config.max_batch_files
            )));
        }
        validate_title(&title)?;

        let mut created_ids = Vec::new();
        let mut errors = Vec::new();
        let mut stats = BatchStats::default();

        for file in files {
            let filename = file.filename.clone();
            let original_size = file.data.len();

            match self.ingest_one(file, &title, &description).await {
                Ok(photo) => {
                    stats.record_success(original_size, photo.file_size as usize);
                    created_ids.push(photo.id);
                }
                Err(e) => {
                    tracing::warn!(
                        filename = %filename,
                        error = %e,
                        "Rejected file in batch upload"
                    );
                    stats.record_failure();
                    errors.push(format!("{}: {}", filename, e.client_message()));
                }
            }
        }

        stats.finish();

        tracing::info!(
            processed = stats.processed,
            succeeded = stats.succeeded,
            failed = stats.failed,
            bytes_saved = stats.bytes_saved,
            "Batch upload finished"
        );

        Ok(BatchReport {
            success: stats.succeeded > 0,
            created_ids,
            errors,
            stats,
        })
    }

    async fn ingest_one(
        &self,
        file: UploadedFile,
        title: &str,
        description: &str,
    ) -> Result<Photo, AppError> {
        self.validator.validate(&file.content_type, file.data.len())?;

        let processed = self.process(file.data).await?;

        self.lifecycle
            .create(NewPhoto {
                image: processed.normalized.data,
                thumbnail: processed.thumbnail,
                title: title.to_string(),
                description: description.to_string(),
                width: processed.normalized.width,
                height: processed.normalized.height,
            })
            .await
    }

    /// Store a single base64-encoded image. Any failure rejects the whole request.
    #[tracing::instrument(skip(self, request), fields(payload_len = request.image.len()))]
    pub async fn ingest_inline(
        &self,
        caller: &CallerContext,
        request: InlineUploadRequest,
    ) -> Result<InlineResult, AppError> {
        caller.require_admin()?;
        request.validate()?;

        let data = self.decode_inline(&request.image)?;
        self.validator.validate_file_size(data.len())?;

        let processed = self.process(data).await?;
        let photo = self
            .lifecycle
            .create(NewPhoto {
                image: processed.normalized.data,
                thumbnail: processed.thumbnail,
                title: request.title,
                description: request.description,
                width: processed.normalized.width,
                height: processed.normalized.height,
            })
            .await?;

        Ok(InlineResult {
            id: photo.id,
            url: self.lifecycle.url(&photo.image_path),
            thumbnail_url: photo
                .thumbnail_path
                .as_deref()
                .map(|path| self.lifecycle.url(path)),
            width: photo.width,
            height: photo.height,
        })
    }

    /// Accepts raw base64 or a `data:<mime>;base64,` URL
    fn decode_inline(&self, payload: &str) -> Result<Vec<u8>, AppError> {
        let payload = payload.trim();
        let encoded = match payload.strip_prefix("data:") {
            Some(rest) => {
                let (header, body) = rest.split_once(',').ok_or_else(|| {
                    AppError::Validation("Malformed data URL: missing ','".to_string())
                })?;
                let mime = header.strip_suffix(";base64").ok_or_else(|| {
                    AppError::Validation("Data URL must be base64 encoded".to_string())
                })?;
                if !mime.is_empty() {
                    self.validator.validate_content_type(mime)?;
                }
                body
            }
            None => payload,
        };

        if encoded.is_empty() {
            return Err(AppError::Validation("Image payload is empty".to_string()));
        }

        let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
        STANDARD
            .decode(compact.as_bytes())
            .map_err(|e| AppError::Validation(format!("Invalid base64 image data: {}", e)))
    }

    /// Replace a photo's image with a newly uploaded file
    #[tracing::instrument(skip(self, file), fields(photo_id = id, filename = %file.filename))]
    pub async fn replace(
        &self,
        caller: &CallerContext,
        id: i64,
        file: UploadedFile,
    ) -> Result<Photo, AppError> {
        caller.require_admin()?;
        self.lifecycle.get(id).await?;
        self.validator.validate(&file.content_type, file.data.len())?;

        let processed = self.process(file.data).await?;
        self.lifecycle
            .replace_image(
                id,
                NewImage {
                    image: processed.normalized.data,
                    thumbnail: processed.thumbnail,
                    width: processed.normalized.width,
                    height: processed.normalized.height,
                },
            )
            .await
    }

    pub async fn edit(
        &self,
        caller: &CallerContext,
        id: i64,
        patch: PhotoPatch,
    ) -> Result<Photo, AppError> {
        caller.require_admin()?;
        patch.validate()?;
        self.lifecycle.edit_fields(id, patch).await
    }

    pub async fn delete(&self, caller: &CallerContext, id: i64) -> Result<(), AppError> {
        caller.require_admin()?;
        self.lifecycle.delete(id).await
    }

    /// Normalize and thumbnail on the blocking pool.
    ///
    /// A failed thumbnail is logged and the photo is stored without one.
    async fn process(&self, data: Vec<u8>) -> Result<ProcessedImage, AppError> {
        let normalize_options = self.config.normalize;
        let thumbnail_options = self.config.thumbnail;
        let thumbnailer = self.thumbnailer;

        let result = tokio::task::spawn_blocking(move || {
            let normalized = normalize(&data, &normalize_options)?;
            let thumbnail = match thumbnailer(&normalized.data, &thumbnail_options) {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    tracing::warn!(error = %e, "Thumbnail generation failed, storing without one");
                    None
                }
            };
            Ok::<_, ProcessingError>(ProcessedImage {
                normalized,
                thumbnail,
            })
        })
        .await
        .map_err(|e| AppError::Internal(format!("Image processing task failed: {}", e)))?;

        result.map_err(AppError::from)
    }
}

fn validate_title(title: &str) -> Result<(), AppError> {
    if title.chars().count() > TITLE_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "Title must be at most {} characters",
            TITLE_MAX_LENGTH
        )));
    }
    Ok(())
}
