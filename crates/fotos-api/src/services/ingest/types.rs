use fotos_core::config::MediaConfig;
use fotos_processing::{NormalizeOptions, ThumbnailOptions};
use serde::Serialize;
use utoipa::ToSchema;

/// Settings the ingestion pipeline is built with
#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub normalize: NormalizeOptions,
    pub thumbnail: ThumbnailOptions,
    pub max_file_size: usize,
    pub max_batch_files: usize,
}

impl From<&MediaConfig> for IngestConfig {
    fn from(media: &MediaConfig) -> Self {
        Self {
            normalize: NormalizeOptions::from(&media.limits),
            thumbnail: ThumbnailOptions::from(&media.thumbnails),
            max_file_size: media.limits.max_file_size,
            max_batch_files: media.max_batch_files,
        }
    }
}

/// One file part of a multipart upload
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct BatchStats {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Upload size of the files that were stored
    pub original_bytes: u64,
    /// Stored size of their normalized originals
    pub stored_bytes: u64,
    /// `original_bytes - stored_bytes`, negative when re-encoding grew the files
    pub bytes_saved: i64,
    pub saved_percent: f64,
}

impl BatchStats {
    pub(crate) fn record_success(&mut self, original: usize, stored: usize) {
        self.processed += 1;
        self.succeeded += 1;
        self.original_bytes += original as u64;
        self.stored_bytes += stored as u64;
    }

    pub(crate) fn record_failure(&mut self) {
        self.processed += 1;
        self.failed += 1;
    }

    pub(crate) fn finish(&mut self) {
        self.bytes_saved = self.original_bytes as i64 - self.stored_bytes as i64;
        self.saved_percent = if self.original_bytes == 0 {
            0.0
        } else {
            let percent = self.bytes_saved as f64 / self.original_bytes as f64 * 100.0;
            (percent * 10.0).round() / 10.0
        };
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BatchReport {
    /// True when at least one file was stored
    pub success: bool,
    pub created_ids: Vec<i64>,
    /// One `<filename>: <reason>` entry per rejected file
    pub errors: Vec<String>,
    pub stats: BatchStats,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InlineResult {
    pub id: i64,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub width: i64,
    pub height: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_saved_percent() {
        let mut stats = BatchStats::default();
        stats.record_success(1000, 250);
        stats.record_failure();
        stats.finish();

        assert_eq!(stats.processed, 2);
        assert_eq!((stats.succeeded, stats.failed), (1, 1));
        assert_eq!(stats.bytes_saved, 750);
        assert_eq!(stats.saved_percent, 75.0);
    }

    #[test]
    fn test_stats_growth_is_negative() {
        let mut stats = BatchStats::default();
        stats.record_success(300, 400);
        stats.finish();
        assert_eq!(stats.bytes_saved, -100);
        assert_eq!(stats.saved_percent, -33.3);
    }

    #[test]
    fn test_stats_empty() {
        let mut stats = BatchStats::default();
        stats.finish();
        assert_eq!(stats.saved_percent, 0.0);
    }
}
