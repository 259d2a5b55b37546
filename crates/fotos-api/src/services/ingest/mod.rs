//! Upload ingestion: authorization, validation, normalization and persistence
//! for batch multipart uploads, inline base64 uploads and image replacement.

mod service;
mod types;

pub use service::IngestService;
pub use types::{BatchReport, BatchStats, IngestConfig, InlineResult, UploadedFile};
