//! Fotos Core Library
//!
//! Domain models, error types and configuration shared by every Fotos crate.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

pub use config::{Config, DatabaseConfig, ImageLimits, MediaConfig, ServerConfig, ThumbnailSettings};
pub use error::{AppError, ErrorMetadata, LogLevel};
// Storage and StorageError live in fotos-storage
