//! Fotos processing
//!
//! Turns uploaded bytes into the stored representation: a correctly oriented,
//! opaque, bounded JPEG plus a small preview.

pub mod compression;
pub mod error;
pub mod image;
pub mod validator;

pub use error::ProcessingError;
pub use crate::image::normalizer::{normalize, NormalizeOptions, NormalizedImage};
pub use crate::image::thumbnail::{thumbnail, ThumbnailOptions};
pub use validator::{UploadValidator, ValidationError};
