//! Fotos storage
//!
//! File persistence for normalized photos and thumbnails. Keys are relative
//! paths produced by [`PathResolver`]; backends map them onto their own
//! namespace (a directory tree for [`LocalStorage`]).

pub mod keys;
pub mod local;
pub mod traits;

pub use keys::{Collection, PathResolver};
pub use local::LocalStorage;
pub use traits::{Storage, StorageError, StorageResult};

use fotos_core::AppError;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::StoreIo(err.to_string())
    }
}
