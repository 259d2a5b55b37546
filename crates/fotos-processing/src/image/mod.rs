//! Image processing module
//!
//! - EXIF orientation correction (orientation)
//! - Bounding-box resizing (resize)
//! - Upload normalization (normalizer)
//! - Preview generation (thumbnail)

pub mod normalizer;
pub mod orientation;
pub mod resize;
pub mod thumbnail;

pub use orientation::ImageOrientation;
pub use resize::ImageResize;
