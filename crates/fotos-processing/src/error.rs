use fotos_core::AppError;

/// Failures while decoding, checking or re-encoding an image
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProcessingError {
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Image too large: {width}x{height} exceeds the {max}px limit")]
    ImageTooLarge { width: u32, height: u32, max: u32 },

    #[error("Image too small: {width}x{height} is below the {min}px minimum")]
    ImageTooSmall { width: u32, height: u32, min: u32 },

    #[error("Image processing error: {0}")]
    ImageProcessing(String),
}

impl From<ProcessingError> for AppError {
    fn from(err: ProcessingError) -> Self {
        match err {
            ProcessingError::UnsupportedFormat(msg) => AppError::UnsupportedFormat(msg),
            ProcessingError::ImageTooLarge { width, height, max } => {
                AppError::ImageTooLarge { width, height, max }
            }
            ProcessingError::ImageTooSmall { width, height, min } => {
                AppError::ImageTooSmall { width, height, min }
            }
            ProcessingError::ImageProcessing(msg) => AppError::ImageProcessing(msg),
        }
    }
}
