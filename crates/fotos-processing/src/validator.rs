use fotos_core::AppError;

/// Rejections raised before any decoding happens
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid content type: {content_type} (expected image/*)")]
    InvalidContentType { content_type: String },

    #[error("Empty file")]
    EmptyFile,
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Checks applied to every uploaded file
#[derive(Debug, Clone, Copy)]
pub struct UploadValidator {
    max_file_size: usize,
}

impl UploadValidator {
    pub fn new(max_file_size: usize) -> Self {
        Self { max_file_size }
    }

    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Accept any `image/*` type, ignoring parameters and case
    pub fn validate_content_type(&self, content_type: &str) -> Result<(), ValidationError> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.strip_prefix("image/") {
            Some(subtype) if !subtype.is_empty() => Ok(()),
            _ => Err(ValidationError::InvalidContentType {
                content_type: content_type.to_string(),
            }),
        }
    }

    pub fn validate(&self, content_type: &str, size: usize) -> Result<(), ValidationError> {
        self.validate_content_type(content_type)?;
        self.validate_file_size(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_file_size() {
        let validator = UploadValidator::new(1024);
        assert!(validator.validate_file_size(512).is_ok());
        assert!(validator.validate_file_size(1024).is_ok());
        assert_eq!(
            validator.validate_file_size(1025),
            Err(ValidationError::FileTooLarge {
                size: 1025,
                max: 1024
            })
        );
        assert_eq!(validator.validate_file_size(0), Err(ValidationError::EmptyFile));
    }

    #[test]
    fn test_validate_content_type() {
        let validator = UploadValidator::new(1024);
        assert!(validator.validate_content_type("image/png").is_ok());
        assert!(validator.validate_content_type("IMAGE/JPEG").is_ok());
        assert!(validator.validate_content_type("image/webp; q=1").is_ok());
        assert!(validator.validate_content_type("image/").is_err());
        assert!(validator.validate_content_type("text/plain").is_err());
        assert!(validator.validate_content_type("").is_err());
    }

    #[test]
    fn test_validation_error_maps_to_app_validation() {
        let err: AppError = ValidationError::EmptyFile.into();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Empty file"));
    }
}
