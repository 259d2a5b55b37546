use fotos_core::config::ThumbnailSettings;

use super::normalizer::{decode, flatten_to_rgb};
use super::resize::ImageResize;
use crate::compression::encode_jpeg;
use crate::error::ProcessingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailOptions {
    pub max_width: u32,
    pub max_height: u32,
    pub quality: u8,
}

impl Default for ThumbnailOptions {
    fn default() -> Self {
        Self::from(&ThumbnailSettings::default())
    }
}

impl From<&ThumbnailSettings> for ThumbnailOptions {
    fn from(settings: &ThumbnailSettings) -> Self {
        Self {
            max_width: settings.max_width,
            max_height: settings.max_height,
            quality: settings.quality,
        }
    }
}

/// Build a JPEG preview of an already normalized image
pub fn thumbnail(data: &[u8], options: &ThumbnailOptions) -> Result<Vec<u8>, ProcessingError> {
    let img = decode(data).map_err(|e| ProcessingError::ImageProcessing(e.to_string()))?;
    let rgb = flatten_to_rgb(img);
    let resized = ImageResize::fit_rgb(rgb, options.max_width, options.max_height);
    encode_jpeg(&resized, options.quality)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::normalizer::{normalize, NormalizeOptions};
    use image::{DynamicImage, GenericImageView, ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn normalized(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([20, 120, 220, 255]));
        let mut png = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();
        normalize(&png, &NormalizeOptions::default()).unwrap().data
    }

    #[test]
    fn test_thumbnail_fits_box() {
        let thumb = thumbnail(&normalized(500, 500), &ThumbnailOptions::default()).unwrap();
        let decoded = image::load_from_memory(&thumb).unwrap();
        assert_eq!(decoded.dimensions(), (300, 300));
    }

    #[test]
    fn test_thumbnail_preserves_aspect() {
        let thumb = thumbnail(&normalized(800, 400), &ThumbnailOptions::default()).unwrap();
        let decoded = image::load_from_memory(&thumb).unwrap();
        assert_eq!(decoded.dimensions(), (300, 150));
    }

    #[test]
    fn test_thumbnail_does_not_upscale() {
        let thumb = thumbnail(&normalized(200, 150), &ThumbnailOptions::default()).unwrap();
        let decoded = image::load_from_memory(&thumb).unwrap();
        assert_eq!(decoded.dimensions(), (200, 150));
    }

    #[test]
    fn test_undecodable_input_is_processing_error() {
        let err = thumbnail(b"junk", &ThumbnailOptions::default()).unwrap_err();
        assert!(matches!(err, ProcessingError::ImageProcessing(_)));
    }
}
