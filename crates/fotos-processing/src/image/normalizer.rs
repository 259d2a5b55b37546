//! Upload normalization
//!
//! Every stored original goes through [`normalize`]: bounds check on the
//! header dimensions, decode, EXIF orientation, alpha flattening onto white,
//! downscale into the bounding box and a mozjpeg re-encode.

use fotos_core::config::ImageLimits;
use image::{DynamicImage, ImageError, ImageReader, Rgb, RgbImage};
use std::io::Cursor;

use super::orientation::ImageOrientation;
use super::resize::ImageResize;
use crate::compression::encode_jpeg;
use crate::error::ProcessingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    pub max_width: u32,
    pub max_height: u32,
    pub quality: u8,
    pub min_dimension: u32,
    pub max_dimension: u32,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self::from(&ImageLimits::default())
    }
}

impl From<&ImageLimits> for NormalizeOptions {
    fn from(limits: &ImageLimits) -> Self {
        Self {
            max_width: limits.max_width,
            max_height: limits.max_height,
            quality: limits.quality,
            min_dimension: limits.min_dimension,
            max_dimension: limits.max_dimension,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NormalizedImage {
    /// JPEG bytes
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Decoded size before orientation and resizing
    pub original_width: u32,
    pub original_height: u32,
}

/// Normalize raw upload bytes into the stored JPEG form.
///
/// Pure and CPU-bound; async callers should run it on a blocking thread.
pub fn normalize(
    data: &[u8],
    options: &NormalizeOptions,
) -> Result<NormalizedImage, ProcessingError> {
    let (original_width, original_height) = read_dimensions(data)?;
    check_bounds(original_width, original_height, options)?;

    let decoded = decode(data)?;
    let oriented = ImageOrientation::apply_exif_orientation(decoded, data);
    let rgb = flatten_to_rgb(oriented);
    let resized = ImageResize::fit_rgb(rgb, options.max_width, options.max_height);
    let (width, height) = resized.dimensions();

    let jpeg = encode_jpeg(&resized, options.quality)?;

    tracing::debug!(
        original_width = original_width,
        original_height = original_height,
        width = width,
        height = height,
        input_bytes = data.len(),
        output_bytes = jpeg.len(),
        "Normalized image"
    );

    Ok(NormalizedImage {
        data: jpeg,
        width,
        height,
        original_width,
        original_height,
    })
}

fn check_bounds(width: u32, height: u32, options: &NormalizeOptions) -> Result<(), ProcessingError> {
    if width > options.max_dimension || height > options.max_dimension {
        return Err(ProcessingError::ImageTooLarge {
            width,
            height,
            max: options.max_dimension,
        });
    }
    if width < options.min_dimension || height < options.min_dimension {
        return Err(ProcessingError::ImageTooSmall {
            width,
            height,
            min: options.min_dimension,
        });
    }
    Ok(())
}

fn reader(data: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>, ProcessingError> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ProcessingError::ImageProcessing(e.to_string()))?;
    if reader.format().is_none() {
        return Err(ProcessingError::UnsupportedFormat(
            "could not recognize image data".to_string(),
        ));
    }
    Ok(reader)
}

/// Width and height from the header, without decoding pixels
fn read_dimensions(data: &[u8]) -> Result<(u32, u32), ProcessingError> {
    reader(data)?.into_dimensions().map_err(map_decode_error)
}

pub(crate) fn decode(data: &[u8]) -> Result<DynamicImage, ProcessingError> {
    reader(data)?.decode().map_err(map_decode_error)
}

fn map_decode_error(err: ImageError) -> ProcessingError {
    match err {
        ImageError::Unsupported(e) => ProcessingError::UnsupportedFormat(e.to_string()),
        ImageError::Decoding(e) => ProcessingError::UnsupportedFormat(e.to_string()),
        other => ProcessingError::ImageProcessing(other.to_string()),
    }
}

/// Convert to 8-bit RGB, compositing any alpha channel onto opaque white
pub(crate) fn flatten_to_rgb(img: DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.into_rgb8();
    }

    let rgba = img.into_rgba8();
    let (width, height) = rgba.dimensions();
    RgbImage::from_fn(width, height, |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = a as u32;
        let blend = |c: u8| ((c as u32 * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, ImageFormat, Rgba, RgbaImage};

    fn png(img: DynamicImage) -> Vec<u8> {
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    fn rgb_png(width: u32, height: u32) -> Vec<u8> {
        png(DynamicImage::ImageRgb8(RgbImage::from_pixel(
            width,
            height,
            Rgb([40, 90, 160]),
        )))
    }

    #[test]
    fn test_transparent_png_becomes_opaque_jpeg() {
        let img = RgbaImage::from_pixel(500, 500, Rgba([255, 0, 0, 0]));
        let data = png(DynamicImage::ImageRgba8(img));

        let out = normalize(&data, &NormalizeOptions::default()).unwrap();

        assert_eq!((out.width, out.height), (500, 500));
        assert_eq!(image::guess_format(&out.data).unwrap(), ImageFormat::Jpeg);
        let decoded = image::load_from_memory(&out.data).unwrap();
        assert!(!decoded.color().has_alpha());
        // Fully transparent pixels land on white
        let [r, g, b] = decoded.to_rgb8().get_pixel(250, 250).0;
        assert!(r > 245 && g > 245 && b > 245, "got {:?}", (r, g, b));
    }

    #[test]
    fn test_flatten_blends_partial_alpha() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 128]));
        let rgb = flatten_to_rgb(DynamicImage::ImageRgba8(img));
        let [r, g, b] = rgb.get_pixel(0, 0).0;
        assert_eq!((r, g, b), (127, 127, 127));
    }

    #[test]
    fn test_fitting_image_keeps_dimensions() {
        let out = normalize(&rgb_png(640, 480), &NormalizeOptions::default()).unwrap();
        assert_eq!((out.width, out.height), (640, 480));
        assert_eq!((out.original_width, out.original_height), (640, 480));
    }

    #[test]
    fn test_large_image_is_downscaled_preserving_aspect() {
        let options = NormalizeOptions {
            max_width: 400,
            max_height: 400,
            ..NormalizeOptions::default()
        };
        let out = normalize(&rgb_png(1200, 900), &options).unwrap();
        assert_eq!((out.width, out.height), (400, 300));

        let decoded = image::load_from_memory(&out.data).unwrap();
        assert_eq!(decoded.dimensions(), (400, 300));
    }

    #[test]
    fn test_oversized_side_is_rejected() {
        let err = normalize(&rgb_png(10000, 120), &NormalizeOptions::default()).unwrap_err();
        assert_eq!(
            err,
            ProcessingError::ImageTooLarge {
                width: 10000,
                height: 120,
                max: 8000
            }
        );
    }

    #[test]
    fn test_undersized_side_is_rejected() {
        let err = normalize(&rgb_png(99, 400), &NormalizeOptions::default()).unwrap_err();
        assert_eq!(
            err,
            ProcessingError::ImageTooSmall {
                width: 99,
                height: 400,
                min: 100
            }
        );
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(normalize(&rgb_png(100, 100), &NormalizeOptions::default()).is_ok());
    }

    #[test]
    fn test_garbage_is_unsupported() {
        let err = normalize(b"definitely not an image", &NormalizeOptions::default()).unwrap_err();
        assert!(matches!(err, ProcessingError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_truncated_png_is_rejected() {
        let mut data = rgb_png(300, 300);
        data.truncate(data.len() / 2);
        let err = normalize(&data, &NormalizeOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            ProcessingError::UnsupportedFormat(_) | ProcessingError::ImageProcessing(_)
        ));
    }

    #[test]
    fn test_exif_orientation_is_applied() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(200, 120, Rgb([200, 10, 10])));
        let mut jpeg = Vec::new();
        img.write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)
            .unwrap();
        let data = with_exif_orientation(&jpeg, 6);
        assert_eq!(ImageOrientation::read_exif_orientation(&data), 6);

        let out = normalize(&data, &NormalizeOptions::default()).unwrap();
        assert_eq!((out.original_width, out.original_height), (200, 120));
        assert_eq!((out.width, out.height), (120, 200));
    }

    /// Insert a minimal big-endian EXIF APP1 segment right after SOI
    fn with_exif_orientation(jpeg: &[u8], orientation: u16) -> Vec<u8> {
        let mut payload = Vec::new();
        payload.extend_from_slice(b"Exif\0\0");
        payload.extend_from_slice(&[b'M', b'M', 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08]);
        payload.extend_from_slice(&[0x00, 0x01]);
        payload.extend_from_slice(&[0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01]);
        payload.extend_from_slice(&orientation.to_be_bytes());
        payload.extend_from_slice(&[0x00, 0x00]);
        payload.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

        let length = (payload.len() + 2) as u16;
        let mut out = Vec::with_capacity(jpeg.len() + payload.len() + 4);
        out.extend_from_slice(&jpeg[..2]);
        out.extend_from_slice(&[0xFF, 0xE1]);
        out.extend_from_slice(&length.to_be_bytes());
        out.extend_from_slice(&payload);
        out.extend_from_slice(&jpeg[2..]);
        out
    }
}
