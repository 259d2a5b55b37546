use image::RgbImage;
use std::panic::{self, AssertUnwindSafe};

use crate::error::ProcessingError;

/// Encode an RGB buffer as a progressive, Huffman-optimized JPEG.
///
/// `quality` is clamped to 1..=100.
pub fn encode_jpeg(img: &RgbImage, quality: u8) -> Result<Vec<u8>, ProcessingError> {
    let (width, height) = img.dimensions();
    let quality = quality.clamp(1, 100);

    // libjpeg reports fatal errors by unwinding
    let result = panic::catch_unwind(AssertUnwindSafe(|| -> std::io::Result<Vec<u8>> {
        let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
        comp.set_size(width as usize, height as usize);
        comp.set_quality(quality as f32);
        comp.set_progressive_mode();
        comp.set_optimize_coding(true);

        let mut comp = comp.start_compress(Vec::new())?;
        comp.write_scanlines(img.as_raw())?;
        comp.finish()
    }));

    match result {
        Ok(Ok(data)) => {
            tracing::debug!(
                width = width,
                height = height,
                quality = quality,
                size_bytes = data.len(),
                "Encoded JPEG"
            );
            Ok(data)
        }
        Ok(Err(e)) => Err(ProcessingError::ImageProcessing(format!(
            "JPEG encoding failed: {}",
            e
        ))),
        Err(_) => Err(ProcessingError::ImageProcessing(
            "JPEG encoder aborted".to_string(),
        )),
    }
}
