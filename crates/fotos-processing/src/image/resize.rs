use image::imageops::FilterType;
use image::RgbImage;

/// Aspect-preserving downscaling into a bounding box
pub struct ImageResize;

impl ImageResize {
    /// Dimensions of `width`x`height` scaled to fit inside the box. Never upscales.
    pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
        if width <= max_width && height <= max_height {
            return (width, height);
        }

        let scale = f64::min(
            max_width as f64 / width as f64,
            max_height as f64 / height as f64,
        );
        let new_width = ((width as f64 * scale).round() as u32).clamp(1, max_width);
        let new_height = ((height as f64 * scale).round() as u32).clamp(1, max_height);
        (new_width, new_height)
    }

    /// Pick a resampling filter from the downscale ratio
    pub fn select_filter(
        orig_width: u32,
        orig_height: u32,
        new_width: u32,
        new_height: u32,
    ) -> FilterType {
        let width_ratio = orig_width as f32 / new_width as f32;
        let height_ratio = orig_height as f32 / new_height as f32;
        let max_ratio = width_ratio.max(height_ratio);

        if max_ratio > 2.0 {
            FilterType::Triangle
        } else if max_ratio > 1.5 {
            FilterType::CatmullRom
        } else {
            FilterType::Lanczos3
        }
    }

    /// Downscale an RGB buffer to fit inside the box
    pub fn fit_rgb(img: RgbImage, max_width: u32, max_height: u32) -> RgbImage {
        let (width, height) = img.dimensions();
        let (new_width, new_height) = Self::fit_within(width, height, max_width, max_height);
        if (new_width, new_height) == (width, height) {
            return img;
        }

        let filter = Self::select_filter(width, height, new_width, new_height);
        tracing::debug!(
            from_width = width,
            from_height = height,
            to_width = new_width,
            to_height = new_height,
            filter = ?filter,
            "Resizing image"
        );
        image::imageops::resize(&img, new_width, new_height, filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_within_no_upscale() {
        assert_eq!(ImageResize::fit_within(800, 600, 1920, 1920), (800, 600));
        assert_eq!(ImageResize::fit_within(1920, 1920, 1920, 1920), (1920, 1920));
    }

    #[test]
    fn test_fit_within_preserves_aspect() {
        assert_eq!(ImageResize::fit_within(4000, 3000, 1920, 1920), (1920, 1440));
        assert_eq!(ImageResize::fit_within(3000, 4000, 1920, 1920), (1440, 1920));
        assert_eq!(ImageResize::fit_within(1000, 500, 300, 300), (300, 150));
    }

    #[test]
    fn test_fit_within_extreme_aspect_keeps_one_pixel() {
        assert_eq!(ImageResize::fit_within(8000, 100, 300, 300), (300, 4));
        assert_eq!(ImageResize::fit_within(8000, 10, 300, 300), (300, 1));
    }

    #[test]
    fn test_select_filter() {
        assert_eq!(ImageResize::select_filter(3000, 3000, 1000, 1000), FilterType::Triangle);
        assert_eq!(ImageResize::select_filter(1800, 1800, 1000, 1000), FilterType::CatmullRom);
        assert_eq!(ImageResize::select_filter(1200, 1200, 1000, 1000), FilterType::Lanczos3);
    }

    #[test]
    fn test_fit_rgb() {
        let img = RgbImage::new(600, 400);
        assert_eq!(ImageResize::fit_rgb(img, 300, 300).dimensions(), (300, 200));
    }
}
