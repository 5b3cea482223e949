//! Image file loading and 8-bit export.
//!
//! 8 and 16-bit greyscale files keep their integer pixel values so the
//! automatic interval can pick min/max limits for them. Every other pixel
//! format is converted to floating point luma in [0, 1].

use crate::sample::{Sample, SampleKind};
use image::{DynamicImage, GrayImage};
use ndarray::{Array2, ShapeError};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Pixel buffer does not match image shape: {0}")]
    Shape(#[from] ShapeError),

    #[error("Cannot build {width}x{height} image from {len} pixels")]
    BufferSize {
        width: usize,
        height: usize,
        len: usize,
    },
}

/// Convert a decoded image into a sample.
pub fn sample_from_image(image: DynamicImage) -> Result<Sample, IoError> {
    let (width, height) = (image.width() as usize, image.height() as usize);
    let sample = match image {
        DynamicImage::ImageLuma8(buf) => {
            let pixels = Array2::from_shape_vec((height, width), buf.into_raw())?;
            Sample::from_integers(pixels.view())
        }
        DynamicImage::ImageLuma16(buf) => {
            let pixels = Array2::from_shape_vec((height, width), buf.into_raw())?;
            Sample::from_integers(pixels.view())
        }
        other => {
            let luma = other.to_luma32f().into_raw();
            let pixels = Array2::from_shape_vec((height, width), luma)?;
            Sample::new(pixels.mapv(f64::from)).with_kind(SampleKind::Float)
        }
    };
    Ok(sample)
}

/// Load an image file (format from the extension) as a sample.
pub fn load_sample<P: AsRef<Path>>(path: P) -> Result<Sample, IoError> {
    let path = path.as_ref();
    let image = image::open(path)?;
    log::debug!(
        "Loaded {} ({}x{}, {:?})",
        path.display(),
        image.width(),
        image.height(),
        image.color()
    );
    sample_from_image(image)
}

/// Grey image buffer from a row-major byte array.
pub fn gray_image(pixels: &Array2<u8>) -> Result<GrayImage, IoError> {
    let (height, width) = pixels.dim();
    let raw: Vec<u8> = pixels.iter().copied().collect();
    let len = raw.len();
    GrayImage::from_raw(width as u32, height as u32, raw).ok_or(IoError::BufferSize {
        width,
        height,
        len,
    })
}

/// Save 8-bit greyscale pixels; the format follows the file extension.
pub fn save_u8_image<P: AsRef<Path>>(pixels: &Array2<u8>, path: P) -> Result<(), IoError> {
    gray_image(pixels)?.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Luma, Rgb, RgbImage};
    use ndarray::array;
    use tempfile::TempDir;

    #[test]
    fn test_luma16_is_integer_sample() {
        let buf: ImageBuffer<Luma<u16>, Vec<u16>> =
            ImageBuffer::from_raw(3, 2, vec![0, 1, 2, 300, 400, 65535]).unwrap();
        let sample = sample_from_image(DynamicImage::ImageLuma16(buf)).unwrap();

        assert_eq!(sample.kind(), SampleKind::Integer);
        assert_eq!(sample.dim(), (2, 3));
        assert_eq!(sample.data()[[1, 0]], 300.0);
        assert_eq!(sample.data()[[1, 2]], 65535.0);
    }

    #[test]
    fn test_rgb_is_float_luma() {
        let mut rgb = RgbImage::new(2, 1);
        rgb.put_pixel(1, 0, Rgb([255, 255, 255]));
        let sample = sample_from_image(DynamicImage::ImageRgb8(rgb)).unwrap();

        assert_eq!(sample.kind(), SampleKind::Float);
        assert_eq!(sample.data()[[0, 0]], 0.0);
        assert!((sample.data()[[0, 1]] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_save_and_load_png() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("levels.png");
        let pixels = array![[0u8, 64, 128], [192, 255, 10]];

        save_u8_image(&pixels, &path).unwrap();
        let sample = load_sample(&path).unwrap();

        assert_eq!(sample.kind(), SampleKind::Integer);
        assert_eq!(sample.data().mapv(|v| v as u8), pixels);
    }

    #[test]
    fn test_missing_file() {
        let result = load_sample("/nonexistent/path/image.png");
        assert!(matches!(result, Err(IoError::Image(_))));
    }
}
