use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, ImageFormat};
use std::io::Cursor;
use thiserror::Error;

/// Longest edge handed to the engine; Tesseract does best around 300 DPI.
const MAX_DIMENSION: u32 = 2800;

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Failed to encode processed image: {0}")]
    Encode(String),
}

/// Decode PNG/JPEG bytes, normalize for recognition and re-encode as PNG.
pub fn prepare_for_ocr(data: &[u8]) -> Result<Vec<u8>, PreprocessError> {
    let img = image::load_from_memory(data)?;
    let gray = stretch_contrast(downscale(img).to_luma8());

    let mut buf = Vec::new();
    DynamicImage::ImageLuma8(gray)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| PreprocessError::Encode(e.to_string()))?;
    Ok(buf)
}

fn downscale(img: DynamicImage) -> DynamicImage {
    if img.width() > MAX_DIMENSION || img.height() > MAX_DIMENSION {
        img.resize(MAX_DIMENSION, MAX_DIMENSION, FilterType::Lanczos3)
    } else {
        img
    }
}

/// Linearly map the darkest pixel to 0 and the brightest to 255.
fn stretch_contrast(mut gray: GrayImage) -> GrayImage {
    let (lo, hi) = gray
        .pixels()
        .fold((u8::MAX, u8::MIN), |(lo, hi), p| (lo.min(p[0]), hi.max(p[0])));

    if hi <= lo {
        return gray;
    }

    let range = u32::from(hi - lo);
    for p in gray.pixels_mut() {
        p[0] = (u32::from(p[0] - lo) * 255 / range) as u8;
    }
    gray
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Luma};

    fn encode_png(img: GrayImage) -> Vec<u8> {
        let mut buf = Vec::new();
        DynamicImage::ImageLuma8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn uniform_image_is_left_alone() {
        let img: GrayImage = ImageBuffer::from_fn(10, 10, |_, _| Luma([128u8]));
        let out = stretch_contrast(img);
        assert!(out.pixels().all(|p| p[0] == 128));
    }

    #[test]
    fn narrow_range_is_stretched_to_full_range() {
        let img: GrayImage = ImageBuffer::from_fn(64, 1, |x, _| Luma([100 + x as u8]));
        let out = stretch_contrast(img);
        let min = out.pixels().map(|p| p[0]).min().unwrap();
        let max = out.pixels().map(|p| p[0]).max().unwrap();
        assert_eq!((min, max), (0, 255));
    }

    #[test]
    fn output_is_png() {
        let img: GrayImage = ImageBuffer::from_fn(4, 4, |_, _| Luma([100u8]));
        let out = prepare_for_ocr(&encode_png(img)).unwrap();
        assert_eq!(&out[..4], b"\x89PNG");
    }

    #[test]
    fn large_image_is_downscaled() {
        let img = DynamicImage::ImageLuma8(ImageBuffer::from_fn(3000, 1500, |_, _| Luma([200u8])));
        let out = downscale(img);
        assert!(out.width() <= MAX_DIMENSION && out.height() <= MAX_DIMENSION);
        // aspect ratio preserved
        assert_eq!(out.width(), 2 * out.height());
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(matches!(
            prepare_for_ocr(b"definitely not an image"),
            Err(PreprocessError::Decode(_))
        ));
    }
}
