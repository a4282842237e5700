//! Signature image loading and resampling

use crate::constants::MAX_RASTER_DIMENSION;
use crate::types::*;
use image::imageops::{self, FilterType};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::Path;

/// Load a signature image from disk, converting it to RGBA.
///
/// Sources without an alpha channel gain a fully opaque one so every
/// signature flows through the compositor in the same pixel format.
pub fn load_signature(path: impl AsRef<Path>) -> Result<RgbaImage> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(StampError::NotFound(path.to_owned()));
    }
    let bytes = std::fs::read(path)?;
    decode_signature(&bytes).map_err(|source| StampError::UnreadableImage {
        path: path.to_owned(),
        source,
    })
}

/// Decode an in-memory image into RGBA.
pub fn decode_signature(bytes: &[u8]) -> std::result::Result<RgbaImage, image::ImageError> {
    Ok(image::load_from_memory(bytes)?.to_rgba8())
}

/// Stretch `image` to exactly `width` × `height` pixels.
///
/// Aspect ratio is not preserved.
pub fn resize(image: &RgbaImage, width: u32, height: u32) -> Result<RgbaImage> {
    if width == 0 || height == 0 {
        return Err(StampError::InvalidDimensions {
            width: width as f32,
            height: height as f32,
        });
    }
    if image.dimensions() == (width, height) {
        return Ok(image.clone());
    }
    if image.width() == 0 || image.height() == 0 {
        return Err(StampError::InvalidDimensions {
            width: image.width() as f32,
            height: image.height() as f32,
        });
    }

    log::debug!(
        "Resizing signature {}x{} -> {}x{}",
        image.width(),
        image.height(),
        width,
        height
    );
    Ok(imageops::resize(image, width, height, FilterType::Lanczos3))
}

/// Convert a box in document units into the raster size used for the signature.
pub fn pixel_box(width: f32, height: f32, pixels_per_unit: f32) -> Result<(u32, u32)> {
    let invalid = || StampError::InvalidDimensions { width, height };

    if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
        return Err(invalid());
    }
    if !pixels_per_unit.is_finite() || pixels_per_unit <= 0.0 {
        return Err(StampError::Config(format!(
            "pixels per unit must be positive, got {}",
            pixels_per_unit
        )));
    }

    let px_w = (width * pixels_per_unit).round();
    let px_h = (height * pixels_per_unit).round();
    if px_w < 1.0 || px_h < 1.0 {
        return Err(invalid());
    }
    if px_w > MAX_RASTER_DIMENSION as f32 || px_h > MAX_RASTER_DIMENSION as f32 {
        return Err(StampError::InvalidInput(format!(
            "raster size {}x{} exceeds the {} pixel limit",
            px_w, px_h, MAX_RASTER_DIMENSION
        )));
    }

    Ok((px_w as u32, px_h as u32))
}

/// Encode an RGBA image as PNG.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_pixel_box_rounds() {
        assert_eq!(pixel_box(150.0, 50.0, 1.0).unwrap(), (150, 50));
        assert_eq!(pixel_box(150.4, 49.6, 1.0).unwrap(), (150, 50));
        assert_eq!(pixel_box(100.0, 25.0, 2.0).unwrap(), (200, 50));
    }

    #[test]
    fn test_pixel_box_rejects_non_positive() {
        for (w, h) in [(0.0, 10.0), (10.0, 0.0), (-5.0, 10.0), (f32::NAN, 10.0), (0.2, 10.0)] {
            assert!(matches!(
                pixel_box(w, h, 1.0),
                Err(StampError::InvalidDimensions { .. })
            ));
        }
    }

    #[test]
    fn test_pixel_box_rejects_bad_scale() {
        assert!(matches!(
            pixel_box(10.0, 10.0, 0.0),
            Err(StampError::Config(_))
        ));
    }

    #[test]
    fn test_resize_same_size_is_copy() {
        let img = RgbaImage::from_fn(3, 2, |x, y| Rgba([x as u8 * 50, y as u8 * 90, 7, 200]));
        let out = resize(&img, 3, 2).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(decode_signature(b"definitely not an image").is_err());
    }
}
