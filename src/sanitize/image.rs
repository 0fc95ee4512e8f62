//! Image re-encoding pipeline.
//!
//! Input bytes are never passed through: every accepted image is decoded
//! and re-encoded to baseline JPEG, so the output stream is freshly
//! generated pixel data with no metadata, EXIF, or trailing container
//! payload. Anything the decoder cannot positively identify is an
//! explicit sanitization failure.

use image::{DynamicImage, ImageFormat};

use crate::error::{Result, ScanError};

/// Default maximum image payload, after transport decoding
pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

/// Quality setting for the canonical JPEG output
pub const JPEG_QUALITY: u8 = 85;

/// Common raster containers that skip the forced colorspace conversion
const PASSTHROUGH_FORMATS: &[ImageFormat] =
    &[ImageFormat::Jpeg, ImageFormat::Png, ImageFormat::WebP];

/// Decode, bound, and re-encode raw image bytes to canonical JPEG.
///
/// Oversized payloads are rejected outright, not truncated. Exotic
/// containers are forced through an RGB conversion before re-encoding to
/// strip format-specific payloads. Every failure collapses to
/// [`ScanError::Sanitization`].
pub fn reencode_image(bytes: &[u8], max_bytes: usize) -> Result<Vec<u8>> {
    if bytes.len() > max_bytes {
        return Err(ScanError::Sanitization(format!(
            "image payload of {} bytes exceeds {} byte cap",
            bytes.len(),
            max_bytes
        )));
    }

    let format = image::guess_format(bytes)
        .map_err(|e| ScanError::Sanitization(format!("unrecognized image container: {e}")))?;

    let mut decoded = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| ScanError::Sanitization(format!("image decode failed: {e}")))?;

    if !PASSTHROUGH_FORMATS.contains(&format) {
        decoded = DynamicImage::ImageRgb8(decoded.to_rgb8());
    }

    // JPEG output carries no alpha channel
    let pixels = decoded.into_rgb8();

    let mut out = Vec::new();
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
    pixels
        .write_with_encoder(encoder)
        .map_err(|e| ScanError::Sanitization(format!("image re-encode failed: {e}")))?;

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb, Rgba};
    use std::io::Cursor;

    fn sample_png() -> Vec<u8> {
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> =
            ImageBuffer::from_fn(8, 8, |x, y| Rgb([x as u8 * 16, y as u8 * 16, 128]));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn test_png_reencoded_to_jpeg() {
        let out = reencode_image(&sample_png(), MAX_IMAGE_BYTES).unwrap();
        assert_eq!(image::guess_format(&out).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_alpha_channel_flattened() {
        let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
            ImageBuffer::from_fn(4, 4, |_, _| Rgba([10, 20, 30, 128]));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();

        let out = reencode_image(&buf, MAX_IMAGE_BYTES).unwrap();
        assert_eq!(image::guess_format(&out).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_non_allowlisted_format_converted() {
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> =
            ImageBuffer::from_fn(4, 4, |_, _| Rgb([200, 100, 50]));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Bmp)
            .unwrap();

        let out = reencode_image(&buf, MAX_IMAGE_BYTES).unwrap();
        assert_eq!(image::guess_format(&out).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_oversized_payload_rejected() {
        let oversized = vec![0u8; MAX_IMAGE_BYTES + 1];
        let err = reencode_image(&oversized, MAX_IMAGE_BYTES).unwrap_err();
        assert!(matches!(err, ScanError::Sanitization(_)));
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        let err = reencode_image(b"definitely not an image", MAX_IMAGE_BYTES).unwrap_err();
        assert!(matches!(err, ScanError::Sanitization(_)));
    }

    #[test]
    fn test_truncated_container_rejected() {
        let mut png = sample_png();
        png.truncate(16);
        let err = reencode_image(&png, MAX_IMAGE_BYTES).unwrap_err();
        assert!(matches!(err, ScanError::Sanitization(_)));
    }

    #[test]
    fn test_output_is_fresh_data() {
        // A valid container with trailing payload must not survive
        let mut png = sample_png();
        png.extend_from_slice(b"TRAILING_SECRET_PAYLOAD");

        let out = reencode_image(&png, MAX_IMAGE_BYTES).unwrap();
        assert!(!out
            .windows(b"TRAILING_SECRET_PAYLOAD".len())
            .any(|w| w == b"TRAILING_SECRET_PAYLOAD"));
    }
}
