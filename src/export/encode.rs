use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, RgbaImage};

use crate::foundation::error::{BoothError, BoothResult};

/// JPEG quality used for the share/QR path; keeps payloads small enough for
/// the share store's size cap.
pub const SHARE_JPEG_QUALITY: u8 = 85;

/// Encode a finished strip losslessly as PNG bytes (the download path).
pub fn encode_png(img: &RgbaImage) -> BoothResult<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)
        .map_err(|e| BoothError::encode(format!("png encode failed: {e}")))?;
    Ok(out.into_inner())
}

/// Encode a finished strip as JPEG bytes at [`SHARE_JPEG_QUALITY`] (the share
/// path). Alpha is dropped; the strip canvas is always opaque.
pub fn encode_jpeg(img: &RgbaImage) -> BoothResult<Vec<u8>> {
    let rgb = image::DynamicImage::ImageRgba8(img.clone()).to_rgb8();
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, SHARE_JPEG_QUALITY)
        .encode_image(&rgb)
        .map_err(|e| BoothError::encode(format!("jpeg encode failed: {e}")))?;
    Ok(out)
}
