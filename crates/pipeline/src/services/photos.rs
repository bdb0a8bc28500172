//! Upload preparation: every uploaded photo is re-encoded as JPEG.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use sharedvisions_core::limits::{JPEG_QUALITY, MAX_IMAGE_SIZE_BYTES};
use sharedvisions_db::StorageError;

/// Decode any supported format and re-encode as JPEG at [`JPEG_QUALITY`].
///
/// Fails with [`StorageError::ImageConversionFailed`] when the bytes do not
/// decode, and [`StorageError::ImageTooLarge`] when the JPEG exceeds
/// [`MAX_IMAGE_SIZE_BYTES`].
pub fn prepare_jpeg(bytes: &[u8]) -> Result<Vec<u8>, StorageError> {
    let decoded = image::load_from_memory(bytes).map_err(|e| {
        tracing::warn!(error = %e, size = bytes.len(), "Could not decode uploaded image");
        StorageError::ImageConversionFailed
    })?;

    let mut out = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY)
        .encode_image(&decoded.to_rgb8())
        .map_err(|e| {
            tracing::warn!(error = %e, "JPEG encoding failed");
            StorageError::ImageConversionFailed
        })?;
    let jpeg = out.into_inner();

    if jpeg.len() > MAX_IMAGE_SIZE_BYTES {
        return Err(StorageError::ImageTooLarge {
            size: jpeg.len(),
            max: MAX_IMAGE_SIZE_BYTES,
        });
    }
    Ok(jpeg)
}

/// [`prepare_jpeg`] on the blocking pool, off the async workers.
pub async fn reencode_jpeg(bytes: Vec<u8>) -> Result<Vec<u8>, StorageError> {
    tokio::task::spawn_blocking(move || prepare_jpeg(&bytes))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "JPEG re-encode task failed");
            StorageError::ImageConversionFailed
        })?
}
