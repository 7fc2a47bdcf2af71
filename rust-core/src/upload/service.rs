//! Upload validation applied before an image reaches the gateway.

use crate::common::error::{ScanError, ScanResult};

use super::domain::{ImagePayload, MediaType, MAX_UPLOAD_BYTES};

/// Accept an upload if its declared type is JPEG/PNG and it fits the size limit.
///
/// The type is checked before the size, so an oversized GIF reports the type.
pub fn validate(file_name: &str, declared_mime: &str, bytes: Vec<u8>) -> ScanResult<ImagePayload> {
    let media_type = MediaType::from_mime(declared_mime)
        .ok_or_else(|| ScanError::UnsupportedMediaType(declared_mime.to_string()))?;
    check_size(bytes.len() as u64)?;
    Ok(ImagePayload::new(file_name, media_type, bytes))
}

/// Reject sizes above [`MAX_UPLOAD_BYTES`].
pub fn check_size(size: u64) -> ScanResult<()> {
    if size > MAX_UPLOAD_BYTES {
        return Err(ScanError::FileTooLarge {
            size,
            limit: MAX_UPLOAD_BYTES,
        });
    }
    Ok(())
}
