//! Filesystem loading of scan images.

use std::fs;
use std::path::Path;

use crate::common::error::{ScanError, ScanResult};

use super::domain::ImagePayload;
use super::service;

/// Read and validate an image from disk.
///
/// The MIME type is guessed from the extension, the way a browser declares
/// it on upload. Size is checked from metadata so oversized files are never
/// read into memory.
pub fn load_image(path: &Path) -> ScanResult<ImagePayload> {
    let mime = mime_guess::from_path(path)
        .first_raw()
        .map(str::to_string)
        .unwrap_or_else(|| {
            path.extension()
                .map(|ext| format!("unknown/.{}", ext.to_string_lossy()))
                .unwrap_or_else(|| "application/octet-stream".to_string())
        });

    let size = fs::metadata(path)?.len();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| ScanError::UnsupportedMediaType(mime.clone()))?;

    // Validate type and size before touching the contents.
    service::validate(&file_name, &mime, Vec::new())?;
    service::check_size(size)?;

    let bytes = fs::read(path)?;
    tracing::debug!(ev = "image_loaded", file = %file_name, bytes = bytes.len());
    service::validate(&file_name, &mime, bytes)
}
