//! Image payload definitions and upload limits.

use std::fmt;

/// Largest accepted upload (10 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Declared MIME types accepted from callers. `image/jpg` is a common alias.
pub const ACCEPTED_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/jpg"];

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];

/// Image encodings the backend understands.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum MediaType {
    Jpeg,
    Png,
}

impl MediaType {
    /// Parse a declared MIME type, ignoring case and parameters.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(MediaType::Jpeg),
            "image/png" => Some(MediaType::Png),
            _ => None,
        }
    }

    /// Detect the encoding from leading magic bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&PNG_MAGIC) {
            Some(MediaType::Png)
        } else if bytes.starts_with(&JPEG_MAGIC) {
            Some(MediaType::Jpeg)
        } else {
            None
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            MediaType::Jpeg => "image/jpeg",
            MediaType::Png => "image/png",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            MediaType::Jpeg => "jpg",
            MediaType::Png => "png",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

/// A single image ready to be handed to the gateway.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ImagePayload {
    pub file_name: String,
    pub media_type: MediaType,
    pub bytes: Vec<u8>,
}

impl ImagePayload {
    pub fn new(file_name: impl Into<String>, media_type: MediaType, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            media_type,
            bytes,
        }
    }

    /// Wrap raw bytes, sniffing the encoding and falling back to JPEG.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let media_type = MediaType::sniff(&bytes).unwrap_or(MediaType::Jpeg);
        Self::new(format!("scan.{}", media_type.extension()), media_type, bytes)
    }

    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
