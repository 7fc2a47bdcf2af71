//! Error handling primitives shared across the core.
//!
//! Every failure maps onto a stable [`ScanCode`] so callers (the CLI in
//! particular) can surface a machine readable status.

use thiserror::Error;

/// Stable error codes, also used as process exit codes.
#[repr(u32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ScanCode {
    /// Success code used as a sentinel.
    Ok = 0,
    /// Remote inference could not be completed.
    PredictionFailed = 1,
    /// Upload is not a JPEG or PNG image.
    UnsupportedMediaType = 2,
    /// Upload exceeds the size limit.
    FileTooLarge = 3,
    /// Configuration value could not be parsed.
    Config = 4,
    /// Filesystem access failed.
    Io = 5,
}

impl ScanCode {
    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

/// Canonical error type for the core.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The remote endpoint was unreachable, answered with a non-success
    /// status, or returned a body that is not a prediction.
    #[error("prediction failed: {reason}")]
    PredictionFailed { reason: String },

    #[error("unsupported media type '{0}': only JPG, JPEG and PNG files are accepted")]
    UnsupportedMediaType(String),

    #[error("file too large ({size} bytes), limit is {limit} bytes")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate.
pub type ScanResult<T> = Result<T, ScanError>;

impl ScanError {
    /// Remote prediction helper.
    pub fn prediction_failed(reason: impl Into<String>) -> Self {
        Self::PredictionFailed {
            reason: reason.into(),
        }
    }

    /// Configuration helper.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Machine parsable code for this error.
    pub fn code(&self) -> ScanCode {
        match self {
            ScanError::PredictionFailed { .. } => ScanCode::PredictionFailed,
            ScanError::UnsupportedMediaType(_) => ScanCode::UnsupportedMediaType,
            ScanError::FileTooLarge { .. } => ScanCode::FileTooLarge,
            ScanError::Config(_) => ScanCode::Config,
            ScanError::Io(_) => ScanCode::Io,
        }
    }
}
