//! Upload domain: image payloads, type/size validation and disk loading.
//!
//! The gateway performs no validation of its own; callers run uploads
//! through this module first.

pub mod domain;
pub mod repo_fs;
pub mod service;

pub use domain::{ImagePayload, MediaType, ACCEPTED_MIME_TYPES, MAX_UPLOAD_BYTES};
pub use repo_fs::load_image;
pub use service::validate;
