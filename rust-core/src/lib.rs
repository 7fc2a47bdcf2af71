// lib.rs - brain MRI classification client core
pub mod api;
pub mod common;
pub mod inference;
pub mod report;
pub mod upload;

pub use common::{ScanCfg, ScanCode, ScanError, ScanResult};
pub use inference::{Gateway, Label, PredictionResult, Simulator};
pub use upload::ImagePayload;
