//! Shared utilities that glue the different domains together.
pub mod config;
pub mod error;
pub mod log;

pub use config::ScanCfg;
pub use error::{ScanCode, ScanError, ScanResult};
