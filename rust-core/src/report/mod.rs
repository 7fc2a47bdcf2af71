//! Result interpretation: confidence buckets, probability breakdowns and text reports.

pub mod domain;
pub mod service;

pub use domain::{ConfidenceLevel, ProbabilityRow, ResultSummary, DISCLAIMER};
pub use service::{render_text, summarize};
