//! Inference domain: result contract, demo simulator and the prediction gateway.

pub mod domain;
pub mod service;
pub mod simulator;
pub mod transport;

pub use domain::{Label, PredictionResult, LOW_CONFIDENCE_PREDICTION, LOW_CONFIDENCE_THRESHOLD};
pub use service::Gateway;
pub use simulator::Simulator;
pub use transport::{HttpTransport, PredictTransport, RawResponse};
