//! Prediction gateway choosing between a remote backend and the simulator.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::common::config::ScanCfg;
use crate::common::error::{ScanCode, ScanError, ScanResult};
use crate::upload::ImagePayload;

use super::domain::PredictionResult;
use super::simulator::Simulator;
use super::transport::{HttpTransport, PredictTransport};

enum Backend {
    Simulated(Simulator),
    Remote {
        endpoint: String,
        transport: Arc<dyn PredictTransport>,
    },
}

/// Single entry point for predictions.
///
/// The mode is fixed at construction. A failed remote call never falls back
/// to simulated data.
pub struct Gateway {
    backend: Backend,
}

impl fmt::Debug for Gateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.backend {
            Backend::Simulated(sim) => f.debug_tuple("Gateway::Simulated").field(sim).finish(),
            Backend::Remote { endpoint, .. } => {
                f.debug_tuple("Gateway::Remote").field(endpoint).finish()
            }
        }
    }
}

impl Gateway {
    /// Remote mode when the config names an endpoint, demo mode otherwise.
    pub fn from_config(cfg: &ScanCfg) -> ScanResult<Self> {
        let gateway = match &cfg.api_url {
            Some(url) => Self::remote(url.clone(), HttpTransport::new(cfg.request_timeout)?),
            None => Self::simulated(Simulator::new(cfg.demo_latency)),
        };
        tracing::info!(
            ev = "gateway_ready",
            demo = gateway.is_demo(),
            endpoint = gateway.endpoint().unwrap_or("-"),
            "prediction gateway ready"
        );
        Ok(gateway)
    }

    pub fn simulated(simulator: Simulator) -> Self {
        Self {
            backend: Backend::Simulated(simulator),
        }
    }

    pub fn remote(endpoint: impl Into<String>, transport: impl PredictTransport + 'static) -> Self {
        Self {
            backend: Backend::Remote {
                endpoint: endpoint.into().trim_end_matches('/').to_string(),
                transport: Arc::new(transport),
            },
        }
    }

    pub fn is_demo(&self) -> bool {
        matches!(self.backend, Backend::Simulated(_))
    }

    pub fn endpoint(&self) -> Option<&str> {
        match &self.backend {
            Backend::Remote { endpoint, .. } => Some(endpoint.as_str()),
            Backend::Simulated(_) => None,
        }
    }

    /// Classify one image.
    ///
    /// Remote responses are returned as parsed, without checking the
    /// probability invariants.
    pub async fn predict(&self, image: &ImagePayload) -> ScanResult<PredictionResult> {
        match &self.backend {
            Backend::Simulated(sim) => Ok(sim.simulate().await),
            Backend::Remote {
                endpoint,
                transport,
            } => predict_remote(endpoint, transport.as_ref(), image).await,
        }
    }

    /// [`Gateway::predict`] for bare bytes.
    pub async fn predict_bytes(&self, bytes: Vec<u8>) -> ScanResult<PredictionResult> {
        self.predict(&ImagePayload::from_bytes(bytes)).await
    }
}

async fn predict_remote(
    endpoint: &str,
    transport: &dyn PredictTransport,
    image: &ImagePayload,
) -> ScanResult<PredictionResult> {
    let url = format!("{endpoint}/predict");
    let start = Instant::now();
    tracing::debug!(ev = "predict_start", %url, bytes = image.len());

    let outcome = transport.upload(&url, image).await.and_then(|response| {
        if !response.is_success() {
            return Err(ScanError::prediction_failed(format!(
                "backend returned status {}",
                response.status
            )));
        }
        serde_json::from_slice::<PredictionResult>(&response.body)
            .map_err(|e| ScanError::prediction_failed(format!("unreadable response body: {e}")))
    });

    let dur_ms = start.elapsed().as_millis() as u64;
    match &outcome {
        Ok(result) => tracing::info!(
            ev = "predict_done",
            code = ScanCode::Ok.as_u32(),
            dur_ms,
            prediction = %result.prediction,
            confidence = result.confidence,
            "remote prediction received"
        ),
        Err(err) => tracing::warn!(
            ev = "predict_failed",
            code = err.code().as_u32(),
            dur_ms,
            error = %err,
            "remote prediction failed"
        ),
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::domain::Label;
    use crate::inference::transport::RawResponse;
    use async_trait::async_trait;
    use std::sync::Mutex;

    const GLIOMA_BODY: &str = r#"{"prediction":"glioma","confidence":0.91,"all_probabilities":{"glioma":0.91,"meningioma":0.03,"pituitary":0.02,"notumor":0.04}}"#;

    #[derive(Default)]
    struct MockTransport {
        reply: Option<RawResponse>,
        calls: Mutex<Vec<(String, ImagePayload)>>,
    }

    impl MockTransport {
        fn replying(status: u16, body: &str) -> Self {
            Self {
                reply: Some(RawResponse {
                    status,
                    body: body.as_bytes().to_vec(),
                }),
                calls: Mutex::default(),
            }
        }

        fn unreachable() -> Self {
            Self::default()
        }
    }

    #[async_trait]
    impl PredictTransport for Arc<MockTransport> {
        async fn upload(&self, url: &str, image: &ImagePayload) -> ScanResult<RawResponse> {
            self.calls
                .lock()
                .unwrap()
                .push((url.to_string(), image.clone()));
            self.reply
                .clone()
                .ok_or_else(|| ScanError::prediction_failed("connection refused"))
        }
    }

    fn expected_glioma() -> PredictionResult {
        PredictionResult {
            prediction: "glioma".into(),
            confidence: 0.91,
            all_probabilities: [
                ("glioma", 0.91),
                ("meningioma", 0.03),
                ("pituitary", 0.02),
                ("notumor", 0.04),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
            gradcam_url: None,
        }
    }

    #[tokio::test]
    async fn demo_mode_always_resolves_valid_results() {
        let gateway = Gateway::simulated(Simulator::instant());
        assert!(gateway.is_demo());
        assert_eq!(gateway.endpoint(), None);
        for size in [0usize, 1, 4096] {
            let result = gateway.predict_bytes(vec![7; size]).await.unwrap();
            assert!(result.confidence >= 0.8);
            assert!(Label::ALL
                .iter()
                .all(|l| result.all_probabilities.contains_key(l.as_str())));
            assert_eq!(result.all_probabilities[&result.prediction], result.confidence);
        }
    }

    #[tokio::test]
    async fn remote_success_passes_body_through() {
        let transport = Arc::new(MockTransport::replying(200, GLIOMA_BODY));
        let gateway = Gateway::remote("http://backend:8000/", transport.clone());
        assert!(!gateway.is_demo());
        assert_eq!(gateway.endpoint(), Some("http://backend:8000"));

        let image = ImagePayload::from_bytes(vec![0xFF, 0xD8, 0xFF, 0x00]);
        let result = gateway.predict(&image).await.unwrap();
        assert_eq!(result, expected_glioma());

        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "http://backend:8000/predict");
        assert_eq!(calls[0].1, image);
    }

    #[tokio::test]
    async fn remote_error_status_fails() {
        let transport = Arc::new(MockTransport::replying(500, "Internal Server Error"));
        let gateway = Gateway::remote("http://backend:8000", transport.clone());
        let err = gateway.predict_bytes(vec![1, 2, 3]).await.unwrap_err();
        assert!(matches!(err, ScanError::PredictionFailed { ref reason } if reason.contains("500")));
        assert_eq!(transport.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn transport_failure_does_not_fall_back_to_simulation() {
        let transport = Arc::new(MockTransport::unreachable());
        let gateway = Gateway::remote("http://backend:8000", transport.clone());
        let err = gateway.predict_bytes(vec![1]).await.unwrap_err();
        assert_eq!(err.code(), ScanCode::PredictionFailed);
        assert_eq!(transport.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn non_prediction_body_fails() {
        let transport = Arc::new(MockTransport::replying(200, "<html>ok</html>"));
        let gateway = Gateway::remote("http://backend:8000", transport);
        let err = gateway.predict_bytes(vec![1]).await.unwrap_err();
        assert!(matches!(err, ScanError::PredictionFailed { .. }));
    }

    #[tokio::test]
    async fn inconsistent_body_is_not_revalidated() {
        let body = r#"{"prediction":"Low Confidence Prediction","confidence":0.42,"all_probabilities":{"glioma":0.42,"other":0.9},"gradcam_url":"/cam/1.png"}"#;
        let transport = Arc::new(MockTransport::replying(200, body));
        let gateway = Gateway::remote("http://backend:8000", transport);
        let result = gateway.predict_bytes(vec![1]).await.unwrap();
        assert!(result.is_low_confidence());
        assert_eq!(result.all_probabilities["other"], 0.9);
        assert_eq!(result.gradcam_url.as_deref(), Some("/cam/1.png"));
    }

    #[tokio::test]
    async fn config_selects_mode() {
        let demo = Gateway::from_config(&ScanCfg::default()).unwrap();
        assert!(demo.is_demo());

        let cfg = ScanCfg::default().with_api_url(Some("http://127.0.0.1:9".into()));
        let live = Gateway::from_config(&cfg).unwrap();
        assert_eq!(live.endpoint(), Some("http://127.0.0.1:9"));
    }
}
