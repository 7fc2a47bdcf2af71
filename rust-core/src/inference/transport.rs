//! HTTP seam between the gateway and a remote inference backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use crate::common::error::{ScanError, ScanResult};
use crate::upload::ImagePayload;

/// Multipart field the backend reads the image from.
pub const UPLOAD_FIELD: &str = "file";

/// Status and body of a completed upload.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Uploads one image per call. Implementations do not retry.
#[async_trait]
pub trait PredictTransport: Send + Sync {
    /// POST `image` to `url`. Only failures to complete the exchange are
    /// errors; any HTTP status is returned as a [`RawResponse`].
    async fn upload(&self, url: &str, image: &ImagePayload) -> ScanResult<RawResponse>;
}

/// `reqwest` backed transport sending `multipart/form-data`.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a client. `timeout` of `None` leaves the exchange unbounded.
    pub fn new(timeout: Option<Duration>) -> ScanResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ScanError::config(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PredictTransport for HttpTransport {
    async fn upload(&self, url: &str, image: &ImagePayload) -> ScanResult<RawResponse> {
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(image.media_type.mime())
            .map_err(|e| ScanError::prediction_failed(format!("invalid part: {e}")))?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ScanError::prediction_failed(format!("request failed: {e}")))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| ScanError::prediction_failed(format!("failed to read response: {e}")))?;

        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }
}
