//! Upload transport abstraction.
//!
//! The form never builds HTTP requests itself; it hands a validated
//! [`MultipartPayload`] to an [`UploadTransport`]. [`HttpTransport`] posts it
//! to the configured endpoint. Tests and embedders can swap in their own.

use crate::config::UploadConfig;
use crate::error::{SubmitError, UploadError};
use crate::http::{send_request, UploadResponse};
use crate::payload::{MultipartPayload, RequestPayload};
use reqwest::{Client, Method};
use std::future::Future;
use tracing::info;

/// Sends one submission and reports its outcome.
pub trait UploadTransport: Send + Sync {
    fn send(
        &self,
        payload: MultipartPayload,
    ) -> impl Future<Output = Result<UploadResponse, SubmitError>> + Send;
}

/// `POST`s the payload as `multipart/form-data` to a fixed URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(config: &UploadConfig) -> Result<Self, UploadError> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| UploadError::ClientBuild(e.to_string()))?;
        Ok(Self::with_client(client, config.endpoint.clone()))
    }

    /// Reuse an existing client (connection pool, proxies, TLS roots).
    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl UploadTransport for HttpTransport {
    async fn send(&self, payload: MultipartPayload) -> Result<UploadResponse, SubmitError> {
        info!(
            "Uploading '{}' ({} bytes, output={}) to {}",
            payload.file.name,
            payload.file.len(),
            payload.output,
            self.endpoint
        );
        let body = RequestPayload::try_from(payload).map_err(|e| SubmitError::Transport {
            reason: format!("could not encode multipart form: {e}"),
            timed_out: false,
        })?;
        send_request(&self.client, &self.endpoint, Method::POST, body).await
    }
}
