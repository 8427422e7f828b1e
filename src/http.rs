//! Thin HTTP helper over reqwest.
//!
//! Any 2xx status is success and the response body is handed back
//! untouched. Anything else is turned into a [`SubmitError`]: the body is
//! read and parsed as JSON so the caller can show the server's `erro` field.
//! A body that is not JSON becomes [`SubmitError::Parse`] instead of an
//! error escaping the helper.

use crate::error::{ErrorBody, SubmitError};
use crate::payload::RequestPayload;
use reqwest::{Client, Method};
use serde::Serialize;
use tracing::{debug, warn};

/// A 2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadResponse {
    pub status: u16,
    /// Raw response body; the form does not interpret it.
    pub body: String,
}

/// Issue one request and classify the outcome.
pub async fn send_request(
    client: &Client,
    url: &str,
    method: Method,
    payload: RequestPayload,
) -> Result<UploadResponse, SubmitError> {
    let request = client.request(method.clone(), url);
    let request = match payload {
        // `.json()` sets `Content-Type: application/json`.
        RequestPayload::Json(value) => request.json(&value),
        RequestPayload::Multipart(form) => request.multipart(form),
    };

    debug!("{} {}", method, url);

    let response = request.send().await.map_err(transport_error)?;
    let status = response.status();
    let body = response.text().await.map_err(transport_error)?;

    if status.is_success() {
        debug!("{} {} → {}", method, url, status);
        return Ok(UploadResponse {
            status: status.as_u16(),
            body,
        });
    }

    warn!("{} {} → {}", method, url, status);
    Err(classify_error_body(status.as_u16(), body))
}

/// Parse the body of a non-2xx response.
pub fn classify_error_body(status: u16, raw: String) -> SubmitError {
    match serde_json::from_str::<serde_json::Value>(&raw) {
        Ok(value) => SubmitError::Http {
            status,
            body: ErrorBody::from_value(value),
        },
        Err(e) => SubmitError::Parse {
            status,
            detail: e.to_string(),
            raw,
        },
    }
}

fn transport_error(e: reqwest::Error) -> SubmitError {
    SubmitError::Transport {
        reason: e.to_string(),
        timed_out: e.is_timeout(),
    }
}
