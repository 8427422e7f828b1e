//! Error types for the model-upload library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`UploadError`] — **Setup**: something went wrong before a submission
//!   could even be attempted (file unreadable, bad endpoint, HTTP client
//!   could not be built). Returned as `Err(UploadError)` from constructors
//!   and file intake helpers.
//!
//! * [`SubmitError`] — **Outcome**: a submission attempt was rejected
//!   locally or by the server. Every variant is handled by the form state
//!   machine and turned into a fail message in the modal, so no submission
//!   can leave the loader spinning.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while preparing a submission.
#[derive(Debug, Error)]
pub enum UploadError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Selected file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists but reading it failed part-way.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// reqwest refused to build a client from the configuration.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

/// A form field that failed the submit-time checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldError {
    /// No file selected.
    MissingFile,
    /// Email input is empty.
    EmptyEmail,
    /// Email does not look like an address (only with `strict_email`).
    MalformedEmail,
    /// No output format checked.
    MissingFormat,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FieldError::MissingFile => "file",
            FieldError::EmptyEmail => "email",
            FieldError::MalformedEmail => "email (malformed)",
            FieldError::MissingFormat => "output format",
        })
    }
}

/// Client-side precondition failure. No request is issued.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("invalid form fields: {}", join_fields(.fields))]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

fn join_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// JSON error body returned by the upload service on non-2xx responses.
///
/// Only `erro` is shown to the user; the service also sends `detail` or
/// `details` with internal context, which is kept for logging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub erro: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    /// The full parsed document, for diagnostics.
    #[serde(skip)]
    pub raw: serde_json::Value,
}

impl ErrorBody {
    /// Interpret a parsed JSON document as an error body.
    ///
    /// Non-object documents and fields of the wrong type are tolerated: the
    /// known fields are simply `None` and the value is kept in `raw`.
    pub fn from_value(value: serde_json::Value) -> Self {
        let field = |name: &str| {
            value
                .get(name)
                .and_then(|v| v.as_str())
                .map(str::to_string)
        };
        let (erro, detail, details) = (field("erro"), field("detail"), field("details"));
        Self {
            erro,
            detail,
            details,
            raw: value,
        }
    }
}

/// Every way a submission can fail once the user presses send.
#[derive(Debug, Clone, Error)]
pub enum SubmitError {
    /// A required field was empty; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Server answered with a non-2xx status and a JSON body.
    #[error("HTTP {status}: {}", .body.erro.as_deref().unwrap_or("no error field"))]
    Http { status: u16, body: ErrorBody },

    /// Server answered with a non-2xx status and an empty or non-JSON body.
    #[error("HTTP {status}: error body is not valid JSON ({detail})")]
    Parse {
        status: u16,
        detail: String,
        raw: String,
    },

    /// The request never produced a response (DNS, TLS, connection, timeout).
    #[error("Request failed: {reason}")]
    Transport { reason: String, timed_out: bool },

    /// A request is already in flight.
    #[error("A submission is already in progress")]
    Busy,
}

impl SubmitError {
    /// The server-supplied `erro` message, if the failure carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            SubmitError::Http { body, .. } => body.erro.as_deref(),
            _ => None,
        }
    }

    /// HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            SubmitError::Http { status, .. } | SubmitError::Parse { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_display_lists_fields() {
        let e = ValidationError {
            fields: vec![FieldError::MissingFile, FieldError::MissingFormat],
        };
        let msg = e.to_string();
        assert!(msg.contains("file"), "got: {msg}");
        assert!(msg.contains("output format"), "got: {msg}");
        assert!(!msg.contains("email"), "got: {msg}");
    }

    #[test]
    fn error_body_extracts_erro() {
        let body = ErrorBody::from_value(serde_json::json!({
            "erro": "Invalid email",
            "detail": "regex mismatch"
        }));
        assert_eq!(body.erro.as_deref(), Some("Invalid email"));
        assert_eq!(body.detail.as_deref(), Some("regex mismatch"));
        assert_eq!(body.details, None);
    }

    #[test]
    fn error_body_tolerates_non_object() {
        let body = ErrorBody::from_value(serde_json::json!([1, 2, 3]));
        assert_eq!(body.erro, None);
        assert!(body.raw.is_array());
    }

    #[test]
    fn error_body_ignores_non_string_erro() {
        let body = ErrorBody::from_value(serde_json::json!({ "erro": 42 }));
        assert_eq!(body.erro, None);
    }

    #[test]
    fn http_error_display_and_accessors() {
        let e = SubmitError::Http {
            status: 400,
            body: ErrorBody::from_value(serde_json::json!({ "erro": "No file" })),
        };
        assert!(e.to_string().contains("400"));
        assert!(e.to_string().contains("No file"));
        assert_eq!(e.server_message(), Some("No file"));
        assert_eq!(e.status(), Some(400));
    }

    #[test]
    fn parse_error_has_status_but_no_message() {
        let e = SubmitError::Parse {
            status: 502,
            detail: "EOF while parsing a value".into(),
            raw: String::new(),
        };
        assert_eq!(e.status(), Some(502));
        assert_eq!(e.server_message(), None);
    }

    #[test]
    fn validation_converts_into_submit_error() {
        let e: SubmitError = ValidationError {
            fields: vec![FieldError::EmptyEmail],
        }
        .into();
        assert!(matches!(e, SubmitError::Validation(_)));
        assert!(e.to_string().contains("email"));
    }
}
