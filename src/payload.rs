//! Request bodies: the three-part upload form and the generic payload enum.

use crate::intake::SelectedFile;
use reqwest::multipart::{Form, Part};
use serde::Serialize;

pub const FIELD_FILE: &str = "file";
pub const FIELD_EMAIL: &str = "email";
pub const FIELD_OUTPUT: &str = "output";

/// The validated contents of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartPayload {
    pub file: SelectedFile,
    pub email: String,
    /// Value of the checked format option.
    pub output: String,
}

impl MultipartPayload {
    /// Encode as a multipart form with parts `file`, `email`, `output`.
    ///
    /// Fails only when the file carries a MIME type reqwest cannot parse.
    pub fn into_form(self) -> Result<Form, reqwest::Error> {
        let MultipartPayload {
            file,
            email,
            output,
        } = self;
        let mut part = Part::bytes(file.bytes).file_name(file.name);
        if let Some(mime) = file.mime {
            part = part.mime_str(&mime)?;
        }
        Ok(Form::new()
            .part(FIELD_FILE, part)
            .text(FIELD_EMAIL, email)
            .text(FIELD_OUTPUT, output))
    }
}

/// Body of a request made through [`crate::http::send_request`].
#[derive(Debug)]
pub enum RequestPayload {
    /// Serialized as JSON with a `Content-Type: application/json` header.
    Json(serde_json::Value),
    /// Sent as-is; reqwest sets the multipart boundary header.
    Multipart(Form),
}

impl RequestPayload {
    pub fn json<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(RequestPayload::Json)
    }
}

impl TryFrom<MultipartPayload> for RequestPayload {
    type Error = reqwest::Error;

    fn try_from(p: MultipartPayload) -> Result<Self, Self::Error> {
        p.into_form().map(RequestPayload::Multipart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_payload_from_struct() {
        #[derive(Serialize)]
        struct Ping {
            ok: bool,
        }
        let payload = RequestPayload::json(&Ping { ok: true }).unwrap();
        match payload {
            RequestPayload::Json(v) => assert_eq!(v, serde_json::json!({ "ok": true })),
            other => panic!("expected JSON payload, got {other:?}"),
        }
    }

    #[test]
    fn multipart_form_has_boundary() {
        let payload = MultipartPayload {
            file: SelectedFile::new("dados.csv", b"a,b\n1,2\n".to_vec()).with_mime("text/csv"),
            email: "ana@example.com".into(),
            output: "pdf".into(),
        };
        let form = payload.into_form().unwrap();
        assert!(!form.boundary().is_empty());
    }

    #[test]
    fn invalid_mime_is_rejected() {
        let payload = MultipartPayload {
            file: SelectedFile::new("x.bin", vec![0u8; 4]).with_mime("not a mime"),
            email: "ana@example.com".into(),
            output: "pdf".into(),
        };
        assert!(RequestPayload::try_from(payload).is_err());
    }
}
