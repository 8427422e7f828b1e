//! Configuration types for the upload form.
//!
//! All behaviour is controlled through [`UploadConfig`], built via its
//! [`UploadConfigBuilder`]. The defaults reproduce the production page:
//! fixed endpoint, Portuguese messages, three output formats, no timeout.

use crate::error::UploadError;
use crate::messages::Locale;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// Endpoint the upload form posts to.
pub const DEFAULT_ENDPOINT: &str =
    "https://upload-file-dot-epidemicapp-280600.rj.r.appspot.com/upload_file";

/// Default `User-Agent` header for the HTTP client.
pub const DEFAULT_USER_AGENT: &str = concat!("model-upload/", env!("CARGO_PKG_VERSION"));

/// Configuration for an upload form.
///
/// # Example
/// ```rust
/// use model_upload::{Locale, UploadConfig};
///
/// let config = UploadConfig::builder()
///     .endpoint("http://localhost:5000/upload_file")
///     .locale(Locale::En)
///     .build()
///     .unwrap();
/// assert_eq!(config.formats.len(), 3);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// URL the multipart form is POSTed to.
    pub endpoint: String,

    /// Language of the filename label and modal messages. Default: pt-BR.
    pub locale: Locale,

    /// Whole-request timeout. Default: none.
    ///
    /// The browser page never set one: a hung request leaves the loader up
    /// until the network layer gives up. Set this to bound the wait.
    pub request_timeout: Option<Duration>,

    /// `User-Agent` header sent with every request.
    pub user_agent: String,

    /// Radio options of the output-format selector, in display order.
    /// The first option is the one checked after a reset.
    pub formats: Vec<FormatOption>,

    /// Also reject emails that do not look like an address. Default: false.
    ///
    /// The page only checks that the field is non-empty and lets the
    /// service reject malformed addresses.
    pub strict_email: bool,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            locale: Locale::default(),
            request_timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            formats: FormatOption::defaults(),
            strict_email: false,
        }
    }
}

impl UploadConfig {
    /// Create a new builder for `UploadConfig`.
    pub fn builder() -> UploadConfigBuilder {
        UploadConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`UploadConfig`].
#[derive(Debug)]
pub struct UploadConfigBuilder {
    config: UploadConfig,
}

impl UploadConfigBuilder {
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.endpoint = url.into();
        self
    }

    pub fn locale(mut self, locale: Locale) -> Self {
        self.config.locale = locale;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = Some(timeout);
        self
    }

    pub fn request_timeout_secs(mut self, secs: Option<u64>) -> Self {
        self.config.request_timeout = secs.map(Duration::from_secs);
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config.user_agent = ua.into();
        self
    }

    pub fn formats(mut self, formats: Vec<FormatOption>) -> Self {
        self.config.formats = formats;
        self
    }

    pub fn strict_email(mut self, v: bool) -> Self {
        self.config.strict_email = v;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<UploadConfig, UploadError> {
        let c = &self.config;
        if !(c.endpoint.starts_with("http://") || c.endpoint.starts_with("https://")) {
            return Err(UploadError::InvalidConfig(format!(
                "endpoint must be an http(s) URL, got '{}'",
                c.endpoint
            )));
        }
        if reqwest::Url::parse(&c.endpoint).is_err() {
            return Err(UploadError::InvalidConfig(format!(
                "endpoint is not a valid URL: '{}'",
                c.endpoint
            )));
        }
        if c.formats.is_empty() {
            return Err(UploadError::InvalidConfig(
                "at least one output format is required".into(),
            ));
        }
        let mut seen = HashSet::new();
        for f in &c.formats {
            if f.value.trim().is_empty() {
                return Err(UploadError::InvalidConfig(
                    "output format values must not be empty".into(),
                ));
            }
            if !seen.insert(f.value.as_str()) {
                return Err(UploadError::InvalidConfig(format!(
                    "duplicate output format '{}'",
                    f.value
                )));
            }
        }
        if matches!(c.request_timeout, Some(d) if d.is_zero()) {
            return Err(UploadError::InvalidConfig(
                "request timeout must be greater than zero".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Output formats ───────────────────────────────────────────────────────

/// One radio option of the output-format selector.
///
/// `value` is what goes into the `output` multipart field; `label` is shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatOption {
    pub value: String,
    pub label: String,
}

impl FormatOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// The formats accepted by the upload service.
    pub fn defaults() -> Vec<FormatOption> {
        vec![
            FormatOption::new("jupyter", "Jupyter notebook"),
            FormatOption::new("pdf", "PDF"),
            FormatOption::new("report", "Report"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = UploadConfig::builder().build().unwrap();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.request_timeout, None);
        assert!(!config.strict_email);
        let values: Vec<_> = config.formats.iter().map(|f| f.value.as_str()).collect();
        assert_eq!(values, ["jupyter", "pdf", "report"]);
    }

    #[test]
    fn rejects_non_http_endpoint() {
        let err = UploadConfig::builder()
            .endpoint("ftp://example.com/upload")
            .build()
            .unwrap_err();
        assert!(matches!(err, UploadError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_empty_formats() {
        let err = UploadConfig::builder().formats(vec![]).build().unwrap_err();
        assert!(err.to_string().contains("at least one"));
    }

    #[test]
    fn rejects_duplicate_formats() {
        let err = UploadConfig::builder()
            .formats(vec![
                FormatOption::new("pdf", "PDF"),
                FormatOption::new("pdf", "Also PDF"),
            ])
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("duplicate"), "got: {err}");
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = UploadConfig::builder()
            .request_timeout(Duration::ZERO)
            .build()
            .unwrap_err();
        assert!(matches!(err, UploadError::InvalidConfig(_)));
    }

    #[test]
    fn timeout_secs_maps_to_duration() {
        let config = UploadConfig::builder()
            .request_timeout_secs(Some(30))
            .build()
            .unwrap();
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
    }
}
