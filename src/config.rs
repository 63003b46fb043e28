//! Client configuration.
//!
//! Everything the library needs to know about its environment lives in
//! [`ClientConfig`], built via [`ClientConfigBuilder`]. The only value that
//! normally varies between deployments is the base URL of the validation
//! service, read from `PDF_VALIDATOR_API_URL` by [`ClientConfig::from_env`].

use crate::error::ValidatorError;
use crate::progress::ProgressCallback;
use reqwest::Url;
use std::fmt;

/// Environment variable holding the validation service base URL.
pub const API_URL_ENV: &str = "PDF_VALIDATOR_API_URL";

/// Base URL used when [`API_URL_ENV`] is unset: a local development service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Fixed path of the validation endpoint.
pub const VALIDATE_PATH: &str = "/api/validate";

/// Fixed path of the service's health endpoint.
pub const HEALTH_PATH: &str = "/health";

/// Largest file the selector accepts: 10 MiB.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// Configuration for talking to the validation service.
///
/// # Example
/// ```rust
/// use pdf_rule_check::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .base_url("http://validator.internal:8000")
///     .build()
///     .unwrap();
/// assert_eq!(config.validate_url().unwrap().path(), "/api/validate");
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    /// Service base URL, without the endpoint path. Default: [`DEFAULT_BASE_URL`].
    pub base_url: String,

    /// Maximum size accepted by the file selector. Default: 10 MiB.
    ///
    /// Advisory only; the service applies its own limit.
    pub max_file_bytes: u64,

    /// Optional submission lifecycle callback.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("max_file_bytes", &self.max_file_bytes)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn SubmissionProgressCallback>"),
            )
            .finish()
    }
}

impl ClientConfig {
    /// Create a new builder for `ClientConfig`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::default(),
        }
    }

    /// Default configuration with the base URL taken from [`API_URL_ENV`].
    ///
    /// An unset or blank variable falls back to [`DEFAULT_BASE_URL`].
    pub fn from_env() -> Result<Self, ValidatorError> {
        let mut builder = Self::builder();
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                builder = builder.base_url(url.trim());
            }
        }
        builder.build()
    }

    /// `{base_url}/api/validate`.
    pub fn validate_url(&self) -> Result<Url, ValidatorError> {
        endpoint(&self.base_url, VALIDATE_PATH)
    }

    /// `{base_url}/health`.
    pub fn health_url(&self) -> Result<Url, ValidatorError> {
        endpoint(&self.base_url, HEALTH_PATH)
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn max_file_bytes(mut self, bytes: u64) -> Self {
        self.config.max_file_bytes = bytes;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ClientConfig, ValidatorError> {
        let c = &self.config;
        let url = Url::parse(&c.base_url).map_err(|e| {
            ValidatorError::InvalidConfig(format!("base URL '{}' is not a URL: {}", c.base_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ValidatorError::InvalidConfig(format!(
                "base URL must be http or https, got '{}'",
                url.scheme()
            )));
        }
        if c.max_file_bytes == 0 {
            return Err(ValidatorError::InvalidConfig(
                "max file size must be ≥ 1 byte".into(),
            ));
        }
        Ok(self.config)
    }
}

/// Join a fixed endpoint path onto a base URL that may or may not carry a
/// path prefix or trailing slash.
fn endpoint(base: &str, path: &str) -> Result<Url, ValidatorError> {
    let joined = format!("{}{}", base.trim_end_matches('/'), path);
    Url::parse(&joined)
        .map_err(|e| ValidatorError::InvalidConfig(format!("invalid endpoint URL '{joined}': {e}")))
}
