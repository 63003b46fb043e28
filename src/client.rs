//! Transport client: the only code that talks to the validation service.
//!
//! One submission is one `POST {base}/api/validate` with a multipart body:
//!
//! | field   | content                        |
//! |---------|--------------------------------|
//! | `file`  | PDF bytes, `application/pdf`   |
//! | `rule1` | first rule, exactly as typed   |
//! | `rule2` | second rule                    |
//! | `rule3` | third rule                     |
//!
//! There are no retries and no client-side timeout: a slow request simply
//! settles whenever the service answers.
//!
//! ## Error mapping
//!
//! * non-2xx with a JSON body `{"detail": "<string>"}` → [`ValidatorError::Server`]
//!   carrying that detail
//! * non-2xx with any other body → [`ValidatorError::Server`] without detail
//!   (displays the generic failure message)
//! * no response at all → [`ValidatorError::Transport`]
//! * 2xx whose body is not a validation response → [`ValidatorError::MalformedResponse`]

use crate::config::ClientConfig;
use crate::error::ValidatorError;
use crate::form::rules::RuleSet;
use crate::form::selector::SelectedFile;
use crate::output::{HealthStatus, ValidationResponse};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, info};

/// Sends one validation request.
///
/// [`HttpTransport`] is the production implementation; tests and alternative
/// front-ends can supply their own.
#[async_trait]
pub trait ValidationTransport: Send + Sync {
    async fn validate(
        &self,
        file: &SelectedFile,
        rules: &RuleSet,
    ) -> Result<ValidationResponse, ValidatorError>;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    validate_url: Url,
    health_url: Url,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ValidatorError> {
        let client = Client::builder()
            .user_agent(concat!("pdf-rule-check/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ValidatorError::Internal(format!("HTTP client: {e}")))?;
        Self::with_client(client, config)
    }

    /// Use a pre-built `reqwest::Client` (proxies, custom TLS roots…).
    pub fn with_client(client: Client, config: &ClientConfig) -> Result<Self, ValidatorError> {
        Ok(Self {
            client,
            validate_url: config.validate_url()?,
            health_url: config.health_url()?,
        })
    }

    pub fn validate_url(&self) -> &Url {
        &self.validate_url
    }

    /// Probe the service's `GET /health` endpoint.
    pub async fn health(&self) -> Result<HealthStatus, ValidatorError> {
        debug!("GET {}", self.health_url);
        let response = self
            .client
            .get(self.health_url.clone())
            .send()
            .await
            .map_err(ValidatorError::Transport)?;

        let status = response.status();
        let body = response.bytes().await.map_err(ValidatorError::Transport)?;
        if !status.is_success() {
            return Err(server_error(status.as_u16(), &body));
        }
        serde_json::from_slice(&body).map_err(|e| ValidatorError::MalformedResponse {
            detail: e.to_string(),
        })
    }
}

#[async_trait]
impl ValidationTransport for HttpTransport {
    async fn validate(
        &self,
        file: &SelectedFile,
        rules: &RuleSet,
    ) -> Result<ValidationResponse, ValidatorError> {
        let form = build_form(file, rules)?;
        let start = Instant::now();
        info!(
            "POST {} ({}, {} bytes)",
            self.validate_url,
            file.name(),
            file.size()
        );

        let response = self
            .client
            .post(self.validate_url.clone())
            .multipart(form)
            .send()
            .await
            .map_err(ValidatorError::Transport)?;

        let status = response.status();
        let body = response.bytes().await.map_err(ValidatorError::Transport)?;
        debug!(
            "HTTP {} with {} byte body after {}ms",
            status,
            body.len(),
            start.elapsed().as_millis()
        );

        if !status.is_success() {
            return Err(server_error(status.as_u16(), &body));
        }
        ValidationResponse::from_json(&body)
    }
}

/// Build the four-field multipart body. Rules are sent untrimmed.
fn build_form(file: &SelectedFile, rules: &RuleSet) -> Result<Form, ValidatorError> {
    let part = Part::bytes(file.bytes().to_vec())
        .file_name(file.name().to_string())
        .mime_str("application/pdf")
        .map_err(|e| ValidatorError::Internal(format!("multipart: {e}")))?;

    let mut form = Form::new().part("file", part);
    for (i, rule) in rules.iter().enumerate() {
        form = form.text(RuleSet::field_name(i), rule.to_string());
    }
    Ok(form)
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

/// Map a non-2xx response to [`ValidatorError::Server`].
///
/// Only a string `detail` counts; validation errors whose `detail` is a list
/// of objects fall back to the generic message.
fn server_error(status: u16, body: &[u8]) -> ValidatorError {
    let detail = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .filter(|d| !d.trim().is_empty());
    debug!("Service error {}: detail={:?}", status, detail);
    ValidatorError::Server { status, detail }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GENERIC_FAILURE;

    #[test]
    fn detail_string_is_extracted() {
        let e = server_error(400, br#"{"detail": "Only PDF files are allowed"}"#);
        assert_eq!(e.to_string(), "Only PDF files are allowed");
    }

    #[test]
    fn detail_list_falls_back_to_generic() {
        let body = br#"{"detail": [{"loc": ["body", "rule2"], "msg": "field required"}]}"#;
        let e = server_error(422, body);
        assert_eq!(e.to_string(), GENERIC_FAILURE);
        assert!(matches!(e, ValidatorError::Server { status: 422, detail: None }));
    }

    #[test]
    fn non_json_body_falls_back_to_generic() {
        let e = server_error(502, b"<html>Bad Gateway</html>");
        assert_eq!(e.to_string(), GENERIC_FAILURE);
    }

    #[test]
    fn blank_detail_falls_back_to_generic() {
        let e = server_error(500, br#"{"detail": "  "}"#);
        assert_eq!(e.to_string(), GENERIC_FAILURE);
    }

    #[test]
    fn transport_targets_fixed_path() {
        let config = ClientConfig::builder()
            .base_url("http://127.0.0.1:9")
            .build()
            .unwrap();
        let t = HttpTransport::new(&config).unwrap();
        assert_eq!(t.validate_url().as_str(), "http://127.0.0.1:9/api/validate");
    }
}
