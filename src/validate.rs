//! One-shot entry points.
//!
//! For callers that do not need an interactive form: select a file, set the
//! rules, submit once, return the response. Internally this drives the same
//! [`FormController`] a front-end would, so the local checks and error
//! messages are identical.

use crate::client::HttpTransport;
use crate::config::ClientConfig;
use crate::error::ValidatorError;
use crate::form::{FormController, RuleSet};
use crate::output::{HealthStatus, ValidationResponse};
use std::path::Path;
use tracing::info;

/// Validate a PDF on disk against three rules.
///
/// # Errors
/// Selector rejections (missing file, not a `.pdf`, over 10 MiB), blank
/// rules, and every transport or response error.
///
/// # Example
/// ```rust,no_run
/// use pdf_rule_check::{validate, ClientConfig, RuleSet};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ClientConfig::from_env()?;
/// let rules = RuleSet::new([
///     "The document must have a purpose section.",
///     "The document must mention at least one date.",
///     "The document must define at least one term.",
/// ]);
/// let response = validate("policy.pdf", rules, &config).await?;
/// println!("{}/{} rules passed", response.passed(), response.results.len());
/// # Ok(())
/// # }
/// ```
pub async fn validate(
    path: impl AsRef<Path>,
    rules: RuleSet,
    config: &ClientConfig,
) -> Result<ValidationResponse, ValidatorError> {
    let path = path.as_ref();
    info!("Validating {} against {}", path.display(), config.base_url);

    let transport = HttpTransport::new(config)?;
    let mut form = FormController::new(config);
    form.select_file(path)?;
    form.set_rules(rules);
    form.submit(&transport).await.cloned()
}

/// Synchronous wrapper around [`validate`].
///
/// Creates a temporary tokio runtime internally; do not call from inside an
/// async context.
pub fn validate_sync(
    path: impl AsRef<Path>,
    rules: RuleSet,
    config: &ClientConfig,
) -> Result<ValidationResponse, ValidatorError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ValidatorError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(validate(path, rules, config))
}

/// Probe the service's health endpoint.
///
/// Does not need a file or rules.
pub async fn check_health(config: &ClientConfig) -> Result<HealthStatus, ValidatorError> {
    HttpTransport::new(config)?.health().await
}
