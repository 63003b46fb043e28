//! Types returned by the external validation service.
//!
//! The wire format is fixed by the service:
//!
//! ```json
//! {
//!   "results": [
//!     { "rule": "…", "status": "pass", "evidence": "…", "reasoning": "…", "confidence": 85 }
//!   ],
//!   "pdf_pages": 3,
//!   "processing_time": 1.42
//! }
//! ```
//!
//! Deserialisation is strict where the shape is closed (`status` must be
//! `pass` or `fail`, `confidence` must be an integer) and
//! [`ValidationResponse::check`] covers the numeric ranges serde cannot.
//! A body that fails either step surfaces as
//! [`ValidatorError::MalformedResponse`] instead of a rendering fault.

use crate::error::ValidatorError;
use crate::form::rules::RuleSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// The service's verdict for one rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleStatus {
    Pass,
    Fail,
}

impl RuleStatus {
    /// Badge text shown in the results table.
    pub fn badge(self) -> &'static str {
        match self {
            RuleStatus::Pass => "PASS",
            RuleStatus::Fail => "FAIL",
        }
    }
}

impl fmt::Display for RuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleStatus::Pass => f.write_str("pass"),
            RuleStatus::Fail => f.write_str("fail"),
        }
    }
}

/// Outcome for a single submitted rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Rule text as echoed back by the service.
    pub rule: String,
    pub status: RuleStatus,
    /// Quote from the document supporting the verdict.
    pub evidence: String,
    pub reasoning: String,
    /// Certainty percentage, 0–100. Display only.
    pub confidence: u8,
}

/// Full response to one submission.
///
/// Results are matched to submitted rules by position only; the service
/// carries no correlation id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub results: Vec<ValidationResult>,
    /// Page count of the submitted document.
    pub pdf_pages: u32,
    /// Server-side processing time in seconds.
    pub processing_time: f64,
}

impl ValidationResponse {
    /// Parse and shape-check a 2xx response body.
    pub fn from_json(body: &[u8]) -> Result<Self, ValidatorError> {
        let response: ValidationResponse =
            serde_json::from_slice(body).map_err(|e| ValidatorError::MalformedResponse {
                detail: e.to_string(),
            })?;
        response.check()?;
        Ok(response)
    }

    /// Check the numeric ranges serde cannot express.
    pub fn check(&self) -> Result<(), ValidatorError> {
        if !self.processing_time.is_finite() || self.processing_time < 0.0 {
            return Err(ValidatorError::MalformedResponse {
                detail: format!(
                    "processing_time must be a non-negative number, got {}",
                    self.processing_time
                ),
            });
        }
        if let Some((i, r)) = self
            .results
            .iter()
            .enumerate()
            .find(|(_, r)| r.confidence > 100)
        {
            return Err(ValidatorError::MalformedResponse {
                detail: format!(
                    "result {} has confidence {} (expected 0–100)",
                    i + 1,
                    r.confidence
                ),
            });
        }
        Ok(())
    }

    /// Log any visible mismatch between the results and the submitted rules.
    ///
    /// Returns `true` when the results line up (same count, same rule text at
    /// each position after trimming). A mismatch is only reported, never
    /// rejected: the service may legitimately paraphrase the rule it echoes.
    pub fn matches_rules(&self, rules: &RuleSet) -> bool {
        let mut aligned = true;
        if self.results.len() != rules.len() {
            warn!(
                "Service returned {} results for {} rules",
                self.results.len(),
                rules.len()
            );
            aligned = false;
        }
        for (i, (result, submitted)) in self.results.iter().zip(rules.iter()).enumerate() {
            if result.rule.trim() != submitted.trim() {
                warn!(
                    "Result {} echoes rule {:?}, submitted {:?}",
                    i + 1,
                    result.rule,
                    submitted
                );
                aligned = false;
            }
        }
        aligned
    }

    pub fn passed(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.status == RuleStatus::Pass)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.passed()
    }
}

/// Body of the service's `GET /health` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub llm_provider: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}
