//! # pdf-rule-check
//!
//! Check a PDF against three free-text rules using a remote validation
//! service.
//!
//! All analysis (text extraction, rule evaluation, typically by an LLM)
//! happens in the external service. This crate is the client side: a form
//! that holds one PDF and three rules, checks them locally, sends them as a
//! single multipart request, and renders the per-rule verdicts that come
//! back.
//!
//! ## Components
//!
//! ```text
//! FileSelector ──┐
//!                ├─▶ FormController ──▶ HttpTransport ──▶ POST {base}/api/validate
//! RuleEditor ────┘         │
//!                          └─▶ ResultsTable (success) / error message
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf_rule_check::{ClientConfig, FormController, HttpTransport};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Base URL from PDF_VALIDATOR_API_URL, else http://localhost:8000
//!     let config = ClientConfig::from_env()?;
//!     let transport = HttpTransport::new(&config)?;
//!
//!     let mut form = FormController::new(&config);
//!     form.select_file("contract.pdf")?;
//!     form.edit_rule(0, "The document must have a purpose section.")?;
//!     form.edit_rule(1, "The document must mention at least one date.")?;
//!     form.edit_rule(2, "The document must define at least one term.")?;
//!
//!     let response = form.submit(&transport).await?;
//!     for r in &response.results {
//!         println!("{} {} ({}%)", r.status.badge(), r.rule, r.confidence);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfcheck` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf-rule-check = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod output;
pub mod placeholders;
pub mod progress;
pub mod render;
pub mod validate;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use client::{HttpTransport, ValidationTransport};
pub use config::{ClientConfig, ClientConfigBuilder, API_URL_ENV, DEFAULT_BASE_URL};
pub use error::{ErrorCategory, ValidatorError, GENERIC_FAILURE};
pub use form::{
    FileSelector, FormController, RuleEditor, RuleSet, SelectedFile, Submission,
    SubmissionState, SubmissionToken,
};
pub use output::{HealthStatus, RuleStatus, ValidationResponse, ValidationResult};
pub use progress::{NoopProgressCallback, ProgressCallback, SubmissionProgressCallback};
pub use render::{ConfidenceTone, RenderOptions, ResultRow, ResultsTable};
pub use validate::{check_health, validate, validate_sync};
