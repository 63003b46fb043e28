//! Error types for the pdf-rule-check library.
//!
//! Every failure is a [`ValidatorError`]. The variants fall into a small
//! number of [`ErrorCategory`] buckets so a front-end can decide how to
//! present them without matching on individual variants:
//!
//! * **Precondition** — nothing to send yet (no file, blank rule). Caught
//!   before any network activity; fixed by correcting the form.
//! * **Selection** — the file selector refused a candidate file. The prior
//!   selection is left untouched.
//! * **Transport** — the service answered with a non-2xx status or could not
//!   be reached at all. Retrying the submission may help.
//! * **MalformedResponse** — the service answered 2xx but the body is not a
//!   validation response.
//!
//! None of them is fatal: after any error the form is interactive again.

use std::path::PathBuf;
use thiserror::Error;

/// Message shown when the service gives no usable detail of its own.
pub const GENERIC_FAILURE: &str = "Validation failed";

/// All errors returned by the pdf-rule-check library.
#[derive(Debug, Error)]
pub enum ValidatorError {
    // ── Precondition errors ──────────────────────────────────────────────
    /// Submit was attempted with no file selected.
    #[error("Please upload a PDF file")]
    NoFileSelected,

    /// One or more rules are empty after trimming whitespace.
    ///
    /// `positions` holds the 1-indexed rule positions that are blank.
    #[error("Please fill in all 3 validation rules")]
    IncompleteRules { positions: Vec<usize> },

    // ── Selection errors ─────────────────────────────────────────────────
    /// Candidate file does not exist.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the candidate file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// Candidate file does not carry a `.pdf` extension.
    #[error("'{name}' is not a PDF file (PDF files only)")]
    NotAPdf { name: String },

    /// Candidate file exceeds the configured maximum size.
    #[error("'{name}' is too large ({}); the maximum is {}", human_size(.size), human_size(.max))]
    FileTooLarge { name: String, size: u64, max: u64 },

    /// Rule editor was asked to replace a position outside 0..3.
    #[error("Rule index {index} is out of range (exactly 3 rules)")]
    RuleIndexOutOfRange { index: usize },

    // ── Transport errors ─────────────────────────────────────────────────
    /// The service answered with a non-2xx status.
    ///
    /// Displays the service's `detail` message when the body carried one,
    /// otherwise [`GENERIC_FAILURE`].
    #[error("{}", .detail.as_deref().unwrap_or(GENERIC_FAILURE))]
    Server { status: u16, detail: Option<String> },

    /// The request never produced a response (connection refused, DNS, TLS…).
    #[error("{}", GENERIC_FAILURE)]
    Transport(#[source] reqwest::Error),

    // ── Response errors ──────────────────────────────────────────────────
    /// A 2xx body that does not match the validation response shape.
    #[error("Malformed response from validation service: {detail}")]
    MalformedResponse { detail: String },

    // ── Controller errors ────────────────────────────────────────────────
    /// A submission is already in flight; the new attempt was refused.
    #[error("A validation request is already in progress")]
    SubmissionInFlight,

    // ── Config errors ────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse grouping of [`ValidatorError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Precondition,
    Selection,
    Transport,
    MalformedResponse,
    InFlight,
    Config,
    Internal,
}

impl ValidatorError {
    /// The category this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ValidatorError::NoFileSelected | ValidatorError::IncompleteRules { .. } => {
                ErrorCategory::Precondition
            }
            ValidatorError::FileNotFound { .. }
            | ValidatorError::PermissionDenied { .. }
            | ValidatorError::NotAPdf { .. }
            | ValidatorError::FileTooLarge { .. }
            | ValidatorError::RuleIndexOutOfRange { .. } => ErrorCategory::Selection,
            ValidatorError::Server { .. } | ValidatorError::Transport(_) => {
                ErrorCategory::Transport
            }
            ValidatorError::MalformedResponse { .. } => ErrorCategory::MalformedResponse,
            ValidatorError::SubmissionInFlight => ErrorCategory::InFlight,
            ValidatorError::InvalidConfig(_) => ErrorCategory::Config,
            ValidatorError::Internal(_) => ErrorCategory::Internal,
        }
    }

    /// True when resubmitting the same form might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self.category(), ErrorCategory::Transport)
    }
}

/// Sizes from 1 MiB up read as `"10.00 MB"`, anything smaller in bytes.
fn human_size(bytes: &u64) -> String {
    const MIB: u64 = 1024 * 1024;
    if *bytes >= MIB {
        format!("{:.2} MB", *bytes as f64 / MIB as f64)
    } else {
        format!("{bytes} bytes")
    }
}
