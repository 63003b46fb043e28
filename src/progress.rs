//! Callback trait for submission lifecycle events.
//!
//! Inject an [`Arc<dyn SubmissionProgressCallback>`] via
//! [`crate::config::ClientConfigBuilder::progress_callback`] (or
//! [`crate::form::FormController::with_progress_callback`]) to follow a
//! submission as the controller moves through its states: a terminal front-end
//! drives a spinner from it, a GUI would flip its button to a busy state.
//!
//! # Example
//!
//! ```rust
//! use pdf_rule_check::{ClientConfig, SubmissionProgressCallback, SubmissionState};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     transitions: AtomicUsize,
//! }
//!
//! impl SubmissionProgressCallback for CountingCallback {
//!     fn on_state_change(&self, state: &SubmissionState) {
//!         self.transitions.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("now: {}", state.name());
//!     }
//! }
//!
//! let config = ClientConfig::builder()
//!     .progress_callback(Arc::new(CountingCallback { transitions: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use crate::form::controller::SubmissionState;
use crate::form::rules::RuleSet;
use crate::output::ValidationResponse;
use std::sync::Arc;

/// Called by [`crate::form::FormController`] as a submission progresses.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Implementations must be `Send + Sync`; a controller
/// may be moved to another task between calls.
pub trait SubmissionProgressCallback: Send + Sync {
    /// Called after every state transition, with the new state.
    fn on_state_change(&self, state: &SubmissionState) {
        let _ = state;
    }

    /// Called once local checks pass, just before the request is sent.
    ///
    /// # Arguments
    /// * `file_name` — name of the selected PDF
    /// * `file_size` — its size in bytes
    /// * `rules`     — the rules being submitted, as typed
    fn on_submit_start(&self, file_name: &str, file_size: u64, rules: &RuleSet) {
        let _ = (file_name, file_size, rules);
    }

    /// Called when the service returned a well-formed response.
    fn on_submit_complete(&self, response: &ValidationResponse) {
        let _ = response;
    }

    /// Called when a submission ends in the error state, with the message
    /// that would be shown to the user.
    fn on_submit_error(&self, message: &str) {
        let _ = message;
    }
}

/// A no-op implementation for callers that don't need lifecycle events.
pub struct NoopProgressCallback;

impl SubmissionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ClientConfig`].
pub type ProgressCallback = Arc<dyn SubmissionProgressCallback>;
