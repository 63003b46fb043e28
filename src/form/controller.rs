//! Submission controller: the form's state machine.
//!
//! ```text
//!            begin_submit()
//!   Idle ──────────────────▶ ValidatingLocally ──(no file / blank rule)──▶ Error
//!    ▲                              │
//!    │                              ▼
//!  Success / Error ◀──────── Submitting { token }
//!        (finish_submit with the matching token)
//! ```
//!
//! Success and Error are resting states; the next `begin_submit` re-runs the
//! local checks from scratch. Entering `Submitting` replaces whatever the
//! previous result or error was, so stale results are never on screen while
//! a new request is outstanding.
//!
//! Only one submission may be in flight. `begin_submit` refuses a second one
//! with [`ValidatorError::SubmissionInFlight`], and `finish_submit` ignores
//! outcomes whose [`SubmissionToken`] is not the in-flight one.

use crate::client::ValidationTransport;
use crate::config::ClientConfig;
use crate::error::{ErrorCategory, ValidatorError};
use crate::form::rules::{RuleEditor, RuleSet};
use crate::form::selector::{FileSelector, SelectedFile};
use crate::output::ValidationResponse;
use crate::progress::ProgressCallback;
use std::path::Path;
use tracing::{debug, info, warn};

/// Identifies one submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmissionToken(u64);

/// Controller state.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionState {
    Idle,
    ValidatingLocally,
    Submitting { token: SubmissionToken },
    Success(ValidationResponse),
    Error {
        category: ErrorCategory,
        message: String,
    },
}

impl SubmissionState {
    pub fn name(&self) -> &'static str {
        match self {
            SubmissionState::Idle => "idle",
            SubmissionState::ValidatingLocally => "validating-locally",
            SubmissionState::Submitting { .. } => "submitting",
            SubmissionState::Success(_) => "success",
            SubmissionState::Error { .. } => "error",
        }
    }
}

/// Snapshot of what is being sent.
///
/// Later edits to the form do not reach an in-flight submission.
#[derive(Debug, Clone)]
pub struct Submission {
    pub token: SubmissionToken,
    pub file: SelectedFile,
    pub rules: RuleSet,
}

/// Owns the form state: selected file, rules, and submission state.
pub struct FormController {
    selector: FileSelector,
    editor: RuleEditor,
    rules: RuleSet,
    state: SubmissionState,
    next_token: u64,
    progress: Option<ProgressCallback>,
}

impl Default for FormController {
    fn default() -> Self {
        Self::new(&ClientConfig::default())
    }
}

impl FormController {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            selector: FileSelector::new(config.max_file_bytes),
            editor: RuleEditor::new(),
            rules: RuleSet::default(),
            state: SubmissionState::Idle,
            next_token: 0,
            progress: config.progress_callback.clone(),
        }
    }

    pub fn with_progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.progress = Some(cb);
        self
    }

    /// Replace the selector, e.g. with one carrying an `on_change` hook.
    pub fn with_selector(mut self, selector: FileSelector) -> Self {
        self.selector = selector;
        self
    }

    // ── Form inputs ──────────────────────────────────────────────────────

    pub fn selector(&self) -> &FileSelector {
        &self.selector
    }

    pub fn selector_mut(&mut self) -> &mut FileSelector {
        &mut self.selector
    }

    pub fn select_file(&mut self, path: impl AsRef<Path>) -> Result<&SelectedFile, ValidatorError> {
        self.selector.select_path(path)
    }

    pub fn editor(&self) -> &RuleEditor {
        &self.editor
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn set_rules(&mut self, rules: RuleSet) {
        self.rules = rules;
    }

    /// Replace one rule (0-based position).
    pub fn edit_rule(&mut self, index: usize, value: impl Into<String>) -> Result<(), ValidatorError> {
        self.rules = self.editor.edit(&self.rules, index, value)?;
        Ok(())
    }

    // ── State ────────────────────────────────────────────────────────────

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// True while a request is outstanding; front-ends disable submit on it.
    pub fn is_submitting(&self) -> bool {
        matches!(self.state, SubmissionState::Submitting { .. })
    }

    pub fn response(&self) -> Option<&ValidationResponse> {
        match &self.state {
            SubmissionState::Success(r) => Some(r),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            SubmissionState::Error { message, .. } => Some(message),
            _ => None,
        }
    }

    // ── Submission ───────────────────────────────────────────────────────

    /// Run the local checks and, if they pass, enter `Submitting`.
    ///
    /// On a precondition failure the controller moves to `Error` and no
    /// network call should be made. While another submission is in flight
    /// the attempt is refused and the state is left as is.
    pub fn begin_submit(&mut self) -> Result<Submission, ValidatorError> {
        if self.is_submitting() {
            warn!("Submit ignored: a request is already in flight");
            return Err(ValidatorError::SubmissionInFlight);
        }

        self.transition(SubmissionState::ValidatingLocally);

        let Some(file) = self.selector.selected().cloned() else {
            let err = ValidatorError::NoFileSelected;
            self.record_error(&err);
            return Err(err);
        };

        let positions = self.rules.blank_positions();
        if !positions.is_empty() {
            debug!("Blank rules at positions {:?}", positions);
            let err = ValidatorError::IncompleteRules { positions };
            self.record_error(&err);
            return Err(err);
        }

        self.next_token += 1;
        let token = SubmissionToken(self.next_token);
        self.transition(SubmissionState::Submitting { token });

        if let Some(cb) = &self.progress {
            cb.on_submit_start(file.name(), file.size(), &self.rules);
        }

        Ok(Submission {
            token,
            file,
            rules: self.rules.clone(),
        })
    }

    /// Apply the outcome of a submission.
    ///
    /// Returns `false` (and changes nothing) when `token` is not the
    /// submission currently in flight.
    pub fn finish_submit(
        &mut self,
        token: SubmissionToken,
        outcome: Result<ValidationResponse, ValidatorError>,
    ) -> bool {
        if !self.is_current(token) {
            debug!("Discarding outcome of stale submission {:?}", token);
            return false;
        }
        match outcome {
            Ok(response) => {
                info!(
                    "Validation complete: {} results, {} pages, {}s",
                    response.results.len(),
                    response.pdf_pages,
                    response.processing_time
                );
                if let Some(cb) = &self.progress {
                    cb.on_submit_complete(&response);
                }
                self.transition(SubmissionState::Success(response));
            }
            Err(err) => self.record_error(&err),
        }
        true
    }

    /// Full cycle: local checks, one request through `transport`, outcome.
    pub async fn submit<T>(&mut self, transport: &T) -> Result<&ValidationResponse, ValidatorError>
    where
        T: ValidationTransport + ?Sized,
    {
        let submission = self.begin_submit()?;
        match transport.validate(&submission.file, &submission.rules).await {
            Ok(response) => {
                response.matches_rules(&submission.rules);
                self.finish_submit(submission.token, Ok(response));
                self.response().ok_or_else(|| {
                    ValidatorError::Internal("submission finished without a response".into())
                })
            }
            Err(err) => {
                if self.is_current(submission.token) {
                    self.record_error(&err);
                }
                Err(err)
            }
        }
    }

    fn is_current(&self, token: SubmissionToken) -> bool {
        matches!(self.state, SubmissionState::Submitting { token: current } if current == token)
    }

    fn record_error(&mut self, err: &ValidatorError) {
        let message = err.to_string();
        match std::error::Error::source(err) {
            Some(source) => warn!("Submission failed: {} ({})", message, source),
            None => warn!("Submission failed: {}", message),
        }
        if let Some(cb) = &self.progress {
            cb.on_submit_error(&message);
        }
        self.transition(SubmissionState::Error {
            category: err.category(),
            message,
        });
    }

    fn transition(&mut self, next: SubmissionState) {
        debug!("Form state: {} → {}", self.state.name(), next.name());
        self.state = next;
        if let Some(cb) = &self.progress {
            cb.on_state_change(&self.state);
        }
    }
}
