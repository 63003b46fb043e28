//! The form: file selector, rule editor, and the controller that ties them
//! to the transport.
//!
//! ## Data Flow
//!
//! ```text
//! selector ──┐
//!            ├──▶ controller ──▶ client ──▶ (validation service)
//! rules ─────┘        │
//!                     └──▶ render (on success) / error message
//! ```
//!
//! 1. [`selector`]   — hold at most one PDF; advisory extension and size checks
//! 2. [`rules`]      — three ordered free-text rules, replaced by value on edit
//! 3. [`controller`] — local precondition checks, one request in flight,
//!    success/error state

pub mod controller;
pub mod rules;
pub mod selector;

pub use controller::{FormController, Submission, SubmissionState, SubmissionToken};
pub use rules::{RuleEditor, RuleSet, RULE_COUNT};
pub use selector::{FileSelector, SelectedFile};
