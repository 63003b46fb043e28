//! Static copy shown by the form: placeholder rules and selector prompts.
//!
//! Kept in one place so front-ends and tests read the same strings.

/// Example rules shown as placeholder text, one per position.
pub const EXAMPLE_RULES: [&str; 3] = [
    "The document must have a purpose section.",
    "The document must mention at least one date.",
    "The document must define at least one term.",
];

/// Heading and hint for the rule editor.
pub const RULES_HEADING: &str = "Validation Rules";
pub const RULES_HINT: &str = "Required: 3 rules";

/// Selector prompt while nothing is selected.
pub const SELECTOR_PROMPT: &str = "Click or drag PDF to upload";
pub const SELECTOR_HINT: &str = "PDF files only, max 10MB";

/// Busy text while a request is in flight.
pub const SUBMITTING_LABEL: &str = "Validating Document...";
