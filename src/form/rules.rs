//! Rule editor: exactly three ordered free-text rules.
//!
//! [`RuleSet`] is a value type. Editing never mutates a caller's set in
//! place; [`RuleSet::with_rule`] returns a new set with one position
//! replaced, the same way the editor hands a fresh list to its owner on
//! every keystroke. No validation happens here: blank detection belongs to
//! the submission controller.

use crate::error::ValidatorError;
use crate::placeholders::{EXAMPLE_RULES, RULES_HEADING, RULES_HINT};
use serde::{Deserialize, Serialize};

/// Number of rules a submission carries.
pub const RULE_COUNT: usize = 3;

/// Ordered rules; position `i` is sent as form field `rule{i+1}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet([String; RULE_COUNT]);

impl RuleSet {
    pub fn new<S: Into<String>>(rules: [S; RULE_COUNT]) -> Self {
        Self(rules.map(Into::into))
    }

    /// Return a copy with position `index` (0-based) replaced by `value`.
    pub fn with_rule(&self, index: usize, value: impl Into<String>) -> Result<Self, ValidatorError> {
        if index >= RULE_COUNT {
            return Err(ValidatorError::RuleIndexOutOfRange { index });
        }
        let mut next = self.clone();
        next.0[index] = value.into();
        Ok(next)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        RULE_COUNT
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// 1-indexed positions whose rule is empty after trimming.
    pub fn blank_positions(&self) -> Vec<usize> {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, r)| r.trim().is_empty())
            .map(|(i, _)| i + 1)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.blank_positions().is_empty()
    }

    /// Multipart field name for a 0-based position.
    pub fn field_name(index: usize) -> String {
        format!("rule{}", index + 1)
    }
}

/// Presentation of the three rule inputs.
///
/// Holds no rule state of its own; [`RuleEditor::edit`] maps the current set
/// and one keystroke to the next set.
#[derive(Debug, Clone)]
pub struct RuleEditor {
    placeholders: [&'static str; RULE_COUNT],
}

impl Default for RuleEditor {
    fn default() -> Self {
        Self {
            placeholders: EXAMPLE_RULES,
        }
    }
}

impl RuleEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn heading(&self) -> &'static str {
        RULES_HEADING
    }

    pub fn hint(&self) -> &'static str {
        RULES_HINT
    }

    /// "Rule 1", "Rule 2", "Rule 3".
    pub fn label(&self, index: usize) -> String {
        format!("Rule {}", index + 1)
    }

    pub fn placeholder(&self, index: usize) -> Option<&'static str> {
        self.placeholders.get(index).copied()
    }

    /// Apply one input change and return the full updated set.
    pub fn edit(
        &self,
        rules: &RuleSet,
        index: usize,
        value: impl Into<String>,
    ) -> Result<RuleSet, ValidatorError> {
        rules.with_rule(index, value)
    }

    /// One line per input: label, then the value or a bracketed placeholder.
    pub fn render(&self, rules: &RuleSet) -> String {
        let mut out = format!("{}  ({})\n", self.heading(), self.hint());
        for (i, value) in rules.iter().enumerate() {
            let shown = if value.is_empty() {
                format!("[{}]", self.placeholder(i).unwrap_or_default())
            } else {
                value.to_string()
            };
            out.push_str(&format!("  {}: {}\n", self.label(i), shown));
        }
        out
    }
}
