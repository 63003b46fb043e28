//! Results renderer: turns a [`ValidationResponse`] into a table.
//!
//! Two layers:
//!
//! * [`ResultsTable`] — a presentation model (one [`ResultRow`] per result)
//!   any front-end can draw. The only computation is formatting: the status
//!   badge is upper-cased and confidence is bucketed into a display tone at
//!   80 / 60.
//! * [`ResultsTable::to_text`] — a column-aligned terminal rendering with
//!   word-wrapped text cells and a proportional confidence bar.
//!
//! An empty result list renders the header and column titles with no rows.

use crate::output::{RuleStatus, ValidationResponse};

/// Display tone for a confidence value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceTone {
    /// ≥ 80
    High,
    /// 60–79
    Medium,
    /// < 60
    Low,
}

impl ConfidenceTone {
    pub fn for_confidence(confidence: u8) -> Self {
        match confidence {
            80.. => ConfidenceTone::High,
            60..=79 => ConfidenceTone::Medium,
            _ => ConfidenceTone::Low,
        }
    }
}

/// One table row.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub rule: String,
    pub status: RuleStatus,
    /// `"PASS"` or `"FAIL"`.
    pub badge: &'static str,
    pub evidence: String,
    pub reasoning: String,
    pub confidence: u8,
    /// e.g. `"85%"`.
    pub confidence_label: String,
    /// Bar fill as a percentage of its track; equals `confidence`.
    pub bar_percent: u8,
    pub tone: ConfidenceTone,
}

/// Presentation model for one response.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsTable {
    pub title: &'static str,
    /// e.g. `"4 pages • 2.31s"`.
    pub summary: String,
    pub rows: Vec<ResultRow>,
}

/// Options for [`ResultsTable::to_text`].
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Emit ANSI colours.
    pub color: bool,
    /// Total table width in columns.
    pub width: usize,
    /// Cells in the confidence bar track.
    pub bar_cells: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            color: false,
            width: 120,
            bar_cells: 10,
        }
    }
}

const HEADERS: [&str; 5] = ["RULE", "STATUS", "EVIDENCE", "REASONING", "CONFIDENCE"];
const SEP: &str = " │ ";
const STATUS_WIDTH: usize = 6;

impl ResultsTable {
    pub fn from_response(response: &ValidationResponse) -> Self {
        let rows = response
            .results
            .iter()
            .map(|r| ResultRow {
                rule: r.rule.clone(),
                status: r.status,
                badge: r.status.badge(),
                evidence: r.evidence.clone(),
                reasoning: r.reasoning.clone(),
                confidence: r.confidence,
                confidence_label: format!("{}%", r.confidence),
                bar_percent: r.confidence,
                tone: ConfidenceTone::for_confidence(r.confidence),
            })
            .collect();

        Self {
            title: "Validation Results",
            summary: format!(
                "{} pages • {}s",
                response.pdf_pages, response.processing_time
            ),
            rows,
        }
    }

    /// Render as a terminal table.
    pub fn to_text(&self, opts: &RenderOptions) -> String {
        let conf_width = "100% ".len() + opts.bar_cells.max(1);
        let fixed = STATUS_WIDTH + conf_width + SEP.chars().count() * (HEADERS.len() - 1);
        // Rule, evidence and reasoning share what is left, roughly 3:4:4.
        let flexible = opts.width.saturating_sub(fixed).max(30);
        let rule_w = (flexible * 3 / 11).max(8);
        let evidence_w = (flexible * 4 / 11).max(8);
        let reasoning_w = flexible.saturating_sub(rule_w + evidence_w).max(8);
        let widths = [rule_w, STATUS_WIDTH, evidence_w, reasoning_w, conf_width];
        let total: usize = widths.iter().sum::<usize>() + SEP.chars().count() * (widths.len() - 1);

        let mut out = String::new();
        out.push_str(&paint(self.title, BOLD, opts.color));
        out.push_str("  ");
        out.push_str(&paint(&self.summary, DIM, opts.color));
        out.push('\n');

        let header: Vec<String> = HEADERS
            .iter()
            .zip(widths)
            .map(|(h, w)| paint(&pad(h, w), DIM, opts.color))
            .collect();
        out.push_str(header.join(SEP).trim_end());
        out.push('\n');
        out.push_str(&paint(&"─".repeat(total), DIM, opts.color));
        out.push('\n');

        for row in &self.rows {
            let rule = wrap(&row.rule, rule_w);
            let evidence = wrap(&row.evidence, evidence_w);
            let reasoning = wrap(&row.reasoning, reasoning_w);
            let height = rule.len().max(evidence.len()).max(reasoning.len());

            for line in 0..height {
                let cell = |lines: &[String], w: usize| {
                    pad(lines.get(line).map(String::as_str).unwrap_or(""), w)
                };
                let (status, confidence) = if line == 0 {
                    let badge_color = match row.status {
                        RuleStatus::Pass => GREEN,
                        RuleStatus::Fail => RED,
                    };
                    let bar = confidence_bar(row.bar_percent, opts.bar_cells);
                    let conf = format!("{:>4} {}", row.confidence_label, bar);
                    (
                        paint(&pad(row.badge, STATUS_WIDTH), badge_color, opts.color),
                        paint(&pad(&conf, conf_width), tone_color(row.tone), opts.color),
                    )
                } else {
                    (pad("", STATUS_WIDTH), pad("", conf_width))
                };

                let cells = [
                    cell(&rule, rule_w),
                    status,
                    cell(&evidence, evidence_w),
                    cell(&reasoning, reasoning_w),
                    confidence,
                ];
                out.push_str(cells.join(SEP).trim_end());
                out.push('\n');
            }
        }
        out
    }
}

/// A bar of `cells` characters, filled in proportion to `percent` (0–100).
pub fn confidence_bar(percent: u8, cells: usize) -> String {
    let percent = usize::from(percent.min(100));
    let filled = (percent * cells + 50) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(cells - filled))
}

/// Greedy word wrap; words longer than `width` are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let word: String = word.into_iter().collect();
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        s.to_string()
    } else {
        format!("{s}{}", " ".repeat(width - len))
    }
}

// ── ANSI colour helpers ──────────────────────────────────────────────────

const GREEN: &str = "32";
const RED: &str = "31";
const YELLOW: &str = "33";
const DIM: &str = "2";
const BOLD: &str = "1";

fn tone_color(tone: ConfidenceTone) -> &'static str {
    match tone {
        ConfidenceTone::High => GREEN,
        ConfidenceTone::Medium => YELLOW,
        ConfidenceTone::Low => RED,
    }
}

fn paint(s: &str, code: &str, enabled: bool) -> String {
    if enabled {
        format!("\x1b[{code}m{s}\x1b[0m")
    } else {
        s.to_string()
    }
}
