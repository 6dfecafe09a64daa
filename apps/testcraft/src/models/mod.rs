//! Shared data models: rule schema, style records, and validation reports.

pub mod rule;
pub mod style;

use serde::Serialize;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
/// Outcome of evaluating one rule against one file.
pub enum Status {
    Pass,
    Fail,
    Warn,
    Skip,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::Pass => "PASS",
            Status::Fail => "FAIL",
            Status::Warn => "WARN",
            Status::Skip => "SKIP",
        }
    }
}

#[derive(Serialize, Debug, Clone)]
/// A single rule outcome, in rule declaration order.
pub struct RuleOutcome {
    pub id: String,
    pub description: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
/// Pass/fail/warn/skip totals.
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    pub warnings: usize,
    pub skipped: usize,
}

#[derive(Serialize, Debug, Clone)]
/// Validation results for one file.
pub struct ValidationReport {
    pub file: String,
    pub outcomes: Vec<RuleOutcome>,
    pub summary: Summary,
}

impl ValidationReport {
    /// A file fails iff at least one rule failed; warnings never fail it.
    pub fn fails(&self) -> bool {
        self.summary.failed > 0
    }

    /// Outcomes that need attention (FAIL and WARN), in report order.
    pub fn issues(&self) -> impl Iterator<Item = &RuleOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, Status::Fail | Status::Warn))
    }
}
