//! Rule-driven style validation of a single test file.
//!
//! Rules are evaluated in declaration order against the whole text with
//! case-insensitive, multi-line matching. Outcomes:
//!
//! | polarity       | found | blocking | advisory |
//! |----------------|-------|----------|----------|
//! | must-match     | yes   | PASS     | PASS     |
//! | must-match     | no    | FAIL     | WARN     |
//! | must-not-match | yes   | FAIL     | FAIL     |
//! | must-not-match | no    | PASS     | PASS     |
//!
//! A rule whose pattern is empty or does not compile is reported as SKIP
//! and evaluation continues with the next rule.

use crate::error::{Error, Result};
use crate::models::rule::{Polarity, Rule, Severity};
use crate::models::{RuleOutcome, Status, Summary, ValidationReport};
use regex::{Regex, RegexBuilder};

fn compile(rule: &Rule) -> Result<Regex> {
    if rule.pattern.trim().is_empty() {
        return Err(Error::PatternCompile {
            id: rule.id.clone(),
            message: "rule has no pattern".into(),
        });
    }
    RegexBuilder::new(&rule.pattern)
        .case_insensitive(true)
        .multi_line(true)
        .build()
        .map_err(|e| Error::PatternCompile {
            id: rule.id.clone(),
            message: e.to_string(),
        })
}

fn decide(polarity: Polarity, severity: Severity, found: bool) -> Status {
    match (polarity, found) {
        (Polarity::MustMatch, true) => Status::Pass,
        (Polarity::MustMatch, false) => match severity {
            Severity::Blocking => Status::Fail,
            Severity::Advisory => Status::Warn,
        },
        (Polarity::MustNotMatch, true) => Status::Fail,
        (Polarity::MustNotMatch, false) => Status::Pass,
    }
}

/// Evaluate one rule. Never fails: compile errors become SKIP.
pub fn evaluate(rule: &Rule, text: &str) -> RuleOutcome {
    let (status, detail) = match compile(rule) {
        Ok(re) => (decide(rule.polarity, rule.severity, re.is_match(text)), None),
        Err(e) => {
            tracing::warn!(rule = %rule.id, error = %e, "skipping rule");
            (Status::Skip, Some(e.to_string()))
        }
    };
    RuleOutcome {
        id: rule.id.clone(),
        description: rule.description.clone(),
        status,
        detail,
    }
}

/// Validate `text` (displayed as `file`) against `rules` in order.
pub fn validate(file: &str, text: &str, rules: &[Rule]) -> ValidationReport {
    let outcomes: Vec<RuleOutcome> = rules.iter().map(|r| evaluate(r, text)).collect();
    let mut summary = Summary::default();
    for o in &outcomes {
        match o.status {
            Status::Pass => summary.passed += 1,
            Status::Fail => summary.failed += 1,
            Status::Warn => summary.warnings += 1,
            Status::Skip => summary.skipped += 1,
        }
    }
    ValidationReport {
        file: file.to_string(),
        outcomes,
        summary,
    }
}
