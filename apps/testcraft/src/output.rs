//! Output rendering for analysis, validation and the style guide.
//!
//! Every operation answers with text; the `render_*` functions build that
//! text without colour. The CLI prints validation and analysis either in
//! `human` form (coloured status labels unless `NO_COLOR` is set) or as
//! JSON built by the pure `compose_*_json` functions.

use crate::analysis::AnalysisResult;
use crate::models::style::StyleConfig;
use crate::models::{Status, ValidationReport};
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;
use std::fmt::Write as _;

fn use_colors(output: &str) -> bool {
    output != "json" && crate::utils::colors_enabled()
}

fn yes_no(b: bool) -> &'static str {
    if b {
        "yes"
    } else {
        "no"
    }
}

fn code_block(out: &mut String, body: &str) {
    out.push_str("```typescript\n");
    out.push_str(body);
    if !body.ends_with('\n') {
        out.push('\n');
    }
    out.push_str("```\n");
}

fn bullets<'a, I: IntoIterator<Item = &'a String>>(out: &mut String, items: I) {
    let mut any = false;
    for item in items {
        let _ = writeln!(out, "  - `{}`", item);
        any = true;
    }
    if !any {
        out.push_str("  - (none detected)\n");
    }
}

/// Text form of an analysis result.
pub fn render_analysis(res: &AnalysisResult) -> String {
    let mut out = String::new();
    out.push_str("# TEST PATTERN ANALYSIS\n\n");
    out.push_str("**Follow these patterns when writing new tests.**\n\n");
    let _ = writeln!(out, "## Files Analyzed: {}", res.files_analyzed.len());
    for f in &res.files_analyzed {
        let _ = writeln!(out, "  - `{}`", f);
    }
    out.push('\n');

    out.push_str("## Test Structure\n");
    let structures: Vec<&str> = res.structures.iter().map(String::as_str).collect();
    let pattern = if structures.is_empty() {
        "Unknown".to_string()
    } else {
        structures.join(" / ")
    };
    let _ = writeln!(out, "- **Pattern Used:** `{}`", pattern);
    let _ = writeln!(out, "- **Uses Arrange/Act/Assert comments:** `{}`", yes_no(res.uses_phase_comments));
    let _ = writeln!(out, "- **Uses setup hooks:** `{}`", yes_no(res.uses_setup_hooks));
    let _ = writeln!(out, "- **Uses teardown hooks:** `{}`", yes_no(res.uses_teardown_hooks));
    out.push('\n');

    out.push_str("## Naming Conventions\n**describe() names used:**\n");
    bullets(&mut out, &res.group_names);
    out.push_str("\n**it()/test() names used:**\n");
    bullets(&mut out, &res.case_names);
    out.push('\n');

    out.push_str("## Import Patterns\n**Libraries used:**\n");
    bullets(&mut out, &res.libraries);
    out.push_str("\n**Common utilities:**\n");
    bullets(&mut out, &res.utilities);
    out.push('\n');
    if let Some(imports) = &res.example_imports {
        out.push_str("**Example import block:**\n");
        code_block(&mut out, imports);
        out.push('\n');
    }

    out.push_str("## Mocking Patterns\n");
    bullets(&mut out, &res.mocking);
    out.push_str("\n## Assertion Patterns\n");
    bullets(&mut out, &res.assertions);
    out.push('\n');

    if let Some(block) = &res.example_block {
        out.push_str("## Real Example: describe() block from the codebase\n");
        code_block(&mut out, block);
        out.push('\n');
    }
    out.push_str("---\n**Use these exact patterns when writing new tests.**");
    out
}

/// Text form of a validation report.
pub fn render_report(report: &ValidationReport) -> String {
    let mut out = String::new();
    out.push_str("# TEST STYLE VALIDATION REPORT\n");
    let _ = writeln!(out, "**File:** {}\n", report.file);
    out.push_str("## Results\n\n");
    for o in &report.outcomes {
        match (&o.status, &o.detail) {
            (Status::Skip, Some(detail)) => {
                let _ = writeln!(out, "**SKIP:** {} ({})", o.id, detail);
            }
            _ => {
                let _ = writeln!(out, "**{}:** {}", o.status.label(), o.description);
            }
        }
    }
    let s = &report.summary;
    out.push_str("\n## Summary\n");
    let _ = writeln!(out, "- Passed: {}", s.passed);
    let _ = writeln!(out, "- Failed: {}", s.failed);
    let _ = writeln!(out, "- Warnings: {}", s.warnings);
    let _ = writeln!(out, "- Skipped: {}\n", s.skipped);
    if report.fails() {
        out.push_str("**Please fix the failed rules before committing.**");
    } else {
        out.push_str("**Test file meets all style requirements!**");
    }
    out
}

const NAMING_EXAMPLE: &str = "\
// CORRECT
describe('Button', () => {
  it('should render with default props', () => { ... });
  it('should call onClick when clicked', () => { ... });
  it('should be disabled when disabled prop is true', () => { ... });
});

// INCORRECT
describe('Button tests', () => {
  it('renders', () => { ... });
  it('click works', () => { ... });
  test('disabled', () => { ... });
});";

const STRUCTURE_EXAMPLE: &str = "\
it('should handle form submission', async () => {
  // Arrange
  const mockSubmit = jest.fn();
  render(<Form onSubmit={mockSubmit} />);

  // Act
  await userEvent.click(screen.getByRole('button', { name: 'Submit' }));

  // Assert
  expect(mockSubmit).toHaveBeenCalledTimes(1);
});";

/// Text form of the team style guide.
pub fn render_style_guide(style: &StyleConfig) -> String {
    let mut out = String::new();
    out.push_str("# TEAM TEST STYLE GUIDE\n\n");
    out.push_str("**Follow these rules exactly for consistency across all developers.**\n\n");
    out.push_str("## Structure\n");
    let _ = writeln!(out, "- **Test Structure:** Use `{}`", style.test_structure);
    let _ = writeln!(
        out,
        "- **it() Naming:** `{}` (e.g., `it('should render button')`)",
        style.it_naming
    );
    let _ = writeln!(out, "- **describe() Naming:** `{}`\n", style.describe_naming);
    out.push_str("## Code Organization\n");
    let _ = writeln!(out, "- **Test Arrangement:** `{}`", style.arrangement);
    let _ = writeln!(out, "- **Use Arrange/Act/Assert comments:** `{}`", yes_no(style.comments));
    let _ = writeln!(out, "- **Imports Order:** `{}`", style.imports_order.join(" -> "));
    let _ = writeln!(out, "- **Mock Location:** `{}`\n", style.mock_location);
    out.push_str("## Test Quality\n");
    let _ = writeln!(out, "- **Assertions per Test:** `{}`", style.assertions_per_test);
    let _ = writeln!(
        out,
        "- **Required Edge Cases:** `{}`\n",
        style.edge_cases_required.join(", ")
    );
    out.push_str("## Example Naming:\n```javascript\n");
    out.push_str(NAMING_EXAMPLE);
    out.push_str("\n```\n\n## Example Structure:\n```javascript\n");
    out.push_str(STRUCTURE_EXAMPLE);
    out.push_str("\n```");
    if !style.custom_rules.is_empty() {
        out.push_str("\n\n## Custom Team Rules");
        for rule in &style.custom_rules {
            let _ = write!(out, "\n- {}", rule);
        }
    }
    out
}

/// Compose validation JSON (pure) for testing/snapshot purposes.
pub fn compose_report_json(report: &ValidationReport) -> JsonVal {
    json!({
        "file": report.file,
        "results": report.outcomes,
        "summary": report.summary,
        "fails": report.fails(),
    })
}

/// Compose analysis JSON (pure) for testing/snapshot purposes.
pub fn compose_analysis_json(res: &AnalysisResult) -> JsonVal {
    match serde_json::to_value(res) {
        Ok(v) => v,
        Err(e) => json!({ "error": e.to_string() }),
    }
}

/// Compose an error JSON object (pure) carrying the stable error code.
pub fn compose_error_json(err: &crate::error::Error) -> JsonVal {
    json!({ "error": { "code": err.code(), "message": err.to_string() } })
}

/// Print an error in the requested format (JSON on stdout, text on stderr).
pub fn print_error(err: &crate::error::Error, output: &str) {
    if output == "json" {
        print_json(&compose_error_json(err));
    } else {
        eprintln!("{} {}", crate::utils::error_prefix(), err);
    }
}

fn print_json(value: &JsonVal) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("{} {}", crate::utils::error_prefix(), e),
    }
}

fn status_badge(status: Status, color: bool) -> String {
    let label = format!("⟦{}⟧", status.label().to_lowercase());
    if !color {
        return label;
    }
    match status {
        Status::Pass => label.green().bold().to_string(),
        Status::Fail => label.red().bold().to_string(),
        Status::Warn => label.yellow().bold().to_string(),
        Status::Skip => label.bright_black().to_string(),
    }
}

/// Print a validation report in the requested format.
pub fn print_report(report: &ValidationReport, output: &str) {
    if output == "json" {
        print_json(&compose_report_json(report));
        return;
    }
    let color = use_colors(output);
    for o in &report.outcomes {
        let text = match (&o.status, &o.detail) {
            (Status::Skip, Some(detail)) => detail.clone(),
            _ => o.description.clone(),
        };
        println!("{} {} ❲{}❳ {}", status_badge(o.status, color), report.file, o.id, text);
    }
    let s = &report.summary;
    let summary = format!(
        "Summary: passed={} failed={} warnings={} skipped={}",
        s.passed, s.failed, s.warnings, s.skipped
    );
    if color {
        println!("{}", summary.bold());
    } else {
        println!("{}", summary);
    }
}

/// Print an analysis result in the requested format.
pub fn print_analysis(res: &AnalysisResult, output: &str) {
    if output == "json" {
        print_json(&compose_analysis_json(res));
    } else {
        println!("{}", render_analysis(res));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RuleOutcome, Summary};

    fn report() -> ValidationReport {
        ValidationReport {
            file: "src/a.test.ts".into(),
            outcomes: vec![
                RuleOutcome {
                    id: "has_describe".into(),
                    description: "Test must use describe() blocks".into(),
                    status: Status::Pass,
                    detail: None,
                },
                RuleOutcome {
                    id: "broken".into(),
                    description: "Broken".into(),
                    status: Status::Skip,
                    detail: Some("Invalid pattern for rule 'broken': x".into()),
                },
                RuleOutcome {
                    id: "has_aaa_comments".into(),
                    description: "Test should have AAA comments".into(),
                    status: Status::Warn,
                    detail: None,
                },
            ],
            summary: Summary {
                passed: 1,
                failed: 0,
                warnings: 1,
                skipped: 1,
            },
        }
    }

    #[test]
    fn test_compose_report_json_shape() {
        let out = compose_report_json(&report());
        assert_eq!(out["summary"]["warnings"], 1);
        assert_eq!(out["fails"], false);
        assert_eq!(out["results"][1]["status"], "SKIP");
        assert!(out["results"][0].get("detail").is_none());
    }

    #[test]
    fn test_compose_error_json_code() {
        let err = crate::error::Error::Timeout { secs: 3 };
        let out = compose_error_json(&err);
        assert_eq!(out["error"]["code"], "TIMEOUT");
        assert_eq!(out["error"]["message"], "Tests timed out after 3 seconds");
    }

    #[test]
    fn test_render_report_lines() {
        let text = render_report(&report());
        assert!(text.contains("**PASS:** Test must use describe() blocks"));
        assert!(text.contains("**SKIP:** broken (Invalid pattern"));
        assert!(text.contains("**WARN:** Test should have AAA comments"));
        assert!(text.contains("- Skipped: 1"));
        assert!(text.ends_with("**Test file meets all style requirements!**"));
    }

    #[test]
    fn test_render_style_guide_custom_rules() {
        let mut style = crate::config::Config::defaults().style_guide;
        let text = render_style_guide(&style);
        assert!(text.contains("Use `describe + it`"));
        assert!(text.contains("react -> testing-library -> components"));
        assert!(!text.contains("Custom Team Rules"));

        style.custom_rules = vec!["Always mock API calls".into()];
        assert!(render_style_guide(&style).ends_with("## Custom Team Rules\n- Always mock API calls"));
    }

    #[test]
    fn test_render_analysis_sections() {
        let mut res = AnalysisResult::default();
        res.files_analyzed.push("a.test.ts".into());
        res.uses_phase_comments = true;
        res.group_names.push("sum".into());
        let text = render_analysis(&res);
        assert!(text.contains("## Files Analyzed: 1\n  - `a.test.ts`"));
        assert!(text.contains("**Pattern Used:** `Unknown`"));
        assert!(text.contains("comments:** `yes`"));
        assert!(text.contains("  - `sum`"));
        assert!(text.contains("## Mocking Patterns\n  - (none detected)"));
        let json = compose_analysis_json(&res);
        assert_eq!(json["uses_phase_comments"], true);
        assert_eq!(json["group_names"][0], "sum");
    }
}
