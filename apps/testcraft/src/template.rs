//! Template lookup and subject-name substitution.
//!
//! Templates name their subject with one of several placeholder spellings.
//! Substitution is a single left-to-right scan that tries every spelling at
//! each position (longest first), so the order in which spellings are
//! listed never changes the output and substituted text is never rescanned.

use crate::analysis::detectors::has_call;
use crate::error::{Error, Result};
use crate::models::style::TemplateSet;
use crate::scan::subject_stem;
use std::path::Path;

/// Placeholder spellings for the subject under test.
pub const PLACEHOLDERS: &[&str] = &["ComponentName", "useHookName", "functionName", "apiFunction"];

/// Replace every placeholder occurrence in `text` with `subject`.
pub fn substitute(text: &str, subject: &str) -> String {
    let mut spellings: Vec<&str> = PLACEHOLDERS.to_vec();
    spellings.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while !rest.is_empty() {
        if let Some(p) = spellings.iter().find(|p| rest.starts_with(**p)) {
            out.push_str(subject);
            rest = &rest[p.len()..];
            continue;
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            out.push(c);
        }
        rest = chars.as_str();
    }
    out
}

/// Look up `kind` and substitute `subject` when one is given. An empty
/// subject leaves the placeholders in place.
pub fn instantiate(templates: &TemplateSet, kind: &str, subject: Option<&str>) -> Result<String> {
    let text = templates.get(kind).ok_or_else(|| Error::UnknownKind {
        kind: kind.to_string(),
        known: templates.kinds(),
    })?;
    Ok(match subject.map(str::trim).filter(|s| !s.is_empty()) {
        Some(name) => substitute(text, name),
        None => text.to_string(),
    })
}

/// Title block placed above an instantiated template.
pub fn header(kind: &str, subject: Option<&str>) -> String {
    let title = kind.replace('_', " ").to_uppercase();
    let subject = subject
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("[Replace with actual name]");
    format!(
        "# TEST TEMPLATE: {}\n\n**Use this exact structure for consistency.**\n**Component/Function:** {}\n\n---\n\n",
        title, subject
    )
}

/// Pick the template kind that fits an existing test file.
///
/// Hook rendering wins over module mocks, which win over JSX rendering;
/// anything else is treated as a plain function test.
pub fn choose_kind(path: &str, text: &str) -> &'static str {
    let stem = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let subject = subject_stem(&stem).unwrap_or(&stem);
    let hook_named = subject
        .strip_prefix("use")
        .and_then(|r| r.chars().next())
        .map(|c| c.is_ascii_uppercase())
        .unwrap_or(false);

    if hook_named || has_call(text, "renderHook") {
        "hook"
    } else if has_call(text, "jest.mock") || text.contains("axios") || has_call(text, "fetch") {
        "api_service"
    } else if has_call(text, "render") || path.ends_with(".tsx") || path.ends_with(".jsx") {
        "react_component"
    } else {
        "utility_function"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn set() -> TemplateSet {
        [
            ("hook".to_string(), "useHookName()".to_string()),
            (
                "utility_function".to_string(),
                "import { functionName } from './utils';\nfunctionName(x);".to_string(),
            ),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_unknown_kind_lists_known_kinds() {
        let err = instantiate(&set(), "widget", None).unwrap_err();
        match err {
            Error::UnknownKind { kind, known } => {
                assert_eq!(kind, "widget");
                assert_eq!(known, vec!["hook", "utility_function"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_subject_is_optional() {
        assert_eq!(instantiate(&set(), "hook", None).unwrap(), "useHookName()");
        assert_eq!(instantiate(&set(), "hook", Some("  ")).unwrap(), "useHookName()");
        assert_eq!(instantiate(&set(), "hook", Some("useCart")).unwrap(), "useCart()");
    }

    #[test]
    fn test_builtin_utility_template_has_no_placeholders_left() {
        let cfg = Config::defaults();
        let out = instantiate(&cfg.templates, "utility_function", Some("computeTotal")).unwrap();
        for p in PLACEHOLDERS {
            assert!(!out.contains(p), "{p} left in output");
        }
        assert!(out.contains("import { computeTotal } from './utils';"));
        assert!(out.contains("describe('computeTotal'"));
        assert!(out.contains("expect(computeTotal(null))"));
    }

    #[test]
    fn test_substitution_does_not_rescan_output() {
        // a subject containing a placeholder spelling is not expanded again
        assert_eq!(substitute("apiFunction()", "functionName"), "functionName()");
        assert_eq!(substitute("x ComponentName y", "Ü"), "x Ü y");
        assert_eq!(substitute("no tokens", "Z"), "no tokens");
    }

    #[test]
    fn test_header_and_kind_choice() {
        let h = header("react_component", None);
        assert!(h.starts_with("# TEST TEMPLATE: REACT COMPONENT\n"));
        assert!(h.contains("[Replace with actual name]"));
        assert!(header("hook", Some("useCart")).contains("**Component/Function:** useCart"));

        assert_eq!(choose_kind("src/useCart.test.ts", ""), "hook");
        assert_eq!(choose_kind("a.test.ts", "renderHook(() => x)"), "hook");
        assert_eq!(choose_kind("api.test.ts", "jest.mock('./http');"), "api_service");
        assert_eq!(choose_kind("Button.test.tsx", ""), "react_component");
        assert_eq!(choose_kind("b.test.js", "render(<B />);"), "react_component");
        assert_eq!(choose_kind("math.test.ts", "expect(add(1, 2))"), "utility_function");
    }
}
