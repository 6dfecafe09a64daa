//! Lexical detectors over raw test-file text.
//!
//! Each detector is total: it never fails and returns a plain fact
//! (bool, optional string, or list of labels). None of them parse the
//! language; they look for conventional call sites and keywords and may
//! miss or over-report on unusual input.

use regex::Regex;
use std::sync::OnceLock;

/// Lines kept from a leading import block.
pub const IMPORT_BLOCK_MAX_LINES: usize = 10;
/// Group names taken from a single file.
pub const GROUP_NAMES_PER_FILE: usize = 3;
/// Case names taken per case-defining callee from a single file.
pub const CASE_NAMES_PER_FILE: usize = 5;

pub const GROUP_CALLEES: &[&str] = &["describe"];
pub const CASE_CALLEES: &[&str] = &["it", "test"];

/// (substring, label) pairs for mocking idioms.
pub const MOCKING_VOCABULARY: &[(&str, &str)] = &[
    ("jest.mock(", "jest.mock() - module mocking"),
    ("jest.fn(", "jest.fn() - function mocks"),
    ("jest.spyOn(", "jest.spyOn() - spy on methods"),
    ("vi.mock(", "vi.mock() - module mocking"),
    ("vi.fn(", "vi.fn() - function mocks"),
    ("mockImplementation", "mockImplementation()"),
    ("mockResolvedValue", "mockResolvedValue() - async mocks"),
    ("mockRejectedValue", "mockRejectedValue() - async failures"),
    ("mockReturnValue", "mockReturnValue()"),
];

/// (substring, label) pairs for assertion idioms.
pub const ASSERTION_VOCABULARY: &[(&str, &str)] = &[
    ("toBeInTheDocument", "toBeInTheDocument()"),
    ("toHaveBeenCalledWith", "toHaveBeenCalledWith()"),
    ("toHaveBeenCalled", "toHaveBeenCalled()"),
    ("toStrictEqual", "toStrictEqual()"),
    ("toEqual", "toEqual()"),
    ("toBe(", "toBe()"),
    ("toMatchSnapshot", "toMatchSnapshot()"),
    ("toThrow", "toThrow()"),
];

/// Test-helper identifiers, matched on identifier boundaries.
pub const UTILITY_VOCABULARY: &[&str] = &[
    "render",
    "renderHook",
    "screen",
    "fireEvent",
    "userEvent",
    "waitFor",
    "act",
    "within",
];

/// Testing libraries recognised in the source text.
pub const LIBRARY_VOCABULARY: &[&str] = &[
    "@testing-library/react",
    "@testing-library/user-event",
    "@testing-library/jest-dom",
];

pub const PHASE_KEYWORDS: &[&str] = &["Arrange", "Act", "Assert"];
pub const SETUP_HOOKS: &[&str] = &["beforeEach", "beforeAll"];
pub const TEARDOWN_HOOKS: &[&str] = &["afterEach", "afterAll"];

fn cached(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern).ok()).as_ref()
}

fn group_call_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&RE, r"\bdescribe\s*\(")
}

fn phase_comment_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&RE, r"(?m)^\s*//\s*(Arrange|Act|Assert)\b")
}

fn standalone_test_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&RE, r"(?m)^test\s*\(")
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// True when `word` occurs in `text` with no identifier character on
/// either side (`act` matches `act(` but not `react`).
pub fn contains_word(text: &str, word: &str) -> bool {
    if word.is_empty() {
        return false;
    }
    let bytes = text.as_bytes();
    text.match_indices(word).any(|(i, _)| {
        let before_ok = i == 0 || !is_ident_byte(bytes[i - 1]);
        let end = i + word.len();
        let after_ok = end >= bytes.len() || !is_ident_byte(bytes[end]);
        before_ok && after_ok
    })
}

/// True when `callee(` appears as a call on identifier boundaries.
pub fn has_call(text: &str, callee: &str) -> bool {
    let bytes = text.as_bytes();
    text.match_indices(callee).any(|(i, _)| {
        if i > 0 && is_ident_byte(bytes[i - 1]) {
            return false;
        }
        let rest = &text[i + callee.len()..];
        rest.trim_start_matches([' ', '\t']).starts_with('(')
    })
}

/// True when the line opens a grouping call.
pub fn is_group_call_line(line: &str) -> bool {
    match group_call_re() {
        Some(re) => re.is_match(line),
        None => GROUP_CALLEES.iter().any(|c| has_call(line, c)),
    }
}

fn is_declaration(trimmed: &str) -> bool {
    let binding = ["const ", "let ", "var "]
        .iter()
        .any(|kw| trimmed.starts_with(kw));
    trimmed.starts_with("import ")
        || trimmed.starts_with("import{")
        || trimmed.starts_with("from ")
        || (binding && trimmed.contains("require("))
}

fn is_comment(trimmed: &str) -> bool {
    trimmed.starts_with("//")
        || trimmed.starts_with("/*")
        || trimmed.starts_with('*')
        || trimmed.starts_with("*/")
}

/// Leading dependency declarations of a file.
///
/// Leading blank and comment lines are skipped; collection starts at the
/// first declaration and stops at the first line that is neither a
/// declaration, a continuation of a multi-line `import { ... }`, nor blank.
pub fn import_block(text: &str) -> Option<String> {
    let mut lines: Vec<&str> = Vec::new();
    let mut open_braces: i32 = 0;
    for line in text.lines() {
        let trimmed = line.trim();
        if open_braces > 0 {
            lines.push(line);
            open_braces += brace_delta(trimmed);
            continue;
        }
        if trimmed.is_empty() {
            continue;
        }
        if is_declaration(trimmed) {
            lines.push(line);
            open_braces = brace_delta(trimmed).max(0);
            continue;
        }
        if lines.is_empty() && is_comment(trimmed) {
            continue;
        }
        break;
    }
    if lines.is_empty() {
        return None;
    }
    lines.truncate(IMPORT_BLOCK_MAX_LINES);
    Some(lines.join("\n"))
}

fn brace_delta(s: &str) -> i32 {
    s.chars().fold(0, |acc, c| match c {
        '{' => acc + 1,
        '}' => acc - 1,
        _ => acc,
    })
}

/// Quoted literal names passed as the first argument to `callee(...)`,
/// in source order, at most `limit`.
pub fn call_names(text: &str, callee: &str, limit: usize) -> Vec<String> {
    let pattern = format!(
        r#"\b{}\s*\(\s*(?:'([^'\n]*)'|"([^"\n]*)"|`([^`\n]*)`)"#,
        regex::escape(callee)
    );
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(_) => return Vec::new(),
    };
    re.captures_iter(text)
        .filter_map(|c| c.get(1).or_else(|| c.get(2)).or_else(|| c.get(3)))
        .map(|m| m.as_str().to_string())
        .filter(|s| !s.trim().is_empty())
        .take(limit)
        .collect()
}

/// Grouping-call names, bounded per file.
pub fn group_names(text: &str) -> Vec<String> {
    GROUP_CALLEES
        .iter()
        .flat_map(|c| call_names(text, c, GROUP_NAMES_PER_FILE))
        .take(GROUP_NAMES_PER_FILE)
        .collect()
}

/// Case-defining call names, bounded per callee per file.
pub fn case_names(text: &str) -> Vec<String> {
    CASE_CALLEES
        .iter()
        .flat_map(|c| call_names(text, c, CASE_NAMES_PER_FILE))
        .collect()
}

/// A comment line whose content starts with a phase keyword.
pub fn uses_phase_comments(text: &str) -> bool {
    match phase_comment_re() {
        Some(re) => re.is_match(text),
        None => text.lines().any(|l| {
            l.trim()
                .strip_prefix("//")
                .map(|c| c.trim_start())
                .is_some_and(|c| PHASE_KEYWORDS.iter().any(|k| c.starts_with(k)))
        }),
    }
}

pub fn uses_setup_hooks(text: &str) -> bool {
    SETUP_HOOKS.iter().any(|h| has_call(text, h))
}

pub fn uses_teardown_hooks(text: &str) -> bool {
    TEARDOWN_HOOKS.iter().any(|h| has_call(text, h))
}

/// Structural conventions present in the file.
pub fn structures(text: &str) -> Vec<&'static str> {
    let mut out = Vec::new();
    let describe = has_call(text, "describe");
    if describe && has_call(text, "it") {
        out.push("describe + it");
    }
    if describe && has_call(text, "test") {
        out.push("describe + test");
    }
    let standalone = match standalone_test_re() {
        Some(re) => re.is_match(text),
        None => text.lines().any(|l| l.starts_with("test(")),
    };
    if standalone {
        out.push("standalone test()");
    }
    out
}

/// Labels of every vocabulary entry whose substring occurs in the text.
pub fn vocabulary(text: &str, table: &[(&'static str, &'static str)]) -> Vec<&'static str> {
    table
        .iter()
        .filter(|(needle, _)| text.contains(needle))
        .map(|(_, label)| *label)
        .collect()
}

pub fn utilities(text: &str) -> Vec<&'static str> {
    UTILITY_VOCABULARY
        .iter()
        .copied()
        .filter(|w| contains_word(text, w))
        .collect()
}

pub fn libraries(text: &str) -> Vec<&'static str> {
    LIBRARY_VOCABULARY
        .iter()
        .copied()
        .filter(|lib| text.contains(lib))
        .collect()
}
