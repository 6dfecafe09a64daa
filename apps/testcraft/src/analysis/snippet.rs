//! Representative block extraction by brace balance.
//!
//! A three-state scanner (seeking, accumulating, done) walks the text line
//! by line. It starts at the first grouping call, keeps a running count of
//! `{` minus `}`, and emits the accumulated lines once the count returns to
//! zero after having gone positive. Braces inside strings and comments are
//! counted like any other, so the block boundary is approximate; the line
//! ceilings guarantee termination and a bounded result either way.

use super::detectors::is_group_call_line;

/// Accumulated lines before the block is cut off.
pub const SNIPPET_MAX_LINES: usize = 50;
/// Lines inspected in total, including those skipped while seeking.
pub const SCAN_CEILING: usize = 20_000;
pub const TRUNCATION_MARKER: &str = "  // ... truncated ...";
pub const SYNTHETIC_CLOSE: &str = "});";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Seeking,
    Accumulating { depth: i64, opened: bool },
    Done,
}

/// The first grouping block in `text`, or `None` when no grouping call is
/// found or the block never opens a brace.
pub fn representative_block(text: &str, max_lines: usize) -> Option<String> {
    let max_lines = max_lines.max(1);
    let mut state = State::Seeking;
    let mut block: Vec<&str> = Vec::new();
    let mut truncated = false;

    for line in text.lines().take(SCAN_CEILING) {
        state = match state {
            State::Seeking if is_group_call_line(line) => {
                State::Accumulating {
                    depth: 0,
                    opened: false,
                }
            }
            other => other,
        };
        if let State::Accumulating { mut depth, mut opened } = state {
            block.push(line);
            for c in line.chars() {
                match c {
                    '{' => depth += 1,
                    '}' => depth -= 1,
                    _ => {}
                }
                if depth > 0 {
                    opened = true;
                }
            }
            state = if opened && depth <= 0 {
                State::Done
            } else if block.len() >= max_lines {
                truncated = true;
                State::Done
            } else {
                State::Accumulating { depth, opened }
            };
        }
        if state == State::Done {
            break;
        }
    }

    let opened = match state {
        State::Seeking => return None,
        State::Accumulating { opened, .. } => opened,
        State::Done => true,
    };
    if !opened && !truncated {
        return None;
    }
    let mut out: Vec<String> = block.iter().map(|l| l.to_string()).collect();
    if truncated {
        out.push(TRUNCATION_MARKER.to_string());
        out.push(SYNTHETIC_CLOSE.to_string());
    }
    Some(out.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_first_balanced_block() {
        let text = "import x from 'x';\n\ndescribe('a', () => {\n  it('b', () => {\n    expect(1).toBe(1);\n  });\n});\n\ndescribe('c', () => {});\n";
        let block = representative_block(text, SNIPPET_MAX_LINES).unwrap();
        assert!(block.starts_with("describe('a'"));
        assert!(block.ends_with("});"));
        assert!(!block.contains("describe('c'"));
        assert_eq!(block.lines().count(), 5);
    }

    #[test]
    fn test_single_line_block() {
        let block = representative_block("describe('a', () => {});", 10).unwrap();
        assert_eq!(block, "describe('a', () => {});");
    }

    #[test]
    fn test_ceiling_appends_marker_and_close() {
        let mut text = String::from("describe('big', () => {\n");
        for i in 0..100 {
            text.push_str(&format!("  it('case {}', () => {{}});\n", i));
        }
        text.push_str("});\n");
        let block = representative_block(&text, 10).unwrap();
        let lines: Vec<&str> = block.lines().collect();
        assert_eq!(lines.len(), 12);
        assert_eq!(lines[10], TRUNCATION_MARKER);
        assert_eq!(lines[11], SYNTHETIC_CLOSE);
    }

    #[test]
    fn test_tolerates_unbalanced_and_missing_blocks() {
        assert_eq!(representative_block("const a = 1;", 10), None);
        assert_eq!(representative_block("describe('x', fn);", 10), None);
        // Closing brace inside a string ends the block early, without panicking.
        let odd = "describe('x', () => {\n  const s = '}}}';\n  it('y', () => {});\n});";
        let block = representative_block(odd, 10).unwrap();
        assert_eq!(block.lines().count(), 2);
        // Never closes: returns what was accumulated.
        let open = "describe('x', () => {\n  it('y', () => {\n";
        assert_eq!(representative_block(open, 10).unwrap().lines().count(), 2);
    }
}
