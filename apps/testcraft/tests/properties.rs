//! Property tests for truncation and snippet extraction.

use proptest::prelude::*;
use testcraft::analysis::snippet::{representative_block, TRUNCATION_MARKER};
use testcraft::sandbox::truncate_lines;

fn numbered(n: usize) -> String {
    (1..=n)
        .map(|i| format!("row {i}"))
        .collect::<Vec<_>>()
        .join("\n")
}

proptest! {
    #[test]
    fn prop_truncation_is_idempotent(n in 0usize..300, max in 1usize..60) {
        let text = numbered(n);
        let once = truncate_lines(&text, max);
        let twice = truncate_lines(&once, max);
        prop_assert_eq!(&once, &twice);
    }

    #[test]
    fn prop_truncation_keeps_head_and_tail(n in 0usize..300, max in 2usize..60) {
        let text = numbered(n);
        let out = truncate_lines(&text, max);
        if n <= max {
            prop_assert_eq!(out, text);
        } else {
            let lines: Vec<&str> = out.lines().collect();
            let head = max / 2;
            let tail = max - head;
            prop_assert_eq!(lines.len(), max + 1);
            let marker = format!("... [{} lines omitted] ...", n - max);
            prop_assert_eq!(lines[head], marker.as_str());
            let first = format!("row {}", 1);
            let last = format!("row {}", n);
            prop_assert_eq!(lines[0], first.as_str());
            prop_assert_eq!(lines[head + tail], last.as_str());
        }
    }

    #[test]
    fn prop_snippet_scanner_is_total(text in "[{}()a-z' \n]{0,400}", max in 1usize..40) {
        let wrapped = format!("describe('x', () => {{\n{}", text);
        if let Some(block) = representative_block(&wrapped, max) {
            let count = block.lines().count();
            prop_assert!(count <= max + 2);
            if count > max {
                prop_assert!(block.contains(TRUNCATION_MARKER));
            }
        }
        let _ = representative_block(&text, max);
    }
}
