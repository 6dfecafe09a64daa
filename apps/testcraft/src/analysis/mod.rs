//! Convention analysis over a sample of test files.
//!
//! Each file is reduced to [`FileFacts`] by the independent detectors in
//! [`detectors`]; facts are then folded into one [`AnalysisResult`]:
//! - booleans are OR-ed across the sample,
//! - vocabularies and structures are set unions,
//! - names are de-duplicated in first-seen order and capped,
//! - the import block and the representative snippet are first-wins.

pub mod detectors;
pub mod snippet;

use serde::Serialize;
use std::collections::BTreeSet;

/// Group names kept in a result.
pub const MAX_GROUP_NAMES: usize = 5;
/// Case names kept in a result.
pub const MAX_CASE_NAMES: usize = 8;

/// Facts derived from a single file.
#[derive(Debug, Clone, Default)]
pub struct FileFacts {
    pub import_block: Option<String>,
    pub group_names: Vec<String>,
    pub case_names: Vec<String>,
    pub structures: Vec<&'static str>,
    pub phase_comments: bool,
    pub setup_hooks: bool,
    pub teardown_hooks: bool,
    pub mocking: Vec<&'static str>,
    pub assertions: Vec<&'static str>,
    pub utilities: Vec<&'static str>,
    pub libraries: Vec<&'static str>,
    pub snippet: Option<String>,
}

impl FileFacts {
    pub fn detect(text: &str) -> Self {
        Self {
            import_block: detectors::import_block(text),
            group_names: detectors::group_names(text),
            case_names: detectors::case_names(text),
            structures: detectors::structures(text),
            phase_comments: detectors::uses_phase_comments(text),
            setup_hooks: detectors::uses_setup_hooks(text),
            teardown_hooks: detectors::uses_teardown_hooks(text),
            mocking: detectors::vocabulary(text, detectors::MOCKING_VOCABULARY),
            assertions: detectors::vocabulary(text, detectors::ASSERTION_VOCABULARY),
            utilities: detectors::utilities(text),
            libraries: detectors::libraries(text),
            snippet: snippet::representative_block(text, snippet::SNIPPET_MAX_LINES),
        }
    }
}

/// Aggregated conventions of the sampled files. Recomputed per call.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisResult {
    pub files_analyzed: Vec<String>,
    pub structures: BTreeSet<String>,
    pub uses_phase_comments: bool,
    pub uses_setup_hooks: bool,
    pub uses_teardown_hooks: bool,
    pub group_names: Vec<String>,
    pub case_names: Vec<String>,
    pub libraries: BTreeSet<String>,
    pub utilities: BTreeSet<String>,
    pub mocking: BTreeSet<String>,
    pub assertions: BTreeSet<String>,
    pub example_imports: Option<String>,
    pub example_block: Option<String>,
}

impl AnalysisResult {
    /// True when no file contributed to the result.
    pub fn is_empty(&self) -> bool {
        self.files_analyzed.is_empty()
    }

    /// Setup or teardown hooks were seen in any file.
    pub fn uses_hooks(&self) -> bool {
        self.uses_setup_hooks || self.uses_teardown_hooks
    }

    /// Fold one file's facts into the aggregate.
    pub fn absorb(&mut self, path: &str, facts: FileFacts) {
        self.files_analyzed.push(path.to_string());
        self.structures
            .extend(facts.structures.iter().map(|s| s.to_string()));
        self.uses_phase_comments |= facts.phase_comments;
        self.uses_setup_hooks |= facts.setup_hooks;
        self.uses_teardown_hooks |= facts.teardown_hooks;
        push_unique(&mut self.group_names, facts.group_names, MAX_GROUP_NAMES);
        push_unique(&mut self.case_names, facts.case_names, MAX_CASE_NAMES);
        self.libraries
            .extend(facts.libraries.iter().map(|s| s.to_string()));
        self.utilities
            .extend(facts.utilities.iter().map(|s| s.to_string()));
        self.mocking.extend(facts.mocking.iter().map(|s| s.to_string()));
        self.assertions
            .extend(facts.assertions.iter().map(|s| s.to_string()));
        if self.example_imports.is_none() {
            self.example_imports = facts.import_block;
        }
        if self.example_block.is_none() {
            self.example_block = facts.snippet;
        }
    }
}

fn push_unique(dst: &mut Vec<String>, src: Vec<String>, cap: usize) {
    for name in src {
        if dst.len() >= cap {
            break;
        }
        if !dst.contains(&name) {
            dst.push(name);
        }
    }
}

/// Analyze `(path, text)` samples. An empty sample yields an empty result.
pub fn analyze<'a, I>(samples: I) -> AnalysisResult
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut result = AnalysisResult::default();
    for (path, text) in samples {
        result.absorb(path, FileFacts::detect(text));
    }
    tracing::debug!(files = result.files_analyzed.len(), "analysis complete");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHASED: &str = r#"import { sum } from './sum';

describe('sum', () => {
  it('should add numbers', () => {
    // Arrange
    const a = 1;
    // Act
    const r = sum(a, 2);
    // Assert
    expect(r).toBe(3);
  });
});
"#;

    const HOOKED: &str = r#"import { Store } from './store';

describe('Store', () => {
  let store;
  beforeEach(() => { store = new Store(); });
  afterEach(() => { store.close(); });

  it('should start empty', () => {
    expect(store.size).toEqual(0);
  });
});
"#;

    #[test]
    fn test_empty_sample() {
        let res = analyze(Vec::<(&str, &str)>::new());
        assert!(res.is_empty());
        assert!(!res.uses_hooks());
        assert_eq!(res.example_block, None);
    }

    #[test]
    fn test_aggregates_markers_and_names() {
        let res = analyze(vec![("a.test.ts", PHASED), ("b.test.ts", HOOKED)]);
        assert_eq!(res.files_analyzed, vec!["a.test.ts", "b.test.ts"]);
        assert!(res.uses_phase_comments);
        assert!(res.uses_setup_hooks && res.uses_teardown_hooks);
        assert_eq!(res.group_names, vec!["sum", "Store"]);
        assert_eq!(res.case_names, vec!["should add numbers", "should start empty"]);
        assert!(res.structures.contains("describe + it"));
        assert!(res.assertions.contains("toBe()"));
        assert!(res.assertions.contains("toEqual()"));
    }

    #[test]
    fn test_first_wins_for_examples() {
        let res = analyze(vec![("a.test.ts", PHASED), ("b.test.ts", HOOKED)]);
        assert_eq!(
            res.example_imports.as_deref(),
            Some("import { sum } from './sum';")
        );
        assert!(res.example_block.unwrap().starts_with("describe('sum'"));
    }

    #[test]
    fn test_names_are_deduplicated_and_capped() {
        let text: String = (0..4)
            .map(|i| format!("describe('g{}', () => {{ it('same', () => {{}}); }});\n", i))
            .collect();
        let res = analyze(vec![("a.test.ts", text.as_str()), ("b.test.ts", text.as_str())]);
        // three group names per file, de-duplicated across files
        assert_eq!(res.group_names, vec!["g0", "g1", "g2"]);
        assert_eq!(res.case_names, vec!["same"]);
    }
}
