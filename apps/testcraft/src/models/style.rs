//! Convention records loaded from the merged configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
/// Team conventions rendered by `get_test_style_guide`.
pub struct StyleConfig {
    pub test_structure: String,
    pub it_naming: String,
    pub describe_naming: String,
    pub arrangement: String,
    /// Whether phase comments (`// Arrange`, `// Act`, `// Assert`) are expected.
    pub comments: bool,
    pub imports_order: Vec<String>,
    pub mock_location: String,
    pub assertions_per_test: String,
    pub edge_cases_required: Vec<String>,
    pub custom_rules: Vec<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
/// External test command settings.
pub struct RunnerConfig {
    /// Argument vector prefix; test path and flags are appended.
    pub command: Vec<String>,
    pub timeout_secs: u64,
    pub max_output_lines: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            command: vec!["npm".into(), "test".into(), "--".into()],
            timeout_secs: 120,
            max_output_lines: 400,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
/// Read budgets enforced by the sandbox.
pub struct Limits {
    pub max_file_bytes: u64,
    pub max_read_lines: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_file_bytes: 1_048_576,
            max_read_lines: 2000,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
/// Template kind name -> canonical template text.
pub struct TemplateSet {
    templates: BTreeMap<String, String>,
}

impl TemplateSet {
    pub fn get(&self, kind: &str) -> Option<&str> {
        self.templates.get(kind).map(String::as_str)
    }

    /// Registered kinds, sorted.
    pub fn kinds(&self) -> Vec<String> {
        self.templates.keys().cloned().collect()
    }
}

impl FromIterator<(String, String)> for TemplateSet {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            templates: iter.into_iter().collect(),
        }
    }
}
