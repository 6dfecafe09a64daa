//! Declarative validation rule schema.
//!
//! Rules are plain data: an id, a human description, a regular expression,
//! a polarity (must the pattern be present or absent) and a severity
//! (whether an absent must-match pattern fails the file or only warns).
//!
//! ```toml
//! [[validation_rules]]
//! id = "no_only"
//! description = "No .only() in tests"
//! pattern = '\.(only|skip)\s*\('
//! polarity = "must-not-match"
//! ```

use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub pattern: String,
    #[serde(default)]
    pub polarity: Polarity,
    #[serde(default)]
    pub severity: Severity,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Polarity {
    #[default]
    MustMatch,
    MustNotMatch,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
/// `advisory` only softens absence-type failures; presence of a
/// must-not-match pattern always fails.
pub enum Severity {
    #[default]
    Blocking,
    Advisory,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
/// Partial rule used by `[rule_overrides.<id>]`; unset fields keep the
/// declared rule's value.
pub struct RuleOverride {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub polarity: Option<Polarity>,
    #[serde(default)]
    pub severity: Option<Severity>,
}

impl Rule {
    pub fn with_override(mut self, ov: &RuleOverride) -> Rule {
        if let Some(d) = ov.description.as_ref() {
            self.description = d.clone();
        }
        if let Some(p) = ov.pattern.as_ref() {
            self.pattern = p.clone();
        }
        if let Some(p) = ov.polarity {
            self.polarity = p;
        }
        if let Some(s) = ov.severity {
            self.severity = s;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_defaults_to_blocking_must_match() {
        let r: Rule = toml::from_str(
            r#"
id = "has_describe"
pattern = 'describe\s*\('
"#,
        )
        .unwrap();
        assert_eq!(r.polarity, Polarity::MustMatch);
        assert_eq!(r.severity, Severity::Blocking);
        assert_eq!(r.description, "");
    }

    #[test]
    fn test_override_only_touches_set_fields() {
        let r = Rule {
            id: "it_uses_should".into(),
            description: "it() should start with 'should'".into(),
            pattern: r#"it\s*\(\s*['"]should"#.into(),
            polarity: Polarity::MustMatch,
            severity: Severity::Blocking,
        };
        let ov = RuleOverride {
            severity: Some(Severity::Advisory),
            ..Default::default()
        };
        let out = r.clone().with_override(&ov);
        assert_eq!(out.severity, Severity::Advisory);
        assert_eq!(out.pattern, r.pattern);
        assert_eq!(out.description, r.description);
    }
}
