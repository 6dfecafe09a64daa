//! Configuration discovery and merging.
//!
//! testcraft reads `.testcraft.toml` (or `.testcraft.yaml|yml`) from the
//! project root and merges it over the built-in defaults embedded from
//! `assets/defaults.toml`. For each top-level key:
//! - table on both sides: merged key by key, the project's value wins;
//! - anything else: the project's value replaces the default wholesale.
//!
//! Defaults are parsed from the embedded text on every load, so a merge
//! always works on a fresh value. A project file that cannot be read or
//! decoded is logged and ignored; the caller then gets the defaults.
//!
//! Root precedence: `--root` > `PROJECT_ROOT` > nearest ancestor with a
//! config file or `.git` > current directory.

use crate::error::{Error, Result};
use crate::models::rule::{Rule, RuleOverride};
use crate::models::style::{Limits, RunnerConfig, StyleConfig, TemplateSet};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Recognised project config files, in lookup order.
pub const CONFIG_FILES: &[&str] = &[".testcraft.toml", ".testcraft.yaml", ".testcraft.yml"];

/// Environment variable naming the project root.
pub const ROOT_ENV: &str = "PROJECT_ROOT";

const DEFAULTS: &str = include_str!("../assets/defaults.toml");

/// Starter file written by `init`.
pub const STARTER: &str = include_str!("../assets/starter.toml");

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
/// Effective configuration for one operation.
pub struct Config {
    pub style_guide: StyleConfig,
    pub templates: TemplateSet,
    pub validation_rules: Vec<Rule>,
    /// `[rule_overrides.<id>]`: partial edits applied to declared rules.
    pub rule_overrides: BTreeMap<String, RuleOverride>,
    pub runner: RunnerConfig,
    pub limits: Limits,
}

impl Config {
    /// Built-in configuration with no project file applied.
    pub fn defaults() -> Config {
        decode(defaults_value()).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "embedded defaults did not decode");
            Config::default()
        })
    }

    /// Declared rules in order with `rule_overrides` applied. Overrides
    /// naming an unknown id are ignored.
    pub fn rules(&self) -> Vec<Rule> {
        self.validation_rules
            .iter()
            .map(|r| match self.rule_overrides.get(&r.id) {
                Some(ov) => r.clone().with_override(ov),
                None => r.clone(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Where the effective configuration came from.
pub enum Source {
    Defaults,
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct Loaded {
    pub config: Config,
    pub source: Source,
}

/// Fresh copy of the embedded defaults as a JSON value.
pub fn defaults_value() -> Value {
    match toml::from_str::<Value>(DEFAULTS) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "embedded defaults did not parse");
            Value::Object(Map::new())
        }
    }
}

/// One-level merge of `overrides` over `defaults`. Neither input is touched.
pub fn merge(defaults: &Value, overrides: &Value) -> Value {
    let mut out = match defaults {
        Value::Object(m) => m.clone(),
        _ => Map::new(),
    };
    if let Value::Object(ov) = overrides {
        for (key, value) in ov {
            let merged = match (out.get(key), value) {
                (Some(Value::Object(base)), Value::Object(top)) => {
                    let mut joined = base.clone();
                    for (k, v) in top {
                        joined.insert(k.clone(), v.clone());
                    }
                    Value::Object(joined)
                }
                _ => value.clone(),
            };
            out.insert(key.clone(), merged);
        }
    }
    Value::Object(out)
}

fn decode(value: Value) -> std::result::Result<Config, serde_json::Error> {
    serde_json::from_value(value)
}

/// First existing config file under `root`.
pub fn find_config_file(root: &Path) -> Option<PathBuf> {
    CONFIG_FILES
        .iter()
        .map(|name| root.join(name))
        .find(|p| p.is_file())
}

fn read_overrides(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path)?;
    let is_yaml = path
        .extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false);
    let parsed: std::result::Result<Value, String> = if is_yaml {
        serde_yaml::from_str(&text).map_err(|e| e.to_string())
    } else {
        toml::from_str(&text).map_err(|e| e.to_string())
    };
    let value = parsed.map_err(|message| Error::ConfigDecode {
        path: path.to_path_buf(),
        message,
    })?;
    if !value.is_object() {
        return Err(Error::ConfigDecode {
            path: path.to_path_buf(),
            message: "top level must be a table".into(),
        });
    }
    Ok(value)
}

fn load_file(path: &Path) -> Result<Config> {
    let overrides = read_overrides(path)?;
    decode(merge(&defaults_value(), &overrides)).map_err(|e| Error::ConfigDecode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load the effective configuration for `root`. Never fails: problems with
/// the project file are logged and the defaults are returned.
pub fn load(root: &Path) -> Loaded {
    let path = match find_config_file(root) {
        Some(p) => p,
        None => {
            return Loaded {
                config: Config::defaults(),
                source: Source::Defaults,
            }
        }
    };
    match load_file(&path) {
        Ok(config) => {
            tracing::debug!(path = %path.display(), "loaded project config");
            Loaded {
                config,
                source: Source::File(path),
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "ignoring project config");
            Loaded {
                config: Config::defaults(),
                source: Source::Defaults,
            }
        }
    }
}

/// Walk upward from `start` to the nearest directory holding a config file
/// or `.git`; `start` itself when none is found.
pub fn detect_project_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if find_config_file(cur).is_some() || cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Resolve the project root from the CLI flag, the environment, or the
/// current directory.
pub fn resolve_root(cli_root: Option<&str>) -> PathBuf {
    if let Some(r) = cli_root.filter(|s| !s.is_empty()) {
        return PathBuf::from(r);
    }
    if let Ok(r) = std::env::var(ROOT_ENV) {
        if !r.is_empty() {
            return PathBuf::from(r);
        }
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    detect_project_root(&cwd)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    Created(PathBuf),
    AlreadyExists(PathBuf),
}

/// Write the starter config unless a config file already exists.
pub fn init(root: &Path) -> Result<InitOutcome> {
    if let Some(existing) = find_config_file(root) {
        return Ok(InitOutcome::AlreadyExists(existing));
    }
    let path = root.join(CONFIG_FILES[0]);
    fs::write(&path, STARTER)?;
    Ok(InitOutcome::Created(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::rule::{Polarity, Severity};
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_embedded_defaults_decode() {
        let cfg = Config::defaults();
        let ids: Vec<&str> = cfg.validation_rules.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "has_describe",
                "has_it_or_test",
                "it_uses_should",
                "has_assertions",
                "has_aaa_comments",
                "no_only",
                "has_edge_cases"
            ]
        );
        assert!(cfg
            .validation_rules
            .iter()
            .all(|r| r.severity == Severity::Blocking));
        assert_eq!(cfg.validation_rules[5].polarity, Polarity::MustNotMatch);
        assert_eq!(
            cfg.templates.kinds(),
            vec!["api_service", "hook", "react_component", "utility_function"]
        );
        assert!(cfg.style_guide.comments);
        assert_eq!(cfg.runner.timeout_secs, 120);
    }

    #[test]
    fn test_merge_is_one_level_and_pure() {
        let base = json!({"a": {"x": 1, "y": 2}, "list": [1, 2], "s": "keep"});
        let top = json!({"a": {"y": 3, "z": 4}, "list": [9]});
        let out = merge(&base, &top);
        assert_eq!(
            out,
            json!({"a": {"x": 1, "y": 3, "z": 4}, "list": [9], "s": "keep"})
        );
        // inputs are unchanged
        assert_eq!(base, json!({"a": {"x": 1, "y": 2}, "list": [1, 2], "s": "keep"}));
        // a non-table override replaces a table
        assert_eq!(merge(&base, &json!({"a": 5}))["a"], json!(5));
    }

    #[test]
    fn test_loads_do_not_share_state() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(
            root.join(".testcraft.toml"),
            "[style_guide]\nit_naming = \"first\"\n",
        )
        .unwrap();
        let first = load(root).config;
        fs::write(
            root.join(".testcraft.toml"),
            "[style_guide]\nit_naming = \"second\"\n",
        )
        .unwrap();
        let second = load(root).config;
        assert_eq!(first.style_guide.it_naming, "first");
        assert_eq!(second.style_guide.it_naming, "second");
        // untouched keys of the same table come from the defaults
        assert_eq!(first.style_guide.test_structure, "describe + it");
        assert_eq!(Config::defaults().style_guide.it_naming, "should + verb");
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".testcraft.toml"), "[[[ not toml").unwrap();
        let loaded = load(dir.path());
        assert_eq!(loaded.source, Source::Defaults);
        assert_eq!(loaded.config, Config::defaults());

        // well-formed but wrongly typed
        fs::write(dir.path().join(".testcraft.toml"), "validation_rules = 3\n").unwrap();
        assert_eq!(load(dir.path()).config, Config::defaults());
    }

    #[test]
    fn test_yaml_file_and_rule_overrides() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(
            root.join(".testcraft.yaml"),
            "rule_overrides:\n  it_uses_should:\n    severity: advisory\n  missing_rule:\n    pattern: x\nrunner:\n  timeout_secs: 5\n",
        )
        .unwrap();
        let loaded = load(root);
        assert_eq!(loaded.source, Source::File(root.join(".testcraft.yaml")));
        let cfg = loaded.config;
        assert_eq!(cfg.runner.timeout_secs, 5);
        assert_eq!(cfg.runner.command, vec!["npm", "test", "--"]);
        let rules = cfg.rules();
        assert_eq!(rules.len(), 7);
        let should = rules.iter().find(|r| r.id == "it_uses_should").unwrap();
        assert_eq!(should.severity, Severity::Advisory);
        // declared rules themselves are untouched
        assert_eq!(cfg.validation_rules[2].severity, Severity::Blocking);
    }

    #[test]
    fn test_init_writes_starter_once() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let created = init(root).unwrap();
        assert_eq!(created, InitOutcome::Created(root.join(".testcraft.toml")));
        assert_eq!(
            init(root).unwrap(),
            InitOutcome::AlreadyExists(root.join(".testcraft.toml"))
        );

        let cfg = load(root).config;
        let rules = cfg.rules();
        assert_eq!(rules.len(), 6);
        assert!(rules.iter().all(|r| r.id != "has_edge_cases"));
        let aaa = rules.iter().find(|r| r.id == "has_aaa_comments").unwrap();
        assert_eq!(aaa.severity, Severity::Advisory);
        assert_eq!(cfg.style_guide.custom_rules.len(), 2);
        // starter leaves templates to the defaults
        assert_eq!(cfg.templates.kinds().len(), 4);
    }

    #[test]
    fn test_detect_project_root() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("pkg/src")).unwrap();
        fs::write(root.join("pkg/.testcraft.toml"), "").unwrap();
        assert_eq!(detect_project_root(&root.join("pkg/src")), root.join("pkg"));
        assert_eq!(resolve_root(Some("/x/y")), PathBuf::from("/x/y"));
    }
}
