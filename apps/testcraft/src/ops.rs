//! Operation surface.
//!
//! Each operation re-reads the project configuration and builds a fresh
//! sandbox, answers with text, and surfaces errors about its own target
//! (the requested path or template kind) as `Err`. Problems with one rule,
//! one sampled file, or the config file degrade the answer instead.

use crate::analysis::{self, snippet, AnalysisResult};
use crate::config::{self, Config, InitOutcome};
use crate::error::{Error, Result};
use crate::models::{Status, ValidationReport};
use crate::output;
use crate::runner::{self, RunRequest};
use crate::sandbox::{truncate_lines, Sandbox};
use crate::scan;
use crate::template;
use crate::validate;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Files longer than this are cut down to one block by `get_example_tests`.
pub const EXAMPLE_FULL_FILE_LINES: usize = 80;

/// Runner config files checked by `get_runner_config`, in order.
pub const RUNNER_CONFIG_FILES: &[&str] = &[
    "jest.config.js",
    "jest.config.ts",
    "jest.config.mjs",
    "jest.config.cjs",
    "jest.config.json",
];

#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Effective configuration and sandbox for one operation.
    fn context(&self) -> Result<(Config, Sandbox)> {
        let cfg = config::load(&self.root).config;
        let sandbox = Sandbox::new(&self.root, cfg.limits.max_file_bytes)?;
        Ok((cfg, sandbox))
    }

    pub fn find_test_files(&self, directory: Option<&str>) -> Result<String> {
        let (_, sb) = self.context()?;
        let files = scan::scan(&sb, directory)?;
        if files.is_empty() {
            return Ok("No test files found.".to_string());
        }
        Ok(format!("Found {} test files:\n{}", files.len(), files.join("\n")))
    }

    pub fn read_file(&self, path: &str) -> Result<String> {
        let (cfg, sb) = self.context()?;
        let text = sb.read(path)?;
        Ok(truncate_lines(&text, cfg.limits.max_read_lines))
    }

    pub fn find_source_for_test(&self, test_path: &str) -> Result<String> {
        let (_, sb) = self.context()?;
        let candidates = scan::find_source_for_test(&sb, test_path)?;
        Ok(match candidates.as_slice() {
            [] => {
                let name = Path::new(test_path)
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                let stem = scan::subject_stem(&name).unwrap_or(&name);
                format!(
                    "Could not find source file for {}. Expected something like {}.tsx",
                    test_path, stem
                )
            }
            [one] => format!("Source file: {}", one),
            many => format!("Multiple candidates found:\n{}", many.join("\n")),
        })
    }

    /// Newest test files first, at most `count`.
    fn newest_tests(&self, sb: &Sandbox, count: usize) -> Result<Vec<String>> {
        let mut files = scan::scan(sb, None)?;
        scan::sort_newest_first(sb, &mut files);
        files.truncate(count);
        Ok(files)
    }

    /// Aggregate conventions over the `sample_count` newest test files.
    /// Files that cannot be read are skipped.
    pub fn analyze(&self, sample_count: usize) -> Result<AnalysisResult> {
        let (_, sb) = self.context()?;
        let sample = self.newest_tests(&sb, sample_count)?;
        let texts: Vec<(String, String)> = sample
            .into_iter()
            .filter_map(|rel| match sb.read(&rel) {
                Ok(text) => Some((rel, text)),
                Err(e) => {
                    tracing::debug!(file = %rel, error = %e, "skipping sample file");
                    None
                }
            })
            .collect();
        Ok(analysis::analyze(
            texts.iter().map(|(p, t)| (p.as_str(), t.as_str())),
        ))
    }

    pub fn analyze_test_patterns(&self, sample_count: usize) -> Result<String> {
        let res = self.analyze(sample_count)?;
        if res.is_empty() {
            return Ok(
                "No test files found to analyze. Use get_test_template() for canonical examples."
                    .to_string(),
            );
        }
        Ok(output::render_analysis(&res))
    }

    /// Validate one file against the effective rules.
    pub fn validate(&self, path: &str) -> Result<ValidationReport> {
        let (cfg, sb) = self.context()?;
        let text = sb.read(path)?;
        Ok(validate::validate(path, &text, &cfg.rules()))
    }

    pub fn validate_test_style(&self, path: &str) -> Result<String> {
        Ok(output::render_report(&self.validate(path)?))
    }

    pub fn get_test_style_guide(&self) -> String {
        output::render_style_guide(&config::load(&self.root).config.style_guide)
    }

    pub fn get_test_template(&self, kind: &str, subject: Option<&str>) -> Result<String> {
        let cfg = config::load(&self.root).config;
        let body = template::instantiate(&cfg.templates, kind, subject)?;
        Ok(format!("{}{}", template::header(kind, subject), body))
    }

    /// Bundle a file's text, its validation issues and the matching template
    /// with instructions for rewriting it to the team standard.
    pub fn rewrite_test_to_standard(&self, path: &str) -> Result<String> {
        let (cfg, sb) = self.context()?;
        let text = sb.read(path)?;
        let report = validate::validate(path, &text, &cfg.rules());
        let kind = template::choose_kind(path, &text);
        let name = Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let subject = scan::subject_stem(&name).map(str::to_string);

        let mut out = String::new();
        let _ = writeln!(out, "# REWRITE TO STANDARD: {}\n", path);
        out.push_str("## Current test\n```typescript\n");
        out.push_str(&truncate_lines(&text, cfg.limits.max_read_lines));
        out.push_str("\n```\n\n## Validation issues\n");
        let mut issues = report.issues().peekable();
        if issues.peek().is_none() {
            out.push_str("- None: the file already passes every rule.\n");
        }
        for o in issues {
            let _ = writeln!(out, "- {}: {} ({})", o.status.label(), o.description, o.id);
        }
        let skipped: Vec<&str> = report
            .outcomes
            .iter()
            .filter(|o| o.status == Status::Skip)
            .map(|o| o.id.as_str())
            .collect();
        if !skipped.is_empty() {
            let _ = writeln!(out, "- Skipped (invalid pattern): {}", skipped.join(", "));
        }

        let _ = writeln!(
            out,
            "\n## Applicable template: {} (subject `{}`)",
            kind,
            subject.as_deref().unwrap_or("?")
        );
        match template::instantiate(&cfg.templates, kind, subject.as_deref()) {
            Ok(body) => {
                out.push_str("```typescript\n");
                out.push_str(&body);
                out.push_str("\n```\n");
            }
            Err(e) => {
                let _ = writeln!(out, "{}", e);
            }
        }

        out.push_str("\n## Instructions\n");
        out.push_str("1. Keep every existing test case and assertion; coverage must not shrink.\n");
        out.push_str("2. Restructure the file to follow the template's grouping and naming.\n");
        out.push_str("3. Resolve each FAIL above; address WARN items where practical.\n");
        out.push_str("4. Keep the file's existing imports and mocks, reordered to the style guide.\n");
        out.push_str("5. Save with write_test_file or update_test_section, then run validate_test_style again.");
        Ok(out)
    }

    /// Create or overwrite a test file. Paths without a test suffix are
    /// rejected before any filesystem access.
    pub fn write_test_file(&self, path: &str, content: &str) -> Result<String> {
        if !scan::is_test_path(path) {
            return Err(Error::NotATestPath(path.to_string()));
        }
        let (_, sb) = self.context()?;
        sb.write(path, content)?;
        Ok(format!("Successfully wrote test file: {}", path))
    }

    /// Replace the first occurrence of `old_text` in a file.
    pub fn update_test_section(&self, path: &str, old_text: &str, new_text: &str) -> Result<String> {
        let (_, sb) = self.context()?;
        let text = sb.read(path)?;
        if old_text.is_empty() || !text.contains(old_text) {
            return Err(Error::OldTextNotFound(path.to_string()));
        }
        sb.write(path, &text.replacen(old_text, new_text, 1))?;
        Ok(format!("Successfully updated: {}", path))
    }

    /// Run the configured test command. A path, when given, must stay inside
    /// the project root.
    pub fn run_tests(&self, mut req: RunRequest) -> Result<String> {
        let (cfg, sb) = self.context()?;
        if let Some(p) = req.path.as_deref().filter(|s| !s.is_empty()) {
            let full = sb.resolve(p)?;
            req.path = Some(sb.relative(&full));
        }
        let outcome = runner::run(sb.root(), &cfg.runner, &req)?;
        Ok(runner::report(&outcome, cfg.runner.max_output_lines))
    }

    pub fn run_single_test(&self, file: &str, name: Option<&str>) -> Result<String> {
        self.run_tests(RunRequest {
            path: Some(file.to_string()),
            name_filter: name.map(str::to_string),
            ..Default::default()
        })
    }

    pub fn list_project_structure(&self, directory: &str, max_depth: usize) -> Result<String> {
        let (_, sb) = self.context()?;
        scan::project_tree(&sb, directory, max_depth)
    }

    pub fn init_style_config(&self) -> Result<String> {
        Ok(match config::init(&self.root)? {
            InitOutcome::Created(path) => format!(
                "Created config file: {}\n\n\
                 Edit `style_guide` for naming and structure, `validation_rules` or \
                 `rule_overrides` for validation, and `custom_rules` for team guidelines.\n\
                 Commit the file so every contributor uses the same conventions.",
                path.display()
            ),
            InitOutcome::AlreadyExists(path) => format!(
                "Config file already exists at: {}\n\nEdit this file to customize your team's test standards.",
                path.display()
            ),
        })
    }

    /// Report the test runner configuration the project declares.
    pub fn get_runner_config(&self) -> Result<String> {
        let (_, sb) = self.context()?;
        for name in RUNNER_CONFIG_FILES {
            if sb.root().join(name).is_file() {
                let text = sb.read(name)?;
                return Ok(format!("Found {}:\n\n{}", name, text));
            }
        }
        if sb.root().join("package.json").is_file() {
            let text = sb.read("package.json")?;
            match serde_json::from_str::<serde_json::Value>(&text) {
                Ok(pkg) => {
                    if let Some(jest) = pkg.get("jest") {
                        let pretty = serde_json::to_string_pretty(jest)
                            .unwrap_or_else(|_| jest.to_string());
                        return Ok(format!("Jest config in package.json:\n\n{}", pretty));
                    }
                }
                Err(e) => tracing::debug!(error = %e, "package.json did not parse"),
            }
        }
        Ok("No Jest configuration file found. Using default Jest config.".to_string())
    }

    /// Real snippets from the `count` newest test files.
    pub fn get_example_tests(&self, count: usize) -> Result<String> {
        let (_, sb) = self.context()?;
        let files = self.newest_tests(&sb, count)?;
        if files.is_empty() {
            return Ok(
                "No existing test files found. Use get_test_template() instead for canonical examples."
                    .to_string(),
            );
        }
        let mut out = String::from("# REAL EXAMPLES FROM YOUR CODEBASE\n\n**Follow these patterns when writing new tests.**\n");
        for rel in files {
            let text = match sb.read(&rel) {
                Ok(t) => t,
                Err(e) => {
                    let _ = write!(out, "\nError reading {}: {}\n", rel, e);
                    continue;
                }
            };
            let body = if text.lines().count() > EXAMPLE_FULL_FILE_LINES {
                snippet::representative_block(&text, snippet::SNIPPET_MAX_LINES)
                    .unwrap_or_else(|| truncate_lines(&text, EXAMPLE_FULL_FILE_LINES))
            } else {
                text
            };
            let _ = writeln!(out, "\n## Example: `{}`\n", rel);
            out.push_str("```typescript\n");
            out.push_str(body.trim_end());
            out.push_str("\n```\n");
        }
        Ok(out.trim_end().to_string())
    }
}
