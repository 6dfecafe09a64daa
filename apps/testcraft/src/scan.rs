//! Test corpus discovery and project layout helpers.
//!
//! Test files are recognised purely by suffix (`*.test.*` / `*.spec.*`
//! across the ts, tsx, js and jsx families). Vendored dependencies,
//! version-control metadata and runtime caches are never reported.

use crate::error::{Error, Result};
use crate::sandbox::Sandbox;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Suffix markers that identify a test file.
pub const TEST_MARKERS: &[&str] = &["test", "spec"];

/// Source extension families covered by the scanner.
pub const SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx"];

/// Directory names skipped by the scanner and the tree listing.
pub const EXCLUDED_DIRS: &[&str] = &["node_modules", ".git", "__pycache__", ".venv"];

/// True when the file name carries a `.test.` or `.spec.` marker.
pub fn is_test_path(path: &str) -> bool {
    let name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    TEST_MARKERS
        .iter()
        .any(|m| name.contains(&format!(".{}.", m)))
}

fn is_excluded_name(name: &str) -> bool {
    EXCLUDED_DIRS.contains(&name)
}

/// True when the file name ends in `.<marker>.<ext>` for a covered family.
fn has_test_suffix(name: &str) -> bool {
    subject_stem(name).is_some()
}

/// List test files under the root (or one of its subdirectories) as sorted,
/// de-duplicated root-relative paths. An empty list is a valid outcome.
///
/// One traversal; excluded directories are pruned before descent and
/// symlinks are never followed, so nothing outside the root is listed.
pub fn scan(sandbox: &Sandbox, subdirectory: Option<&str>) -> Result<Vec<String>> {
    let base = match subdirectory.filter(|s| !s.trim().is_empty()) {
        Some(dir) => sandbox.resolve(dir)?,
        None => sandbox.root().to_path_buf(),
    };
    if !base.is_dir() {
        return Err(Error::NotFound(base));
    }

    let mut builder = ignore::WalkBuilder::new(&base);
    builder
        .standard_filters(false)
        .follow_links(false)
        .filter_entry(|entry| {
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            !(is_dir && entry.depth() > 0 && is_excluded_name(&entry.file_name().to_string_lossy()))
        });

    let mut found: BTreeSet<String> = BTreeSet::new();
    for entry in builder.build() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::debug!(error = %e, "skipping unreadable scan entry");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        if has_test_suffix(&entry.file_name().to_string_lossy()) {
            found.insert(sandbox.relative(entry.path()));
        }
    }
    tracing::debug!(count = found.len(), base = %base.display(), "scanned test corpus");
    Ok(found.into_iter().collect())
}

/// Order root-relative paths newest first by modification time; ties and
/// unreadable timestamps fall back to path order.
pub fn sort_newest_first(sandbox: &Sandbox, paths: &mut [String]) {
    let mtime = |rel: &str| -> SystemTime {
        fs::metadata(sandbox.root().join(rel))
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH)
    };
    paths.sort_by(|a, b| mtime(b).cmp(&mtime(a)).then_with(|| a.cmp(b)));
}

/// Strip the test marker and extension: `Button.test.tsx` -> `Button`.
pub fn subject_stem(file_name: &str) -> Option<&str> {
    for marker in TEST_MARKERS {
        for ext in SOURCE_EXTENSIONS {
            if let Some(stem) = file_name.strip_suffix(&format!(".{}.{}", marker, ext)) {
                if !stem.is_empty() {
                    return Some(stem);
                }
            }
        }
    }
    None
}

/// Candidate source files for a test: same directory first, then the parent
/// directory (for `__tests__` layouts), across every extension family.
pub fn find_source_for_test(sandbox: &Sandbox, test_path: &str) -> Result<Vec<String>> {
    let full = sandbox.resolve(test_path)?;
    let name = full
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let stem = match subject_stem(&name) {
        Some(s) => s.to_string(),
        None => return Ok(Vec::new()),
    };

    let mut dirs: Vec<PathBuf> = Vec::new();
    if let Some(dir) = full.parent() {
        dirs.push(dir.to_path_buf());
        if let Some(up) = dir.parent() {
            if up.starts_with(sandbox.root()) {
                dirs.push(up.to_path_buf());
            }
        }
    }

    let mut out: Vec<String> = Vec::new();
    for ext in ["tsx", "ts", "jsx", "js"] {
        for dir in &dirs {
            let cand = dir.join(format!("{}.{}", stem, ext));
            if cand.is_file() {
                let rel = sandbox.relative(&cand);
                if !out.contains(&rel) {
                    out.push(rel);
                }
            }
        }
    }
    Ok(out)
}

/// Render an indented tree of `directory` down to `max_depth` levels,
/// directories first, skipping excluded directories. Symlinked directories
/// are listed but not descended into.
pub fn project_tree(sandbox: &Sandbox, directory: &str, max_depth: usize) -> Result<String> {
    let start = sandbox.resolve(directory)?;
    if !start.is_dir() {
        return Err(Error::NotFound(start));
    }
    let mut lines = vec![format!("{}/", directory.trim_end_matches('/'))];
    build_tree(&start, "", 0, max_depth, &mut lines);
    Ok(lines.join("\n"))
}

fn build_tree(dir: &Path, prefix: &str, depth: usize, max_depth: usize, lines: &mut Vec<String>) {
    if depth >= max_depth {
        return;
    }
    let mut items: Vec<(bool, String, PathBuf)> = match fs::read_dir(dir) {
        Ok(rd) => rd
            .flatten()
            .filter_map(|e| {
                let name = e.file_name().to_string_lossy().to_string();
                if is_excluded_name(&name) {
                    return None;
                }
                let is_dir = e.file_type().map(|t| t.is_dir()).unwrap_or(false);
                Some((is_dir, name, e.path()))
            })
            .collect(),
        Err(_) => return,
    };
    items.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

    let count = items.len();
    for (i, (is_dir, name, path)) in items.into_iter().enumerate() {
        let last = i + 1 == count;
        lines.push(format!("{}{}{}", prefix, if last { "└── " } else { "├── " }, name));
        if is_dir {
            let next = format!("{}{}", prefix, if last { "    " } else { "│   " });
            build_tree(&path, &next, depth + 1, max_depth, lines);
        }
    }
}
