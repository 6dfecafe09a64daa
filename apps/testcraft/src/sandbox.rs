//! Sandboxed file access rooted at the project directory.
//!
//! Every path an operation touches goes through [`Sandbox::resolve`]:
//! relative paths are joined onto the root, absolute paths are taken as-is,
//! and the result must stay under the canonical root after symlinks and
//! `..` segments are resolved. Reads are size-checked before any byte is
//! read, so latency is bounded by `max_file_bytes` rather than file size.

use crate::error::{Error, Result};
use crate::utils;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Sandbox {
    root: PathBuf,
    max_file_bytes: u64,
}

impl Sandbox {
    /// Create a sandbox over `root`, which must be an existing directory.
    pub fn new(root: &Path, max_file_bytes: u64) -> Result<Self> {
        let canonical = root.canonicalize().map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::NotFound(root.to_path_buf()),
            _ => Error::Io(e),
        })?;
        if !canonical.is_dir() {
            return Err(Error::NotFound(root.to_path_buf()));
        }
        Ok(Self {
            root: canonical,
            max_file_bytes,
        })
    }

    /// Canonical trusted root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `requested` to an absolute path under the root.
    ///
    /// `..` segments are collapsed lexically first. The deepest existing
    /// ancestor is then canonicalized (following symlinks) and the
    /// non-existent remainder appended, so paths for files that are about
    /// to be created resolve too.
    pub fn resolve(&self, requested: &str) -> Result<PathBuf> {
        let req = Path::new(requested);
        let candidate = if req.is_absolute() {
            normalize(req)
        } else {
            normalize(&self.root.join(req))
        };

        let mut existing = PathBuf::new();
        let mut tail: Vec<Component<'_>> = Vec::new();
        for comp in candidate.components() {
            if tail.is_empty() {
                let next = existing.join(comp);
                if next.symlink_metadata().is_ok() {
                    existing = next;
                    continue;
                }
            }
            tail.push(comp);
        }

        let mut resolved = existing
            .canonicalize()
            .map_err(|_| Error::SandboxViolation(requested.to_string()))?;
        // Only plain names remain after normalize.
        resolved.extend(tail);

        if !resolved.starts_with(&self.root) {
            tracing::debug!(requested, resolved = %resolved.display(), "path rejected by sandbox");
            return Err(Error::SandboxViolation(requested.to_string()));
        }
        Ok(resolved)
    }

    /// Read a UTF-8 text file under the root, enforcing the byte budget.
    pub fn read(&self, requested: &str) -> Result<String> {
        let full = self.resolve(requested)?;
        let meta = fs::metadata(&full).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::NotFound(full.clone()),
            _ => Error::Io(e),
        })?;
        if !meta.is_file() {
            return Err(Error::NotAFile(full));
        }
        if meta.len() > self.max_file_bytes {
            return Err(Error::TooLarge {
                path: full,
                size: meta.len(),
                limit: self.max_file_bytes,
            });
        }
        Ok(fs::read_to_string(&full)?)
    }

    /// Write `content` to a path under the root, creating parent directories.
    pub fn write(&self, requested: &str, content: &str) -> Result<PathBuf> {
        let full = self.resolve(requested)?;
        if full.is_dir() {
            return Err(Error::NotAFile(full));
        }
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&full, content)?;
        Ok(full)
    }

    /// Root-relative display form of an absolute path under the root.
    pub fn relative(&self, path: &Path) -> String {
        utils::rel_to(&self.root, path)
    }
}

/// Lexically drop `.` and apply `..` against the preceding segment.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

const MARKER_PREFIX: &str = "... [";
const MARKER_SUFFIX: &str = " lines omitted] ...";

fn omission_marker(omitted: usize) -> String {
    format!("{}{}{}", MARKER_PREFIX, omitted, MARKER_SUFFIX)
}

fn is_omission_marker(line: &str) -> bool {
    line.strip_prefix(MARKER_PREFIX)
        .and_then(|rest| rest.strip_suffix(MARKER_SUFFIX))
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

/// Keep the first and last halves of a `max_lines` budget, joined by one
/// marker line carrying the exact number of omitted lines.
///
/// A marker sitting where this function would have placed it does not count
/// against the budget, so truncating an already-truncated text at the same
/// budget returns it unchanged. Marker-shaped lines anywhere else are content.
pub fn truncate_lines(text: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() <= max_lines {
        return text.to_string();
    }
    if lines.len() == max_lines + 1 && is_omission_marker(lines[max_lines / 2]) {
        return text.to_string();
    }
    let head = max_lines / 2;
    let tail = max_lines - head;
    let omitted = lines.len() - head - tail;
    let mut out: Vec<String> = Vec::with_capacity(max_lines + 1);
    out.extend(lines[..head].iter().map(|l| l.to_string()));
    out.push(omission_marker(omitted));
    out.extend(lines[lines.len() - tail..].iter().map(|l| l.to_string()));
    out.join("\n")
}
