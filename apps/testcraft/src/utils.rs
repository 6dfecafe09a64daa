//! Supporting helpers: coloured message prefixes and path display.

use owo_colors::OwoColorize;
use std::path::Path;

/// Colours are disabled by `NO_COLOR`.
pub fn colors_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

pub fn error_prefix() -> String {
    if colors_enabled() {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    }
}

pub fn note_prefix() -> String {
    if colors_enabled() {
        "note:".yellow().bold().to_string()
    } else {
        "note:".to_string()
    }
}

pub fn info_prefix() -> String {
    if colors_enabled() {
        "info:".blue().bold().to_string()
    } else {
        "info:".to_string()
    }
}

/// Display `target` relative to `base` with `/` separators; falls back to
/// the full path when no relative form exists.
pub fn rel_to(base: &Path, target: &Path) -> String {
    let rel = pathdiff::diff_paths(target, base).unwrap_or_else(|| target.to_path_buf());
    let s = rel.to_string_lossy().replace('\\', "/");
    if s.is_empty() {
        ".".to_string()
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rel_to_forms() {
        let base = Path::new("/work/app");
        assert_eq!(rel_to(base, Path::new("/work/app/src/a.test.ts")), "src/a.test.ts");
        assert_eq!(rel_to(base, Path::new("/work/app")), ".");
    }
}
