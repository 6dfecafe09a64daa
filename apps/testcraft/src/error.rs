//! Error taxonomy shared by every operation.
//!
//! Errors about the target of an operation (the requested path, the
//! requested template kind) are surfaced to the caller. Errors local to one
//! rule, one sampled file, or one configuration read are absorbed by the
//! module that produces them and never escape as a failure.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // Filesystem targets
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Not a file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("File too large: {} is {size} bytes (limit {limit})", .path.display())]
    TooLarge {
        path: PathBuf,
        size: u64,
        limit: u64,
    },

    #[error("ACCESS DENIED: {0} resolves outside the project root")]
    SandboxViolation(String),

    // Writes
    #[error("Can only write test files (.test.* or .spec.*): {0}")]
    NotATestPath(String),

    #[error("Could not find the content to replace in {0}. Make sure it matches exactly.")]
    OldTextNotFound(String),

    // Templates
    #[error("Unknown template type '{kind}'. Available types: {}", .known.join(", "))]
    UnknownKind { kind: String, known: Vec<String> },

    // Absorbed inside `validate`; reported as a SKIP outcome
    #[error("Invalid pattern for rule '{id}': {message}")]
    PatternCompile { id: String, message: String },

    // Absorbed inside `config`; defaults apply
    #[error("Could not decode override file {}: {message}", .path.display())]
    ConfigDecode { path: PathBuf, message: String },

    // External runner
    #[error("Tests timed out after {secs} seconds")]
    Timeout { secs: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Stable machine-readable code, used by the JSON printers.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::NotAFile(_) => "NOT_A_FILE",
            Self::TooLarge { .. } => "TOO_LARGE",
            Self::SandboxViolation(_) => "SANDBOX_VIOLATION",
            Self::NotATestPath(_) => "NOT_A_TEST_PATH",
            Self::OldTextNotFound(_) => "OLD_TEXT_NOT_FOUND",
            Self::UnknownKind { .. } => "UNKNOWN_KIND",
            Self::PatternCompile { .. } => "PATTERN_COMPILE",
            Self::ConfigDecode { .. } => "CONFIG_DECODE",
            Self::Timeout { .. } => "TIMEOUT",
            Self::Io(_) => "IO",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_kind_lists_known_kinds() {
        let err = Error::UnknownKind {
            kind: "widget".into(),
            known: vec!["hook".into(), "api_service".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("'widget'"));
        assert!(msg.contains("hook, api_service"));
        assert_eq!(err.code(), "UNKNOWN_KIND");
    }

    #[test]
    fn test_io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err: Error = io.into();
        assert_eq!(err.code(), "IO");
    }
}
