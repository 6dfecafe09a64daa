//! External test command invocation.
//!
//! The configured command runs in the project root with stdin closed and
//! stdout/stderr captured to anonymous temp files, so a chatty child (or a
//! grandchild that inherits the handles) can never block on a full pipe.
//! The child is polled until it exits or the wall-clock budget runs out; on
//! timeout it is killed and [`Error::Timeout`] is returned.

use crate::error::{Error, Result};
use crate::models::style::RunnerConfig;
use crate::sandbox::truncate_lines;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    /// Root-relative test file or directory.
    pub path: Option<String>,
    /// Only run cases whose name matches this pattern.
    pub name_filter: Option<String>,
    pub coverage: bool,
    pub watch: bool,
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Arguments appended to the configured command prefix.
pub fn build_args(req: &RunRequest) -> Vec<String> {
    let mut args = Vec::new();
    if let Some(p) = req.path.as_deref().filter(|s| !s.is_empty()) {
        args.push(p.to_string());
    }
    if let Some(name) = req.name_filter.as_deref().filter(|s| !s.is_empty()) {
        args.push("-t".to_string());
        args.push(name.to_string());
    }
    if req.coverage {
        args.push("--coverage".to_string());
    }
    if !req.watch {
        args.push("--watchAll=false".to_string());
    }
    args.push("--verbose".to_string());
    args
}

/// Run the configured test command for `req` in `root`.
pub fn run(root: &Path, cfg: &RunnerConfig, req: &RunRequest) -> Result<RunOutcome> {
    let (program, prefix) = cfg.command.split_first().ok_or_else(|| {
        Error::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            "runner command is empty",
        ))
    })?;
    let mut args: Vec<String> = prefix.to_vec();
    args.extend(build_args(req));
    run_command(root, program, &args, Duration::from_secs(cfg.timeout_secs.max(1)))
}

fn read_back(mut file: File) -> io::Result<String> {
    file.seek(SeekFrom::Start(0))?;
    let mut buf = Vec::new();
    file.read_to_end(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Spawn `program args` in `cwd` and wait at most `timeout`.
pub fn run_command(cwd: &Path, program: &str, args: &[String], timeout: Duration) -> Result<RunOutcome> {
    let stdout_file = tempfile::tempfile()?;
    let stderr_file = tempfile::tempfile()?;
    tracing::debug!(%program, ?args, cwd = %cwd.display(), "spawning test command");
    let mut child = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::from(stdout_file.try_clone()?))
        .stderr(Stdio::from(stderr_file.try_clone()?))
        .spawn()?;

    let started = Instant::now();
    let status = loop {
        match child.try_wait()? {
            Some(status) => break status,
            None => {
                if started.elapsed() >= timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    tracing::warn!(%program, secs = timeout.as_secs(), "test command timed out");
                    return Err(Error::Timeout {
                        secs: timeout.as_secs(),
                    });
                }
                thread::sleep(POLL_INTERVAL);
            }
        }
    };

    Ok(RunOutcome {
        success: status.success(),
        exit_code: status.code(),
        stdout: read_back(stdout_file)?,
        stderr: read_back(stderr_file)?,
    })
}

/// Headline plus joined output, truncated to `max_lines`.
pub fn report(outcome: &RunOutcome, max_lines: usize) -> String {
    let headline = if outcome.success {
        "All tests passed!".to_string()
    } else {
        match outcome.exit_code {
            Some(code) => format!("Some tests failed! (exit code {})", code),
            None => "Some tests failed! (terminated by signal)".to_string(),
        }
    };
    let body = [outcome.stdout.trim_end(), outcome.stderr.trim_end()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    format!("{}\n\n{}", headline, truncate_lines(&body, max_lines))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_args() {
        let req = RunRequest {
            path: Some("src/a.test.ts".into()),
            name_filter: Some("adds".into()),
            coverage: true,
            watch: false,
        };
        assert_eq!(
            build_args(&req),
            vec!["src/a.test.ts", "-t", "adds", "--coverage", "--watchAll=false", "--verbose"]
        );
        let watch = RunRequest {
            watch: true,
            name_filter: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(build_args(&watch), vec!["--verbose"]);
    }

    #[test]
    fn test_empty_command_is_an_error() {
        let cfg = RunnerConfig {
            command: vec![],
            ..Default::default()
        };
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            run(dir.path(), &cfg, &RunRequest::default()),
            Err(Error::Io(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_output_and_status() {
        let dir = tempfile::tempdir().unwrap();
        let args = vec!["-c".to_string(), "echo out; echo err >&2; exit 3".to_string()];
        let outcome = run_command(dir.path(), "sh", &args, Duration::from_secs(10)).unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.exit_code, Some(3));
        assert_eq!(outcome.stdout, "out\n");
        assert_eq!(outcome.stderr, "err\n");
        let text = report(&outcome, 100);
        assert_eq!(text, "Some tests failed! (exit code 3)\n\nout\nerr");
    }

    #[test]
    fn test_report_joins_streams_without_blank_lines() {
        let outcome = RunOutcome {
            success: true,
            exit_code: Some(0),
            stdout: "PASS a.test.ts\n\n".into(),
            stderr: String::new(),
        };
        assert_eq!(report(&outcome, 100), "All tests passed!\n\nPASS a.test.ts");
        let only_err = RunOutcome {
            success: false,
            exit_code: None,
            stdout: String::new(),
            stderr: "boom\n".into(),
        };
        assert_eq!(
            report(&only_err, 100),
            "Some tests failed! (terminated by signal)\n\nboom"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_kills_child() {
        let dir = tempfile::tempdir().unwrap();
        let args = vec!["-c".to_string(), "sleep 5".to_string()];
        let started = Instant::now();
        let res = run_command(dir.path(), "sh", &args, Duration::from_secs(1));
        assert!(matches!(res, Err(Error::Timeout { secs: 1 })));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[cfg(unix)]
    #[test]
    fn test_configured_prefix_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = RunnerConfig {
            command: vec!["echo".into(), "jest".into()],
            timeout_secs: 10,
            max_output_lines: 50,
        };
        let req = RunRequest {
            path: Some("a.test.ts".into()),
            ..Default::default()
        };
        let outcome = run(dir.path(), &cfg, &req).unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.stdout.trim(), "jest a.test.ts --watchAll=false --verbose");
        assert!(report(&outcome, 50).starts_with("All tests passed!"));
    }
}
