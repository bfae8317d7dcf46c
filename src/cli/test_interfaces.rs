//! Test runner I/O boundary interfaces
//!
//! This module defines trait-based abstractions for the two operations that
//! touch the outside world:
//! - Fixture discovery (filesystem scan)
//! - Test execution (spawning the executable under test + output capture)
//!
//! The comparison loop in `test_runner.rs` only talks to these traits, so it
//! can be driven by scripted executors in tests.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};

use thiserror::Error;
use tracing::debug;

use super::discovery::{FixturePair, discover_fixtures};

/// Errors that occur during test operations
#[derive(Debug, Error)]
pub enum TestError {
    #[error("different amount of input and output files ({inputs} input, {outputs} output)")]
    FixtureCountMismatch { inputs: usize, outputs: usize },

    #[error("{fixture} has no matching output fixture")]
    UnpairedFixture { fixture: String },

    #[error("failed to read fixture directory {}: {source}", path.display())]
    ReadDir { path: PathBuf, source: io::Error },

    #[error("failed to read fixture {}: {source}", path.display())]
    ReadFixture { path: PathBuf, source: io::Error },

    #[error("first input line must supply two arguments, found {found}")]
    MissingArguments { found: usize },

    #[error("failed to run {}: {source}", program.display())]
    Spawn { program: PathBuf, source: io::Error },

    #[error("failed to capture output: {0}")]
    Capture(#[source] io::Error),
}

// ============================================================================
// Fixture Discovery Interface
// ============================================================================

/// Produce the ordered fixture pairs for a run.
pub trait FixtureDiscovery {
    fn discover(&self) -> Result<Vec<FixturePair>, TestError>;
}

/// Filesystem discovery rooted at a single fixture directory.
pub struct DirectoryDiscovery {
    pub dir: PathBuf,
}

impl DirectoryDiscovery {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl FixtureDiscovery for DirectoryDiscovery {
    fn discover(&self) -> Result<Vec<FixturePair>, TestError> {
        discover_fixtures(&self.dir)
    }
}

// ============================================================================
// Test Executor Interface
// ============================================================================

/// Both captured streams of one invocation of the executable under test.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, if the process exited normally. Informational only.
    pub status: Option<i32>,
}

impl CapturedOutput {
    /// The text compared against the expected fixture: stdout, or stderr when
    /// stdout is empty.
    pub fn text(&self) -> &str {
        if self.stdout.is_empty() { &self.stderr } else { &self.stdout }
    }
}

/// Run the executable under test on one test input.
pub trait TestExecutor {
    fn execute(&self, input: &str) -> Result<CapturedOutput, TestError>;
}

/// Split the first input line into the two positional arguments.
///
/// Tokens past the second are ignored.
pub fn command_arguments(input: &str) -> Result<[&str; 2], TestError> {
    let mut tokens = input.lines().next().unwrap_or("").split_whitespace();
    match (tokens.next(), tokens.next()) {
        (Some(first), Some(second)) => Ok([first, second]),
        (first, _) => Err(TestError::MissingArguments {
            found: usize::from(first.is_some()),
        }),
    }
}

/// Wait for the stdin feeder. A broken pipe (the child exited without reading
/// all of its input) is ignored; any other write failure is a capture error.
fn join_feeder(handle: JoinHandle<io::Result<()>>) -> Result<(), TestError> {
    match handle.join() {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) if e.kind() == io::ErrorKind::BrokenPipe => {
            debug!("executable closed stdin before reading all input");
            Ok(())
        }
        Ok(Err(e)) => Err(TestError::Capture(e)),
        Err(_) => Err(TestError::Capture(io::Error::other("stdin feeder thread panicked"))),
    }
}

/// Spawns the executable under test once per input and blocks until it exits.
///
/// There is no timeout: an executable that never exits hangs the run.
pub struct ProcessExecutor {
    program: PathBuf,
}

impl ProcessExecutor {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl TestExecutor for ProcessExecutor {
    fn execute(&self, input: &str) -> Result<CapturedOutput, TestError> {
        let args = command_arguments(input)?;
        debug!(program = %self.program.display(), ?args, "spawning executable under test");

        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| TestError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        // Feed stdin from its own thread so a child that fills its stdout
        // pipe before reading cannot deadlock us.
        let feeder = child.stdin.take().map(|mut stdin| {
            let bytes = input.as_bytes().to_vec();
            thread::spawn(move || stdin.write_all(&bytes))
        });

        let output = child.wait_with_output().map_err(TestError::Capture)?;

        if let Some(handle) = feeder {
            join_feeder(handle)?;
        }

        let captured = CapturedOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            status: output.status.code(),
        };
        debug!(
            status = ?captured.status,
            stdout_len = captured.stdout.len(),
            stderr_len = captured.stderr.len(),
            "executable finished"
        );
        Ok(captured)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_arguments_from_first_line() {
        assert_eq!(command_arguments("5 3\nhello").unwrap(), ["5", "3"]);
    }

    #[test]
    fn test_arguments_ignore_extra_tokens() {
        assert_eq!(command_arguments("data.json  $.a.b  extra").unwrap(), ["data.json", "$.a.b"]);
    }

    #[test]
    fn test_arguments_do_not_span_lines() {
        let err = command_arguments("only\nsecond").unwrap_err();
        assert!(matches!(err, TestError::MissingArguments { found: 1 }));
    }

    #[test]
    fn test_arguments_empty_input() {
        let err = command_arguments("").unwrap_err();
        assert!(matches!(err, TestError::MissingArguments { found: 0 }));
    }

    #[test]
    fn test_text_prefers_stdout() {
        let captured = CapturedOutput {
            stdout: "42\n".to_string(),
            stderr: "warning".to_string(),
            status: Some(0),
        };
        assert_eq!(captured.text(), "42\n");
    }

    #[test]
    fn test_text_falls_back_to_stderr() {
        let captured = CapturedOutput {
            stdout: String::new(),
            stderr: "error: bad arg".to_string(),
            status: Some(1),
        };
        assert_eq!(captured.text(), "error: bad arg");
    }

    #[test]
    fn test_feeder_broken_pipe_is_ignored() {
        let handle = thread::spawn(|| Err(io::Error::from(io::ErrorKind::BrokenPipe)));
        assert!(join_feeder(handle).is_ok());
    }

    #[test]
    fn test_feeder_write_error_is_capture_error() {
        let handle = thread::spawn(|| Err(io::Error::from(io::ErrorKind::WriteZero)));
        let err = join_feeder(handle).unwrap_err();
        assert!(matches!(err, TestError::Capture(ref e) if e.kind() == io::ErrorKind::WriteZero));
    }

    #[test]
    fn test_feeder_panic_is_capture_error() {
        let handle = thread::spawn(|| -> io::Result<()> { panic!("feeder") });
        assert!(matches!(join_feeder(handle), Err(TestError::Capture(_))));
    }
}
