//! Fixture comparison loop and reporting
//!
//! ## TestReporter Trait
//!
//! The runner uses a `TestReporter` trait to separate reporting from
//! execution. `ConsoleReporter` writes the human-readable progress lines;
//! tests plug in a reporter over an in-memory buffer.
//!
//! ## Control flow
//!
//! Pairs run strictly in order, one child process at a time. The first
//! mismatch (or a test that cannot be run at all) ends the loop; later pairs
//! are never read. `Done` is printed either way.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::discovery::FixturePair;
use super::test_interfaces::{DirectoryDiscovery, FixtureDiscovery, ProcessExecutor, TestError, TestExecutor};
use super::{CliError, CliResult, ExitCode};
use crate::normalize::{normalize_expected, normalize_output};

// ============================================================================
// Outcomes
// ============================================================================

/// Diagnostics for a test whose normalized output differed from the fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub input: String,
    pub expected: String,
    pub actual: String,
}

/// Result of running a single fixture pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestOutcome {
    Passed,
    Failed(Mismatch),
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The loop was exhausted without a failure.
    AllPassed { passed: usize },
    /// The loop halted at a mismatching test.
    Failed { test_number: usize },
    /// The loop halted at a test that could not be run.
    Errored { test_number: usize },
}

// ============================================================================
// Test Reporter Trait
// ============================================================================

/// Trait for reporting run progress.
///
/// Test numbers are 1-based positions in the run, not fixture indices.
pub trait TestReporter {
    /// Called when discovery fails; no test runs afterwards
    fn on_configuration_error(&mut self, error: &TestError);

    /// Called before a test's fixtures are read
    fn on_test_start(&mut self, test_number: usize);

    fn on_test_passed(&mut self, test_number: usize);

    fn on_test_failed(&mut self, test_number: usize, mismatch: &Mismatch);

    /// Called when a test could not be run at all
    fn on_test_error(&mut self, test_number: usize, error: &TestError);

    /// Called after the last test or after the halt
    fn on_run_complete(&mut self);
}

/// Console reporter: plain progress lines, ANSI colour on `OK` and `Error`.
pub struct ConsoleReporter<W: Write> {
    out: W,
    color: bool,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout(color: bool) -> Self {
        Self::new(io::stdout(), color)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if self.color {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    fn ok_label(&self) -> String {
        self.paint("OK", "32")
    }

    fn error_label(&self) -> String {
        self.paint("Error", "31")
    }

    fn line(&mut self, args: fmt::Arguments<'_>) {
        if let Err(e) = writeln!(self.out, "{args}") {
            debug!(error = %e, "failed to write report line");
        }
    }
}

impl<W: Write> TestReporter for ConsoleReporter<W> {
    fn on_configuration_error(&mut self, error: &TestError) {
        self.line(format_args!("Error: {error}"));
    }

    fn on_test_start(&mut self, test_number: usize) {
        self.line(format_args!("Running Test #{test_number}..."));
    }

    fn on_test_passed(&mut self, test_number: usize) {
        let ok = self.ok_label();
        self.line(format_args!("Test #{test_number} - {ok}"));
    }

    fn on_test_failed(&mut self, test_number: usize, mismatch: &Mismatch) {
        let error = self.error_label();
        self.line(format_args!("{error}: Test #{test_number} failed"));
        self.line(format_args!("{}", mismatch.input));
        self.line(format_args!("Expected:"));
        self.line(format_args!("{}", mismatch.expected));
        self.line(format_args!("Actual:"));
        self.line(format_args!("{}", mismatch.actual));
    }

    fn on_test_error(&mut self, test_number: usize, error: &TestError) {
        let label = self.error_label();
        self.line(format_args!("{label}: Test #{test_number} could not be run: {error}"));
    }

    fn on_run_complete(&mut self) {
        self.line(format_args!("Done"));
        if let Err(e) = self.out.flush() {
            debug!(error = %e, "failed to flush report");
        }
    }
}

// ============================================================================
// Runner
// ============================================================================

fn read_fixture(path: &Path) -> Result<String, TestError> {
    fs::read_to_string(path).map_err(|source| TestError::ReadFixture {
        path: path.to_path_buf(),
        source,
    })
}

/// Run one fixture pair: read both files, execute, normalize, compare.
pub fn run_single_test(pair: &FixturePair, executor: &impl TestExecutor) -> Result<TestOutcome, TestError> {
    let raw_input = read_fixture(&pair.input)?;
    let input = raw_input.trim();
    let raw_expected = read_fixture(&pair.output)?;
    let expected = normalize_expected(&raw_expected);

    let captured = executor.execute(input)?;
    let actual = normalize_output(captured.text());

    if actual == expected {
        Ok(TestOutcome::Passed)
    } else {
        debug!(fixture = %pair.index, "output mismatch");
        Ok(TestOutcome::Failed(Mismatch {
            input: input.to_string(),
            expected: expected.to_string(),
            actual,
        }))
    }
}

/// Run the pairs in order, halting at the first failure.
pub fn run_tests(
    pairs: &[FixturePair],
    executor: &impl TestExecutor,
    reporter: &mut impl TestReporter,
) -> RunOutcome {
    let mut outcome = RunOutcome::AllPassed { passed: pairs.len() };

    for (position, pair) in pairs.iter().enumerate() {
        let test_number = position + 1;
        reporter.on_test_start(test_number);

        match run_single_test(pair, executor) {
            Ok(TestOutcome::Passed) => reporter.on_test_passed(test_number),
            Ok(TestOutcome::Failed(mismatch)) => {
                reporter.on_test_failed(test_number, &mismatch);
                outcome = RunOutcome::Failed { test_number };
                break;
            }
            Err(error) => {
                reporter.on_test_error(test_number, &error);
                outcome = RunOutcome::Errored { test_number };
                break;
            }
        }
    }

    reporter.on_run_complete();
    outcome
}

/// Settings for one invocation of the runner.
#[derive(Debug, Clone)]
pub struct SuiteOptions {
    pub executable: PathBuf,
    pub fixtures_dir: PathBuf,
    pub color: bool,
    /// Map failures to a non-zero exit code instead of always exiting 0.
    pub exit_code: bool,
}

/// Discover fixtures and run them, mapping the outcome to an exit code.
pub fn run_suite_with(
    discovery: &impl FixtureDiscovery,
    executor: &impl TestExecutor,
    reporter: &mut impl TestReporter,
    exit_code: bool,
) -> CliResult<ExitCode> {
    let failure = || {
        if exit_code {
            Err(CliError::failure(""))
        } else {
            Ok(ExitCode::SUCCESS)
        }
    };

    let pairs = match discovery.discover() {
        Ok(pairs) => pairs,
        Err(error) => {
            reporter.on_configuration_error(&error);
            return failure();
        }
    };
    info!(count = pairs.len(), "running fixture pairs");

    match run_tests(&pairs, executor, reporter) {
        RunOutcome::AllPassed { passed } => {
            info!(passed, "all fixture pairs passed");
            Ok(ExitCode::SUCCESS)
        }
        RunOutcome::Failed { test_number } => {
            info!(test_number, "run halted at output mismatch");
            failure()
        }
        RunOutcome::Errored { test_number } => {
            info!(test_number, "run halted at harness error");
            failure()
        }
    }
}

/// Run the fixture suite against the executable on the console.
pub fn run_suite(options: &SuiteOptions) -> CliResult<ExitCode> {
    let discovery = DirectoryDiscovery::new(&options.fixtures_dir);
    let executor = ProcessExecutor::new(&options.executable);
    let mut reporter = ConsoleReporter::stdout(options.color);
    run_suite_with(&discovery, &executor, &mut reporter, options.exit_code)
}
