//! CLI module for the fixture runner
//!
//! ## Usage
//!
//! `fixture-runner <EXECUTABLE> [--fixtures-dir DIR] [--no-color] [--exit-code]`
//!
//! ## Modules
//!
//! - `discovery` - Fixture pairing by filename convention
//! - `test_interfaces` - Discovery/execution traits and the process executor
//! - `test_runner` - Comparison loop and console reporting
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod discovery;
pub mod test_interfaces;
pub mod test_runner;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use clap::error::ErrorKind;
use tracing::debug;

use crate::version::RUNNER_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Printed verbatim when the command line is not a single executable path.
pub const USAGE: &str = "Usage: {path_to_test_runner} {path_to_built_app}";

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Black-box fixture test runner
#[derive(Parser, Debug)]
#[command(name = "fixture-runner")]
#[command(version = RUNNER_VERSION)]
#[command(about = "Run an executable against paired input/output fixtures", long_about = None)]
pub struct Cli {
    /// Path to the built executable under test
    #[arg(value_name = "EXECUTABLE")]
    pub executable: PathBuf,

    /// Directory holding test*_input.txt / test*_output.txt fixtures
    #[arg(long = "fixtures-dir", value_name = "DIR", default_value = "test")]
    pub fixtures_dir: PathBuf,

    /// Disable ANSI colours in the report
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Exit with status 1 when a test fails or the fixtures are inconsistent
    #[arg(long = "exit-code")]
    pub exit_code: bool,
}

impl Cli {
    fn into_suite_options(self) -> test_runner::SuiteOptions {
        test_runner::SuiteOptions {
            executable: self.executable,
            fixtures_dir: self.fixtures_dir,
            color: !self.no_color,
            exit_code: self.exit_code,
        }
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            report_parse_error(&e);
            return;
        }
    };

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the parsed command line and return the exit code.
pub fn execute(cli: Cli) -> CliResult<ExitCode> {
    debug!(?cli, "parsed command line");
    test_runner::run_suite(&cli.into_suite_options())
}

/// Help and version requests print as clap renders them; every other parse
/// failure prints the usage line and runs nothing.
fn report_parse_error(e: &clap::Error) {
    match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            if let Err(io_err) = e.print() {
                debug!(error = %io_err, "failed to print help");
            }
        }
        _ => {
            debug!(error = %e, "rejected command line");
            println!("{USAGE}");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
