#![forbid(unsafe_code)]
//! fixture-runner: a black-box test runner for command-line executables
//!
//! Discovers `test<N>_input.txt` / `test<N>_output.txt` fixture pairs, feeds
//! each input to the executable under test, normalizes what it prints and
//! compares it against the expected fixture. The run halts at the first
//! mismatch.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod normalize;
pub mod version;

pub use cli::discovery::{FixtureIndex, FixturePair, discover_fixtures};
pub use cli::test_interfaces::{CapturedOutput, ProcessExecutor, TestError, TestExecutor};
pub use cli::test_runner::{ConsoleReporter, RunOutcome, TestOutcome, TestReporter, run_tests};
pub use normalize::{normalize_expected, normalize_output};
