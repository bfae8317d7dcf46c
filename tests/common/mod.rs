//! Shared helpers for the fixture-runner integration tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::path::Path;

use fixture_runner::{CapturedOutput, TestError, TestExecutor};

/// Write `test<index>_input.txt` / `test<index>_output.txt` for each case.
pub fn write_fixtures(dir: &Path, cases: &[(&str, &str, &str)]) {
    fs::create_dir_all(dir).unwrap();
    for (index, input, output) in cases {
        fs::write(dir.join(format!("test{index}_input.txt")), input).unwrap();
        fs::write(dir.join(format!("test{index}_output.txt")), output).unwrap();
    }
}

/// Captured output with only stdout populated.
pub fn stdout(text: &str) -> CapturedOutput {
    CapturedOutput {
        stdout: text.to_string(),
        stderr: String::new(),
        status: Some(0),
    }
}

/// Executor that answers from a closure and records every input it receives.
pub struct ScriptedExecutor<F: Fn(&str) -> CapturedOutput> {
    respond: F,
    pub seen: RefCell<Vec<String>>,
}

impl<F: Fn(&str) -> CapturedOutput> ScriptedExecutor<F> {
    pub fn new(respond: F) -> Self {
        Self {
            respond,
            seen: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.seen.borrow().len()
    }
}

impl<F: Fn(&str) -> CapturedOutput> TestExecutor for ScriptedExecutor<F> {
    fn execute(&self, input: &str) -> Result<CapturedOutput, TestError> {
        fixture_runner::cli::test_interfaces::command_arguments(input)?;
        self.seen.borrow_mut().push(input.to_string());
        Ok((self.respond)(input))
    }
}
