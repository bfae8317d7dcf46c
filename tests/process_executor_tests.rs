//! Process executor tests against small shell scripts
//!
//! Each test writes a script into a temp dir, marks it executable and runs it
//! through `ProcessExecutor`. Writing and spawning are serialized: a fork
//! from a parallel test while a script is still open for writing makes the
//! exec fail with "text file busy".

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use fixture_runner::{ProcessExecutor, TestError, TestExecutor};

static SERIAL: Mutex<()> = Mutex::new(());

fn serial() -> MutexGuard<'static, ()> {
    SERIAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_script(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("app.sh");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[test]
fn test_arguments_and_stdin() {
    let _guard = serial();
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), r#"printf '%s|%s\n' "$1" "$2"; cat"#);

    let captured = ProcessExecutor::new(script).execute("5 3\nhello").unwrap();

    assert_eq!(captured.stdout, "5|3\n5 3\nhello");
    assert_eq!(captured.stderr, "");
    assert_eq!(captured.status, Some(0));
}

#[test]
fn test_argument_count_is_two() {
    let _guard = serial();
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), r#"echo "$#""#);

    let captured = ProcessExecutor::new(script).execute("a b c d").unwrap();

    assert_eq!(captured.text(), "2\n");
}

#[test]
fn test_stderr_fallback() {
    let _guard = serial();
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "echo 'error: bad arg' >&2\nexit 3");

    let captured = ProcessExecutor::new(script).execute("x y").unwrap();

    assert_eq!(captured.text(), "error: bad arg\n");
    assert_eq!(captured.status, Some(3));
}

#[test]
fn test_stdout_wins_over_stderr() {
    let _guard = serial();
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "echo warn >&2\necho result");

    let captured = ProcessExecutor::new(script).execute("x y").unwrap();

    assert_eq!(captured.text(), "result\n");
    assert_eq!(captured.stderr, "warn\n");
}

#[test]
fn test_child_ignoring_stdin() {
    let _guard = serial();
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "echo done");
    let input = format!("x y\n{}", "z".repeat(1 << 20));

    let captured = ProcessExecutor::new(script).execute(&input).unwrap();

    assert_eq!(captured.text(), "done\n");
}

#[test]
fn test_large_echo_does_not_deadlock() {
    let _guard = serial();
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "cat");
    let input = format!("x y\n{}", "z".repeat(1 << 20));

    let captured = ProcessExecutor::new(script).execute(&input).unwrap();

    assert_eq!(captured.stdout.len(), input.len());
}

#[test]
fn test_missing_executable() {
    let _guard = serial();
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("no-such-app");

    let err = ProcessExecutor::new(&missing).execute("x y").unwrap_err();

    match err {
        TestError::Spawn { program, .. } => assert_eq!(program, missing),
        other => panic!("expected spawn error, got {other:?}"),
    }
}

#[test]
fn test_missing_arguments_spawns_nothing() {
    let err = ProcessExecutor::new("/definitely/not/run").execute("").unwrap_err();
    assert!(matches!(err, TestError::MissingArguments { found: 0 }));
}
