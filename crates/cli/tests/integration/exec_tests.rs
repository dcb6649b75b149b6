//! `mk exec` behavior: exit-status propagation and diagnostics.

use predicates::prelude::*;

use crate::common::mk_cmd;

#[cfg(unix)]
#[test]
fn exec_passes_arguments_through() {
  mk_cmd()
    .args(["exec", "--", "echo", "hello", "world"])
    .assert()
    .success()
    .stdout(predicate::str::contains("hello world"));
}

#[cfg(unix)]
#[test]
fn exec_echoes_the_command_to_stderr() {
  mk_cmd()
    .args(["exec", "--", "echo", "hi"])
    .assert()
    .success()
    .stderr(predicate::str::contains("echo hi"));
}

#[cfg(unix)]
#[test]
fn exec_accepts_hyphenated_arguments() {
  mk_cmd()
    .args(["exec", "--", "printf", "--", "ok"])
    .assert()
    .success()
    .stdout(predicate::str::contains("ok"));
}

#[cfg(unix)]
#[test]
fn nonzero_exit_becomes_exit_one_with_diagnostic() {
  mk_cmd()
    .args(["exec", "--", "sh", "-c", "exit 42"])
    .assert()
    .failure()
    .code(1)
    .stderr(predicate::str::contains("exited with code 42"));
}

#[test]
fn missing_program_is_reported_as_not_executable() {
  mk_cmd()
    .args(["exec", "--", "mkrs-no-such-program-exists"])
    .assert()
    .failure()
    .code(1)
    .stderr(predicate::str::contains("Could not execute"));
}
