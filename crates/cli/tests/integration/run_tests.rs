//! `mk run` pipelines, end to end.

use predicates::prelude::*;

use crate::common::TestEnv;

#[cfg(unix)]
#[test]
fn stages_are_connected_in_order() {
  let env = TestEnv::new();
  let out = env.path("out.txt");

  env
    .mk_cmd()
    .args(["run", "--stage", "echo hello", "--stage", "tr a-z A-Z"])
    .arg("--output")
    .arg(&out)
    .assert()
    .success();

  assert_eq!(std::fs::read_to_string(&out).unwrap(), "HELLO\n");
}

#[cfg(unix)]
#[test]
fn input_file_feeds_the_first_stage() {
  let env = TestEnv::new();
  let input = env.write_file("in.txt", "3\n1\n2\n");
  let out = env.path("out.txt");

  env
    .mk_cmd()
    .args(["run", "--stage", "sort"])
    .arg("--input")
    .arg(&input)
    .arg("--output")
    .arg(&out)
    .assert()
    .success();

  assert_eq!(std::fs::read_to_string(&out).unwrap(), "1\n2\n3\n");
}

#[cfg(unix)]
#[test]
fn chain_is_echoed_to_stderr() {
  let env = TestEnv::new();

  env
    .mk_cmd()
    .args(["run", "--stage", "echo hi", "--stage", "cat"])
    .assert()
    .success()
    .stderr(predicate::str::contains("echo hi |> cat"));
}

#[cfg(unix)]
#[test]
fn without_output_flag_stdout_is_inherited() {
  let env = TestEnv::new();

  env
    .mk_cmd()
    .args(["run", "--stage", "echo passthrough"])
    .assert()
    .success()
    .stdout(predicate::str::contains("passthrough"));
}

#[cfg(unix)]
#[test]
fn failing_stage_is_fatal() {
  let env = TestEnv::new();

  env
    .mk_cmd()
    .args(["run", "--stage", "echo hi", "--stage", "false"])
    .assert()
    .failure()
    .code(1)
    .stderr(predicate::str::contains("exited with code 1"));
}

#[cfg(unix)]
#[test]
fn missing_input_file_is_fatal() {
  let env = TestEnv::new();

  env
    .mk_cmd()
    .args(["run", "--stage", "cat"])
    .arg("--input")
    .arg(env.path("absent.txt"))
    .assert()
    .failure()
    .code(1)
    .stderr(predicate::str::contains("Failed to open"));
}

#[test]
fn blank_stage_is_rejected() {
  let env = TestEnv::new();

  env
    .mk_cmd()
    .args(["run", "--stage", "  "])
    .assert()
    .failure()
    .code(1)
    .stderr(predicate::str::contains("Stage command is empty"));
}
