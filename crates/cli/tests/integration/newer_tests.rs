//! `mk newer` staleness queries.

use predicates::prelude::*;

use crate::common::TestEnv;

#[test]
fn newer_file_prints_true() {
  let env = TestEnv::new();
  let old = env.write_file("old.txt", "");
  let new = env.write_file("new.txt", "");
  env.set_mtime(&old, 1_000_000);
  env.set_mtime(&new, 2_000_000);

  env
    .mk_cmd()
    .arg("newer")
    .arg(&new)
    .arg(&old)
    .assert()
    .success()
    .stdout(predicate::str::diff("true\n"));
}

#[test]
fn older_file_prints_false() {
  let env = TestEnv::new();
  let old = env.write_file("old.txt", "");
  let new = env.write_file("new.txt", "");
  env.set_mtime(&old, 1_000_000);
  env.set_mtime(&new, 2_000_000);

  env
    .mk_cmd()
    .arg("newer")
    .arg(&old)
    .arg(&new)
    .assert()
    .success()
    .stdout(predicate::str::diff("false\n"));
}

#[test]
fn missing_first_path_warns_and_prints_false() {
  let env = TestEnv::new();
  let existing = env.write_file("target.txt", "x");

  env
    .mk_cmd()
    .arg("newer")
    .arg(env.path("missing.txt"))
    .arg(&existing)
    .assert()
    .success()
    .stdout(predicate::str::diff("false\n"))
    .stderr(predicate::str::contains("missing.txt"));
}

#[test]
fn missing_second_path_prints_true() {
  let env = TestEnv::new();
  let existing = env.write_file("source.txt", "x");

  env
    .mk_cmd()
    .arg("newer")
    .arg(&existing)
    .arg(env.path("missing.txt"))
    .assert()
    .success()
    .stdout(predicate::str::diff("true\n"));
}

#[test]
fn directory_recency_is_its_newest_file() {
  let env = TestEnv::new();
  let a = env.write_file("src/a.rs", "");
  let b = env.write_file("src/nested/b.rs", "");
  let target = env.write_file("tool", "");
  env.set_mtime(&a, 1_000_000);
  env.set_mtime(&b, 3_000_000);
  env.set_mtime(&target, 2_000_000);

  env
    .mk_cmd()
    .arg("newer")
    .arg(env.path("src"))
    .arg(&target)
    .assert()
    .success()
    .stdout(predicate::str::diff("true\n"));

  env.set_mtime(&target, 4_000_000);

  env
    .mk_cmd()
    .arg("newer")
    .arg(env.path("src"))
    .arg(&target)
    .assert()
    .success()
    .stdout(predicate::str::diff("false\n"));
}
