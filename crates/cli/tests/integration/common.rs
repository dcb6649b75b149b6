//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Get a Command for the mk binary with default log filtering.
pub fn mk_cmd() -> Command {
  let mut cmd: Command = cargo_bin_cmd!("mk");
  cmd.env_remove("RUST_LOG");
  cmd
}

/// Isolated test environment: a scratch directory per test.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    TestEnv {
      temp: TempDir::new().unwrap(),
    }
  }

  /// Path inside the scratch directory.
  pub fn path(&self, name: &str) -> PathBuf {
    self.temp.path().join(name)
  }

  /// Write a file and return its path.
  pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
    let path = self.path(name);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
  }

  /// Pin a file's modification time to a fixed Unix timestamp.
  pub fn set_mtime(&self, path: &Path, unix_secs: i64) {
    let mtime = filetime::FileTime::from_unix_time(unix_secs, 0);
    filetime::set_file_mtime(path, mtime).unwrap();
  }

  /// Write an executable shell script and return its path.
  #[cfg(unix)]
  pub fn write_script(&self, name: &str, content: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = self.write_file(name, content);
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
  }

  /// Get a Command for the mk binary, rooted in the scratch directory.
  pub fn mk_cmd(&self) -> Command {
    let mut cmd = mk_cmd();
    cmd.current_dir(self.temp.path());
    cmd
  }
}
