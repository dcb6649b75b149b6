//! Self-rebuild: recompile and re-run a build driver whose source changed.
//!
//! A build script using this crate is compiled by hand exactly once. From
//! then on a [`SelfRebuild`] call at the top of `main` keeps the binary in
//! step with its source: when the source is newer, the running binary is
//! set aside as `<binary>.old`, rebuilt, and re-invoked with the original
//! arguments, and the current process exits with the re-invocation's
//! status.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, error, info};

use crate::cmd::Cmd;
use crate::path::{self, PathError};
use crate::process::ProcessError;
use crate::stale::{self, StaleError};

#[derive(Debug, Error)]
pub enum BootstrapError {
  #[error("Bootstrap argv is empty; argv[0] must name the running binary")]
  EmptyArgv,

  #[error(transparent)]
  Stale(#[from] StaleError),

  #[error(transparent)]
  Path(#[from] PathError),

  #[error(transparent)]
  Process(#[from] ProcessError),
}

/// The self-rebuild protocol for a driver binary.
///
/// The binary's path is taken from `argv[0]`; the source it is built from
/// is supplied by the caller. [`go`](SelfRebuild::go) compares the two and
/// either returns so the caller proceeds normally, or rebuilds, re-runs,
/// and never returns.
#[derive(Debug)]
pub struct SelfRebuild {
  source: PathBuf,
  argv: Vec<OsString>,
  rebuild: Option<Cmd>,
}

impl SelfRebuild {
  /// Targets the current process: the argument vector is captured from the
  /// environment.
  pub fn new(source: impl Into<PathBuf>) -> Self {
    Self::with_argv(source, std::env::args_os().collect())
  }

  /// Uses an explicit argument vector; `argv[0]` names the binary.
  pub fn with_argv(source: impl Into<PathBuf>, argv: Vec<OsString>) -> Self {
    SelfRebuild {
      source: source.into(),
      argv,
      rebuild: None,
    }
  }

  /// Replaces the default rebuild command, `rustc -O -o <binary> <source>`.
  ///
  /// The command must leave a runnable binary at `argv[0]`'s path or exit
  /// non-zero.
  pub fn rebuild_with(mut self, cmd: Cmd) -> Self {
    self.rebuild = Some(cmd);
    self
  }

  /// Runs the protocol.
  ///
  /// Returns `Ok(())` when the binary is already up to date, including when
  /// the source file is missing. When a rebuild happens this call does not
  /// return: the fresh binary runs to completion and the current process
  /// exits with status 0, the re-run's non-zero exit code, or 1 if the
  /// re-run could not be executed at all. A failed rename or rebuild is
  /// returned as an error, with the old binary preserved at `<binary>.old`.
  pub fn go(self) -> Result<(), BootstrapError> {
    let SelfRebuild { source, argv, rebuild } = self;

    let binary = match argv.first() {
      Some(first) => PathBuf::from(first),
      None => return Err(BootstrapError::EmptyArgv),
    };

    if !stale::is_newer(&source, &binary)? {
      debug!(binary = %binary.display(), "binary is up to date");
      return Ok(());
    }

    info!(
      source = %source.display(),
      binary = %binary.display(),
      "source changed, rebuilding"
    );

    path::rename(&binary, backup_path(&binary))?;

    let rebuild = rebuild.unwrap_or_else(|| {
      Cmd::new("rustc").arg("-O").arg("-o").arg(&binary).arg(&source)
    });
    rebuild.run()?;

    match Cmd::new(&binary).args(&argv[1..]).run() {
      Ok(()) => std::process::exit(0),
      Err(ProcessError::NonZero { cmd, code }) => {
        error!(cmd = %cmd, code, "rebuilt binary failed");
        std::process::exit(code);
      }
      Err(err) => {
        error!(error = %err, "could not run the rebuilt binary");
        std::process::exit(1);
      }
    }
  }
}

/// `<binary>.old`, appended to the full name, so `mk` backs up to `mk.old`
/// and `mk.exe` to `mk.exe.old`.
fn backup_path(binary: &Path) -> PathBuf {
  let mut backup = binary.as_os_str().to_os_string();
  backup.push(".old");
  PathBuf::from(backup)
}
