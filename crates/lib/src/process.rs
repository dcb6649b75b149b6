//! Child process spawning and wait classification.

use std::io;
use std::process::{Child, ExitStatus, Stdio};

use thiserror::Error;
use tracing::debug;

use crate::cmd::Cmd;
use crate::fd::Descriptor;

#[derive(Debug, Error)]
pub enum ProcessError {
  #[error("Failed to spawn {cmd}: {source}")]
  Spawn {
    cmd: String,
    #[source]
    source: io::Error,
  },

  #[error("Could not execute {cmd}: {source}")]
  Exec {
    cmd: String,
    #[source]
    source: io::Error,
  },

  #[error("Failed to wait on {cmd}: {source}")]
  Wait {
    cmd: String,
    #[source]
    source: io::Error,
  },

  #[error("Command {cmd} exited with code {code}")]
  NonZero { cmd: String, code: i32 },

  #[error("Command {cmd} was terminated by {signal}")]
  Signaled { cmd: String, signal: String },
}

/// A spawned child process.
///
/// Waiting consumes the handle, so each spawn is waited on exactly once.
/// Dropping an un-waited handle abandons the child without reaping it.
#[derive(Debug)]
pub struct ProcessHandle {
  state: HandleState,
  cmd: String,
}

#[derive(Debug)]
enum HandleState {
  Running(Child),
  /// The program image could not be loaded; surfaced on wait.
  ExecFailed(io::Error),
}

impl ProcessHandle {
  /// Blocks until the process terminates.
  ///
  /// Returns `Ok(())` only for a normal exit with status 0. A non-zero exit,
  /// termination by signal, or a program that could not be executed all
  /// produce an error carrying the rendered command line.
  pub fn wait(self) -> Result<(), ProcessError> {
    let mut child = match self.state {
      HandleState::Running(child) => child,
      HandleState::ExecFailed(source) => {
        return Err(ProcessError::Exec { cmd: self.cmd, source });
      }
    };

    let status = match child.wait() {
      Ok(status) => status,
      Err(source) => return Err(ProcessError::Wait { cmd: self.cmd, source }),
    };
    debug!(cmd = %self.cmd, %status, "process finished");

    match status.code() {
      Some(0) => Ok(()),
      Some(code) => Err(ProcessError::NonZero { cmd: self.cmd, code }),
      None => Err(ProcessError::Signaled {
        signal: signal_name(&status),
        cmd: self.cmd,
      }),
    }
  }
}

/// Starts `cmd` with optional standard-stream overrides.
///
/// The override descriptors are moved in; once the child holds its copies,
/// the parent's are closed before this function returns. A pipe's read side
/// only sees end-of-stream when every write-end copy is closed, so the
/// parent must not retain any.
pub(crate) fn spawn(
  cmd: &Cmd,
  stdin: Option<Descriptor>,
  stdout: Option<Descriptor>,
) -> Result<ProcessHandle, ProcessError> {
  let rendered = cmd.to_string();

  let mut command = std::process::Command::new(cmd.program());
  command.args(cmd.tail());
  if let Some(descriptor) = stdin {
    command.stdin(Stdio::from(descriptor.into_file()));
  }
  if let Some(descriptor) = stdout {
    command.stdout(Stdio::from(descriptor.into_file()));
  }

  // `command` drops at the end of this function, releasing the parent's
  // copies of the descriptors moved in above.
  match command.spawn() {
    Ok(child) => {
      debug!(cmd = %rendered, pid = child.id(), "spawned process");
      Ok(ProcessHandle {
        state: HandleState::Running(child),
        cmd: rendered,
      })
    }
    Err(source) if is_exec_failure(&source) => {
      debug!(cmd = %rendered, "program could not be loaded, deferring to wait");
      Ok(ProcessHandle {
        state: HandleState::ExecFailed(source),
        cmd: rendered,
      })
    }
    Err(source) => Err(ProcessError::Spawn { cmd: rendered, source }),
  }
}

/// Faults that belong to the child's exec step rather than to process
/// creation itself. They surface through [`ProcessHandle::wait`], matching
/// the fork/exec model where the parent cannot observe them at spawn time.
fn is_exec_failure(err: &io::Error) -> bool {
  matches!(
    err.kind(),
    io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied
  )
}

#[cfg(unix)]
fn signal_name(status: &ExitStatus) -> String {
  use std::os::unix::process::ExitStatusExt;

  // Names for the signal numbers POSIX fixes across platforms.
  match status.signal() {
    Some(1) => "SIGHUP".into(),
    Some(2) => "SIGINT".into(),
    Some(3) => "SIGQUIT".into(),
    Some(4) => "SIGILL".into(),
    Some(5) => "SIGTRAP".into(),
    Some(6) => "SIGABRT".into(),
    Some(8) => "SIGFPE".into(),
    Some(9) => "SIGKILL".into(),
    Some(11) => "SIGSEGV".into(),
    Some(13) => "SIGPIPE".into(),
    Some(14) => "SIGALRM".into(),
    Some(15) => "SIGTERM".into(),
    Some(other) => format!("signal {other}"),
    None => "an unknown signal".into(),
  }
}

#[cfg(not(unix))]
fn signal_name(_status: &ExitStatus) -> String {
  // Windows children always report an exit code, so this is unreachable in
  // practice.
  "an unknown signal".into()
}
