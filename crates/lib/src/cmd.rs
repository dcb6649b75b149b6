//! Commands: argument vectors for external program invocations.

use std::ffi::{OsStr, OsString};
use std::fmt;

use tracing::info;

use crate::fd::Descriptor;
use crate::process::{self, ProcessError, ProcessHandle};

/// One external program invocation: a program name followed by its
/// arguments.
///
/// A `Cmd` is plain data. It is assembled right before a [`run`](Cmd::run)
/// or [`spawn`](Cmd::spawn) call and carries no state about past
/// invocations, so the same value can be run any number of times.
#[derive(Debug, Clone)]
pub struct Cmd {
  line: Vec<OsString>,
}

impl Cmd {
  /// Creates a command that invokes `program` with no arguments.
  pub fn new(program: impl AsRef<OsStr>) -> Self {
    Cmd {
      line: vec![program.as_ref().to_os_string()],
    }
  }

  /// Appends one argument.
  pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
    self.line.push(arg.as_ref().to_os_string());
    self
  }

  /// Appends every argument in `args`.
  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
  {
    for arg in args {
      self.line.push(arg.as_ref().to_os_string());
    }
    self
  }

  pub(crate) fn program(&self) -> &OsStr {
    &self.line[0]
  }

  pub(crate) fn tail(&self) -> &[OsString] {
    &self.line[1..]
  }

  /// Starts the command without waiting for it, optionally overriding the
  /// child's standard input and output.
  ///
  /// The outcome is only observable through [`ProcessHandle::wait`]; a
  /// program that cannot be executed at all still yields a handle here and
  /// reports the failure on wait.
  pub fn spawn(
    &self,
    stdin: Option<Descriptor>,
    stdout: Option<Descriptor>,
  ) -> Result<ProcessHandle, ProcessError> {
    process::spawn(self, stdin, stdout)
  }

  /// Runs the command to completion, echoing it first.
  ///
  /// Returns `Ok(())` only for a normal exit with status 0; see
  /// [`ProcessHandle::wait`] for the failure classification.
  pub fn run(&self) -> Result<(), ProcessError> {
    info!(cmd = %self, "running command");
    self.spawn(None, None)?.wait()
  }
}

/// Renders the argument vector joined by single spaces.
///
/// The rendering is lossy: arguments containing spaces or shell
/// metacharacters are not quoted. It is meant for logs and error messages,
/// never for re-parsing.
impl fmt::Display for Cmd {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, arg) in self.line.iter().enumerate() {
      if i > 0 {
        f.write_str(" ")?;
      }
      write!(f, "{}", arg.to_string_lossy())?;
    }
    Ok(())
  }
}

/// Builds a [`Cmd`] from a literal argument list.
///
/// ```
/// let c = mkrs_lib::cmd!["cc", "-o", "tool", "tool.c"];
/// assert_eq!(c.to_string(), "cc -o tool tool.c");
/// ```
#[macro_export]
macro_rules! cmd {
  ($program:expr $(, $arg:expr)* $(,)?) => {
    $crate::cmd::Cmd::new($program)$(.arg($arg))*
  };
}
