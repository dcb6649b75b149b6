//! Pipelines: commands chained by pipes, with optional file endpoints.
//!
//! A pipeline mirrors the shell form `stage0 < input | stage1 | ... > output`.
//! Every stage is spawned before any stage is waited on; waiting earlier can
//! deadlock, because a stage blocked writing into a full pipe cannot exit
//! until the next stage exists to drain it.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

use crate::cmd::Cmd;
use crate::fd::{self, Descriptor, FdError};
use crate::process::{ProcessError, ProcessHandle};

#[derive(Debug, Error)]
pub enum PipelineError {
  #[error("Pipeline input is already set to {existing}")]
  DuplicateInput { existing: PathBuf },

  #[error("Pipeline output is already set to {existing}")]
  DuplicateOutput { existing: PathBuf },

  #[error(transparent)]
  Fd(#[from] FdError),

  #[error(transparent)]
  Process(#[from] ProcessError),
}

/// One element of a pipeline description: a file source, a file sink, or a
/// command stage.
#[derive(Debug)]
pub enum Token {
  Input(PathBuf),
  Output(PathBuf),
  Stage(Cmd),
}

/// An ordered chain of commands connected by pipes.
///
/// At most one input file may feed the first stage's standard input and at
/// most one output file may capture the last stage's standard output. Stages
/// keep the order they were added in. Standard error is never redirected.
#[derive(Debug, Default)]
pub struct Pipeline {
  input: Option<PathBuf>,
  stages: Vec<Cmd>,
  output: Option<PathBuf>,
  duplicate: Option<Duplicate>,
}

/// First cardinality violation seen while building; reported by `run` and
/// `from_tokens` before anything is spawned.
#[derive(Debug)]
enum Duplicate {
  Input(PathBuf),
  Output(PathBuf),
}

impl Pipeline {
  /// Creates a pipeline with no input, no output, and no stages.
  pub fn new() -> Self {
    Pipeline::default()
  }

  /// Builds a pipeline from an ordered token list.
  ///
  /// Fails if the list carries more than one `Input` or more than one
  /// `Output` token; nothing is spawned for an invalid list.
  pub fn from_tokens(tokens: impl IntoIterator<Item = Token>) -> Result<Self, PipelineError> {
    let mut pipeline = Pipeline::new();
    for token in tokens {
      pipeline = match token {
        Token::Input(path) => pipeline.input(path),
        Token::Output(path) => pipeline.output(path),
        Token::Stage(cmd) => pipeline.stage(cmd),
      };
    }
    pipeline.validate()?;
    Ok(pipeline)
  }

  /// Sets the file feeding the first stage's standard input.
  pub fn input(mut self, path: impl Into<PathBuf>) -> Self {
    match &self.input {
      None => self.input = Some(path.into()),
      Some(existing) => {
        if self.duplicate.is_none() {
          self.duplicate = Some(Duplicate::Input(existing.clone()));
        }
      }
    }
    self
  }

  /// Sets the file capturing the last stage's standard output.
  pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
    match &self.output {
      None => self.output = Some(path.into()),
      Some(existing) => {
        if self.duplicate.is_none() {
          self.duplicate = Some(Duplicate::Output(existing.clone()));
        }
      }
    }
    self
  }

  /// Appends a command stage.
  pub fn stage(mut self, cmd: Cmd) -> Self {
    self.stages.push(cmd);
    self
  }

  /// Runs the pipeline to completion.
  ///
  /// Echoes the chain, spawns every stage with pipes wired between adjacent
  /// ones, then waits on each stage in spawn order. The first failing wait
  /// aborts the run; stages after it are left running un-waited. A pipeline
  /// with no stages succeeds without touching the endpoint files.
  pub fn run(&self) -> Result<(), PipelineError> {
    self.run_with(&mut OsRunner)
  }

  fn run_with<R: StageRunner>(&self, runner: &mut R) -> Result<(), PipelineError> {
    self.validate()?;

    info!(pipeline = %self, "running pipeline");

    if self.stages.is_empty() {
      return Ok(());
    }

    let mut stdin = match &self.input {
      Some(path) => Some(Descriptor::open_read(path)?),
      None => None,
    };

    let mut handles = Vec::with_capacity(self.stages.len());
    let last = self.stages.len() - 1;

    for cmd in &self.stages[..last] {
      let pipe = fd::pipe()?;
      // The parent's write end moves into the spawn and is closed there;
      // holding it open would starve the next stage of end-of-stream.
      handles.push(runner.spawn(cmd, stdin.take(), Some(pipe.write))?);
      stdin = Some(pipe.read);
    }

    let stdout = match &self.output {
      Some(path) => Some(Descriptor::open_write(path)?),
      None => None,
    };
    handles.push(runner.spawn(&self.stages[last], stdin.take(), stdout)?);

    for handle in handles {
      runner.wait(handle)?;
    }

    Ok(())
  }

  fn validate(&self) -> Result<(), PipelineError> {
    match &self.duplicate {
      None => Ok(()),
      Some(Duplicate::Input(existing)) => Err(PipelineError::DuplicateInput {
        existing: existing.clone(),
      }),
      Some(Duplicate::Output(existing)) => Err(PipelineError::DuplicateOutput {
        existing: existing.clone(),
      }),
    }
  }
}

/// Renders the chain as `input |> stage0 |> ... |> output`, omitting the
/// endpoints that are not set.
impl fmt::Display for Pipeline {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut sep = "";
    if let Some(input) = &self.input {
      write!(f, "{}", input.display())?;
      sep = " |> ";
    }
    for cmd in &self.stages {
      write!(f, "{sep}{cmd}")?;
      sep = " |> ";
    }
    if let Some(output) = &self.output {
      write!(f, "{sep}{}", output.display())?;
    }
    Ok(())
  }
}

/// Seam between the pipeline algorithm and the operating system. Real runs
/// go through [`OsRunner`]; tests substitute a recorder to observe the
/// spawn and wait order without creating processes.
trait StageRunner {
  type Handle;

  fn spawn(
    &mut self,
    cmd: &Cmd,
    stdin: Option<Descriptor>,
    stdout: Option<Descriptor>,
  ) -> Result<Self::Handle, ProcessError>;

  fn wait(&mut self, handle: Self::Handle) -> Result<(), ProcessError>;
}

struct OsRunner;

impl StageRunner for OsRunner {
  type Handle = ProcessHandle;

  fn spawn(
    &mut self,
    cmd: &Cmd,
    stdin: Option<Descriptor>,
    stdout: Option<Descriptor>,
  ) -> Result<ProcessHandle, ProcessError> {
    cmd.spawn(stdin, stdout)
  }

  fn wait(&mut self, handle: ProcessHandle) -> Result<(), ProcessError> {
    handle.wait()
  }
}
