//! Implementation of the `mk run` command.
//!
//! Assembles a pipeline from `--input`, `--output`, and repeated `--stage`
//! flags, runs it, and reports the elapsed time.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use tracing::info;

use mkrs_lib::cmd::Cmd;
use mkrs_lib::pipeline::{Pipeline, Token};

pub fn cmd_run(input: Option<PathBuf>, output: Option<PathBuf>, stages: &[String]) -> Result<()> {
  let start = Instant::now();

  let mut tokens = Vec::new();
  if let Some(path) = input {
    tokens.push(Token::Input(path));
  }
  for stage in stages {
    tokens.push(Token::Stage(parse_stage(stage)?));
  }
  if let Some(path) = output {
    tokens.push(Token::Output(path));
  }

  Pipeline::from_tokens(tokens)?.run()?;

  let elapsed = Duration::from_millis(start.elapsed().as_millis() as u64);
  info!(elapsed = %humantime::format_duration(elapsed), "pipeline finished");
  Ok(())
}

/// Splits a stage command line on whitespace; quoting is not interpreted.
fn parse_stage(stage: &str) -> Result<Cmd> {
  let mut words = stage.split_whitespace();
  let Some(program) = words.next() else {
    bail!("Stage command is empty");
  };
  Ok(Cmd::new(program).args(words))
}
