//! Implementation of the `mk bootstrap` command.
//!
//! Applies the self-rebuild protocol on behalf of a script binary: the
//! binary and its original arguments arrive as trailing arguments, the
//! rebuild command as a template with `{binary}` and `{source}`
//! placeholders.

use std::ffi::OsString;
use std::path::Path;

use anyhow::{Result, bail};

use mkrs_lib::bootstrap::SelfRebuild;
use mkrs_lib::cmd::Cmd;

use crate::output::print_success;

pub fn cmd_bootstrap(source: &Path, rebuild_with: &str, argv: Vec<OsString>) -> Result<()> {
  let Some(binary) = argv.first() else {
    bail!("No binary given");
  };

  let rebuild = parse_rebuild(
    rebuild_with,
    &binary.to_string_lossy(),
    &source.to_string_lossy(),
  )?;

  // Returns only when the binary is already current; a rebuild re-runs the
  // binary and exits this process with its status.
  SelfRebuild::with_argv(source, argv)
    .rebuild_with(rebuild)
    .go()?;

  print_success("Binary is up to date");
  Ok(())
}

/// Expands `{binary}` and `{source}` in each whitespace-split template word.
fn parse_rebuild(template: &str, binary: &str, source: &str) -> Result<Cmd> {
  let mut words = template
    .split_whitespace()
    .map(|word| word.replace("{binary}", binary).replace("{source}", source));

  let Some(program) = words.next() else {
    bail!("Rebuild command template is empty");
  };
  Ok(Cmd::new(program).args(words))
}
