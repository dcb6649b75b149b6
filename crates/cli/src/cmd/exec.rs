use std::ffi::OsString;

use anyhow::{Result, bail};

use mkrs_lib::cmd::Cmd;

pub fn cmd_exec(argv: &[OsString]) -> Result<()> {
  let Some((program, args)) = argv.split_first() else {
    bail!("No program given");
  };

  Cmd::new(program).args(args).run()?;
  Ok(())
}
