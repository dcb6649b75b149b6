use std::path::Path;

use anyhow::Result;

use mkrs_lib::stale::is_newer;

/// Prints `true` or `false` on stdout; warnings and errors go to stderr.
pub fn cmd_newer(path1: &Path, path2: &Path) -> Result<()> {
  if is_newer(path1, path2)? {
    println!("true");
  } else {
    println!("false");
  }
  Ok(())
}
