use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;
mod output;

use crate::cmd::{cmd_bootstrap, cmd_exec, cmd_newer, cmd_run};

/// mk - process pipelines and rebuild decisions for build scripts
#[derive(Parser)]
#[command(name = "mk")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Run a single command, failing unless it exits with status 0
  Exec {
    /// Program and its arguments
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    argv: Vec<OsString>,
  },

  /// Assemble a pipeline from stages and run it
  Run {
    /// File feeding the first stage's standard input
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// File capturing the last stage's standard output
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Stage command line, split on whitespace; repeat in pipeline order
    #[arg(short, long = "stage")]
    stages: Vec<String>,
  },

  /// Report whether one path was modified more recently than another
  Newer {
    /// Path whose recency is in question
    path1: PathBuf,

    /// Path compared against
    path2: PathBuf,
  },

  /// Rebuild a script binary when its source is newer, then re-run it
  Bootstrap {
    /// Source file the binary is built from
    #[arg(short, long)]
    source: PathBuf,

    /// Rebuild command; `{binary}` and `{source}` are expanded before running
    #[arg(long, default_value = "rustc -O -o {binary} {source}")]
    rebuild_with: String,

    /// The binary and its original arguments
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    argv: Vec<OsString>,
  },
}

fn main() {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let result = match cli.command {
    Commands::Exec { argv } => cmd_exec(&argv),
    Commands::Run {
      input,
      output,
      stages,
    } => cmd_run(input, output, &stages),
    Commands::Newer { path1, path2 } => cmd_newer(&path1, &path2),
    Commands::Bootstrap {
      source,
      rebuild_with,
      argv,
    } => cmd_bootstrap(&source, &rebuild_with, argv),
  };

  if let Err(err) = result {
    output::print_error(&format!("{err:#}"));
    std::process::exit(1);
  }
}

/// Command echoes and warnings are on by default; `--verbose` adds spawn
/// and wait detail. `RUST_LOG` overrides both. Logs go to stderr so
/// pipeline data owns stdout.
fn init_tracing(verbose: bool) {
  let default_filter = if verbose { "debug" } else { "info" };
  let filter =
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .without_time()
    .with_writer(std::io::stderr)
    .init();
}
