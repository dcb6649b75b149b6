//! Core engine for build scripts that drive external tools.
//!
//! The pieces a compiled build driver needs:
//! - [`cmd::Cmd`] and the [`cmd!`] macro: one external program invocation,
//!   spawned or run synchronously with its command line echoed;
//! - [`pipeline::Pipeline`]: commands chained by pipes, with optional file
//!   endpoints, spawned together and waited on in order;
//! - [`stale::is_newer`]: the modification-time comparison behind rebuild
//!   decisions, recursive over directories;
//! - [`bootstrap::SelfRebuild`]: recompile and re-run the driver itself
//!   when its source changes;
//! - [`path`]: logged filesystem operations (mkdirs, rename, copy, remove).

pub mod bootstrap;
pub mod cmd;
pub mod fd;
pub mod path;
pub mod pipeline;
pub mod process;
pub mod stale;
