//! Staleness queries: recursive modification-time comparison between paths.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use thiserror::Error;
use tracing::warn;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum StaleError {
  #[error("Failed to stat {path}: {source}")]
  Stat {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("Failed to walk {path}: {source}")]
  Walk {
    path: PathBuf,
    #[source]
    source: walkdir::Error,
  },
}

/// Reports whether `path1` was modified more recently than `path2`.
///
/// The two sides are deliberately asymmetric:
/// - a missing `path1` logs a warning naming it and reports `false`, so a
///   rebuild predicate with a vanished source does not fire;
/// - a missing `path2` reports `true` without comparing, so a target that
///   does not exist yet always counts as out of date.
///
/// With both present the answer is `mtime(path1) > mtime(path2)`, strictly;
/// equal timestamps are not newer. See [`mtime`] for how directories are
/// timed.
pub fn is_newer(path1: impl AsRef<Path>, path2: impl AsRef<Path>) -> Result<bool, StaleError> {
  let path1 = path1.as_ref();
  let path2 = path2.as_ref();

  if !path1.exists() {
    warn!(path = %path1.display(), "path does not exist, reporting it as not newer");
    return Ok(false);
  }
  if !path2.exists() {
    return Ok(true);
  }

  Ok(mtime(path1)? > mtime(path2)?)
}

/// The modification time of `path`.
///
/// A regular file reports its filesystem timestamp. A directory reports the
/// newest timestamp over every non-directory entry beneath it, recursively;
/// directory nodes themselves contribute nothing, so touching a
/// subdirectory's inode does not make the tree newer. A directory tree with
/// no files at all yields `None`, which orders before every `Some` and so
/// compares as older than anything.
///
/// Symbolic links are not followed; a link contributes its own timestamp.
pub fn mtime(path: impl AsRef<Path>) -> Result<Option<SystemTime>, StaleError> {
  let path = path.as_ref();

  if !path.is_dir() {
    return Ok(Some(file_mtime(path)?));
  }

  let mut newest = None;
  for entry in WalkDir::new(path).min_depth(1) {
    let entry = entry.map_err(|source| StaleError::Walk {
      path: path.to_path_buf(),
      source,
    })?;
    if entry.file_type().is_dir() {
      continue;
    }

    let metadata = entry.metadata().map_err(|source| StaleError::Walk {
      path: path.to_path_buf(),
      source,
    })?;
    let modified = metadata.modified().map_err(|source| StaleError::Stat {
      path: entry.path().to_path_buf(),
      source,
    })?;
    newest = newest.max(Some(modified));
  }
  Ok(newest)
}

fn file_mtime(path: &Path) -> Result<SystemTime, StaleError> {
  let stat = |source| StaleError::Stat {
    path: path.to_path_buf(),
    source,
  };
  fs::metadata(path).map_err(stat)?.modified().map_err(stat)
}
