//! Logged filesystem operations for build scripts.
//!
//! Each operation echoes itself at info level before acting, like the
//! command echo in [`cmd`](crate::cmd), so a build log reads as the full
//! sequence of steps taken.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::fd::{Descriptor, FdError};

#[derive(Debug, Error)]
pub enum PathError {
  #[error("Failed to create directory {path}: {source}")]
  CreateDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("Failed to rename {from} to {to}: {source}")]
  Rename {
    from: PathBuf,
    to: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("Failed to read directory {path}: {source}")]
  ReadDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("Failed to remove {path}: {source}")]
  Remove {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error(transparent)]
  Fd(#[from] FdError),
}

/// Creates `path` and any missing parents. Succeeds if it already exists.
pub fn mkdirs(path: impl AsRef<Path>) -> Result<(), PathError> {
  let path = path.as_ref();
  info!(path = %path.display(), "creating directories");

  fs::create_dir_all(path).map_err(|source| PathError::CreateDir {
    path: path.to_path_buf(),
    source,
  })
}

/// Renames `from` to `to`, replacing `to` if it exists.
pub fn rename(from: impl AsRef<Path>, to: impl AsRef<Path>) -> Result<(), PathError> {
  let from = from.as_ref();
  let to = to.as_ref();
  info!(from = %from.display(), to = %to.display(), "renaming");

  fs::rename(from, to).map_err(|source| PathError::Rename {
    from: from.to_path_buf(),
    to: to.to_path_buf(),
    source,
  })
}

/// Copies `from` to `to`.
///
/// Directories are copied recursively; file payloads are streamed through
/// [`Descriptor`] reads and writes in fixed-size chunks. Existing target
/// files are truncated first.
pub fn copy(from: impl AsRef<Path>, to: impl AsRef<Path>) -> Result<(), PathError> {
  let from = from.as_ref();
  let to = to.as_ref();
  info!(from = %from.display(), to = %to.display(), "copying");

  copy_tree(from, to)
}

/// Removes a file or a directory tree.
///
/// A missing `path` logs a warning and succeeds, so removal is idempotent
/// from a build script's point of view.
pub fn remove(path: impl AsRef<Path>) -> Result<(), PathError> {
  let path = path.as_ref();
  info!(path = %path.display(), "removing");

  remove_tree(path)
}

fn copy_tree(from: &Path, to: &Path) -> Result<(), PathError> {
  if !from.is_dir() {
    return copy_file(from, to);
  }

  fs::create_dir_all(to).map_err(|source| PathError::CreateDir {
    path: to.to_path_buf(),
    source,
  })?;
  for entry in read_dir(from)? {
    let entry = entry.map_err(|source| PathError::ReadDir {
      path: from.to_path_buf(),
      source,
    })?;
    copy_tree(&entry.path(), &to.join(entry.file_name()))?;
  }
  Ok(())
}

fn copy_file(from: &Path, to: &Path) -> Result<(), PathError> {
  let mut reader = Descriptor::open_read(from)?;
  let mut writer = Descriptor::open_write(to)?;

  let mut buf = [0u8; 4096];
  loop {
    let count = reader.read(&mut buf)?;
    if count == 0 {
      return Ok(());
    }

    let mut written = 0;
    while written < count {
      let step = writer.write(&buf[written..count])?;
      if step == 0 {
        return Err(FdError::Write(io::ErrorKind::WriteZero.into()).into());
      }
      written += step;
    }
  }
}

fn remove_tree(path: &Path) -> Result<(), PathError> {
  if !path.is_dir() {
    return match fs::remove_file(path) {
      Ok(()) => Ok(()),
      Err(source) if source.kind() == io::ErrorKind::NotFound => {
        warn!(path = %path.display(), "path does not exist, nothing to remove");
        Ok(())
      }
      Err(source) => Err(PathError::Remove {
        path: path.to_path_buf(),
        source,
      }),
    };
  }

  for entry in read_dir(path)? {
    let entry = entry.map_err(|source| PathError::ReadDir {
      path: path.to_path_buf(),
      source,
    })?;
    remove_tree(&entry.path())?;
  }
  fs::remove_dir(path).map_err(|source| PathError::Remove {
    path: path.to_path_buf(),
    source,
  })
}

fn read_dir(path: &Path) -> Result<fs::ReadDir, PathError> {
  fs::read_dir(path).map_err(|source| PathError::ReadDir {
    path: path.to_path_buf(),
    source,
  })
}
