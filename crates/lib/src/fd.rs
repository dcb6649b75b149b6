//! Move-only descriptors over open files and pipe endpoints.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FdError {
  #[error("Failed to open {path} for reading: {source}")]
  OpenRead {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("Failed to open {path} for writing: {source}")]
  OpenWrite {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("Failed to create pipe: {0}")]
  Pipe(#[source] io::Error),

  #[error("Read failed: {0}")]
  Read(#[source] io::Error),

  #[error("Write failed: {0}")]
  Write(#[source] io::Error),
}

/// An exclusively owned handle to an open file or one end of a pipe.
///
/// A `Descriptor` cannot be copied or cloned. It is released exactly once:
/// explicitly via [`close`](Descriptor::close), on drop, or by moving it into
/// a spawn call, so double-close and use-after-close cannot be written.
#[derive(Debug)]
pub struct Descriptor {
  inner: File,
}

impl Descriptor {
  /// Opens `path` for reading.
  pub fn open_read(path: impl AsRef<Path>) -> Result<Self, FdError> {
    let path = path.as_ref();
    let inner = File::open(path).map_err(|source| FdError::OpenRead {
      path: path.to_path_buf(),
      source,
    })?;
    Ok(Descriptor { inner })
  }

  /// Opens `path` for writing, creating it if absent and truncating it
  /// otherwise. New files are created with mode `0o644` on Unix (before
  /// umask).
  pub fn open_write(path: impl AsRef<Path>) -> Result<Self, FdError> {
    let path = path.as_ref();
    let inner = write_options().open(path).map_err(|source| FdError::OpenWrite {
      path: path.to_path_buf(),
      source,
    })?;
    Ok(Descriptor { inner })
  }

  /// Reads into `buf`, returning the byte count; 0 means end of stream.
  ///
  /// Failures here are not fatal by themselves; the caller decides whether
  /// to escalate.
  pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, FdError> {
    self.inner.read(buf).map_err(FdError::Read)
  }

  /// Writes from `buf`, returning the byte count actually written.
  pub fn write(&mut self, buf: &[u8]) -> Result<usize, FdError> {
    self.inner.write(buf).map_err(FdError::Write)
  }

  /// Releases the underlying OS handle.
  ///
  /// Dropping does the same; this form marks hand-off points in calling
  /// code.
  pub fn close(self) {}

  pub(crate) fn into_file(self) -> File {
    self.inner
  }

  fn from_file(inner: File) -> Self {
    Descriptor { inner }
  }
}

/// A connected pipe pair.
///
/// Bytes written to `write` become readable from `read`. The read end only
/// reports end-of-stream once every copy of the write end, in every process,
/// has been closed.
#[derive(Debug)]
pub struct Pipe {
  pub read: Descriptor,
  pub write: Descriptor,
}

/// Creates a connected [`Pipe`] atomically.
pub fn pipe() -> Result<Pipe, FdError> {
  let (read, write) = sys_pipe().map_err(FdError::Pipe)?;
  Ok(Pipe {
    read: Descriptor::from_file(read),
    write: Descriptor::from_file(write),
  })
}

#[cfg(unix)]
fn write_options() -> OpenOptions {
  use std::os::unix::fs::OpenOptionsExt;

  let mut options = OpenOptions::new();
  options.write(true).create(true).truncate(true).mode(0o644);
  options
}

#[cfg(not(unix))]
fn write_options() -> OpenOptions {
  let mut options = OpenOptions::new();
  options.write(true).create(true).truncate(true);
  options
}

#[cfg(unix)]
fn sys_pipe() -> io::Result<(File, File)> {
  let (read, write) =
    rustix::pipe::pipe().map_err(|e| io::Error::from_raw_os_error(e.raw_os_error()))?;
  Ok((File::from(read), File::from(write)))
}

#[cfg(windows)]
fn sys_pipe() -> io::Result<(File, File)> {
  use std::os::windows::io::{FromRawHandle, OwnedHandle};
  use windows_sys::Win32::System::Pipes::CreatePipe;

  let mut read = std::ptr::null_mut();
  let mut write = std::ptr::null_mut();

  // SAFETY: CreatePipe only writes the two out-pointers, both of which point
  // at live locals. Null attributes and size 0 select the defaults.
  let result = unsafe { CreatePipe(&mut read, &mut write, std::ptr::null(), 0) };
  if result == 0 {
    return Err(io::Error::last_os_error());
  }

  // SAFETY: both handles are freshly created, valid, and owned by nothing
  // else yet.
  let (read, write) = unsafe {
    (
      OwnedHandle::from_raw_handle(read as _),
      OwnedHandle::from_raw_handle(write as _),
    )
  };
  Ok((File::from(read), File::from(write)))
}
