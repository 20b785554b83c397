//! Persistent file handle
//!
//! One on-disk file with its next write offset.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use crate::error::Result;
use crate::CaskError;

/// How a [`LogFile`] was opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Append-write, only ever used for the active file
    Append,

    /// Read-only, used for retired files
    ReadOnly,
}

/// File plus the offset the next append will land at
#[derive(Debug)]
struct FileState {
    file: File,
    offset: u64,
}

/// Append/read handle over a single file
///
/// ## Concurrency:
/// - `append`: exclusive lock (mutates the file and the offset)
/// - `read_at`: shared lock, positioned reads never move a cursor
#[derive(Debug)]
pub struct LogFile {
    path: PathBuf,
    mode: OpenMode,
    state: RwLock<FileState>,
}

impl LogFile {
    /// Open `path` in the given mode
    ///
    /// Append mode creates the file if missing. The offset starts at the
    /// current file length, so existing bytes are never overwritten.
    pub fn open(path: &Path, mode: OpenMode) -> Result<Self> {
        let file = match mode {
            OpenMode::Append => OpenOptions::new()
                .create(true)
                .read(true)
                .append(true)
                .open(path)?,
            OpenMode::ReadOnly => OpenOptions::new().read(true).open(path)?,
        };
        let offset = file.metadata()?.len();

        Ok(Self {
            path: path.to_path_buf(),
            mode,
            state: RwLock::new(FileState { file, offset }),
        })
    }

    /// Append `bytes`, returning `(start_offset, bytes_written)`
    ///
    /// `start_offset` is the offset before the write. On failure the offset is
    /// left untouched and any partially written tail is truncated away.
    pub fn append(&self, bytes: &[u8]) -> Result<(u64, u64)> {
        if self.mode == OpenMode::ReadOnly {
            return Err(CaskError::ReadOnlyFile(self.path.clone()));
        }

        let mut state = self.state.write();
        let start = state.offset;

        if let Err(e) = state.file.write_all(bytes) {
            if let Err(truncate_err) = state.file.set_len(start) {
                tracing::warn!(
                    path = %self.path.display(),
                    offset = start,
                    error = %truncate_err,
                    "failed to roll back partial append"
                );
            }
            return Err(e.into());
        }

        let written = bytes.len() as u64;
        state.offset += written;
        Ok((start, written))
    }

    /// Read exactly `length` bytes starting at `offset`
    pub fn read_at(&self, offset: u64, length: u64) -> Result<Vec<u8>> {
        let state = self.state.read();
        let mut buf = vec![0u8; length as usize];
        read_exact_at(&state.file, &mut buf, offset)?;
        Ok(buf)
    }

    /// Flush file contents to disk
    pub fn sync(&self) -> Result<()> {
        self.state.read().file.sync_all()?;
        Ok(())
    }

    /// Offset the next append will start at (== bytes in the file)
    pub fn offset(&self) -> u64 {
        self.state.read().offset
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    /// Close the handle, syncing first if it was writable
    pub fn close(self) -> Result<()> {
        if self.mode == OpenMode::Append {
            self.sync()?;
        }
        Ok(())
    }

    /// Close the handle and remove the file from disk
    pub fn delete(self) -> Result<()> {
        let path = self.path.clone();
        drop(self);
        fs::remove_file(path)?;
        Ok(())
    }
}

#[cfg(unix)]
fn read_exact_at(file: &File, buf: &mut [u8], offset: u64) -> io::Result<()> {
    use std::os::unix::fs::FileExt;

    file.read_exact_at(buf, offset)
}

#[cfg(windows)]
fn read_exact_at(file: &File, mut buf: &mut [u8], mut offset: u64) -> io::Result<()> {
    use std::os::windows::fs::FileExt;

    while !buf.is_empty() {
        match file.seek_read(buf, offset) {
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "failed to fill whole buffer",
                ))
            }
            Ok(n) => {
                buf = &mut buf[n..];
                offset += n as u64;
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}
