//! Data files
//!
//! A [`LogFile`] bound to a file id. The active file accepts appends up to
//! its size limit; [`ActiveDataFile::retire`] consumes it and yields a
//! read-only [`RetiredDataFile`] over the same bytes.

use std::path::Path;

use crate::error::Result;
use crate::index::ValueLocation;
use crate::record::LogRecord;
use crate::CaskError;

use super::{data_file_path, LogFile, OpenMode};

/// The single data file currently accepting appends
///
/// Size checks read the offset before appending, so callers must serialize
/// writers (the engine does so with its writer guard).
#[derive(Debug)]
pub struct ActiveDataFile {
    id: u64,
    max_size: u64,
    always_sync: bool,
    file: LogFile,
}

impl ActiveDataFile {
    /// Create (or reopen for append) data file `id` inside `dir`
    pub fn create(dir: &Path, id: u64, max_size: u64, always_sync: bool) -> Result<Self> {
        let path = data_file_path(dir, id);
        let file = LogFile::open(&path, OpenMode::Append)?;

        tracing::debug!(file_id = id, path = %path.display(), "opened active data file");

        Ok(Self {
            id,
            max_size,
            always_sync,
            file,
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    /// Bytes written so far
    pub fn offset(&self) -> u64 {
        self.file.offset()
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Append a normal record for `(key, value)`
    ///
    /// Without `force`, fails with [`CaskError::FileTooSmall`] when the record
    /// would push a non-empty file past its limit. An empty file takes any
    /// record, since a fresh file could not hold it either.
    pub fn write(&self, key: &[u8], value: &[u8], force: bool) -> Result<ValueLocation> {
        self.append(LogRecord::normal(key, value), force)
    }

    /// Append a tombstone for `key`, under the same size policy as `write`
    pub fn delete(&self, key: &[u8], force: bool) -> Result<ValueLocation> {
        self.append(LogRecord::tombstone(key), force)
    }

    /// Read the value of the record at `location` (empty for a tombstone)
    pub fn read(&self, location: &ValueLocation) -> Result<Vec<u8>> {
        read_value(&self.file, location)
    }

    pub fn sync(&self) -> Result<()> {
        self.file.sync()
    }

    /// Reopen the same file read-only and drop the write handle
    ///
    /// The read-only handle is opened and the writes synced before anything
    /// is released. On failure the file comes back untouched with the error,
    /// still accepting appends.
    pub fn retire(self) -> std::result::Result<RetiredDataFile, (Self, CaskError)> {
        let file = match LogFile::open(self.file.path(), OpenMode::ReadOnly) {
            Ok(file) => file,
            Err(e) => return Err((self, e)),
        };
        if let Err(e) = self.file.sync() {
            return Err((self, e));
        }

        tracing::debug!(file_id = self.id, size = file.offset(), "retired data file");

        Ok(RetiredDataFile { id: self.id, file })
    }

    pub fn close(self) -> Result<()> {
        self.file.close()
    }

    /// Close and delete the file from disk
    pub fn remove(self) -> Result<()> {
        self.file.delete()
    }

    fn append(&self, record: LogRecord, force: bool) -> Result<ValueLocation> {
        let record_size = record.encoded_len();
        if !force {
            self.check_capacity(record_size)?;
        }

        let bytes = record.encode();
        let (offset, written) = self.file.append(&bytes)?;
        if self.always_sync {
            self.file.sync()?;
        }

        tracing::trace!(
            file_id = self.id,
            offset,
            len = written,
            kind = ?record.kind(),
            "appended record"
        );

        Ok(ValueLocation::new(self.id, offset, written, record.timestamp()))
    }

    fn check_capacity(&self, record_size: u64) -> Result<()> {
        let offset = self.file.offset();
        if offset > 0 && offset.saturating_add(record_size) > self.max_size {
            return Err(CaskError::FileTooSmall {
                file_id: self.id,
                offset,
                record_size,
                max_size: self.max_size,
            });
        }
        Ok(())
    }
}

/// A data file that no longer takes writes
#[derive(Debug)]
pub struct RetiredDataFile {
    id: u64,
    file: LogFile,
}

impl RetiredDataFile {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn size(&self) -> u64 {
        self.file.offset()
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Read the value of the record at `location` (empty for a tombstone)
    pub fn read(&self, location: &ValueLocation) -> Result<Vec<u8>> {
        read_value(&self.file, location)
    }

    pub fn close(self) -> Result<()> {
        self.file.close()
    }

    /// Close and delete the file from disk
    pub fn remove(self) -> Result<()> {
        self.file.delete()
    }
}

fn read_value(file: &LogFile, location: &ValueLocation) -> Result<Vec<u8>> {
    let bytes = file.read_at(location.offset, location.length)?;
    Ok(LogRecord::decode(&bytes)?.into_value())
}
