//! Engine Module
//!
//! The storage engine that ties the index and the data files together.
//!
//! ## Responsibilities
//! - Lazily create the active data file on first write
//! - Rotate the active file when a record no longer fits, then retry
//! - Keep the index pointing at the latest record of every live key
//! - Route reads to the active or the matching retired file
//!
//! The index is not rebuilt from existing files on open. Data written by a
//! previous process stays on disk but is not reachable through this engine.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{RwLock, RwLockUpgradableReadGuard};

use crate::command::Command;
use crate::config::Config;
use crate::error::Result;
use crate::index::{Indexer, ValueLocation};
use crate::storage::{self, ActiveDataFile, RetiredDataFile};
use crate::CaskError;

/// Active file plus every retired file, keyed by file id
#[derive(Default)]
struct DataFiles {
    active: Option<ActiveDataFile>,
    retired: HashMap<u64, RetiredDataFile>,
}

impl DataFiles {
    /// Read the value at `location` from whichever file holds it
    fn read(&self, location: &ValueLocation) -> Result<Vec<u8>> {
        match &self.active {
            Some(active) if active.id() == location.file_id => active.read(location),
            _ => self
                .retired
                .get(&location.file_id)
                .ok_or(CaskError::DataFileNotFound(location.file_id))?
                .read(location),
        }
    }
}

/// The main storage engine
///
/// ## Concurrency Model
///
/// - **Writes** (put/delete): take an upgradable read on `files`
///   - Only ONE writer at a time, readers are not blocked
///   - Upgraded to exclusive only to create or rotate the active file
///   - The index is updated before the writer guard is released, so an
///     entry never points past the end of its file and two writes to the
///     same key publish in append order
///
/// - **Reads** (get): index read lock, then a shared lock on `files`
///   - Each `LogFile` adds its own shared/exclusive lock around the bytes
///
/// - **File ids**: atomic counter owned by this engine, never reused
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// Which file is active, and the retired ones
    files: RwLock<DataFiles>,

    /// Key → location of its latest record (internal RwLock)
    index: Box<dyn Indexer>,

    /// Id handed to the next data file
    next_file_id: AtomicU64,
}

impl Engine {
    /// Open an engine over the configured directory
    ///
    /// Creates the directory if needed. Existing data files are left alone and
    /// new ids continue after the highest one found.
    pub fn open(config: Config) -> Result<Self> {
        fs::create_dir_all(&config.dir)?;

        let existing = Self::existing_file_ids(&config.dir)?;
        let next_file_id = existing.last().map(|&id| id + 1).unwrap_or(1);

        if !existing.is_empty() {
            tracing::warn!(
                dir = %config.dir.display(),
                files = existing.len(),
                next_file_id,
                "existing data files are not indexed"
            );
        }

        tracing::info!(
            dir = %config.dir.display(),
            max_file_size = config.max_file_size,
            always_sync = config.always_sync,
            index = ?config.index_kind,
            "opened engine"
        );

        Ok(Self {
            index: config.index_kind.build(),
            files: RwLock::new(DataFiles::default()),
            next_file_id: AtomicU64::new(next_file_id),
            config,
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified directory
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::builder().dir(path).build())
    }

    /// Execute a command
    ///
    /// Routes commands to appropriate handlers
    pub fn execute(&self, command: Command) -> Result<Option<Vec<u8>>> {
        match command {
            Command::Get { key } => self.get(&key),
            Command::Put { key, value } => {
                self.put(&key, &value)?;
                Ok(None)
            }
            Command::Delete { key } => {
                self.delete(&key)?;
                Ok(None)
            }
            Command::Keys => {
                let keys = self.keys();
                let mut listing = Vec::new();
                for key in keys {
                    listing.extend_from_slice(&key);
                    listing.push(b'\n');
                }
                Ok(Some(listing))
            }
            Command::Sync => {
                self.sync()?;
                Ok(None)
            }
        }
    }

    /// Get the value for `key`
    ///
    /// Absent keys yield `Ok(None)`. Checksum and IO failures from the read
    /// are returned as errors.
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let Some(location) = self.index.get(key) else {
            return Ok(None);
        };

        let files = self.files.read();
        files.read(&location).map(Some)
    }

    /// Put a key-value pair
    ///
    /// If the active file is full it is retired, a new one is opened, and the
    /// write is retried there unconditionally.
    pub fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.append(
            |active, force| active.write(key, value, force),
            |location| {
                self.index.set(key.to_vec(), location);
            },
        )
    }

    /// Delete a key
    ///
    /// A tombstone is always appended, even for keys never written, and the key
    /// is dropped from the index once the tombstone is on disk.
    pub fn delete(&self, key: &[u8]) -> Result<()> {
        self.append(
            |active, _| active.delete(key, true),
            |_| {
                self.index.delete(key);
            },
        )
    }

    /// Sync the active file to disk (no-op before the first write)
    pub fn sync(&self) -> Result<()> {
        match &self.files.read().active {
            Some(active) => active.sync(),
            None => Ok(()),
        }
    }

    /// Live keys, in key order for an ordered index
    pub fn keys(&self) -> Vec<Vec<u8>> {
        self.index.keys()
    }

    /// Close the engine
    ///
    /// Closes the active file, then every retired file. A failure does not stop
    /// the remaining closes; the first error is returned.
    pub fn close(self) -> Result<()> {
        let files = self.files.into_inner();
        let mut first_error = None;

        if let Some(active) = files.active {
            let id = active.id();
            keep_first_error(&mut first_error, id, active.close());
        }
        for (id, retired) in files.retired {
            keep_first_error(&mut first_error, id, retired.close());
        }

        tracing::info!(dir = %self.config.dir.display(), "closed engine");

        first_error.map_or(Ok(()), Err)
    }

    /// Close the engine and delete every data file it holds
    ///
    /// Same error policy as [`close`](Self::close).
    pub fn destroy(self) -> Result<()> {
        let files = self.files.into_inner();
        let mut first_error = None;

        if let Some(active) = files.active {
            let id = active.id();
            keep_first_error(&mut first_error, id, active.remove());
        }
        for (id, retired) in files.retired {
            keep_first_error(&mut first_error, id, retired.remove());
        }

        tracing::info!(dir = %self.config.dir.display(), "destroyed engine data files");

        first_error.map_or(Ok(()), Err)
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the data directory path
    pub fn dir(&self) -> &Path {
        &self.config.dir
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Id of the active file, if one has been created
    pub fn active_file_id(&self) -> Option<u64> {
        self.files.read().active.as_ref().map(ActiveDataFile::id)
    }

    /// Ids of the retired files, ascending
    pub fn retired_file_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.files.read().retired.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Number of data files (active + retired)
    pub fn file_count(&self) -> usize {
        let files = self.files.read();
        files.retired.len() + usize::from(files.active.is_some())
    }

    /// Number of live keys in the index
    pub fn key_count(&self) -> usize {
        self.index.len()
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Append through the active file and publish the result
    ///
    /// `write` is first tried unforced against the current active file. When
    /// there is none, or it reports `FileTooSmall`, the writer guard is upgraded,
    /// the full file retired, a new one opened and `write` retried forced.
    /// `commit` runs while the writer guard is still held.
    fn append<W, C>(&self, write: W, commit: C) -> Result<()>
    where
        W: Fn(&ActiveDataFile, bool) -> Result<ValueLocation>,
        C: FnOnce(ValueLocation),
    {
        let files = self.files.upgradable_read();

        if let Some(active) = &files.active {
            match write(active, false) {
                Ok(location) => {
                    commit(location);
                    return Ok(());
                }
                Err(CaskError::FileTooSmall { .. }) => {}
                Err(e) => return Err(e),
            }
        }

        let mut files = RwLockUpgradableReadGuard::upgrade(files);

        let retired_id = match files.active.take() {
            Some(full) => {
                let id = full.id();
                match full.retire() {
                    Ok(retired) => {
                        files.retired.insert(id, retired);
                        Some(id)
                    }
                    Err((full, e)) => {
                        tracing::warn!(
                            file_id = id,
                            error = %e,
                            "failed to retire active data file"
                        );
                        files.active = Some(full);
                        return Err(e);
                    }
                }
            }
            None => None,
        };

        let active = files.active.insert(self.create_active_file()?);
        if let Some(retired) = retired_id {
            tracing::debug!(retired, active = active.id(), "rotated active data file");
        }

        let location = write(active, true)?;
        commit(location);
        Ok(())
    }

    fn create_active_file(&self) -> Result<ActiveDataFile> {
        let id = self.next_file_id.fetch_add(1, Ordering::SeqCst);
        ActiveDataFile::create(
            &self.config.dir,
            id,
            self.config.max_file_size,
            self.config.always_sync,
        )
    }

    /// Ids of the data files already present in `dir`, ascending
    fn existing_file_ids(dir: &Path) -> Result<Vec<u64>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() {
                if let Some(id) = storage::parse_file_id(&path) {
                    ids.push(id);
                }
            }
        }
        ids.sort_unstable();
        Ok(ids)
    }
}

/// Record `result` into `first` unless an earlier error is already held
fn keep_first_error(first: &mut Option<CaskError>, file_id: u64, result: Result<()>) {
    if let Err(e) = result {
        tracing::warn!(file_id, error = %e, "failed to release data file");
        if first.is_none() {
            *first = Some(e);
        }
    }
}
