//! Configuration for logcask
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::index::IndexKind;

/// Default size limit for a single data file (4 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 4 << 20;

/// Default data directory
pub const DEFAULT_DIR: &str = "bit_cask_data_dir";

/// Main configuration for a logcask engine
///
/// Consumed as-is by [`Engine::open`](crate::Engine::open); the engine never
/// mutates it afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Directory holding the numbered data files
    /// Internal structure:
    ///   {dir}/
    ///     ├── 000001.db
    ///     ├── 000002.db
    ///     └── ...
    pub dir: PathBuf,

    /// Size limit of the active data file (in bytes)
    ///
    /// Advisory: a record that would not fit even in an empty file is still
    /// written, it just gets a file to itself.
    pub max_file_size: u64,

    /// fsync after every append before returning to the caller
    pub always_sync: bool,

    // -------------------------------------------------------------------------
    // Index Configuration
    // -------------------------------------------------------------------------
    /// Which in-memory index implementation to use
    pub index_kind: IndexKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_DIR),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            always_sync: false,
            index_kind: IndexKind::BTree,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory
    pub fn dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.dir = path.into();
        self
    }

    /// Set the size limit of a single data file (in bytes)
    pub fn max_file_size(mut self, size: u64) -> Self {
        self.config.max_file_size = size;
        self
    }

    /// Sync every append to disk
    pub fn always_sync(mut self, always_sync: bool) -> Self {
        self.config.always_sync = always_sync;
        self
    }

    /// Select the index implementation
    pub fn index_kind(mut self, kind: IndexKind) -> Self {
        self.config.index_kind = kind;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
