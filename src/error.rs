//! Error types for logcask
//!
//! Provides a unified error type for all operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using CaskError
pub type Result<T> = std::result::Result<T, CaskError>;

/// Unified error type for logcask operations
#[derive(Debug, Error)]
pub enum CaskError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Record Errors
    // -------------------------------------------------------------------------
    /// The stored checksum does not match the one computed over the record bytes.
    /// The byte range is corrupt or truncated and must not be retried.
    #[error("Checksum mismatch: stored {stored:#010x}, computed {computed:#010x}")]
    ChecksumMismatch { stored: u32, computed: u32 },

    #[error("Record corruption detected: {0}")]
    Corruption(String),

    // -------------------------------------------------------------------------
    // Data File Errors
    // -------------------------------------------------------------------------
    /// The active file cannot take this record without exceeding its size limit.
    /// Only ever seen between a data file and the engine, which rotates and retries.
    #[error(
        "Data file {file_id} too small: record of {record_size} bytes at offset {offset} exceeds max size {max_size}"
    )]
    FileTooSmall {
        file_id: u64,
        offset: u64,
        record_size: u64,
        max_size: u64,
    },

    #[error("Attempted to append to read-only file {0}")]
    ReadOnlyFile(PathBuf),

    #[error("Data file {0} is not held by this engine")]
    DataFileNotFound(u64),

    // -------------------------------------------------------------------------
    // Key Errors
    // -------------------------------------------------------------------------
    #[error("Key required")]
    KeyRequired,

    // -------------------------------------------------------------------------
    // Command Errors
    // -------------------------------------------------------------------------
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}
