//! Record Module
//!
//! Binary codec for the entries of a data file.
//!
//! ## Responsibilities
//! - Encode a single log record into its exact on-disk byte layout
//! - CRC32 checksum over every field after the checksum itself
//! - Decode and verify, failing closed on any mismatch
//! - Predict the encoded size of a record before it touches disk
//!
//! ## Record Format (little-endian)
//! ```text
//! Normal:
//! ┌─────────┬──────────┬───────────┬────────────┬────────────┬─────┬───────┐
//! │ CRC (4) │ Kind (1) │ Time (8)  │ KeyLen (8) │ ValLen (8) │ Key │ Value │
//! └─────────┴──────────┴───────────┴────────────┴────────────┴─────┴───────┘
//!
//! Tombstone:
//! ┌─────────┬──────────┬───────────┬────────────┬─────┐
//! │ CRC (4) │ Kind (1) │ Time (8)  │ KeyLen (8) │ Key │
//! └─────────┴──────────┴───────────┴────────────┴─────┘
//! ```

mod entry;

pub use entry::{size_of, LogRecord, RecordKind};

/// Size of the checksum field
pub const CHECKSUM_SIZE: usize = 4;

/// Size of the record kind field
pub const KIND_SIZE: usize = 1;

/// Size of the timestamp field
pub const TIMESTAMP_SIZE: usize = 8;

/// Size of each length field (key length, value length)
pub const LEN_SIZE: usize = 8;

/// Fixed header size of a tombstone record (no value length field)
pub const TOMBSTONE_HEADER_SIZE: usize = CHECKSUM_SIZE + KIND_SIZE + TIMESTAMP_SIZE + LEN_SIZE;

/// Fixed header size of a normal record
pub const NORMAL_HEADER_SIZE: usize = TOMBSTONE_HEADER_SIZE + LEN_SIZE;
