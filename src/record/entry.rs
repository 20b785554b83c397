//! Log record definitions
//!
//! Defines the structure of individual data-file records and their codec.

use std::time::{SystemTime, UNIX_EPOCH};

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::Result;
use crate::CaskError;

use super::{CHECKSUM_SIZE, NORMAL_HEADER_SIZE, TOMBSTONE_HEADER_SIZE};

/// Kind of a log record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RecordKind {
    /// A live key-value pair
    Normal = 0,

    /// A deletion marker, carries no value
    Tombstone = 1,
}

impl RecordKind {
    /// Size of the fixed-width header for this kind
    pub fn header_size(self) -> usize {
        match self {
            RecordKind::Normal => NORMAL_HEADER_SIZE,
            RecordKind::Tombstone => TOMBSTONE_HEADER_SIZE,
        }
    }
}

impl TryFrom<u8> for RecordKind {
    type Error = CaskError;

    fn try_from(byte: u8) -> Result<Self> {
        match byte {
            0 => Ok(RecordKind::Normal),
            1 => Ok(RecordKind::Tombstone),
            other => Err(CaskError::Corruption(format!("unknown record kind: {}", other))),
        }
    }
}

/// Encoded size of a record, computed from its kind and lengths alone
///
/// `value_len` is ignored for tombstones.
pub fn size_of(kind: RecordKind, key_len: u64, value_len: u64) -> u64 {
    let header = kind.header_size() as u64;
    match kind {
        RecordKind::Normal => header.saturating_add(key_len).saturating_add(value_len),
        RecordKind::Tombstone => header.saturating_add(key_len),
    }
}

/// A single record in a data file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    kind: RecordKind,

    /// Seconds since the unix epoch when the record was created
    timestamp: u64,

    key: Vec<u8>,

    /// Always empty for tombstones
    value: Vec<u8>,
}

impl LogRecord {
    /// Create a normal (key, value) record stamped with the current time
    pub fn normal(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            kind: RecordKind::Normal,
            timestamp: unix_now(),
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a tombstone for `key` stamped with the current time
    pub fn tombstone(key: impl Into<Vec<u8>>) -> Self {
        Self {
            kind: RecordKind::Tombstone,
            timestamp: unix_now(),
            key: key.into(),
            value: Vec::new(),
        }
    }

    /// Override the creation timestamp
    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn into_value(self) -> Vec<u8> {
        self.value
    }

    pub fn key_len(&self) -> u64 {
        self.key.len() as u64
    }

    pub fn value_len(&self) -> u64 {
        self.value.len() as u64
    }

    /// Number of bytes `encode` will produce
    pub fn encoded_len(&self) -> u64 {
        size_of(self.kind, self.key_len(), self.value_len())
    }

    /// CRC32 over every encoded field after the checksum
    pub fn checksum(&self) -> u32 {
        let encoded = self.encode();
        crc32fast::hash(&encoded[CHECKSUM_SIZE..])
    }

    /// Serialize to the on-disk layout, checksum first
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.encoded_len() as usize);

        // Placeholder, filled once the rest of the record is laid out
        buf.put_u32_le(0);
        buf.put_u8(self.kind as u8);
        buf.put_u64_le(self.timestamp);
        buf.put_u64_le(self.key_len());
        if self.kind == RecordKind::Normal {
            buf.put_u64_le(self.value_len());
        }
        buf.put_slice(&self.key);
        if self.kind == RecordKind::Normal {
            buf.put_slice(&self.value);
        }

        let crc = crc32fast::hash(&buf[CHECKSUM_SIZE..]);
        buf[..CHECKSUM_SIZE].copy_from_slice(&crc.to_le_bytes());

        buf.freeze()
    }

    /// Deserialize exactly one record from `data`
    ///
    /// `data` must span the whole record and nothing more. The checksum is
    /// verified before any field is trusted; no partial record is ever returned.
    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() < CHECKSUM_SIZE {
            return Err(CaskError::Corruption(format!(
                "record truncated: {} bytes",
                data.len()
            )));
        }

        let mut buf = data;
        let stored = buf.get_u32_le();
        let computed = crc32fast::hash(buf);
        if stored != computed {
            return Err(CaskError::ChecksumMismatch { stored, computed });
        }

        if !buf.has_remaining() {
            return Err(CaskError::Corruption("record has no kind byte".to_string()));
        }
        let kind = RecordKind::try_from(buf.get_u8())?;

        if data.len() < kind.header_size() {
            return Err(CaskError::Corruption(format!(
                "record header truncated: {} of {} bytes",
                data.len(),
                kind.header_size()
            )));
        }

        let timestamp = buf.get_u64_le();
        let key_len = buf.get_u64_le();
        let value_len = match kind {
            RecordKind::Normal => buf.get_u64_le(),
            RecordKind::Tombstone => 0,
        };

        let expected = size_of(kind, key_len, value_len);
        if expected != data.len() as u64 {
            return Err(CaskError::Corruption(format!(
                "record length mismatch: header declares {} bytes, got {}",
                expected,
                data.len()
            )));
        }

        let key = buf[..key_len as usize].to_vec();
        buf.advance(key_len as usize);
        let value = buf[..value_len as usize].to_vec();

        Ok(Self {
            kind,
            timestamp,
            key,
            value,
        })
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
