//! Index Module
//!
//! In-memory mapping from key to the on-disk location of its latest record.
//!
//! ## Responsibilities
//! - Point lookups, upserts and removals by key
//! - Shared/exclusive locking independent of file locks
//! - Ordered iteration (tree variant only)
//!
//! ## Implementations
//! - [`BTreeIndex`]: `BTreeMap`, byte-lexicographic order, supports range scans
//! - [`HashIndex`]: `HashMap`, point operations only
//!
//! Both behave identically for point operations and are chosen at engine
//! construction through [`IndexKind`].

mod btree;
mod hash;

pub use btree::BTreeIndex;
pub use hash::HashIndex;

/// Where the current record for a key lives on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueLocation {
    /// Data file holding the record
    pub file_id: u64,

    /// Byte offset of the record start within that file
    pub offset: u64,

    /// Length of the whole encoded record, not just the value payload
    pub length: u64,

    /// Record creation time (seconds since the unix epoch)
    pub timestamp: u64,
}

impl ValueLocation {
    pub fn new(file_id: u64, offset: u64, length: u64, timestamp: u64) -> Self {
        Self {
            file_id,
            offset,
            length,
            timestamp,
        }
    }
}

/// Interface shared by the index implementations
///
/// Keys may be any byte sequence, including the empty one. Locations are
/// replaced wholesale on every `set`, never mutated in place.
pub trait Indexer: Send + Sync {
    /// Look up the location for `key` (read lock)
    fn get(&self, key: &[u8]) -> Option<ValueLocation>;

    /// Insert or replace the location for `key` (write lock), returning the old one
    fn set(&self, key: Vec<u8>, location: ValueLocation) -> Option<ValueLocation>;

    /// Remove `key` (write lock), returning its last location
    fn delete(&self, key: &[u8]) -> Option<ValueLocation>;

    /// All indexed keys; ordered only for ordered implementations
    fn keys(&self) -> Vec<Vec<u8>>;

    /// Number of indexed keys
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Index implementation selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IndexKind {
    /// Ordered tree (supports range iteration)
    #[default]
    BTree,

    /// Hash map (point lookups only)
    Hash,
}

impl IndexKind {
    /// Build an empty index of this kind
    pub fn build(self) -> Box<dyn Indexer> {
        match self {
            IndexKind::BTree => Box::new(BTreeIndex::new()),
            IndexKind::Hash => Box::new(HashIndex::new()),
        }
    }
}
