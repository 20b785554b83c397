//! Ordered index
//!
//! BTreeMap-based index with RwLock for concurrency.

use std::collections::BTreeMap;
use std::ops::Bound;

use parking_lot::RwLock;

use super::{Indexer, ValueLocation};

/// Ordered index keyed by raw bytes (byte-lexicographic order)
#[derive(Debug, Default)]
pub struct BTreeIndex {
    tree: RwLock<BTreeMap<Vec<u8>, ValueLocation>>,
}

impl BTreeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the entries within `(start, end)`, in key order
    pub fn range(
        &self,
        start: Bound<&[u8]>,
        end: Bound<&[u8]>,
    ) -> Vec<(Vec<u8>, ValueLocation)> {
        if is_inverted(start, end) {
            return Vec::new();
        }

        let tree = self.tree.read();
        tree.range::<[u8], _>((start, end))
            .map(|(key, location)| (key.clone(), *location))
            .collect()
    }
}

impl Indexer for BTreeIndex {
    fn get(&self, key: &[u8]) -> Option<ValueLocation> {
        self.tree.read().get(key).copied()
    }

    fn set(&self, key: Vec<u8>, location: ValueLocation) -> Option<ValueLocation> {
        self.tree.write().insert(key, location)
    }

    fn delete(&self, key: &[u8]) -> Option<ValueLocation> {
        self.tree.write().remove(key)
    }

    fn keys(&self) -> Vec<Vec<u8>> {
        self.tree.read().keys().cloned().collect()
    }

    fn len(&self) -> usize {
        self.tree.read().len()
    }
}

/// Ranges `BTreeMap::range` would panic on: start past end, or an empty
/// range excluded on both sides
fn is_inverted(start: Bound<&[u8]>, end: Bound<&[u8]>) -> bool {
    match (start, end) {
        (Bound::Excluded(s), Bound::Excluded(e)) => s >= e,
        (Bound::Included(s) | Bound::Excluded(s), Bound::Included(e) | Bound::Excluded(e)) => s > e,
        _ => false,
    }
}
