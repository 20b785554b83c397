//! Hash index
//!
//! HashMap-based index with RwLock for concurrency. Point operations only.

use std::collections::HashMap;

use parking_lot::RwLock;

use super::{Indexer, ValueLocation};

#[derive(Debug, Default)]
pub struct HashIndex {
    map: RwLock<HashMap<Vec<u8>, ValueLocation>>,
}

impl HashIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Indexer for HashIndex {
    fn get(&self, key: &[u8]) -> Option<ValueLocation> {
        self.map.read().get(key).copied()
    }

    fn set(&self, key: Vec<u8>, location: ValueLocation) -> Option<ValueLocation> {
        self.map.write().insert(key, location)
    }

    fn delete(&self, key: &[u8]) -> Option<ValueLocation> {
        self.map.write().remove(key)
    }

    fn keys(&self) -> Vec<Vec<u8>> {
        self.map.read().keys().cloned().collect()
    }

    fn len(&self) -> usize {
        self.map.read().len()
    }
}
