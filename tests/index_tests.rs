//! Tests for the in-memory indexes
//!
//! These tests verify:
//! - Point operations behave identically for both implementations
//! - Empty keys are ordinary keys
//! - Byte-lexicographic ordering and range scans of the tree index
//! - Concurrent access through the internal locks

use std::ops::Bound;

use logcask::index::{BTreeIndex, HashIndex, IndexKind, Indexer, ValueLocation};

fn location(file_id: u64, offset: u64) -> ValueLocation {
    ValueLocation::new(file_id, offset, 40, 1_700_000_000)
}

// =============================================================================
// Shared Point-Operation Tests (generated for each implementation)
// =============================================================================

macro_rules! indexer_tests {
    ($module:ident, $make:expr) => {
        mod $module {
            use super::*;
            use std::sync::Arc;
            use std::thread;

            fn make() -> Box<dyn Indexer> {
                $make
            }

            #[test]
            fn test_get_missing_key() {
                let index = make();
                assert_eq!(index.get(b"missing"), None);
                assert!(index.is_empty());
            }

            #[test]
            fn test_set_and_get() {
                let index = make();
                assert_eq!(index.set(b"key".to_vec(), location(1, 0)), None);

                assert_eq!(index.get(b"key"), Some(location(1, 0)));
                assert_eq!(index.len(), 1);
            }

            #[test]
            fn test_set_replaces_location() {
                let index = make();
                index.set(b"key".to_vec(), location(1, 0));

                let previous = index.set(b"key".to_vec(), location(2, 64));

                assert_eq!(previous, Some(location(1, 0)));
                assert_eq!(index.get(b"key"), Some(location(2, 64)));
                assert_eq!(index.len(), 1);
            }

            #[test]
            fn test_delete() {
                let index = make();
                index.set(b"key".to_vec(), location(1, 0));

                assert_eq!(index.delete(b"key"), Some(location(1, 0)));
                assert_eq!(index.get(b"key"), None);
                assert!(index.is_empty());
            }

            #[test]
            fn test_delete_missing_key() {
                let index = make();
                assert_eq!(index.delete(b"missing"), None);
            }

            #[test]
            fn test_empty_key_is_distinct() {
                let index = make();
                index.set(Vec::new(), location(1, 0));
                index.set(b"\0".to_vec(), location(1, 40));

                assert_eq!(index.get(b""), Some(location(1, 0)));
                assert_eq!(index.get(b"\0"), Some(location(1, 40)));

                index.delete(b"");
                assert_eq!(index.get(b""), None);
                assert_eq!(index.get(b"\0"), Some(location(1, 40)));
            }

            #[test]
            fn test_keys_lists_every_live_key() {
                let index = make();
                for key in [&b"b"[..], b"a", b"c"] {
                    index.set(key.to_vec(), location(1, 0));
                }
                index.delete(b"c");

                let mut keys = index.keys();
                keys.sort();
                assert_eq!(keys, vec![b"a".to_vec(), b"b".to_vec()]);
            }

            #[test]
            fn test_concurrent_writers() {
                let index: Arc<dyn Indexer> = Arc::from(make());

                let mut handles = vec![];
                for t in 0..4u64 {
                    let index = Arc::clone(&index);
                    handles.push(thread::spawn(move || {
                        for i in 0..100u64 {
                            let key = format!("thread{}_key{}", t, i);
                            index.set(key.into_bytes(), location(t, i));
                        }
                    }));
                }
                for handle in handles {
                    handle.join().unwrap();
                }

                assert_eq!(index.len(), 400);
                for t in 0..4u64 {
                    for i in 0..100u64 {
                        let key = format!("thread{}_key{}", t, i);
                        assert_eq!(index.get(key.as_bytes()), Some(location(t, i)));
                    }
                }
            }
        }
    };
}

indexer_tests!(btree, Box::new(BTreeIndex::new()));
indexer_tests!(hash, Box::new(HashIndex::new()));
indexer_tests!(kind_btree, IndexKind::BTree.build());
indexer_tests!(kind_hash, IndexKind::Hash.build());

// =============================================================================
// Ordered Index Tests
// =============================================================================

#[test]
fn test_default_kind_is_btree() {
    assert_eq!(IndexKind::default(), IndexKind::BTree);
}

#[test]
fn test_btree_keys_are_byte_ordered() {
    let index = BTreeIndex::new();
    for key in [&b"b"[..], b"\xFF", b"", b"a", b"ab", b"\x00"] {
        index.set(key.to_vec(), location(1, 0));
    }

    assert_eq!(
        index.keys(),
        vec![
            b"".to_vec(),
            b"\x00".to_vec(),
            b"a".to_vec(),
            b"ab".to_vec(),
            b"b".to_vec(),
            b"\xFF".to_vec(),
        ]
    );
}

#[test]
fn test_btree_range_scan() {
    let index = BTreeIndex::new();
    for (i, key) in [&b"apple"[..], b"banana", b"cherry", b"date"].iter().enumerate() {
        index.set(key.to_vec(), location(1, i as u64));
    }

    let hits = index.range(Bound::Included(&b"banana"[..]), Bound::Excluded(&b"date"[..]));
    let keys: Vec<Vec<u8>> = hits.iter().map(|(k, _)| k.clone()).collect();
    assert_eq!(keys, vec![b"banana".to_vec(), b"cherry".to_vec()]);
    assert_eq!(hits[0].1, location(1, 1));

    let all = index.range(Bound::Unbounded, Bound::Unbounded);
    assert_eq!(all.len(), 4);

    let tail = index.range(Bound::Excluded(&b"cherry"[..]), Bound::Unbounded);
    assert_eq!(tail, vec![(b"date".to_vec(), location(1, 3))]);
}

#[test]
fn test_btree_inverted_range_is_empty() {
    let index = BTreeIndex::new();
    index.set(b"a".to_vec(), location(1, 0));
    index.set(b"z".to_vec(), location(1, 1));

    assert!(index
        .range(Bound::Included(&b"z"[..]), Bound::Included(&b"a"[..]))
        .is_empty());
    assert!(index
        .range(Bound::Excluded(&b"a"[..]), Bound::Excluded(&b"a"[..]))
        .is_empty());
    assert_eq!(
        index
            .range(Bound::Included(&b"a"[..]), Bound::Included(&b"a"[..]))
            .len(),
        1
    );
}
