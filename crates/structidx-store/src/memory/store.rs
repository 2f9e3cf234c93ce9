use std::ops::Bound;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use imbl::OrdMap;

use crate::error::StoreError;
use crate::store::{OrderedStore, ScanHit, StoreRead, StoreWrite};

type Map = OrdMap<Vec<u8>, u64>;

/// In-memory [`OrderedStore`], backed by a persistent ordered map guarded by
/// a single `RwLock`.
///
/// The source memory store this is grounded on layers an `ArcSwap` snapshot
/// per column family on top of the map so that readers never block a
/// concurrent writer's commit. That machinery exists to support its
/// transaction-per-call API, where a reader and a writer can be open at
/// once with no defined ordering between them. Here, the locking discipline
/// is spelled out directly (read lock held for one scan/point-get, write
/// lock held for one qname/doc batch, never across a callback into caller
/// code), so a plain `RwLock` already gives the required guarantee: many
/// concurrent readers, or one writer with no readers. The snapshot/dirty-set
/// layer is dropped as a result; see DESIGN.md.
#[derive(Default)]
pub struct MemoryOrderedStore {
    map: RwLock<Map>,
}

impl MemoryOrderedStore {
    pub fn new() -> Self {
        Self::default()
    }
}

pub struct MemoryReadGuard<'a> {
    map: RwLockReadGuard<'a, Map>,
}

pub struct MemoryWriteGuard<'a> {
    map: RwLockWriteGuard<'a, Map>,
}

fn scan_bounds(from: &[u8], to: &[u8]) -> (Bound<Vec<u8>>, Bound<Vec<u8>>) {
    (
        Bound::Included(from.to_vec()),
        Bound::Excluded(to.to_vec()),
    )
}

impl StoreRead for MemoryReadGuard<'_> {
    fn range_scan(&self, from: &[u8], to: &[u8], visit: &mut dyn FnMut(ScanHit<'_>) -> bool) {
        for (key, value) in self.map.range(scan_bounds(from, to)) {
            if !visit((key.as_slice(), *value)) {
                break;
            }
        }
    }

    fn point_get(&self, key: &[u8]) -> Option<u64> {
        self.map.get(key).copied()
    }
}

impl StoreRead for MemoryWriteGuard<'_> {
    fn range_scan(&self, from: &[u8], to: &[u8], visit: &mut dyn FnMut(ScanHit<'_>) -> bool) {
        for (key, value) in self.map.range(scan_bounds(from, to)) {
            if !visit((key.as_slice(), *value)) {
                break;
            }
        }
    }

    fn point_get(&self, key: &[u8]) -> Option<u64> {
        self.map.get(key).copied()
    }
}

impl StoreWrite for MemoryWriteGuard<'_> {
    fn insert(&mut self, key: &[u8], value: u64) {
        self.map.insert(key.to_vec(), value);
    }

    fn delete_one(&mut self, key: &[u8]) {
        self.map.remove(key);
    }

    fn delete_range(&mut self, from: &[u8], to: &[u8]) {
        let doomed: Vec<Vec<u8>> = self
            .map
            .range(scan_bounds(from, to))
            .map(|(k, _)| k.clone())
            .collect();
        for key in doomed {
            self.map.remove(&key);
        }
    }
}

impl OrderedStore for MemoryOrderedStore {
    type ReadGuard<'a> = MemoryReadGuard<'a>;
    type WriteGuard<'a> = MemoryWriteGuard<'a>;

    fn acquire_read(&self) -> Result<Self::ReadGuard<'_>, StoreError> {
        let map = self.map.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(MemoryReadGuard { map })
    }

    fn acquire_write(&self) -> Result<Self::WriteGuard<'_>, StoreError> {
        let map = self.map.write().map_err(|_| StoreError::LockPoisoned)?;
        Ok(MemoryWriteGuard { map })
    }
}
