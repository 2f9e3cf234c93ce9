use std::path::Path;
use std::sync::Mutex;

use rocksdb::{Direction, IteratorMode, Options, DB};

use crate::error::StoreError;
use crate::store::{OrderedStore, ScanHit, StoreRead, StoreWrite};

/// RocksDB-backed [`OrderedStore`] for hosts that want the index to survive
/// a restart without re-indexing.
///
/// RocksDB iterators already see a consistent point-in-time view, so no
/// extra coordination is needed for readers. Writers are still serialized
/// through an application-level mutex rather than delegated to RocksDB's own
/// write path, because the contract here is about bounding a
/// `(qname, docId)` batch, not about RocksDB's internal write atomicity.
pub struct RocksOrderedStore {
    db: DB,
    write_lock: Mutex<()>,
}

impl RocksOrderedStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        let db = DB::open(&opts, path).map_err(|e| StoreError::Io(e.to_string()))?;
        Ok(Self {
            db,
            write_lock: Mutex::new(()),
        })
    }
}

fn encode_value(v: u64) -> [u8; 8] {
    v.to_be_bytes()
}

fn decode_value(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[..8]);
    u64::from_be_bytes(buf)
}

fn scan(db: &DB, from: &[u8], to: &[u8], visit: &mut dyn FnMut(ScanHit<'_>) -> bool) {
    let iter = db.iterator(IteratorMode::From(from, Direction::Forward));
    for item in iter {
        let Ok((key, value)) = item else { break };
        if key.as_ref() >= to {
            break;
        }
        if !visit((key.as_ref(), decode_value(&value))) {
            break;
        }
    }
}

pub struct RocksReadGuard<'a> {
    db: &'a DB,
}

pub struct RocksWriteGuard<'a> {
    db: &'a DB,
    _guard: std::sync::MutexGuard<'a, ()>,
}

impl StoreRead for RocksReadGuard<'_> {
    fn range_scan(&self, from: &[u8], to: &[u8], visit: &mut dyn FnMut(ScanHit<'_>) -> bool) {
        scan(self.db, from, to, visit);
    }

    fn point_get(&self, key: &[u8]) -> Option<u64> {
        self.db
            .get(key)
            .ok()
            .flatten()
            .map(|bytes| decode_value(&bytes))
    }
}

impl StoreRead for RocksWriteGuard<'_> {
    fn range_scan(&self, from: &[u8], to: &[u8], visit: &mut dyn FnMut(ScanHit<'_>) -> bool) {
        scan(self.db, from, to, visit);
    }

    fn point_get(&self, key: &[u8]) -> Option<u64> {
        self.db
            .get(key)
            .ok()
            .flatten()
            .map(|bytes| decode_value(&bytes))
    }
}

impl StoreWrite for RocksWriteGuard<'_> {
    fn insert(&mut self, key: &[u8], value: u64) {
        let _ = self.db.put(key, encode_value(value));
    }

    fn delete_one(&mut self, key: &[u8]) {
        let _ = self.db.delete(key);
    }

    fn delete_range(&mut self, from: &[u8], to: &[u8]) {
        let _ = self.db.delete_range(from, to);
    }
}

impl OrderedStore for RocksOrderedStore {
    type ReadGuard<'a> = RocksReadGuard<'a>;
    type WriteGuard<'a> = RocksWriteGuard<'a>;

    fn acquire_read(&self) -> Result<Self::ReadGuard<'_>, StoreError> {
        Ok(RocksReadGuard { db: &self.db })
    }

    fn acquire_write(&self) -> Result<Self::WriteGuard<'_>, StoreError> {
        let guard = self.write_lock.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(RocksWriteGuard {
            db: &self.db,
            _guard: guard,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_scan_and_delete_range_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = RocksOrderedStore::open(dir.path()).unwrap();
        {
            let mut w = store.acquire_write().unwrap();
            w.insert(b"a", 1);
            w.insert(b"b", 2);
            w.insert(b"c", 3);
        }
        {
            let r = store.acquire_read().unwrap();
            let mut seen = Vec::new();
            r.range_scan(b"a", b"c", &mut |(k, v)| {
                seen.push((k.to_vec(), v));
                true
            });
            assert_eq!(seen, vec![(b"a".to_vec(), 1), (b"b".to_vec(), 2)]);
        }
        {
            let mut w = store.acquire_write().unwrap();
            w.delete_range(b"a", b"c");
        }
        let r = store.acquire_read().unwrap();
        assert_eq!(r.point_get(b"a"), None);
        assert_eq!(r.point_get(b"c"), Some(3));
    }
}
