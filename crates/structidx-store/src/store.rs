use crate::error::StoreError;

/// A single key/value entry yielded by a range scan, in ascending key order.
pub type ScanHit<'a> = (&'a [u8], u64);

/// Read-side operations available once a read guard has been acquired.
///
/// A guard is held for the duration of exactly one range scan or point
/// lookup; dropping it releases the lock. `range_scan`'s callback returns
/// `true` to keep scanning and `false` to stop early (used for cooperative
/// cancellation).
pub trait StoreRead {
    fn range_scan(&self, from: &[u8], to: &[u8], visit: &mut dyn FnMut(ScanHit<'_>) -> bool);

    fn point_get(&self, key: &[u8]) -> Option<u64>;
}

/// Write-side operations available once a write guard has been acquired.
///
/// A guard is held for the duration of exactly one `(qname, docId)` batch.
/// Implementations must make `insert` idempotent under key conflict.
pub trait StoreWrite: StoreRead {
    fn insert(&mut self, key: &[u8], value: u64);

    fn delete_one(&mut self, key: &[u8]);

    fn delete_range(&mut self, from: &[u8], to: &[u8]);
}

/// An ordered byte-key to `u64`-value store, guarded by a read/write lock.
///
/// Acquiring a guard is the Rust-idiomatic stand-in for the source
/// `lock().acquireRead()/acquireWrite()/release()` triad: the guard's `Drop`
/// impl releases the lock on every exit path, including unwinding, which is
/// exactly the "guaranteed release on every exit path" requirement without
/// needing a manual try/finally block at every call site.
pub trait OrderedStore: Send + Sync {
    type ReadGuard<'a>: StoreRead
    where
        Self: 'a;
    type WriteGuard<'a>: StoreWrite
    where
        Self: 'a;

    fn acquire_read(&self) -> Result<Self::ReadGuard<'_>, StoreError>;

    fn acquire_write(&self) -> Result<Self::WriteGuard<'_>, StoreError>;
}
