use std::fmt;

/// Failure modes of an [`OrderedStore`](crate::store::OrderedStore).
///
/// Both variants map directly onto the two error kinds the core is required
/// to swallow-and-log rather than propagate: a poisoned lock and a backend
/// I/O failure.
#[derive(Debug)]
pub enum StoreError {
    LockPoisoned,
    Io(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::LockPoisoned => write!(f, "store lock poisoned"),
            StoreError::Io(msg) => write!(f, "store I/O failure: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}
