mod error;
mod store;

#[cfg(feature = "memory")]
pub mod memory;

#[cfg(feature = "rocksdb")]
pub mod rocks;

pub use error::StoreError;
pub use store::{OrderedStore, ScanHit, StoreRead, StoreWrite};

#[cfg(feature = "memory")]
pub use memory::MemoryOrderedStore;

#[cfg(feature = "rocksdb")]
pub use rocks::RocksOrderedStore;
