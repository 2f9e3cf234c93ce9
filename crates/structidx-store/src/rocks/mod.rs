mod store;

pub use store::RocksOrderedStore;
