//! The top-level owner of the store and symbol-table injection (§4.5).

use std::sync::Arc;

use structidx_store::OrderedStore;
use structidx_symbols::SymbolTable;

use crate::key::KeyCodec;
use crate::worker::IndexWorker;

/// Owns the shared store and symbol table. Its only job is handing out
/// fresh, independently stateful [`IndexWorker`]s; it holds no per-document
/// state of its own. Lifecycle (when to construct one, how long it lives)
/// is bound to the enclosing broker pool, external to this crate.
pub struct StructuralIndex<S: OrderedStore> {
    store: Arc<S>,
    keys: Arc<KeyCodec>,
}

impl<S: OrderedStore> StructuralIndex<S> {
    pub fn new(store: Arc<S>, symbols: Arc<dyn SymbolTable>) -> StructuralIndex<S> {
        StructuralIndex {
            store,
            keys: Arc::new(KeyCodec::new(symbols)),
        }
    }

    pub fn new_worker(&self) -> IndexWorker<S> {
        IndexWorker::new(Arc::clone(&self.store), Arc::clone(&self.keys))
    }
}
