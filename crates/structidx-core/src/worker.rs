//! The per-document mutator and the three structural query operations.

use std::collections::BTreeMap;
use std::sync::Arc;

use structidx_store::OrderedStore;

use crate::axis::Axis;
use crate::docset::DocumentSet;
use crate::error::IndexError;
use crate::key::{decode_address, encode_value, InternedQName, KeyCodec};
use crate::nodeid::{NodeId, Relation};
use crate::proxy::{NodeProxy, Selector};
use crate::qname::{NodeKind, QName};
use crate::DocumentId;

/// What `flush()` does with a worker's buffered pending nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Unknown,
    Store,
    RemoveAllNodes,
    RemoveSomeNodes,
}

/// Per-document mutator. Buffers nodes seen by the stream listener keyed
/// by interned qname (ordered, for deterministic replay), then drains that
/// buffer into the store on `flush()`. Also answers the three structural
/// query operations directly against the store, independent of any
/// buffered state.
pub struct IndexWorker<S: OrderedStore> {
    store: Arc<S>,
    keys: Arc<KeyCodec>,
    mode: Mode,
    current_doc: Option<DocumentId>,
    pending: BTreeMap<InternedQName, Vec<(NodeId, u64)>>,
}

impl<S: OrderedStore> IndexWorker<S> {
    pub fn new(store: Arc<S>, keys: Arc<KeyCodec>) -> IndexWorker<S> {
        IndexWorker {
            store,
            keys,
            mode: Mode::Unknown,
            current_doc: None,
            pending: BTreeMap::new(),
        }
    }

    pub fn current_doc(&self) -> Option<DocumentId> {
        self.current_doc
    }

    /// Binds the worker to a document and a mode, discarding any previous
    /// buffered state (the previous document must have already been
    /// flushed).
    pub fn set_document(&mut self, doc_id: DocumentId, mode: Mode) {
        self.current_doc = Some(doc_id);
        self.mode = mode;
        self.pending.clear();
    }

    /// Buffers one node under its interned qname. `doc_id` must match the
    /// document the worker is currently bound to; a mismatch is the
    /// "invariant violation on ingest" fail-fast case (§7), not something
    /// the index catches and logs.
    pub fn record(
        &mut self,
        doc_id: DocumentId,
        kind: NodeKind,
        qname: &QName,
        node_id: NodeId,
        address: u64,
    ) -> Result<(), IndexError> {
        let expected = self.current_doc.expect("record called before set_document");
        if expected != doc_id {
            return Err(IndexError::DocumentMismatch {
                expected,
                found: doc_id,
            });
        }
        let iq = self.keys.intern(kind, qname)?;
        self.pending.entry(iq).or_default().push((node_id, address));
        Ok(())
    }

    /// Drains `pending` into the store per the worker's current mode, then
    /// clears it unconditionally. Lock and store failures are logged and
    /// do not abort other qnames in the batch — see §4.4.2/§7.
    pub fn flush(&mut self) {
        let doc_id = self.current_doc.expect("flush called before set_document");
        match self.mode {
            Mode::Store => self.process_pending(doc_id),
            Mode::RemoveAllNodes => self.remove_document(doc_id),
            Mode::RemoveSomeNodes => self.remove_some(doc_id),
            Mode::Unknown => {}
        }
        self.pending.clear();
    }

    fn process_pending(&self, doc_id: DocumentId) {
        for (iq, nodes) in &self.pending {
            let mut guard = match self.store.acquire_write() {
                Ok(guard) => guard,
                Err(error) => {
                    tracing::warn!(%error, ?iq, doc_id, "failed to acquire write lock storing qname batch");
                    continue;
                }
            };
            for (node_id, address) in nodes {
                let key = self.keys.encode_name_key(*iq, doc_id, node_id);
                let value = encode_value(*address, node_id.units());
                guard.insert(&key, value);
            }
            let doc_key = self.keys.encode_doc_key(*iq, doc_id);
            if guard.point_get(&doc_key).is_none() {
                guard.insert(&doc_key, 0);
            }
        }
    }

    fn remove_some(&self, doc_id: DocumentId) {
        for (iq, nodes) in &self.pending {
            let mut guard = match self.store.acquire_write() {
                Ok(guard) => guard,
                Err(error) => {
                    tracing::warn!(%error, ?iq, doc_id, "failed to acquire write lock for remove-some batch");
                    continue;
                }
            };
            for (node_id, _address) in nodes {
                let key = self.keys.encode_name_key(*iq, doc_id, node_id);
                guard.delete_one(&key);
            }
        }
    }

    /// Removes every name-key and doc-key for `doc_id`. Does not consult
    /// `pending` — callable on any worker, or directly by
    /// [`IndexWorker::remove_collection`], regardless of that worker's
    /// current mode.
    pub fn remove_document(&self, doc_id: DocumentId) {
        let qnames: Vec<InternedQName> = {
            let guard = match self.store.acquire_read() {
                Ok(guard) => guard,
                Err(error) => {
                    tracing::warn!(%error, doc_id, "failed to acquire read lock listing doc-keys");
                    return;
                }
            };
            let from = KeyCodec::encode_doc_key_prefix(doc_id);
            let to = KeyCodec::encode_doc_key_prefix(doc_id + 1);
            let mut found = Vec::new();
            guard.range_scan(&from, &to, &mut |(key, _value)| {
                found.push(KeyCodec::read_qname(key));
                true
            });
            found
        };

        for iq in &qnames {
            let mut guard = match self.store.acquire_write() {
                Ok(guard) => guard,
                Err(error) => {
                    tracing::warn!(%error, ?iq, doc_id, "failed to acquire write lock removing name-keys");
                    continue;
                }
            };
            let from = self.keys.encode_name_key_prefix(*iq, doc_id);
            let to = self.keys.encode_name_key_prefix(*iq, doc_id + 1);
            guard.delete_range(&from, &to);
        }

        match self.store.acquire_write() {
            Ok(mut guard) => {
                let from = KeyCodec::encode_doc_key_prefix(doc_id);
                let to = KeyCodec::encode_doc_key_prefix(doc_id + 1);
                guard.delete_range(&from, &to);
            }
            Err(error) => {
                tracing::warn!(%error, doc_id, "failed to acquire write lock removing doc-key inventory");
            }
        }
    }

    /// Removes a caller-supplied set of documents; a thin loop over
    /// [`IndexWorker::remove_document`] with no collection abstraction of
    /// its own (§4.4.9).
    pub fn remove_collection(&self, doc_ids: &[DocumentId]) {
        for &doc_id in doc_ids {
            self.remove_document(doc_id);
        }
    }

    /// §4.4.5: coalesces `docSet` into maximal contiguous ranges, scans
    /// each once, and returns every hit whose docId is actually in
    /// `docSet` (the range may be wider than the set when the set has
    /// gaps the range still has to span... it does not; ranges are
    /// computed from the set itself, so every docId in range is in the
    /// set by construction).
    pub fn find_elements_by_qname(
        &self,
        kind: NodeKind,
        qname: &QName,
        doc_set: &DocumentSet,
        selector: Option<&dyn Selector>,
    ) -> Result<Vec<NodeProxy>, IndexError> {
        let iq = self.keys.intern(kind, qname)?;
        let mut hits: Vec<(DocumentId, NodeId, u64)> = Vec::new();

        for (start, end) in doc_set.contiguous_ranges() {
            let from = self.keys.encode_name_key_prefix(iq, start);
            let to = self.keys.encode_name_key_prefix(iq, end + 1);
            let guard = match self.store.acquire_read() {
                Ok(guard) => guard,
                Err(error) => {
                    tracing::warn!(%error, "failed to acquire read lock scanning elements");
                    continue;
                }
            };
            guard.range_scan(&from, &to, &mut |(key, value)| {
                let doc_id = KeyCodec::read_doc_id(key);
                if doc_set.contains(doc_id) {
                    let node_id = KeyCodec::read_node_id(key, value);
                    hits.push((doc_id, node_id, decode_address(value)));
                }
                true
            });
        }

        let mut results = Vec::with_capacity(hits.len());
        for (doc_id, node_id, address) in hits {
            let candidate = NodeProxy::new(doc_id, node_id, kind, address);
            let emitted = match selector {
                Some(selector) if !selector.accept(&candidate) => continue,
                Some(selector) => match selector.substitute(&candidate) {
                    Some((kind, address)) => NodeProxy {
                        kind,
                        address,
                        ..candidate
                    },
                    None => candidate,
                },
                None => candidate,
            };
            results.push(emitted);
        }
        Ok(results)
    }

    /// §4.4.6: one scan per ancestor, axis-filtered per hit.
    pub fn find_descendants_by_qname(
        &self,
        kind: NodeKind,
        qname: &QName,
        axis: Axis,
        ancestors: &[NodeProxy],
        context_id: Option<u64>,
    ) -> Result<Vec<NodeProxy>, IndexError> {
        let iq = self.keys.intern(kind, qname)?;
        let mut results = Vec::new();

        for ancestor in ancestors {
            let (from, to) = if ancestor.node_id.is_document() {
                (
                    self.keys.encode_name_key_prefix(iq, ancestor.doc_id),
                    self.keys.encode_name_key_prefix(iq, ancestor.doc_id + 1),
                )
            } else {
                (
                    self.keys.encode_name_key(iq, ancestor.doc_id, &ancestor.node_id),
                    self.keys
                        .encode_name_key(iq, ancestor.doc_id, &ancestor.node_id.next_sibling()),
                )
            };

            let mut hits: Vec<(NodeId, u64)> = Vec::new();
            match self.store.acquire_read() {
                Ok(guard) => {
                    guard.range_scan(&from, &to, &mut |(key, value)| {
                        hits.push((KeyCodec::read_node_id(key, value), decode_address(value)));
                        true
                    });
                }
                Err(error) => {
                    tracing::warn!(%error, "failed to acquire read lock scanning descendants");
                    continue;
                }
            }

            for (node_id, address) in hits {
                let accept = match axis {
                    Axis::DescendantSelf | Axis::DescendantAttribute => true,
                    Axis::Child | Axis::Attribute => {
                        node_id.compute_relation(&ancestor.node_id) == Relation::IsChild
                    }
                    Axis::Descendant => matches!(
                        node_id.compute_relation(&ancestor.node_id),
                        Relation::IsDescendant | Relation::IsChild
                    ),
                    _ => false,
                };
                if !accept {
                    continue;
                }
                let candidate = NodeProxy::new(ancestor.doc_id, node_id, kind, address);
                results.push(candidate.with_context(ancestor, context_id));
            }
        }
        Ok(results)
    }

    /// §4.4.7: climbs the parent chain with point-gets, not a scan.
    pub fn find_ancestors_by_qname(
        &self,
        kind: NodeKind,
        qname: &QName,
        axis: Axis,
        descendants: &[NodeProxy],
        context_id: Option<u64>,
    ) -> Result<Vec<NodeProxy>, IndexError> {
        let iq = self.keys.intern(kind, qname)?;
        let mut results = Vec::new();

        for descendant in descendants {
            let mut parent_id = if matches!(axis, Axis::SelfAxis | Axis::AncestorSelf) {
                descendant.node_id.clone()
            } else {
                descendant.node_id.parent_id()
            };

            while !parent_id.is_document() {
                let key = self.keys.encode_name_key(iq, descendant.doc_id, &parent_id);
                let value = match self.store.acquire_read() {
                    Ok(guard) => guard.point_get(&key),
                    Err(error) => {
                        tracing::warn!(%error, "failed to acquire read lock for ancestor point-get");
                        None
                    }
                };
                if let Some(value) = value {
                    let candidate = NodeProxy::new(descendant.doc_id, parent_id.clone(), kind, decode_address(value));
                    results.push(candidate.with_context(descendant, context_id));
                }
                if matches!(axis, Axis::SelfAxis | Axis::Parent) {
                    break;
                }
                parent_id = parent_id.parent_id();
            }
        }
        Ok(results)
    }
}
