//! Adapts document-pipeline callbacks to [`IndexWorker`] mutations (§4.4.1).
//!
//! Paths are part of the upstream event but structurally meaningless to
//! this index (they matter to other, value-level indexes); the trait omits
//! them rather than threading through a parameter nothing here reads.

use structidx_store::OrderedStore;

use crate::error::IndexError;
use crate::nodeid::NodeId;
use crate::qname::{NodeKind, QName};
use crate::worker::IndexWorker;
use crate::DocumentId;

/// The stream the document pipeline drives a worker with. `end_element`
/// is a no-op for structural indexing — kept so a listener can be wired
/// into a pipeline that calls every callback unconditionally.
pub trait StreamListener {
    fn start_document(&mut self, doc_id: DocumentId);
    fn start_element(&mut self, qname: &QName, node_id: NodeId, address: u64) -> Result<(), IndexError>;
    fn attribute(&mut self, qname: &QName, node_id: NodeId, address: u64) -> Result<(), IndexError>;
    fn end_element(&mut self);
    fn end_document(&mut self);
}

impl<S: OrderedStore> StreamListener for IndexWorker<S> {
    fn start_document(&mut self, doc_id: DocumentId) {
        debug_assert_eq!(
            self.current_doc(),
            Some(doc_id),
            "listener driven out of step with set_document"
        );
    }

    fn start_element(&mut self, qname: &QName, node_id: NodeId, address: u64) -> Result<(), IndexError> {
        let doc_id = self.current_doc().expect("start_element before set_document");
        self.record(doc_id, NodeKind::Element, qname, node_id, address)
    }

    fn attribute(&mut self, qname: &QName, node_id: NodeId, address: u64) -> Result<(), IndexError> {
        let doc_id = self.current_doc().expect("attribute before set_document");
        self.record(doc_id, NodeKind::Attribute, qname, node_id, address)
    }

    fn end_element(&mut self) {}

    fn end_document(&mut self) {}
}
