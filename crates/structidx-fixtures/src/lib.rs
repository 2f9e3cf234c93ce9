//! Synthetic Dewey-tree document generator for integration tests and
//! smoke benchmarks, mirroring the corpus's own dedicated fake-data crate
//! but generating structural node trees instead of flat records.

use structidx_core::{DocumentId, NodeId, NodeKind, QName};

#[derive(Debug, Clone)]
pub struct SyntheticNode {
    pub kind: NodeKind,
    pub qname: QName,
    pub node_id: NodeId,
    pub address: u64,
}

#[derive(Debug, Clone)]
pub struct SyntheticDocument {
    pub doc_id: DocumentId,
    pub nodes: Vec<SyntheticNode>,
}

/// Deterministically generates a `catalog` document containing 1-4 `book`
/// elements (the count cycling on `doc_id`), each with an `id` attribute
/// and a `title` child. No randomness: the same `doc_id` always produces
/// the same tree and the same addresses, which is what lets integration
/// tests assert on specific node counts and addresses.
///
/// Attribute and element children of a `book` share the same sibling-index
/// numbering space here (`id` always takes slot 1, `title` slot 2) — a
/// simplification of real shredders, which often number attributes in a
/// separate space from element children; nothing in this index's
/// invariants depends on which convention a node-id factory picks.
pub fn generate_document(doc_id: DocumentId) -> SyntheticDocument {
    let mut nodes = Vec::new();
    let mut address = 0x1000u64 + (doc_id as u64) * 0x100;
    let mut next_address = || {
        let a = address;
        address += 1;
        a
    };

    nodes.push(SyntheticNode {
        kind: NodeKind::Element,
        qname: QName::no_namespace("catalog"),
        node_id: NodeId::from_levels(vec![1]),
        address: next_address(),
    });

    let book_count = (doc_id % 4) + 1;
    for b in 1..=book_count {
        nodes.push(SyntheticNode {
            kind: NodeKind::Element,
            qname: QName::no_namespace("book"),
            node_id: NodeId::from_levels(vec![1, b]),
            address: next_address(),
        });
        nodes.push(SyntheticNode {
            kind: NodeKind::Attribute,
            qname: QName::no_namespace("id"),
            node_id: NodeId::from_levels(vec![1, b, 1]),
            address: next_address(),
        });
        nodes.push(SyntheticNode {
            kind: NodeKind::Element,
            qname: QName::no_namespace("title"),
            node_id: NodeId::from_levels(vec![1, b, 2]),
            address: next_address(),
        });
    }

    SyntheticDocument { doc_id, nodes }
}

/// A contiguous run of synthetic documents, `start..start+count` — handy
/// for exercising the contiguous-docId-range coalescing in
/// `findElementsByQName`.
pub fn generate_corpus(start: DocumentId, count: u32) -> Vec<SyntheticDocument> {
    (start..start + count).map(generate_document).collect()
}
