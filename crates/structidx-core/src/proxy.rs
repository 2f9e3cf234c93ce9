//! Node proxies and the context-propagation / selector hooks that ride
//! along with them through the query operations (§4.4.8).

use crate::nodeid::NodeId;
use crate::qname::NodeKind;
use crate::DocumentId;

/// Opaque match annotations carried from a driving proxy into an emitted
/// one. The core never inspects the contents; it only merges them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchContext {
    pub annotations: Vec<String>,
}

/// The context edge attached to an emitted proxy, recording which proxy
/// drove its discovery and whether the edge was deep- or shallow-copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextNode {
    None,
    Shallow(Box<NodeProxy>),
    Deep(Box<NodeProxy>),
}

/// A lightweight reference to a node, as returned by the three query
/// operations: `(document, nodeId, kind, address)` plus the context edge
/// and match annotations carried along for XPath predicate evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeProxy {
    pub doc_id: DocumentId,
    pub node_id: NodeId,
    pub kind: NodeKind,
    pub address: u64,
    pub context: ContextNode,
    pub match_context: Option<MatchContext>,
}

impl NodeProxy {
    pub fn new(doc_id: DocumentId, node_id: NodeId, kind: NodeKind, address: u64) -> NodeProxy {
        NodeProxy {
            doc_id,
            node_id,
            kind,
            address,
            context: ContextNode::None,
            match_context: None,
        }
    }

    /// Attaches `driving` as this proxy's context edge — deep-copied when
    /// `context_id` carries a real (non-sentinel) id, shallow otherwise —
    /// and merges `driving`'s match annotations, per §4.4.8.
    pub fn with_context(mut self, driving: &NodeProxy, context_id: Option<u64>) -> NodeProxy {
        self.context = match context_id {
            Some(_) => ContextNode::Deep(Box::new(driving.clone())),
            None => ContextNode::Shallow(Box::new(driving.clone())),
        };
        self.match_context = driving.match_context.clone();
        self
    }
}

/// A caller-supplied veto/substitution hook consulted by
/// `findElementsByQName` for each scan hit.
///
/// `substitute` may only replace a candidate's `(kind, address)`, never its
/// `nodeId` — this is the Open Question from §9 resolved explicitly: the
/// source behavior implicitly never let selectors renumber a candidate, so
/// this trait makes that the only expressible shape rather than leaving it
/// as an unenforced convention.
pub trait Selector {
    /// Returns `false` to veto the candidate entirely.
    fn accept(&self, candidate: &NodeProxy) -> bool;

    /// Optionally replaces `(kind, address)` on an accepted candidate.
    fn substitute(&self, candidate: &NodeProxy) -> Option<(NodeKind, u64)> {
        let _ = candidate;
        None
    }
}
