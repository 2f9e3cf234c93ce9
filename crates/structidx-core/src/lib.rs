//! The structural index: hierarchical node ids, byte-exact key encoding,
//! and the streaming worker that answers XPath structural queries against
//! a single ordered-key store.

mod axis;
mod bits;
mod docset;
mod error;
mod index;
mod key;
mod listener;
mod nodeid;
mod proxy;
mod qname;
mod worker;

/// A 32-bit positive document id assigned by the document store.
pub type DocumentId = u32;

pub use axis::Axis;
pub use docset::DocumentSet;
pub use error::IndexError;
pub use index::StructuralIndex;
pub use key::{InternedQName, KeyCodec};
pub use listener::StreamListener;
pub use nodeid::{NodeId, Relation};
pub use proxy::{ContextNode, MatchContext, NodeProxy, Selector};
pub use qname::{NodeKind, QName};
pub use worker::{IndexWorker, Mode};
