use std::fmt;

use structidx_symbols::SymbolOverflow;

use crate::DocumentId;

/// Errors that escape the index as a genuine `Err` rather than being
/// swallowed and logged. Lock-acquisition and store I/O failures are
/// *not* represented here: per the error handling design, those are caught
/// at the worker boundary, logged at WARN, and turned into a partial
/// result instead of an error value.
#[derive(Debug)]
pub enum IndexError {
    /// More than 65535 distinct local-names or namespace URIs. Out of
    /// scope to recover from, but must be surfaced rather than silently
    /// wrapped.
    SymbolOverflow,
    /// The worker's current document does not match the document embedded
    /// in an incoming proxy. A programming error: fails fast rather than
    /// being caught inside the index.
    DocumentMismatch {
        expected: DocumentId,
        found: DocumentId,
    },
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexError::SymbolOverflow => write!(f, "symbol table exhausted"),
            IndexError::DocumentMismatch { expected, found } => write!(
                f,
                "worker is bound to document {expected} but received a proxy for document {found}"
            ),
        }
    }
}

impl std::error::Error for IndexError {}

impl From<SymbolOverflow> for IndexError {
    fn from(_: SymbolOverflow) -> Self {
        IndexError::SymbolOverflow
    }
}
