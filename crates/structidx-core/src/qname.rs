//! Qualified names as seen at the index's external boundary, before
//! interning.

/// Distinguishes ELEMENT from ATTRIBUTE name-keys. The numeric values are
/// load-bearing: they are the first byte of a name-key and must stay below
/// `0x02`, the doc-key region tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NodeKind {
    Element = 0x00,
    Attribute = 0x01,
}

impl NodeKind {
    pub fn from_byte(byte: u8) -> Option<NodeKind> {
        match byte {
            0x00 => Some(NodeKind::Element),
            0x01 => Some(NodeKind::Attribute),
            _ => None,
        }
    }
}

/// A qualified name as supplied by a caller: local-name and namespace URI,
/// not yet interned. `""` denotes the empty/no namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    pub local_name: String,
    pub namespace_uri: String,
}

impl QName {
    pub fn new(local_name: impl Into<String>, namespace_uri: impl Into<String>) -> QName {
        QName {
            local_name: local_name.into(),
            namespace_uri: namespace_uri.into(),
        }
    }

    pub fn no_namespace(local_name: impl Into<String>) -> QName {
        QName::new(local_name, "")
    }
}
