//! Byte-exact key encoding shared by writers and readers: the name-key and
//! doc-key families, plus the 64-bit store-value packing.

use std::sync::Arc;

use structidx_symbols::{Symbol, SymbolOverflow, SymbolTable};

use crate::nodeid::NodeId;
use crate::qname::{NodeKind, QName};
use crate::DocumentId;

/// First byte of every doc-key, placing the whole doc-key region above the
/// two name-key regions (`0x00` ELEMENT, `0x01` ATTRIBUTE).
const DOC_KEY_TAG: u8 = 0x02;

/// Fixed prefix length of a name-key, before the variable-length nodeId
/// suffix: `type(1) + sym(2) + nsSym(2) + docId(4)`.
const NAME_KEY_PREFIX_LEN: usize = 9;

/// Fixed total length of a doc-key:
/// `tag(1) + docId(4) + type(1) + sym(2) + nsSym(2)`.
const DOC_KEY_LEN: usize = 10;

/// Low 56 bits of a store value: the document-store address.
const ADDRESS_MASK: u64 = (1u64 << 56) - 1;

/// `(type, sym, nsSym)` — a [`QName`] after interning. Ordered
/// lexicographically on this triple, matching the worker's `pending` map
/// ordering requirement (§4.4 of the spec).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InternedQName {
    pub kind: NodeKind,
    pub sym: Symbol,
    pub ns_sym: Symbol,
}

impl PartialOrd for NodeKind {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NodeKind {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (*self as u8).cmp(&(*other as u8))
    }
}

/// Encodes and decodes name-keys and doc-keys, interning qualified names
/// through a shared [`SymbolTable`]. Pure aside from that interning side
/// effect (new names allocate a symbol on first sight).
pub struct KeyCodec {
    symbols: Arc<dyn SymbolTable>,
}

impl KeyCodec {
    pub fn new(symbols: Arc<dyn SymbolTable>) -> KeyCodec {
        KeyCodec { symbols }
    }

    pub fn intern(&self, kind: NodeKind, qname: &QName) -> Result<InternedQName, SymbolOverflow> {
        let sym = self.symbols.get_symbol(&qname.local_name)?;
        let ns_sym = self.symbols.get_ns_symbol(&qname.namespace_uri)?;
        Ok(InternedQName { kind, sym, ns_sym })
    }

    pub fn encode_name_key(&self, iq: InternedQName, doc_id: DocumentId, node_id: &NodeId) -> Vec<u8> {
        let mut key = self.encode_name_key_prefix(iq, doc_id);
        key.extend_from_slice(&node_id.serialize());
        key
    }

    /// The 9-byte inclusive lower bound of a scan over all nodes of
    /// `(type, qname, docId)`.
    pub fn encode_name_key_prefix(&self, iq: InternedQName, doc_id: DocumentId) -> Vec<u8> {
        let mut key = Vec::with_capacity(NAME_KEY_PREFIX_LEN);
        key.push(iq.kind as u8);
        key.extend_from_slice(&iq.sym.0.to_be_bytes());
        key.extend_from_slice(&iq.ns_sym.0.to_be_bytes());
        key.extend_from_slice(&doc_id.to_be_bytes());
        key
    }

    pub fn encode_doc_key(&self, iq: InternedQName, doc_id: DocumentId) -> Vec<u8> {
        let mut key = Vec::with_capacity(DOC_KEY_LEN);
        key.push(DOC_KEY_TAG);
        key.extend_from_slice(&doc_id.to_be_bytes());
        key.push(iq.kind as u8);
        key.extend_from_slice(&iq.sym.0.to_be_bytes());
        key.extend_from_slice(&iq.ns_sym.0.to_be_bytes());
        key
    }

    /// The 5-byte inclusive lower bound of a scan over all doc-keys of
    /// `docId`.
    pub fn encode_doc_key_prefix(doc_id: DocumentId) -> Vec<u8> {
        let mut key = Vec::with_capacity(5);
        key.push(DOC_KEY_TAG);
        key.extend_from_slice(&doc_id.to_be_bytes());
        key
    }

    /// Reads the docId field (bytes 5..9) of a name-key.
    pub fn read_doc_id(key: &[u8]) -> DocumentId {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(&key[5..9]);
        u32::from_be_bytes(buf)
    }

    /// Reads `(type, sym, nsSym)` back out of a doc-key.
    pub fn read_qname(doc_key: &[u8]) -> InternedQName {
        let kind = NodeKind::from_byte(doc_key[5]).expect("doc-key type byte out of range");
        let sym = Symbol(u16::from_be_bytes([doc_key[6], doc_key[7]]));
        let ns_sym = Symbol(u16::from_be_bytes([doc_key[8], doc_key[9]]));
        InternedQName { kind, sym, ns_sym }
    }

    /// Reconstructs the `NodeId` suffix of a name-key, given the stored
    /// value's piggybacked unit count.
    pub fn read_node_id(key: &[u8], stored_value: u64) -> NodeId {
        let units = decode_units(key.len(), stored_value);
        NodeId::from_serialized(units, key, NAME_KEY_PREFIX_LEN)
    }
}

/// Packs a document-store address and a NodeId's unit count into the
/// store's 64-bit value.
pub fn encode_value(address: u64, units: usize) -> u64 {
    let bits_mod8 = (units % 8) as u64;
    (address & ADDRESS_MASK) | (bits_mod8 << 24)
}

/// Recovers the document-store address from a store value.
pub fn decode_address(value: u64) -> u64 {
    value & ADDRESS_MASK
}

/// Recovers the NodeId's significant bit count from a name-key's total
/// length and its store value's piggybacked field.
pub fn decode_units(key_len: usize, value: u64) -> usize {
    let node_id_size = key_len - NAME_KEY_PREFIX_LEN;
    let stored = ((value >> 24) & 0xFF) as usize;
    let last_byte_bits = if stored == 0 { 8 } else { stored };
    if node_id_size == 0 {
        0
    } else {
        8 * (node_id_size - 1) + last_byte_bits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use structidx_symbols::InMemorySymbolTable;

    fn codec() -> KeyCodec {
        KeyCodec::new(Arc::new(InMemorySymbolTable::new()))
    }

    #[test]
    fn name_key_prefix_is_nine_bytes_and_fields_are_big_endian() {
        let codec = codec();
        let iq = codec.intern(NodeKind::Element, &QName::no_namespace("book")).unwrap();
        let prefix = codec.encode_name_key_prefix(iq, 42);
        assert_eq!(prefix.len(), 9);
        assert_eq!(prefix[0], 0x00);
        assert_eq!(&prefix[5..9], &42u32.to_be_bytes());
    }

    #[test]
    fn name_key_total_length_is_nine_plus_node_id_size() {
        let codec = codec();
        let iq = codec.intern(NodeKind::Element, &QName::no_namespace("book")).unwrap();
        let node_id = NodeId::from_levels(vec![1, 2, 3]);
        let key = codec.encode_name_key(iq, 42, &node_id);
        assert_eq!(key.len(), 9 + node_id.size());
    }

    #[test]
    fn doc_key_is_ten_bytes_with_leading_tag() {
        let codec = codec();
        let iq = codec.intern(NodeKind::Attribute, &QName::no_namespace("id")).unwrap();
        let key = codec.encode_doc_key(iq, 7);
        assert_eq!(key.len(), 10);
        assert_eq!(key[0], 0x02);
        assert_eq!(KeyCodec::read_qname(&key), iq);
    }

    #[test]
    fn doc_key_prefix_is_five_bytes() {
        assert_eq!(KeyCodec::encode_doc_key_prefix(9).len(), 5);
    }

    #[test]
    fn read_doc_id_round_trips() {
        let codec = codec();
        let iq = codec.intern(NodeKind::Element, &QName::no_namespace("book")).unwrap();
        let key = codec.encode_name_key(iq, 0x1234, &NodeId::from_levels(vec![1]));
        assert_eq!(KeyCodec::read_doc_id(&key), 0x1234);
    }

    #[test]
    fn store_value_address_and_units_round_trip() {
        let value = encode_value(0x100, 3);
        assert_eq!(value, 0x0000000300000100);
        assert_eq!(decode_address(value), 0x100);
    }

    #[test]
    fn node_id_and_units_round_trip_through_key_and_value() {
        let codec = codec();
        let iq = codec.intern(NodeKind::Element, &QName::no_namespace("book")).unwrap();
        for levels in [vec![1], vec![1, 2, 3], vec![200, 5]] {
            let node_id = NodeId::from_levels(levels);
            let key = codec.encode_name_key(iq, 42, &node_id);
            let value = encode_value(0xABCDEF, node_id.units());
            let decoded = KeyCodec::read_node_id(&key, value);
            assert_eq!(decoded, node_id);
        }
    }

    #[test]
    fn name_key_region_sorts_before_doc_key_region() {
        let codec = codec();
        let iq = codec.intern(NodeKind::Element, &QName::no_namespace("book")).unwrap();
        let name_key = codec.encode_name_key_prefix(iq, 1);
        let doc_key = KeyCodec::encode_doc_key_prefix(0);
        assert!(name_key[0] < doc_key[0]);
    }
}
