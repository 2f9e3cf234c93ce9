//! Hierarchical, order-preserving node identifiers.
//!
//! A [`NodeId`] is a Dewey path: a sequence of 1-based sibling positions
//! from the document root down to a node. Each level is encoded as a
//! self-delimiting, order-preserving bit code (see [`encode_level`]); the
//! concatenation of a path's level codes is the node's serialized form.
//!
//! The codec here is this crate's own design, not a byte-for-byte
//! reproduction of any particular reference system's internal bit layout —
//! see DESIGN.md for why, and for the invariants this scheme is required to
//! satisfy regardless of its concrete bit pattern.

use crate::bits::{BitReader, BitWriter};

/// The relation of `self` to another [`NodeId`], as returned by
/// [`NodeId::compute_relation`]. `self.compute_relation(other)` describes
/// how `self` relates to `other` — e.g. `IsChild` means `self` is a child
/// of `other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    SameNode,
    IsChild,
    IsDescendant,
    IsAncestor,
    IsParent,
    IsSibling,
    Unrelated,
}

/// A hierarchical node identifier: a sequence of 1-based sibling positions
/// from the document root. The empty path is the distinguished
/// [`NodeId::document`] sentinel.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId {
    levels: Vec<u32>,
}

/// Bit length of the self-delimiting code for one level value `w` (a
/// 1-based sibling index, so `w >= 1`).
///
/// The code is an order-preserving variant of an Elias-gamma code: write
/// `v = w + 1` (so `v >= 2`, guaranteeing at least one leading one-bit),
/// let `n` be the bit-length of `v`; the code is `(n-1)` one-bits, a
/// zero-bit terminator, then the low `n-1` bits of `v`. Shifting by one
/// avoids the degenerate `w == 1` case emitting an all-zero code, which
/// would be indistinguishable from the zero-padding at the end of a
/// standalone serialized byte string.
fn level_code_bits(w: u32) -> u32 {
    let v = w as u64 + 1;
    let n = 64 - v.leading_zeros();
    2 * n - 1
}

fn encode_level(writer: &mut BitWriter, w: u32) {
    let v = w as u64 + 1;
    let n = 64 - v.leading_zeros();
    for _ in 0..(n - 1) {
        writer.push_bit(true);
    }
    writer.push_bit(false);
    writer.push_bits(v, n - 1);
}

fn decode_level(reader: &mut BitReader<'_>) -> u32 {
    let mut ones = 0u32;
    while reader.read_bit() {
        ones += 1;
    }
    let mut payload: u64 = 0;
    for _ in 0..ones {
        payload = (payload << 1) | reader.read_bit() as u64;
    }
    let v = (1u64 << ones) | payload;
    (v - 1) as u32
}

impl NodeId {
    /// The distinguished document-root sentinel: the empty path.
    pub fn document() -> NodeId {
        NodeId { levels: Vec::new() }
    }

    /// Builds a `NodeId` directly from a sequence of 1-based sibling
    /// positions. Used by the node-id factory's external callers (the
    /// parser) and by tests/fixtures.
    pub fn from_levels(levels: Vec<u32>) -> NodeId {
        debug_assert!(levels.iter().all(|&w| w >= 1), "sibling positions are 1-based");
        NodeId { levels }
    }

    /// The first child of `self`.
    pub fn child(&self, sibling_index: u32) -> NodeId {
        debug_assert!(sibling_index >= 1);
        let mut levels = self.levels.clone();
        levels.push(sibling_index);
        NodeId { levels }
    }

    pub fn is_document(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn levels(&self) -> &[u32] {
        &self.levels
    }

    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Number of significant bits in the serialized form.
    pub fn units(&self) -> usize {
        self.levels.iter().map(|&w| level_code_bits(w) as usize).sum()
    }

    /// Number of whole bytes needed to serialize.
    pub fn size(&self) -> usize {
        self.units().div_ceil(8)
    }

    /// Serializes to a fresh, zero-padded byte vector of length
    /// [`NodeId::size`].
    pub fn serialize(&self) -> Vec<u8> {
        let mut writer = BitWriter::new();
        for &w in &self.levels {
            encode_level(&mut writer, w);
        }
        let (bytes, bit_len) = writer.finish();
        debug_assert_eq!(bit_len, self.units());
        bytes
    }

    /// Reconstructs a `NodeId` from `units` significant bits starting at
    /// `bytes[offset..]`.
    pub fn from_serialized(units: usize, bytes: &[u8], offset: usize) -> NodeId {
        if units == 0 {
            return NodeId::document();
        }
        let mut reader = BitReader::new(&bytes[offset..], units);
        let mut levels = Vec::new();
        while reader.remaining() > 0 {
            levels.push(decode_level(&mut reader));
        }
        NodeId { levels }
    }

    /// The parent identifier, or [`NodeId::document`] when `self` is a
    /// direct child of the document root.
    pub fn parent_id(&self) -> NodeId {
        match self.levels.split_last() {
            Some((_, rest)) => NodeId {
                levels: rest.to_vec(),
            },
            None => NodeId::document(),
        }
    }

    /// The smallest identifier strictly greater than all descendants of
    /// `self`; an exclusive upper bound for range scans rooted at `self`.
    pub fn next_sibling(&self) -> NodeId {
        let mut levels = self.levels.clone();
        match levels.last_mut() {
            Some(last) => *last += 1,
            None => panic!("the document root has no next sibling"),
        }
        NodeId { levels }
    }

    /// How `self` relates to `other`: `self.compute_relation(other)` is
    /// `IsChild` when `self` is a child of `other`, and so on.
    pub fn compute_relation(&self, other: &NodeId) -> Relation {
        if self.levels == other.levels {
            return Relation::SameNode;
        }
        let (a, b) = (&self.levels, &other.levels);
        if a.len() > b.len() && a[..b.len()] == b[..] {
            return if a.len() - b.len() == 1 {
                Relation::IsChild
            } else {
                Relation::IsDescendant
            };
        }
        if b.len() > a.len() && b[..a.len()] == a[..] {
            return if b.len() - a.len() == 1 {
                Relation::IsParent
            } else {
                Relation::IsAncestor
            };
        }
        if a.len() == b.len() && !a.is_empty() && a[..a.len() - 1] == b[..b.len() - 1] {
            return Relation::IsSibling;
        }
        Relation::Unrelated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_node_has_zero_units_and_size() {
        let doc = NodeId::document();
        assert!(doc.is_document());
        assert_eq!(doc.units(), 0);
        assert_eq!(doc.size(), 0);
        assert_eq!(doc.serialize(), Vec::<u8>::new());
    }

    #[test]
    fn parent_of_depth_one_is_document() {
        let n = NodeId::from_levels(vec![1]);
        assert!(n.parent_id().is_document());
    }

    #[test]
    fn parent_of_deeper_node_strips_last_level() {
        let n = NodeId::from_levels(vec![1, 2, 3]);
        assert_eq!(n.parent_id(), NodeId::from_levels(vec![1, 2]));
    }

    #[test]
    fn serialize_round_trips_through_from_serialized() {
        for levels in [
            vec![1],
            vec![2],
            vec![7],
            vec![8],
            vec![1, 1],
            vec![1, 2, 3],
            vec![100, 2, 9999],
        ] {
            let n = NodeId::from_levels(levels.clone());
            let bytes = n.serialize();
            let back = NodeId::from_serialized(n.units(), &bytes, 0);
            assert_eq!(back, n, "round trip failed for {levels:?}");
        }
    }

    #[test]
    fn serialize_is_prefixed_by_ancestor_serialization_in_units() {
        // The byte serialization of an ancestor is a bit-prefix of any
        // descendant's, which is what the range-scan invariants rely on.
        let ancestor = NodeId::from_levels(vec![1, 2]);
        let descendant = NodeId::from_levels(vec![1, 2, 1, 4]);
        let a_bytes = ancestor.serialize();
        let d_bytes = descendant.serialize();
        let mut ancestor_reader = BitReader::new(&a_bytes, ancestor.units());
        let mut d_reader = BitReader::new(&d_bytes, ancestor.units());
        for _ in 0..ancestor.units() {
            assert_eq!(ancestor_reader.read_bit(), d_reader.read_bit());
        }
    }

    #[test]
    fn serialize_strictly_orders_ancestor_before_descendant() {
        let ancestor = NodeId::from_levels(vec![1]);
        for descendant_levels in [vec![1, 1], vec![1, 7], vec![1, 1, 1]] {
            let descendant = NodeId::from_levels(descendant_levels);
            assert!(
                ancestor.serialize() < descendant.serialize(),
                "ancestor must sort before its descendant"
            );
        }
    }

    #[test]
    fn next_sibling_exceeds_all_descendants_but_not_the_true_sibling() {
        let a = NodeId::from_levels(vec![1, 2]);
        let sibling = NodeId::from_levels(vec![1, 3]);
        assert_eq!(a.next_sibling(), sibling);

        for descendant_levels in [vec![1, 2, 1], vec![1, 2, 99], vec![1, 2, 1, 1]] {
            let descendant = NodeId::from_levels(descendant_levels);
            assert!(descendant.serialize() < a.next_sibling().serialize());
            assert!(a.serialize() < descendant.serialize());
        }
    }

    #[test]
    fn compute_relation_same_node() {
        let n = NodeId::from_levels(vec![1, 2]);
        assert_eq!(n.compute_relation(&n), Relation::SameNode);
    }

    #[test]
    fn compute_relation_child_and_parent_are_inverse() {
        let parent = NodeId::from_levels(vec![1]);
        let child = NodeId::from_levels(vec![1, 5]);
        assert_eq!(child.compute_relation(&parent), Relation::IsChild);
        assert_eq!(parent.compute_relation(&child), Relation::IsParent);
    }

    #[test]
    fn compute_relation_descendant_and_ancestor_are_inverse() {
        let ancestor = NodeId::from_levels(vec![1]);
        let descendant = NodeId::from_levels(vec![1, 5, 2]);
        assert_eq!(descendant.compute_relation(&ancestor), Relation::IsDescendant);
        assert_eq!(ancestor.compute_relation(&descendant), Relation::IsAncestor);
    }

    #[test]
    fn compute_relation_siblings() {
        let a = NodeId::from_levels(vec![1, 2]);
        let b = NodeId::from_levels(vec![1, 3]);
        assert_eq!(a.compute_relation(&b), Relation::IsSibling);
    }

    #[test]
    fn compute_relation_unrelated() {
        let a = NodeId::from_levels(vec![1, 2]);
        let b = NodeId::from_levels(vec![2, 1]);
        assert_eq!(a.compute_relation(&b), Relation::Unrelated);
    }

    #[test]
    fn compute_relation_unrelated_across_different_depths() {
        let a = NodeId::from_levels(vec![1, 2]);
        let b = NodeId::from_levels(vec![2, 1, 1]);
        assert_eq!(a.compute_relation(&b), Relation::Unrelated);
    }
}
