use std::collections::BTreeMap;

use crate::bit_vec::BitVec;
use crate::hufftree::{HuffNode, HuffmanTree};

/// Prefix code per symbol, derived from a [`HuffmanTree`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodingMap {
    codes: BTreeMap<u8, BitVec>,
}

impl EncodingMap {
    /// Left = 0, right = 1. A tree that is a lone leaf gets the code `0`.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut codes: BTreeMap<u8, BitVec> = BTreeMap::new();
        match &tree.root {
            HuffNode::Leaf { byte, .. } => {
                codes.insert(*byte, std::iter::once(false).collect());
            },
            root => {
                let mut path = BitVec::new();
                Self::walk(root, &mut path, &mut codes);
            }
        }
        EncodingMap { codes }
    }

    fn walk(node: &HuffNode, path: &mut BitVec, codes: &mut BTreeMap<u8, BitVec>) {
        match node {
            HuffNode::Leaf { byte, .. } => {
                codes.insert(*byte, path.clone());
            },
            HuffNode::Internal { left, right, .. } => {
                path.push_bit(false);
                Self::walk(left, path, codes);
                path.pop();
                path.push_bit(true);
                Self::walk(right, path, codes);
                path.pop();
            }
        }
    }

    pub fn get(&self, symbol: u8) -> Option<&BitVec> {
        self.codes.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// (symbol, code) pairs in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &BitVec)> + '_ {
        self.codes.iter().map(|(&symbol, code)| (symbol, code))
    }

    /// Total number of bits `data` encodes to, if every byte has a code.
    pub fn encoded_len(&self, data: &[u8]) -> Option<usize> {
        data.iter().map(|b| self.get(*b).map(BitVec::len)).sum()
    }

    pub fn is_prefix_free(&self) -> bool {
        let codes: Vec<&BitVec> = self.codes.values().collect();
        codes.iter().enumerate().all(|(i, a)| {
            codes.iter()
                .enumerate()
                .all(|(j, b)| i == j || !b.starts_with(a))
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::frequency::FrequencyTable;

    #[test]
    fn two_symbol_codes() {
        let tree = HuffmanTree::from_bytes(b"aaab").unwrap();
        let map = EncodingMap::from_tree(&tree);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(b'a').unwrap().to_string(), "0");
        assert_eq!(map.get(b'b').unwrap().to_string(), "1");
        assert_eq!(map.encoded_len(b"aaab"), Some(4));
        assert_eq!(map.encoded_len(b"abc"), None);
    }

    #[test]
    fn lone_leaf_gets_zero() {
        let tree = HuffmanTree::from_bytes(b"\n\n\n").unwrap();
        let map = EncodingMap::from_tree(&tree);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(b'\n').unwrap().to_string(), "0");
    }

    #[test]
    fn one_entry_per_leaf_and_prefix_free() {
        let text = b"Lorem ipsum dolor sit amet, consectetur adipiscing elit.\nCurabitur sit amet justo nibh.";
        let tree = HuffmanTree::from_bytes(text).unwrap();
        let map = EncodingMap::from_tree(&tree);
        assert_eq!(map.len(), tree.leaf_count());
        assert!(map.is_prefix_free());

        let wpl: f64 = map.iter()
            .map(|(symbol, code)| {
                let count = text.iter().filter(|&&b| b == symbol).count();
                count as f64 / text.len() as f64 * code.len() as f64
            })
            .sum();
        assert!((wpl - tree.weighted_path_length()).abs() < 1e-9);
    }

    #[test]
    fn long_codes_fit() {
        // fibonacci-like counts produce a maximally skewed tree
        let mut counts = vec![(0u8, 1u64), (1, 1)];
        for i in 2..40u8 {
            let next = counts[i as usize - 1].1 + counts[i as usize - 2].1;
            counts.push((i, next));
        }
        let table: FrequencyTable = counts.into_iter().collect();
        let tree = HuffmanTree::from_frequencies(&table).unwrap();
        let map = EncodingMap::from_tree(&tree);
        assert_eq!(tree.depth(), 39);
        assert!(map.iter().any(|(_, code)| code.len() == 39));
        assert!(map.is_prefix_free());
    }
}
