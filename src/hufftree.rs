use std::cmp::Ordering;

use tracing::{debug, trace, Level};

use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;
use crate::min_heap::MinHeap;

#[derive(Debug, Clone, PartialEq)]
pub struct HuffmanTree {
    pub root: HuffNode,
}

impl HuffmanTree {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        HuffmanTree::from_frequencies(&FrequencyTable::analyze(bytes))
    }

    /// Greedy minimum-weight merge over the table's symbols.
    ///
    /// Nodes are ordered by occurrence count, ties broken by a sequence number:
    /// leaves are numbered in ascending symbol order, merged nodes after every
    /// leaf in creation order. Of the two nodes removed per step, the second
    /// becomes the left (0) child.
    ///
    /// A table with a single symbol produces a tree whose root is that leaf.
    pub fn from_frequencies(table: &FrequencyTable) -> Result<Self> {
        if table.is_empty() {
            return Err(Error::EmptyInput);
        }

        let total = table.total() as f64;
        let nodes: Vec<Pending> = table.iter()
            .enumerate()
            .map(|(order, (byte, count))| Pending {
                count,
                order,
                node: HuffNode::new(byte, count as f64 / total),
            })
            .collect();

        let mut next_order = nodes.len();
        let mut heap = MinHeap::build(nodes);
        while heap.heap_size() > 1 {
            let (Some(first), Some(second)) = (heap.extract_min(), heap.extract_min()) else {
                break;
            };
            trace!(
                left = second.count,
                right = first.count,
                "merging nodes"
            );
            heap.insert(Pending {
                count: first.count + second.count,
                order: next_order,
                node: HuffNode::merge(second.node, first.node),
            });
            next_order += 1;
        }

        let root = heap.extract_min().ok_or(Error::EmptyInput)?.node;
        let tree = HuffmanTree { root };
        debug!(
            symbols = tree.leaf_count(),
            depth = tree.depth(),
            "built huffman tree"
        );
        if tracing::enabled!(Level::TRACE) {
            tree.trace_structure();
        }
        Ok(tree)
    }

    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    pub fn internal_count(&self) -> usize {
        self.root.internal_count()
    }

    /// Longest root-to-leaf path. A lone leaf still carries a one-bit code.
    pub fn depth(&self) -> usize {
        self.root.depth().max(1)
    }

    /// Σ frequency × code length over all leaves.
    pub fn weighted_path_length(&self) -> f64 {
        match &self.root {
            HuffNode::Leaf { frequency, .. } => *frequency,
            node => node.weighted_path_length(0),
        }
    }

    /// Leaf symbols, left to right.
    pub fn symbols(&self) -> Vec<u8> {
        let mut symbols = Vec::with_capacity(self.leaf_count());
        self.root.collect_symbols(&mut symbols);
        symbols
    }

    /// Same shape and symbols, with frequencies within `tolerance`.
    pub fn approx_eq(&self, other: &HuffmanTree, tolerance: f64) -> bool {
        self.root.approx_eq(&other.root, tolerance)
    }

    fn trace_structure(&self) {
        self.trace_node(&self.root, 0, "root");
    }

    fn trace_node(&self, node: &HuffNode, depth: usize, label: &str) {
        let indent = "  ".repeat(depth);
        match node {
            HuffNode::Leaf { byte, frequency } => {
                trace!("{}{}-> Leaf: 0x{:02x} [frequency: {}]", indent, label, byte, frequency);
            },
            HuffNode::Internal { frequency, left, right } => {
                trace!("{}{}-> Internal [frequency: {}]", indent, label, frequency);
                self.trace_node(left, depth + 1, "L");
                self.trace_node(right, depth + 1, "R");
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HuffNode {
    Leaf {
        frequency: f64,
        byte: u8,
    },
    Internal {
        frequency: f64,
        left: Box<HuffNode>,
        right: Box<HuffNode>,
    }
}

impl HuffNode {
    pub fn new(b: u8, f: f64) -> Self {
        HuffNode::Leaf {
            frequency: f,
            byte: b,
        }
    }

    pub fn frequency(&self) -> f64 {
        match self {
            HuffNode::Leaf { frequency, .. } => *frequency,
            HuffNode::Internal { frequency, .. } => *frequency,
        }
    }

    pub fn merge(left: Self, right: Self) -> Self {
        let frequency = left.frequency() + right.frequency();
        HuffNode::Internal {
            frequency,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 1,
            HuffNode::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    pub fn internal_count(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 0,
            HuffNode::Internal { left, right, .. } => {
                1 + left.internal_count() + right.internal_count()
            }
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 0,
            HuffNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn weighted_path_length(&self, depth: usize) -> f64 {
        match self {
            HuffNode::Leaf { frequency, .. } => frequency * depth as f64,
            HuffNode::Internal { left, right, .. } => {
                left.weighted_path_length(depth + 1) + right.weighted_path_length(depth + 1)
            }
        }
    }

    fn collect_symbols(&self, symbols: &mut Vec<u8>) {
        match self {
            HuffNode::Leaf { byte, .. } => symbols.push(*byte),
            HuffNode::Internal { left, right, .. } => {
                left.collect_symbols(symbols);
                right.collect_symbols(symbols);
            }
        }
    }

    fn approx_eq(&self, other: &HuffNode, tolerance: f64) -> bool {
        match (self, other) {
            (HuffNode::Leaf { byte: a, frequency: f1 }, HuffNode::Leaf { byte: b, frequency: f2 }) => {
                a == b && (f1 - f2).abs() <= tolerance
            },
            (
                HuffNode::Internal { frequency: f1, left: l1, right: r1 },
                HuffNode::Internal { frequency: f2, left: l2, right: r2 },
            ) => {
                (f1 - f2).abs() <= tolerance
                    && l1.approx_eq(l2, tolerance)
                    && r1.approx_eq(r2, tolerance)
            },
            _ => false,
        }
    }
}

/// A queued subtree with its exact occurrence count and tie-break sequence.
#[derive(Debug)]
struct Pending {
    count: u64,
    order: usize,
    node: HuffNode,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        self.count.cmp(&other.count)
            .then_with(|| self.order.cmp(&other.order))
    }
}
