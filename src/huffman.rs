//! Huffman code construction over the fixed alphabet.
//!
//! The tree is only a scaffold: once [`generate_codes`] has produced a
//! [`CodeTable`] the tree can be dropped.

use crate::alphabet::{self, ALPHABET_SIZE};
use crate::{BitStr, Bits};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A node of the Huffman tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffmanNode {
    /// A symbol and its number of occurrences.
    Leaf { symbol: u8, freq: u64 },
    /// Two merged subtrees; carries no symbol, only the summed frequency.
    Internal {
        freq: u64,
        left: Box<HuffmanNode>,
        right: Box<HuffmanNode>,
    },
}

impl HuffmanNode {
    /// Returns the frequency of the node.
    pub fn freq(&self) -> u64 {
        match self {
            HuffmanNode::Leaf { freq, .. } => *freq,
            HuffmanNode::Internal { freq, .. } => *freq,
        }
    }

    /// Returns true for leaf nodes.
    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffmanNode::Leaf { .. })
    }
}

/// Heap entry ordered so the lowest frequency pops first.
///
/// Equal frequencies pop in insertion order, which keeps codeword assignment
/// deterministic.
#[derive(Debug)]
struct QueueEntry {
    freq: u64,
    seq: u64,
    node: Box<HuffmanNode>,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.freq == other.freq && self.seq == other.seq
    }
}

impl Eq for QueueEntry {}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap
        (other.freq, other.seq).cmp(&(self.freq, self.seq))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-priority queue of Huffman nodes keyed by frequency.
#[derive(Debug, Default)]
pub struct HuffmanQueue {
    heap: BinaryHeap<QueueEntry>,
    next_seq: u64,
}

impl HuffmanQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a node; ties with existing entries resolve in its disfavour.
    pub fn push(&mut self, node: HuffmanNode) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(QueueEntry {
            freq: node.freq(),
            seq,
            node: Box::new(node),
        });
    }

    /// Removes the node with the lowest frequency.
    pub fn pop(&mut self) -> Option<Box<HuffmanNode>> {
        self.heap.pop().map(|entry| entry.node)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

/// Counts each symbol of `text` and queues one leaf per symbol present.
///
/// Leaves are inserted in ascending symbol order. Bytes outside the alphabet
/// are not counted.
pub fn build_frequencies(text: &[u8]) -> HuffmanQueue {
    let mut counts = [0u64; ALPHABET_SIZE];
    for &byte in text {
        if let Some(slot) = alphabet::slot(byte) {
            counts[slot] += 1;
        }
    }

    let mut queue = HuffmanQueue::new();
    for (slot, &freq) in counts.iter().enumerate() {
        if freq > 0 {
            queue.push(HuffmanNode::Leaf {
                symbol: alphabet::symbol_at(slot),
                freq,
            });
        }
    }
    queue
}

/// Merges the two lowest nodes until one remains and returns it as the root.
///
/// The first node popped becomes the left child. Returns `None` for an empty
/// queue.
pub fn build_tree(mut queue: HuffmanQueue) -> Option<HuffmanNode> {
    while queue.len() > 1 {
        let (Some(left), Some(right)) = (queue.pop(), queue.pop()) else {
            break;
        };
        queue.push(HuffmanNode::Internal {
            freq: left.freq() + right.freq(),
            left,
            right,
        });
    }
    queue.pop().map(|root| *root)
}

/// Symbol to codeword mapping, detached from the tree that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<Bits>>,
}

impl CodeTable {
    fn empty() -> Self {
        Self {
            codes: vec![None; ALPHABET_SIZE],
        }
    }

    /// Returns the codeword for `symbol`, if it was part of the input.
    pub fn get(&self, symbol: u8) -> Option<&BitStr> {
        let slot = alphabet::slot(symbol)?;
        self.codes[slot].as_deref()
    }

    /// Iterates `(symbol, codeword)` pairs in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &BitStr)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(slot, code)| Some((alphabet::symbol_at(slot), code.as_deref()?)))
    }

    /// Number of symbols with a codeword.
    pub fn len(&self) -> usize {
        self.codes.iter().filter(|code| code.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Walks the tree assigning `0` on left descent and `1` on right descent.
///
/// A tree made of a single leaf gives that symbol the empty codeword.
pub fn generate_codes(tree: &HuffmanNode) -> CodeTable {
    let mut table = CodeTable::empty();
    let mut stack = vec![(tree, Bits::new())];

    while let Some((node, prefix)) = stack.pop() {
        match node {
            HuffmanNode::Leaf { symbol, .. } => {
                if let Some(slot) = alphabet::slot(*symbol) {
                    table.codes[slot] = Some(prefix);
                }
            }
            HuffmanNode::Internal { left, right, .. } => {
                let mut right_prefix = prefix.clone();
                right_prefix.push(true);
                stack.push((right.as_ref(), right_prefix));

                let mut left_prefix = prefix;
                left_prefix.push(false);
                stack.push((left.as_ref(), left_prefix));
            }
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::to01;

    fn codes_for(text: &[u8]) -> CodeTable {
        let tree = build_tree(build_frequencies(text)).expect("non-empty input");
        generate_codes(&tree)
    }

    #[test]
    fn test_frequencies() {
        let mut queue = build_frequencies(b"aabccc");
        assert_eq!(queue.len(), 3);

        let first = queue.pop().unwrap();
        assert_eq!(*first, HuffmanNode::Leaf { symbol: b'b', freq: 1 });
        let second = queue.pop().unwrap();
        assert_eq!(*second, HuffmanNode::Leaf { symbol: b'a', freq: 2 });
    }

    #[test]
    fn test_ties_pop_in_insertion_order() {
        let mut queue = build_frequencies(b"dcba");
        let order: Vec<u8> = std::iter::from_fn(|| queue.pop())
            .map(|node| match *node {
                HuffmanNode::Leaf { symbol, .. } => symbol,
                HuffmanNode::Internal { .. } => unreachable!(),
            })
            .collect();
        assert_eq!(order, b"abcd");
    }

    #[test]
    fn test_banana_codes() {
        let table = codes_for(b"banana$");
        assert_eq!(table.len(), 4);
        assert_eq!(to01(table.get(b'a').unwrap()), "0");
        assert_eq!(to01(table.get(b'n').unwrap()), "10");
        assert_eq!(to01(table.get(b'$').unwrap()), "110");
        assert_eq!(to01(table.get(b'b').unwrap()), "111");
        assert!(table.get(b'z').is_none());
    }

    #[test]
    fn test_two_symbols_get_one_bit_each() {
        let tree = build_tree(build_frequencies(b"aaaa$")).unwrap();
        assert_eq!(tree.freq(), 5);
        match &tree {
            HuffmanNode::Internal { left, right, .. } => {
                assert!(left.is_leaf());
                assert!(right.is_leaf());
            }
            HuffmanNode::Leaf { .. } => panic!("expected an internal root"),
        }

        let table = generate_codes(&tree);
        assert_eq!(to01(table.get(b'$').unwrap()), "0");
        assert_eq!(to01(table.get(b'a').unwrap()), "1");
    }

    #[test]
    fn test_single_symbol_empty_code() {
        let table = codes_for(b"zzzz");
        assert_eq!(table.len(), 1);
        assert!(table.get(b'z').unwrap().is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(build_tree(build_frequencies(b"")).is_none());
    }

    #[test]
    fn test_iter_ascending() {
        let table = codes_for(b"the_quick_brown_fox$");
        let symbols: Vec<u8> = table.iter().map(|(symbol, _)| symbol).collect();
        let mut sorted = symbols.clone();
        sorted.sort_unstable();
        assert_eq!(symbols, sorted);
        assert_eq!(symbols.len(), table.len());
    }
}
