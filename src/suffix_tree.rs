//! Online suffix tree construction (Ukkonen).
//!
//! Nodes live in a `SlotMap` arena owned by the tree. Children and suffix
//! links are plain keys into that arena, so the back references never own
//! anything.
//!
//! Leaves use the open-ended edge trick: their edge end is never stored and
//! always reads as `text.len() - 1`, so a new phase never has to touch the
//! existing leaves.

use crate::alphabet::{self, ALPHABET_SIZE, MIN_SYMBOL};
use crate::error::Result;
use log::{debug, trace};
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Stable handle to a node of a [`SuffixTree`].
    pub struct NodeKey;
}

/// How an extension finds the end of the suffix it is about to extend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Traversal {
    /// Compares the suffix against the tree one symbol at a time.
    Naive,
    /// Skips whole edges by length, comparing only the new symbol.
    ///
    /// Valid because the suffix being extended is already in the tree.
    #[default]
    SkipCount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EdgeEnd {
    /// Leaf edge, always reaching the last symbol of the text.
    Open,
    Fixed(usize),
}

/// Inclusive range of the text labelling the edge into a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Edge {
    start: usize,
    end: EdgeEnd,
}

#[derive(Debug)]
pub(crate) struct Node {
    children: [Option<NodeKey>; ALPHABET_SIZE],
    /// `None` only for the root.
    edge: Option<Edge>,
    /// Set on leaves only.
    suffix_index: Option<usize>,
    suffix_link: Option<NodeKey>,
}

impl Node {
    fn root() -> Self {
        Self {
            children: [None; ALPHABET_SIZE],
            edge: None,
            suffix_index: None,
            suffix_link: None,
        }
    }

    fn leaf(start: usize, suffix_index: usize) -> Self {
        Self {
            children: [None; ALPHABET_SIZE],
            edge: Some(Edge {
                start,
                end: EdgeEnd::Open,
            }),
            suffix_index: Some(suffix_index),
            suffix_link: None,
        }
    }

    fn internal(start: usize, end: usize) -> Self {
        Self {
            children: [None; ALPHABET_SIZE],
            edge: Some(Edge {
                start,
                end: EdgeEnd::Fixed(end),
            }),
            suffix_index: None,
            suffix_link: None,
        }
    }
}

/// Where the walk for `text[j..i)` stopped.
#[derive(Debug, Clone, Copy)]
struct Locus {
    /// Last explicit node on the path.
    node: NodeKey,
    /// Child edge entered below `node` and the number of symbols consumed on it.
    within: Option<(NodeKey, usize)>,
    /// Index of the first text symbol not yet matched.
    next: usize,
}

impl Locus {
    fn at(node: NodeKey, next: usize) -> Self {
        Self {
            node,
            within: None,
            next,
        }
    }
}

/// Outcome of a single extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extension {
    /// Rule 2 at an explicit node: a leaf was attached.
    Leaf,
    /// Rule 2 inside an edge: the edge was split around a new leaf.
    Split,
    /// Rule 3: the suffix is already present, the phase is over.
    Present,
}

/// Construction state carried from one phase to the next.
#[derive(Debug, Default)]
struct Construction {
    phase: usize,
    extension: usize,
    /// Internal node created by the previous extension, still waiting for its
    /// suffix link.
    pending: Option<NodeKey>,
    /// First extension not yet turned into a leaf.
    resume: usize,
}

/// Suffix tree of a sentinel-terminated text.
#[derive(Debug)]
pub struct SuffixTree {
    text: Vec<u8>,
    nodes: SlotMap<NodeKey, Node>,
    root: NodeKey,
    traversal: Traversal,
}

impl SuffixTree {
    /// Builds the tree with the default [`Traversal`].
    pub fn build(text: &[u8]) -> Result<Self> {
        Self::build_with(text, Traversal::default())
    }

    /// Builds the tree of `text`, which must be non-empty, use only alphabet
    /// symbols and end with the single sentinel.
    pub fn build_with(text: &[u8], traversal: Traversal) -> Result<Self> {
        alphabet::validate_terminated(text)?;

        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::root());
        nodes[root].suffix_link = Some(root);

        let mut tree = Self {
            text: text.to_vec(),
            nodes,
            root,
            traversal,
        };

        let mut state = Construction::default();
        for phase in 0..tree.text.len() {
            tree.run_phase(&mut state, phase);
        }

        debug!(
            "built suffix tree: {} symbols, {} nodes, {} leaves ({:?})",
            tree.text.len(),
            tree.node_count(),
            tree.leaf_count(),
            traversal
        );
        Ok(tree)
    }

    /// Appends `text[phase]` to every suffix still ending inside the tree.
    fn run_phase(&mut self, state: &mut Construction, phase: usize) {
        state.phase = phase;
        state.pending = None;

        for extension in state.resume..=phase {
            state.extension = extension;
            if self.extend(extension, phase, &mut state.pending) == Extension::Present {
                trace!(
                    "phase {}: suffix {} already present, resuming there",
                    state.phase,
                    state.extension
                );
                state.resume = extension;
                return;
            }
        }
        state.resume = phase + 1;
        trace!("phase {}: all suffixes are leaves", state.phase);
    }

    /// Extends suffix `text[j..i)` with `text[i]`.
    fn extend(&mut self, j: usize, i: usize, pending: &mut Option<NodeKey>) -> Extension {
        let locus = match self.traversal {
            Traversal::Naive => self.walk(j, i),
            Traversal::SkipCount => self.skip_count(j, i),
        };
        let next = locus.next;
        let symbol = self.text[next];

        match locus.within {
            None => {
                if self.child(locus.node, symbol).is_none() {
                    let leaf = self.nodes.insert(Node::leaf(next, j));
                    self.set_child(locus.node, symbol, leaf);
                    self.resolve_link(pending, locus.node);
                    Extension::Leaf
                } else {
                    self.resolve_link(pending, locus.node);
                    Extension::Present
                }
            }
            Some((child, offset)) => {
                let (start, _) = self.bounds(child);
                if self.text[start + offset] == symbol {
                    self.resolve_link(pending, locus.node);
                    Extension::Present
                } else {
                    let internal = self.split(locus.node, child, offset, next, j);
                    self.resolve_link(pending, internal);
                    *pending = Some(internal);
                    Extension::Split
                }
            }
        }
    }

    /// Points the pending internal node, if any, at `target`.
    fn resolve_link(&mut self, pending: &mut Option<NodeKey>, target: NodeKey) {
        if let Some(node) = pending.take() {
            self.nodes[node].suffix_link = Some(target);
        }
    }

    /// Locates the end of `text[j..i)` comparing every symbol.
    fn walk(&self, j: usize, i: usize) -> Locus {
        let mut node = self.root;
        let mut k = j;

        while k < i {
            let Some(child) = self.child(node, self.text[k]) else {
                return Locus::at(node, k);
            };
            let (start, end) = self.bounds(child);
            let mut offset = 0;
            while start + offset <= end && k < i {
                if self.text[start + offset] != self.text[k] {
                    break;
                }
                offset += 1;
                k += 1;
            }

            if start + offset > end {
                node = child;
            } else {
                return Locus {
                    node,
                    within: Some((child, offset)),
                    next: k,
                };
            }
        }
        Locus::at(node, k)
    }

    /// Locates the end of `text[j..i)` jumping over whole edges.
    fn skip_count(&self, j: usize, i: usize) -> Locus {
        let mut node = self.root;
        let mut k = j;

        while k < i {
            let Some(child) = self.child(node, self.text[k]) else {
                return Locus::at(node, k);
            };
            let (start, end) = self.bounds(child);
            let edge_len = end - start + 1;
            let remaining = i - k;
            if remaining < edge_len {
                return Locus {
                    node,
                    within: Some((child, remaining)),
                    next: i,
                };
            }
            k += edge_len;
            node = child;
        }
        Locus::at(node, k)
    }

    /// Splits the edge into `child` after `offset` symbols and hangs a new
    /// leaf for suffix `suffix` (starting at text index `next`) off the split.
    fn split(
        &mut self,
        parent: NodeKey,
        child: NodeKey,
        offset: usize,
        next: usize,
        suffix: usize,
    ) -> NodeKey {
        let (start, _) = self.bounds(child);
        let split_at = start + offset;

        let internal = self.nodes.insert(Node::internal(start, split_at - 1));
        if let Some(edge) = self.nodes[child].edge.as_mut() {
            edge.start = split_at;
        }
        let leaf = self.nodes.insert(Node::leaf(next, suffix));

        let (head, continued, branched) = (self.text[start], self.text[split_at], self.text[next]);
        self.set_child(internal, continued, child);
        self.set_child(internal, branched, leaf);
        self.set_child(parent, head, internal);
        internal
    }

    #[inline]
    fn child(&self, node: NodeKey, symbol: u8) -> Option<NodeKey> {
        self.nodes[node].children[child_slot(symbol)]
    }

    #[inline]
    fn set_child(&mut self, node: NodeKey, symbol: u8, child: NodeKey) {
        self.nodes[node].children[child_slot(symbol)] = Some(child);
    }

    /// Inclusive text range of the edge into `key`, with open ends resolved.
    fn bounds(&self, key: NodeKey) -> (usize, usize) {
        match self.nodes[key].edge {
            Some(Edge { start, end }) => match end {
                EdgeEnd::Open => (start, self.text.len() - 1),
                EdgeEnd::Fixed(end) => (start, end),
            },
            None => (0, 0),
        }
    }

    /// The indexed text, sentinel included.
    pub fn text(&self) -> &[u8] {
        &self.text
    }

    /// Length of the indexed text.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Always false: construction rejects empty text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of leaves; equals the text length for a terminated text.
    pub fn leaf_count(&self) -> usize {
        self.nodes
            .values()
            .filter(|node| node.suffix_index.is_some())
            .count()
    }

    pub fn root(&self) -> NodeRef<'_> {
        self.node(self.root)
    }

    /// Returns a view of the node behind `key`.
    ///
    /// # Panics
    ///
    /// Panics if `key` does not belong to this tree.
    pub fn node(&self, key: NodeKey) -> NodeRef<'_> {
        assert!(self.nodes.contains_key(key), "key does not belong to this tree");
        NodeRef { tree: self, key }
    }

    pub(crate) fn root_key(&self) -> NodeKey {
        self.root
    }

    pub(crate) fn raw(&self, key: NodeKey) -> &Node {
        &self.nodes[key]
    }
}

impl Node {
    /// Children in ascending symbol order.
    pub(crate) fn children(&self) -> impl DoubleEndedIterator<Item = NodeKey> + '_ {
        self.children.iter().flatten().copied()
    }

    pub(crate) fn suffix_index(&self) -> Option<usize> {
        self.suffix_index
    }
}

/// Slot of `symbol` in a child array; the text was validated on entry.
#[inline]
fn child_slot(symbol: u8) -> usize {
    (symbol - MIN_SYMBOL) as usize
}

/// Read-only view of a tree node.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a SuffixTree,
    key: NodeKey,
}

impl<'a> NodeRef<'a> {
    pub fn key(&self) -> NodeKey {
        self.key
    }

    pub fn is_root(&self) -> bool {
        self.key == self.tree.root
    }

    pub fn is_leaf(&self) -> bool {
        self.tree.nodes[self.key].children().next().is_none()
    }

    /// Inclusive text range labelling the edge into this node; `None` for the root.
    pub fn edge(&self) -> Option<(usize, usize)> {
        if self.is_root() {
            None
        } else {
            Some(self.tree.bounds(self.key))
        }
    }

    /// Symbols on the edge into this node.
    pub fn label(&self) -> &'a [u8] {
        match self.edge() {
            Some((start, end)) => &self.tree.text[start..=end],
            None => &[],
        }
    }

    /// Starting offset of the suffix spelled by a leaf.
    pub fn suffix_index(&self) -> Option<usize> {
        self.tree.nodes[self.key].suffix_index
    }

    pub fn suffix_link(&self) -> Option<NodeRef<'a>> {
        let tree = self.tree;
        tree.nodes[self.key]
            .suffix_link
            .map(|key| NodeRef { tree, key })
    }

    /// Children in ascending order of their first symbol.
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let tree = self.tree;
        tree.nodes[self.key]
            .children()
            .map(move |key| NodeRef { tree, key })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::collections::HashMap;

    /// Path label (concatenated edge labels from the root) of every node.
    fn path_labels(tree: &SuffixTree) -> HashMap<NodeKey, Vec<u8>> {
        let mut labels = HashMap::new();
        let mut stack = vec![(tree.root(), Vec::new())];
        while let Some((node, mut path)) = stack.pop() {
            path.extend_from_slice(node.label());
            for child in node.children() {
                stack.push((child, path.clone()));
            }
            labels.insert(node.key(), path);
        }
        labels
    }

    fn leaves_in_order(tree: &SuffixTree) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack = vec![tree.root()];
        while let Some(node) = stack.pop() {
            if let Some(index) = node.suffix_index() {
                out.push(index);
            }
            let children: Vec<_> = node.children().collect();
            stack.extend(children.into_iter().rev());
        }
        out
    }

    #[test]
    fn test_banana_shape() {
        let tree = SuffixTree::build(b"banana$").unwrap();
        assert_eq!(tree.len(), 7);
        assert_eq!(tree.leaf_count(), 7);
        // root + internal nodes for "a", "ana", "na" + 7 leaves
        assert_eq!(tree.node_count(), 11);

        let first: Vec<u8> = tree.root().children().map(|c| c.label()[0]).collect();
        assert_eq!(first, b"$abn");
        assert_eq!(leaves_in_order(&tree), vec![6, 5, 3, 1, 0, 4, 2]);
    }

    #[test]
    fn test_leaves_spell_their_suffix() {
        let text = b"mississippi$";
        let tree = SuffixTree::build(text).unwrap();
        let labels = path_labels(&tree);

        for (key, label) in &labels {
            let node = tree.node(*key);
            if let Some(index) = node.suffix_index() {
                assert!(node.is_leaf());
                assert_eq!(label.as_slice(), &text[index..]);
            } else if !node.is_root() {
                assert!(node.children().count() >= 2, "internal node must branch");
            }
        }
        assert_eq!(tree.leaf_count(), text.len());
    }

    #[test]
    fn test_suffix_links_drop_first_symbol() {
        for text in [&b"banana$"[..], b"mississippi$", b"abcabxabcd$", b"aaaaaa$"] {
            let tree = SuffixTree::build(text).unwrap();
            let labels = path_labels(&tree);

            for (key, label) in &labels {
                let node = tree.node(*key);
                if node.is_root() {
                    assert_eq!(node.suffix_link().unwrap().key(), node.key());
                    continue;
                }
                if node.is_leaf() {
                    continue;
                }
                let link = node
                    .suffix_link()
                    .unwrap_or_else(|| panic!("internal node {:?} has no link", label));
                assert_eq!(labels[&link.key()].as_slice(), &label[1..]);
            }
        }
    }

    #[test]
    fn test_traversals_agree() {
        for text in [&b"banana$"[..], b"abracadabra$", b"xyxyxyxyx$", b"$"] {
            let naive = SuffixTree::build_with(text, Traversal::Naive).unwrap();
            let fast = SuffixTree::build_with(text, Traversal::SkipCount).unwrap();
            assert_eq!(naive.node_count(), fast.node_count());
            assert_eq!(leaves_in_order(&naive), leaves_in_order(&fast));
        }
    }

    #[test]
    fn test_sentinel_only() {
        let tree = SuffixTree::build(b"$").unwrap();
        assert_eq!(tree.node_count(), 2);
        let leaf = tree.root().children().next().unwrap();
        assert_eq!(leaf.label(), b"$");
        assert_eq!(leaf.suffix_index(), Some(0));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            SuffixTree::build(b"banana"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            SuffixTree::build(b""),
            Err(Error::InvalidArgument(_))
        ));
        assert_eq!(
            SuffixTree::build(b"ban ana$").unwrap_err(),
            Error::UnsupportedSymbol {
                byte: b' ',
                offset: 3
            }
        );
    }
}
