use crate::suffix_tree::{NodeKey, SuffixTree};
use log::debug;

/// Iterator over the leaves of a suffix tree in lexicographic order.
///
/// Children are visited in ascending symbol order, so the suffix offsets come
/// out already sorted. Single pass: collect it to keep the result.
pub struct SuffixIndices<'a> {
    tree: &'a SuffixTree,
    stack: Vec<NodeKey>,
}

impl<'a> SuffixIndices<'a> {
    pub(crate) fn new(tree: &'a SuffixTree) -> Self {
        Self {
            tree,
            stack: vec![tree.root_key()],
        }
    }
}

impl Iterator for SuffixIndices<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        while let Some(key) = self.stack.pop() {
            let node = tree.raw(key);
            // Push in reverse so the smallest symbol is popped first
            self.stack.extend(node.children().rev());
            if let Some(index) = node.suffix_index() {
                return Some(index);
            }
        }
        None
    }
}

impl SuffixTree {
    /// Returns the suffix offsets in lexicographic order of their suffixes.
    pub fn suffix_indices(&self) -> SuffixIndices<'_> {
        SuffixIndices::new(self)
    }
}

/// Suffix offsets of a text sorted by suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixArray {
    offsets: Vec<usize>,
}

impl SuffixArray {
    /// Extracts the suffix array by a depth-first walk of `tree`.
    pub fn from_tree(tree: &SuffixTree) -> Self {
        let offsets: Vec<usize> = tree.suffix_indices().collect();
        debug!("extracted suffix array of {} entries", offsets.len());
        Self { offsets }
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Inverse permutation: `ranks()[offset]` is the rank of the suffix
    /// starting at `offset`.
    pub fn ranks(&self) -> Vec<usize> {
        let mut ranks = vec![0; self.offsets.len()];
        for (rank, &offset) in self.offsets.iter().enumerate() {
            ranks[offset] = rank;
        }
        ranks
    }

    /// Rank (0-based) of the suffix starting at `offset`.
    ///
    /// Scans the array, so each call is O(n). Build [`ranks`](Self::ranks)
    /// once for repeated lookups.
    pub fn rank_of(&self, offset: usize) -> Option<usize> {
        self.offsets.iter().position(|&o| o == offset)
    }

    pub fn into_vec(self) -> Vec<usize> {
        self.offsets
    }
}

impl std::ops::Index<usize> for SuffixArray {
    type Output = usize;

    fn index(&self, rank: usize) -> &usize {
        &self.offsets[rank]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suffix_array(text: &[u8]) -> SuffixArray {
        SuffixArray::from_tree(&SuffixTree::build(text).unwrap())
    }

    #[test]
    fn test_banana() {
        let sa = suffix_array(b"banana$");
        assert_eq!(sa.as_slice(), &[6, 5, 3, 1, 0, 4, 2]);
        assert_eq!(sa[0], 6);
        assert_eq!(sa.len(), 7);
    }

    #[test]
    fn test_mississippi() {
        let sa = suffix_array(b"mississippi$");
        assert_eq!(sa.as_slice(), &[11, 10, 7, 4, 1, 0, 9, 8, 6, 3, 5, 2]);
    }

    #[test]
    fn test_sorted_against_naive() {
        let text = b"abracadabra_abracadabra$";
        let sa = suffix_array(text);

        let mut expected: Vec<usize> = (0..text.len()).collect();
        expected.sort_by(|&a, &b| text[a..].cmp(&text[b..]));
        assert_eq!(sa.into_vec(), expected);
    }

    #[test]
    fn test_iterator_is_single_pass() {
        let tree = SuffixTree::build(b"abc$").unwrap();
        let mut iter = tree.suffix_indices();
        assert_eq!(iter.by_ref().count(), 4);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_ranks_invert_offsets() {
        let sa = suffix_array(b"banana$");
        let ranks = sa.ranks();
        assert_eq!(ranks, vec![4, 3, 6, 2, 5, 1, 0]);
        for (offset, &rank) in ranks.iter().enumerate() {
            assert_eq!(sa[rank], offset);
            assert_eq!(sa.rank_of(offset), Some(rank));
        }
        assert_eq!(sa.rank_of(7), None);
    }
}
