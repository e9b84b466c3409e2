//! # bwtzip - Suffix Tree, BWT and Huffman Compression
//!
//! A lossless text compressor built from three classical pieces:
//!
//! 1. **Ukkonen's suffix tree**, built online in a single pass
//! 2. **Burrows-Wheeler Transform**, read straight off the suffix array the
//!    tree yields, then collapsed into runs
//! 3. **Entropy coding**: Huffman codewords for run symbols and Elias-Omega
//!    codes for every length in the container
//!
//! Texts use the 91 printable ASCII symbols `$` (36) through `~` (126) and end
//! with a single `$` sentinel.
//!
//! ## Example
//!
//! ```
//! use bwtzip::{decode, encode, SuffixArray, SuffixTree};
//!
//! let tree = SuffixTree::build(b"banana$").unwrap();
//! let sa = SuffixArray::from_tree(&tree);
//! assert_eq!(sa.as_slice(), &[6, 5, 3, 1, 0, 4, 2]);
//!
//! let packed = encode(b"banana$").unwrap();
//! assert_eq!(decode(&packed).unwrap(), b"banana$");
//! ```
//!
//! ## Performance
//!
//! - Every extension walks down from the root, so construction costs
//!   O(n × depth); skip/count only makes each walk cost one step per edge
//!   instead of one per symbol
//! - Inverse BWT runs in O(n) using counting-sort LF-mapping
//! - Nodes hold a dense 91-slot child array, so memory grows as O(91 × n)

pub mod alphabet;
pub mod bwt;
mod container;
pub mod elias;
mod error;
pub mod huffman;
pub mod rle;
mod suffix_array;
mod suffix_tree;

#[cfg(test)]
mod tests;

pub use container::{
    decode, encode, parse, Decoder, EncodeStats, Encoder, Header, SentinelPolicy, SymbolRecord,
    DEFAULT_MAX_TEXT_LENGTH,
};
pub use error::{Error, Result};
pub use rle::Run;
pub use suffix_array::{SuffixArray, SuffixIndices};
pub use suffix_tree::{NodeKey, NodeRef, SuffixTree, Traversal};

/// Owned bit sequence, most significant bit first.
pub type Bits = bitvec::vec::BitVec<u8, bitvec::order::Msb0>;

/// Borrowed bit sequence, most significant bit first.
pub type BitStr = bitvec::slice::BitSlice<u8, bitvec::order::Msb0>;
