//! Burrows-Wheeler Transform over sentinel-terminated text.
//!
//! The forward direction reads the transform straight off the suffix array.
//! The inverse uses LF-mapping built with a counting sort, so neither
//! direction sorts rotations.

use crate::alphabet::{self, ALPHABET_SIZE, SENTINEL};
use crate::error::{Error, Result};
use crate::suffix_array::SuffixArray;
use log::debug;

/// Computes the BWT of `text` from its suffix array.
///
/// `bwt[r]` is the symbol preceding the suffix of rank `r`, wrapping to the
/// last symbol for the suffix starting at 0.
pub fn forward(text: &[u8], suffix_array: &SuffixArray) -> Vec<u8> {
    debug_assert_eq!(text.len(), suffix_array.len());
    let Some(&last) = text.last() else {
        return Vec::new();
    };

    suffix_array
        .as_slice()
        .iter()
        .map(|&offset| if offset == 0 { last } else { text[offset - 1] })
        .collect()
}

/// Reconstructs the text whose BWT is `bwt`.
///
/// Fails with [`Error::CorruptData`] if the sentinel is missing or repeated,
/// or a symbol lies outside the alphabet.
pub fn inverse(bwt: &[u8]) -> Result<Vec<u8>> {
    if bwt.is_empty() {
        return Ok(Vec::new());
    }

    let mut freq = [0usize; ALPHABET_SIZE];
    for (i, &symbol) in bwt.iter().enumerate() {
        let slot = alphabet::slot(symbol).ok_or_else(|| {
            Error::CorruptData(format!(
                "symbol {:#04x} at BWT position {} is outside the alphabet",
                symbol, i
            ))
        })?;
        freq[slot] += 1;
    }

    // Checked before anything proportional to the input is allocated
    let sentinel_slot = slot_of(SENTINEL);
    if freq[sentinel_slot] != 1 {
        return Err(Error::CorruptData(format!(
            "expected exactly one sentinel '{}' in the BWT, found {}",
            SENTINEL as char, freq[sentinel_slot]
        )));
    }

    // First row of each symbol in the sorted first column
    let mut rank = [0usize; ALPHABET_SIZE];
    let mut cumulative = 0;
    for (slot, &count) in freq.iter().enumerate() {
        rank[slot] = cumulative;
        cumulative += count;
    }

    // occurrences[i]: number of earlier positions holding bwt[i]
    let mut seen = [0usize; ALPHABET_SIZE];
    let occurrences: Vec<usize> = bwt
        .iter()
        .map(|&symbol| {
            let slot = slot_of(symbol);
            let count = seen[slot];
            seen[slot] += 1;
            count
        })
        .collect();

    let mut idx = bwt
        .iter()
        .position(|&b| b == SENTINEL)
        .ok_or_else(|| Error::CorruptData("sentinel missing from the BWT".to_string()))?;

    let mut original = vec![0u8; bwt.len()];
    for k in (0..bwt.len()).rev() {
        let symbol = bwt[idx];
        original[k] = symbol;
        idx = rank[slot_of(symbol)] + occurrences[idx];
    }

    debug!("inverted BWT of {} symbols", bwt.len());
    Ok(original)
}

/// Slot of a symbol already checked against the alphabet.
#[inline]
fn slot_of(symbol: u8) -> usize {
    (symbol - alphabet::MIN_SYMBOL) as usize
}
