use crate::error::{Error, Result};

/// Smallest supported symbol, also the sentinel.
pub const MIN_SYMBOL: u8 = 36;

/// Largest supported symbol.
pub const MAX_SYMBOL: u8 = 126;

/// Number of symbols in the alphabet (printable ASCII 36..=126).
pub const ALPHABET_SIZE: usize = (MAX_SYMBOL - MIN_SYMBOL) as usize + 1;

/// Terminator that must close every text handed to the encoder.
///
/// It sorts before every other symbol, which makes each suffix a leaf of the
/// suffix tree and gives the inverse BWT its starting row.
pub const SENTINEL: u8 = b'$';

/// Maps a symbol to its dense slot index, or `None` if it is not supported.
#[inline]
pub fn slot(symbol: u8) -> Option<usize> {
    if (MIN_SYMBOL..=MAX_SYMBOL).contains(&symbol) {
        Some((symbol - MIN_SYMBOL) as usize)
    } else {
        None
    }
}

/// Inverse of [`slot`].
#[inline]
pub fn symbol_at(slot: usize) -> u8 {
    debug_assert!(slot < ALPHABET_SIZE);
    MIN_SYMBOL + slot as u8
}

/// Checks that every byte of `text` belongs to the alphabet.
pub fn validate(text: &[u8]) -> Result<()> {
    match text.iter().position(|&b| slot(b).is_none()) {
        Some(offset) => Err(Error::UnsupportedSymbol {
            byte: text[offset],
            offset,
        }),
        None => Ok(()),
    }
}

/// Checks that `text` is non-empty, within the alphabet, and ends with the
/// only occurrence of [`SENTINEL`].
pub fn validate_terminated(text: &[u8]) -> Result<()> {
    validate(text)?;

    let Some((&last, body)) = text.split_last() else {
        return Err(Error::InvalidArgument("text is empty".to_string()));
    };
    if last != SENTINEL {
        return Err(Error::InvalidArgument(format!(
            "text must end with the sentinel '{}'",
            SENTINEL as char
        )));
    }
    if let Some(offset) = body.iter().position(|&b| b == SENTINEL) {
        return Err(Error::InvalidArgument(format!(
            "sentinel '{}' also occurs at offset {}",
            SENTINEL as char, offset
        )));
    }
    Ok(())
}
