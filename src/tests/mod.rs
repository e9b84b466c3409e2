
use crate::{BitStr, Bits};

/// Builds a bit vector from a string of `0` and `1`.
pub(crate) fn bits(stream: &str) -> Bits {
    stream.chars().map(|c| c == '1').collect()
}

/// Renders bits as a string of `0` and `1`.
pub(crate) fn to01(bits: &BitStr) -> String {
    bits.iter()
        .by_vals()
        .map(|bit| if bit { '1' } else { '0' })
        .collect()
}
