//! Elias-Omega universal code for positive integers.
//!
//! A value is written as a chain of length components followed by the value
//! itself. Every component but the last has its leading bit cleared, which
//! tells the reader another component follows. The final component keeps its
//! leading 1.

use crate::error::{Error, Result};
use crate::{BitStr, Bits};

/// Width of the largest length indicator the decoder accepts.
const MAX_COMPONENT_BITS: u64 = u64::BITS as u64;

/// Encodes `n` into a fresh bit vector.
pub fn encode(n: u64) -> Result<Bits> {
    let mut out = Bits::new();
    encode_into(n, &mut out)?;
    Ok(out)
}

/// Appends the code for `n` to `out`.
///
/// Fails with [`Error::InvalidArgument`] when `n == 0`; `out` is left untouched.
pub fn encode_into(n: u64, out: &mut Bits) -> Result<()> {
    if n < 1 {
        return Err(Error::InvalidArgument(
            "Elias-Omega can only encode positive integers, got 0".to_string(),
        ));
    }

    // components[0] is n, each following entry is the previous bit length - 1
    let mut components = Vec::new();
    let mut current = n;
    while current >= 1 {
        components.push(current);
        current = u64::from(bit_length(current)) - 1;
    }

    for (idx, &value) in components.iter().enumerate().rev() {
        let width = bit_length(value) as usize;
        let msb = out.len();
        push_uint(out, value, width);
        if idx != 0 {
            out.set(msb, false);
        }
    }
    Ok(())
}

/// Decodes one integer from the front of `bits`, returning it with the
/// unread remainder.
///
/// An empty input yields `(0, empty)`.
pub fn decode(bits: &BitStr) -> Result<(u64, &BitStr)> {
    if bits.is_empty() {
        return Ok((0, bits));
    }

    let mut pos = 0;
    let mut readlen = 1usize;
    while pos + readlen <= bits.len() {
        let component = &bits[pos..pos + readlen];
        pos += readlen;

        let value = read_uint(component);
        if component[0] {
            return Ok((value, &bits[pos..]));
        }

        let restored = value | (1u64 << (readlen - 1));
        readlen = restored
            .checked_add(1)
            .filter(|&len| len <= MAX_COMPONENT_BITS)
            .ok_or_else(|| {
                Error::MalformedStream(format!(
                    "Elias-Omega length indicator {} exceeds {} bits",
                    restored, MAX_COMPONENT_BITS
                ))
            })? as usize;
    }

    Err(Error::MalformedStream(format!(
        "stream ended after {} bits without a terminal Elias-Omega component",
        bits.len()
    )))
}

/// Number of significant bits in `value`.
#[inline]
fn bit_length(value: u64) -> u32 {
    u64::BITS - value.leading_zeros()
}

/// Appends the low `width` bits of `value`, most significant first.
pub(crate) fn push_uint(out: &mut Bits, value: u64, width: usize) {
    debug_assert!(width <= 64);
    for shift in (0..width).rev() {
        out.push((value >> shift) & 1 == 1);
    }
}

/// Reads `bits` (at most 64) as an unsigned integer, most significant first.
pub(crate) fn read_uint(bits: &BitStr) -> u64 {
    debug_assert!(bits.len() <= 64);
    bits.iter()
        .by_vals()
        .fold(0u64, |acc, bit| (acc << 1) | u64::from(bit))
}
