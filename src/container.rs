//! Self-describing bitstream container.
//!
//! Layout, most significant bit first within every byte:
//!
//! ```text
//! EliasOmega(bwt length)
//! EliasOmega(distinct symbol count)
//! per symbol, ascending:   7-bit ASCII code, EliasOmega(codeword length), codeword
//! per run, in BWT order:   codeword of the run symbol, EliasOmega(run length)
//! zero padding to the next byte boundary
//! ```

use crate::alphabet::{self, ALPHABET_SIZE, SENTINEL};
use crate::bwt;
use crate::elias::{self, push_uint, read_uint};
use crate::error::{Error, Result};
use crate::huffman::{self, CodeTable};
use crate::rle::{self, Run};
use crate::suffix_array::SuffixArray;
use crate::suffix_tree::{SuffixTree, Traversal};
use crate::{BitStr, Bits};
use ahash::AHashMap as HashMap;
use bitvec::{bitvec, order::Msb0, view::BitView};
use log::debug;
use std::borrow::Cow;

/// Width of the symbol field in a symbol record.
const SYMBOL_BITS: usize = 7;

/// What the encoder does with text that lacks the trailing sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SentinelPolicy {
    /// Reject text that does not already end with the single sentinel.
    #[default]
    Require,
    /// Append the sentinel when it is missing.
    Append,
}

/// Text → container encoder.
///
/// ```
/// use bwtzip::{Decoder, Encoder, SentinelPolicy};
///
/// let packed = Encoder::new()
///     .sentinel(SentinelPolicy::Append)
///     .encode(b"banana")
///     .unwrap();
/// let text = Decoder::new().strip_sentinel(true).decode(&packed).unwrap();
/// assert_eq!(text, b"banana");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Encoder {
    sentinel: SentinelPolicy,
    traversal: Traversal,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how a missing sentinel is handled.
    pub fn sentinel(mut self, policy: SentinelPolicy) -> Self {
        self.sentinel = policy;
        self
    }

    /// Sets the suffix tree traversal used during construction.
    pub fn traversal(mut self, traversal: Traversal) -> Self {
        self.traversal = traversal;
        self
    }

    /// Encodes `text` into a byte-aligned container.
    pub fn encode(&self, text: &[u8]) -> Result<Vec<u8>> {
        self.encode_with_stats(text).map(|(bytes, _)| bytes)
    }

    /// Encodes `text` and reports what the pipeline produced.
    pub fn encode_with_stats(&self, text: &[u8]) -> Result<(Vec<u8>, EncodeStats)> {
        let text = self.terminated(text);

        let tree = SuffixTree::build_with(&text, self.traversal)?;
        let suffix_array = SuffixArray::from_tree(&tree);
        drop(tree);

        let transformed = bwt::forward(&text, &suffix_array);
        let runs = rle::collapse(&transformed);
        debug!(
            "BWT of {} symbols collapsed into {} runs",
            transformed.len(),
            runs.len()
        );

        let tree = huffman::build_tree(huffman::build_frequencies(&text))
            .ok_or_else(|| Error::InvalidArgument("text is empty".to_string()))?;
        let codes = huffman::generate_codes(&tree);

        let mut bits = Bits::new();
        write_header(&mut bits, transformed.len(), &codes)?;
        write_runs(&mut bits, &runs, &codes)?;
        let payload_bits = bits.len();

        bits.resize(payload_bits.next_multiple_of(8), false);
        let bytes = bits.into_vec();

        let stats = EncodeStats {
            text_length: text.len(),
            distinct_symbols: codes.len(),
            runs: runs.len(),
            payload_bits,
            container_bytes: bytes.len(),
        };
        debug!(
            "encoded {} symbols into {} bytes ({:.2}%)",
            stats.text_length,
            stats.container_bytes,
            stats.compression_ratio()
        );
        Ok((bytes, stats))
    }

    fn terminated<'t>(&self, text: &'t [u8]) -> Cow<'t, [u8]> {
        match self.sentinel {
            SentinelPolicy::Append if text.last() != Some(&SENTINEL) => {
                let mut owned = Vec::with_capacity(text.len() + 1);
                owned.extend_from_slice(text);
                owned.push(SENTINEL);
                Cow::Owned(owned)
            }
            _ => Cow::Borrowed(text),
        }
    }
}

/// Statistics about one encode run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeStats {
    /// Symbols encoded, sentinel included
    pub text_length: usize,
    /// Symbols with a Huffman codeword
    pub distinct_symbols: usize,
    /// Runs in the collapsed BWT
    pub runs: usize,
    /// Container bits before padding
    pub payload_bits: usize,
    /// Container size in bytes
    pub container_bytes: usize,
}

impl EncodeStats {
    /// Returns the container size as a percentage of the text size.
    pub fn compression_ratio(&self) -> f64 {
        if self.text_length == 0 {
            0.0
        } else {
            (self.container_bytes as f64 / self.text_length as f64) * 100.0
        }
    }
}

/// Codeword as written to the container.
///
/// A lone symbol has the empty codeword, which Elias-Omega cannot length
/// prefix; it is written as the single bit `0`.
fn container_code(code: &BitStr) -> Bits {
    if code.is_empty() {
        bitvec![u8, Msb0; 0]
    } else {
        code.to_bitvec()
    }
}

fn write_header(out: &mut Bits, bwt_length: usize, codes: &CodeTable) -> Result<()> {
    elias::encode_into(bwt_length as u64, out)?;
    elias::encode_into(codes.len() as u64, out)?;

    for (symbol, code) in codes.iter() {
        let code = container_code(code);
        push_uint(out, u64::from(symbol), SYMBOL_BITS);
        elias::encode_into(code.len() as u64, out)?;
        out.extend_from_bitslice(&code);
    }
    Ok(())
}

fn write_runs(out: &mut Bits, runs: &[Run], codes: &CodeTable) -> Result<()> {
    let by_symbol: HashMap<u8, Bits> = codes
        .iter()
        .map(|(symbol, code)| (symbol, container_code(code)))
        .collect();

    for run in runs {
        let code = by_symbol.get(&run.symbol).ok_or_else(|| {
            Error::CorruptData(format!(
                "no codeword for run symbol {:?}",
                run.symbol as char
            ))
        })?;
        out.extend_from_bitslice(code);
        elias::encode_into(run.length as u64, out)?;
    }
    Ok(())
}

/// One symbol record of the container header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRecord {
    pub symbol: u8,
    pub codeword: Bits,
}

/// Parsed container header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Length of the BWT, equal to the text length.
    pub bwt_length: usize,
    /// Symbol records in stream order.
    pub symbols: Vec<SymbolRecord>,
}

/// Largest BWT length a [`Decoder`] accepts unless configured otherwise.
pub const DEFAULT_MAX_TEXT_LENGTH: usize = 1 << 24;

/// Container → text decoder.
#[derive(Debug, Clone, Copy)]
pub struct Decoder {
    strip_sentinel: bool,
    max_text_length: usize,
}

impl Default for Decoder {
    fn default() -> Self {
        Self {
            strip_sentinel: false,
            max_text_length: DEFAULT_MAX_TEXT_LENGTH,
        }
    }
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops the trailing sentinel from the decoded text.
    pub fn strip_sentinel(mut self, strip: bool) -> Self {
        self.strip_sentinel = strip;
        self
    }

    /// Rejects containers announcing more than `max` symbols before any
    /// memory is reserved for them.
    pub fn max_text_length(mut self, max: usize) -> Self {
        self.max_text_length = max;
        self
    }

    /// Decodes a container produced by [`Encoder::encode`].
    pub fn decode(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        let (header, runs) = self.parse(bytes)?;
        let transformed = rle::expand(&runs);
        debug_assert_eq!(transformed.len(), header.bwt_length);

        let mut text = bwt::inverse(&transformed)?;
        if self.strip_sentinel && text.last() == Some(&SENTINEL) {
            text.pop();
        }
        debug!("decoded {} bytes into {} symbols", bytes.len(), text.len());
        Ok(text)
    }

    /// Splits a container into its header and run list.
    pub fn parse(&self, bytes: &[u8]) -> Result<(Header, Vec<Run>)> {
        let bits = bytes.view_bits::<Msb0>();
        if bits.is_empty() {
            return Err(Error::MalformedStream("container is empty".to_string()));
        }

        let (header, rest) = read_header(bits)?;
        if header.bwt_length > self.max_text_length {
            return Err(Error::MalformedStream(format!(
                "BWT length {} exceeds the limit of {}",
                header.bwt_length, self.max_text_length
            )));
        }
        let (runs, rest) = read_runs(rest, &header)?;

        if rest.len() >= 8 || rest.any() {
            return Err(Error::MalformedStream(format!(
                "{} unexpected bits after the last run",
                rest.len()
            )));
        }
        Ok((header, runs))
    }
}

/// Reads one Elias-Omega number; an exhausted stream is an error here.
fn read_number<'a>(bits: &'a BitStr, field: &str) -> Result<(u64, &'a BitStr)> {
    if bits.is_empty() {
        return Err(Error::MalformedStream(format!(
            "stream ended before the {}",
            field
        )));
    }
    elias::decode(bits)
}

fn read_header(bits: &BitStr) -> Result<(Header, &BitStr)> {
    let (bwt_length, rest) = read_number(bits, "BWT length")?;
    let bwt_length = usize::try_from(bwt_length).map_err(|_| {
        Error::MalformedStream(format!("BWT length {} does not fit in memory", bwt_length))
    })?;

    let (count, mut rest) = read_number(rest, "symbol count")?;
    if count == 0 || count > ALPHABET_SIZE as u64 {
        return Err(Error::MalformedStream(format!(
            "symbol count {} outside 1..={}",
            count, ALPHABET_SIZE
        )));
    }

    let mut seen = [false; ALPHABET_SIZE];
    let mut symbols = Vec::with_capacity(count as usize);
    for _ in 0..count {
        if rest.len() < SYMBOL_BITS {
            return Err(Error::MalformedStream(
                "stream ended inside a symbol record".to_string(),
            ));
        }
        let symbol = read_uint(&rest[..SYMBOL_BITS]) as u8;
        rest = &rest[SYMBOL_BITS..];

        let slot = alphabet::slot(symbol).ok_or_else(|| {
            Error::MalformedStream(format!("symbol {:#04x} outside the alphabet", symbol))
        })?;
        if std::mem::replace(&mut seen[slot], true) {
            return Err(Error::MalformedStream(format!(
                "symbol {:?} recorded twice",
                symbol as char
            )));
        }

        let (code_len, tail) = read_number(rest, "codeword length")?;
        let code_len = code_len as usize;
        if code_len > tail.len() {
            return Err(Error::MalformedStream(format!(
                "codeword of {} bits for {:?} runs past the end of the stream",
                code_len, symbol as char
            )));
        }
        symbols.push(SymbolRecord {
            symbol,
            codeword: tail[..code_len].to_bitvec(),
        });
        rest = &tail[code_len..];
    }

    Ok((
        Header {
            bwt_length,
            symbols,
        },
        rest,
    ))
}

/// Codeword lookup used while reading runs.
struct CodeBook {
    symbols: HashMap<Bits, u8>,
    /// Distinct codeword lengths, shortest first.
    lengths: Vec<usize>,
}

impl CodeBook {
    fn new(records: &[SymbolRecord]) -> Result<Self> {
        let mut symbols = HashMap::with_capacity(records.len());
        for record in records {
            if let Some(other) = symbols.insert(record.codeword.clone(), record.symbol) {
                return Err(Error::MalformedStream(format!(
                    "symbols {:?} and {:?} share a codeword",
                    other as char, record.symbol as char
                )));
            }
        }

        let mut lengths: Vec<usize> = records.iter().map(|r| r.codeword.len()).collect();
        lengths.sort_unstable();
        lengths.dedup();
        Ok(Self { symbols, lengths })
    }

    /// Finds the codeword at the front of `bits`, returning its symbol and length.
    fn lookup(&self, bits: &BitStr) -> Option<(u8, usize)> {
        self.lengths
            .iter()
            .take_while(|&&len| len <= bits.len())
            .find_map(|&len| self.symbols.get(&bits[..len]).map(|&symbol| (symbol, len)))
    }
}

fn read_runs<'a>(bits: &'a BitStr, header: &Header) -> Result<(Vec<Run>, &'a BitStr)> {
    let book = CodeBook::new(&header.symbols)?;
    let mut rest = bits;
    let mut runs = Vec::new();
    let mut total = 0usize;

    while total < header.bwt_length {
        if rest.is_empty() {
            return Err(Error::MalformedStream(format!(
                "stream ended after {} of {} symbols",
                total, header.bwt_length
            )));
        }
        let (symbol, code_len) = book.lookup(rest).ok_or_else(|| {
            Error::MalformedStream(format!(
                "no codeword matches after {} of {} symbols",
                total, header.bwt_length
            ))
        })?;

        let (length, tail) = read_number(&rest[code_len..], "run length")?;
        let length = usize::try_from(length)
            .ok()
            .filter(|&len| len <= header.bwt_length - total)
            .ok_or_else(|| {
                Error::MalformedStream(format!(
                    "run of {} {:?} overflows the BWT length {}",
                    length, symbol as char, header.bwt_length
                ))
            })?;

        runs.push(Run::new(symbol, length));
        total += length;
        rest = tail;
    }

    debug!("read {} runs covering {} symbols", runs.len(), total);
    Ok((runs, rest))
}

/// Encodes `text` with the default [`Encoder`].
pub fn encode(text: &[u8]) -> Result<Vec<u8>> {
    Encoder::new().encode(text)
}

/// Decodes `bytes` with the default [`Decoder`].
pub fn decode(bytes: &[u8]) -> Result<Vec<u8>> {
    Decoder::new().decode(bytes)
}

/// Parses `bytes` with the default [`Decoder`].
pub fn parse(bytes: &[u8]) -> Result<(Header, Vec<Run>)> {
    Decoder::new().parse(bytes)
}
