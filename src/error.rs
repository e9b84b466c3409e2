use thiserror::Error;

/// Errors raised by the compression pipeline.
///
/// Every variant is fatal to the call that produced it; no partial output is
/// returned alongside an error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A caller-supplied value violates a precondition.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The input text contains a byte outside the supported alphabet.
    #[error("unsupported symbol {byte:#04x} at offset {offset}")]
    UnsupportedSymbol { byte: u8, offset: usize },

    /// The bitstream ended early or does not follow the container layout.
    #[error("malformed stream: {0}")]
    MalformedStream(String),

    /// Decoded data cannot be inverted back to a text.
    #[error("corrupt data: {0}")]
    CorruptData(String),
}

/// A specialized Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;
