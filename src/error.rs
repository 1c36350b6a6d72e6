//! Error types for encoding and decoding.

use thiserror::Error;

/// Result type alias for huffman operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Huffman codec error types.
#[derive(Debug, Error)]
pub enum Error {
    /// Serialized tree text does not follow the tree grammar.
    #[error("malformed tree at byte {position}: {reason}")]
    MalformedTree {
        position: usize,
        reason: &'static str,
    },

    /// A tree was requested for a frequency table with no symbols.
    #[error("cannot build a code tree from empty input")]
    EmptyInput,

    /// The bitstream ended in the middle of a code.
    #[error("bitstream truncated: walk from bit {bit_offset} ended before reaching a leaf")]
    TruncatedBitstream { bit_offset: usize },

    /// A bit selected a branch the tree does not have.
    #[error("invalid code at bit {bit_offset}")]
    InvalidCode { bit_offset: usize },

    /// Payload bits were supplied alongside an empty tree.
    #[error("empty tree carries {count} unexpected payload bits")]
    UnexpectedBits { count: usize },

    /// A byte has no entry in the encoding map.
    #[error("byte 0x{0:02x} not in encoding map")]
    UnknownSymbol(u8),

    /// The compressed container cannot be split into tree and payload.
    #[error("invalid container: {reason}")]
    Container { reason: String },

    /// I/O error from underlying stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl Error {
    /// Create a malformed tree error at a byte position.
    pub fn malformed(position: usize, reason: &'static str) -> Self {
        Error::MalformedTree { position, reason }
    }

    /// Create a container error.
    pub fn container(reason: impl Into<String>) -> Self {
        Error::Container {
            reason: reason.into(),
        }
    }
}
