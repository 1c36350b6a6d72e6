//! # huffcode
//!
//! Huffman prefix-code compression over bytes. The code tree travels with the
//! payload as one line of text, e.g. `1(0.75:61,0.25:62)`.
//!
//! ## Quick Start
//!
//! ```rust
//! use huffcode::{compress, decompress};
//!
//! let compressed = compress(b"aaab")?;
//! assert_eq!(compressed.tree, "1(0.75:61,0.25:62)");
//! assert_eq!(compressed.payload, vec![0x08, 0x04]);
//!
//! let restored = decompress(&compressed.tree, &compressed.payload)?;
//! assert_eq!(restored, b"aaab");
//! # Ok::<(), huffcode::Error>(())
//! ```
//!
//! Whole artifacts, framed for storage:
//!
//! ```rust
//! use huffcode::{CodecConfig, Framing, HuffmanCodec};
//!
//! let codec = HuffmanCodec::new(CodecConfig::default().with_framing(Framing::Line));
//! let mut artifact = Vec::new();
//! codec.encode_stream(&b"hello\nworld\n"[..], &mut artifact)?;
//!
//! let mut restored = Vec::new();
//! codec.decode_stream(&artifact[..], &mut restored)?;
//! assert_eq!(restored, b"hello\nworld\n");
//! # Ok::<(), huffcode::Error>(())
//! ```

pub mod bit_vec;
pub mod compressed_data;
pub mod config;
pub mod encoding_map;
pub mod error;
pub mod frequency;
pub mod huffman_codec;
pub mod hufftree;
pub mod tree_codec;

// Internal modules - not part of public API
mod min_heap;

// Re-export main types for convenience
pub use bit_vec::BitVec;
pub use compressed_data::CompressedData;
pub use config::{CodecConfig, Framing};
pub use encoding_map::EncodingMap;
pub use error::{Error, Result};
pub use frequency::FrequencyTable;
pub use huffman_codec::{compress, decompress, CompressionStats, HuffmanCodec};
pub use hufftree::{HuffNode, HuffmanTree};
