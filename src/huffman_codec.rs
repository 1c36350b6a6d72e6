use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use tracing::debug;

use crate::bit_vec::BitVec;
use crate::compressed_data::CompressedData;
use crate::config::CodecConfig;
use crate::encoding_map::EncodingMap;
use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;
use crate::hufftree::{HuffmanTree, HuffNode};
use crate::tree_codec;

/// Compress `data` into tree text and a packed bitstream.
///
/// Empty input yields an empty tree and a payload holding no bits.
pub fn compress(data: &[u8]) -> Result<CompressedData> {
    compress_with_precision(data, None)
}

/// As [`compress`], writing non-root tree frequencies with `precision`
/// decimal places.
pub fn compress_with_precision(data: &[u8], precision: Option<usize>) -> Result<CompressedData> {
    compress_counted(data, precision).map(|(compressed, _)| compressed)
}

/// Compress and report sizes; `output_bytes` is left for the caller to frame.
fn compress_counted(data: &[u8], precision: Option<usize>) -> Result<(CompressedData, CompressionStats)> {
    let mut stats = CompressionStats {
        input_bytes: data.len(),
        distinct_symbols: 0,
        payload_bits: 0,
        output_bytes: 0,
    };

    if data.is_empty() {
        debug!("empty input, writing empty tree");
        let compressed = CompressedData {
            tree: String::new(),
            payload: BitVec::new().pack(),
        };
        return Ok((compressed, stats));
    }

    let table = FrequencyTable::analyze(data);
    let tree = HuffmanTree::from_frequencies(&table)?;
    let map = EncodingMap::from_tree(&tree);
    let bits = encode_with(&map, data)?;

    stats.distinct_symbols = table.len();
    stats.payload_bits = bits.len();
    debug!(
        input_bytes = data.len(),
        symbols = stats.distinct_symbols,
        payload_bits = stats.payload_bits,
        "compressed buffer"
    );

    let compressed = CompressedData {
        tree: tree_codec::serialize_with_precision(&tree, precision),
        payload: bits.pack(),
    };
    Ok((compressed, stats))
}

/// Expand `data` into the concatenation of each byte's code.
pub fn encode_with(map: &EncodingMap, data: &[u8]) -> Result<BitVec> {
    let mut bit_vec = BitVec::with_capacity(map.encoded_len(data).unwrap_or(0));
    for &byte in data {
        let code = map.get(byte).ok_or(Error::UnknownSymbol(byte))?;
        bit_vec.extend_from(code);
    }
    Ok(bit_vec)
}

/// Rebuild the original bytes from tree text and a packed bitstream.
pub fn decompress(tree: &str, payload: &[u8]) -> Result<Vec<u8>> {
    let bits = BitVec::unpack(payload);

    if tree.strip_suffix('\n').unwrap_or(tree).is_empty() {
        if !bits.is_empty() {
            return Err(Error::UnexpectedBits { count: bits.len() });
        }
        return Ok(Vec::new());
    }

    let tree = tree_codec::parse(tree)?;
    let result = decode_bits(&tree, &bits)?;
    debug!(
        payload_bits = bits.len(),
        output_bytes = result.len(),
        "decompressed buffer"
    );
    Ok(result)
}

/// Walk `tree` once per code: 0 goes left, 1 goes right, a leaf emits its
/// symbol and the walk restarts at the root.
pub fn decode_bits(tree: &HuffmanTree, bits: &BitVec) -> Result<Vec<u8>> {
    if let HuffNode::Leaf { byte, .. } = &tree.root {
        // a lone leaf only has the code 0
        if let Some(bit_offset) = bits.iter().position(|bit| bit) {
            return Err(Error::InvalidCode { bit_offset });
        }
        return Ok(vec![*byte; bits.len()]);
    }

    let mut result = Vec::with_capacity(bits.len() / 2);
    let mut bit_index = 0;

    while bit_index < bits.len() {
        let walk_start = bit_index;
        let mut current_node = &tree.root;

        // walk the tree until we hit a leaf
        loop {
            match current_node {
                HuffNode::Leaf { byte, .. } => {
                    result.push(*byte);
                    break;
                },
                HuffNode::Internal { left, right, .. } => {
                    let Some(bit) = bits.get(bit_index) else {
                        return Err(Error::TruncatedBitstream { bit_offset: walk_start });
                    };
                    bit_index += 1;

                    current_node = if bit { right } else { left };
                }
            }
        }
    }

    Ok(result)
}

/// Sizes from one `encode_stream` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionStats {
    pub input_bytes: usize,
    pub distinct_symbols: usize,
    pub payload_bits: usize,
    pub output_bytes: usize,
}

impl CompressionStats {
    /// Output size as a fraction of input size.
    pub fn ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            return 0.0;
        }
        self.output_bytes as f64 / self.input_bytes as f64
    }
}

/// Compressor bound to a [`CodecConfig`], framing its output as configured.
#[derive(Debug, Clone, Default)]
pub struct HuffmanCodec {
    config: CodecConfig,
}

impl HuffmanCodec {
    pub fn new(config: CodecConfig) -> Self {
        HuffmanCodec { config }
    }

    pub fn encode(&self, data: &[u8]) -> Result<CompressedData> {
        compress_with_precision(data, self.config.frequency_precision)
    }

    pub fn decode(&self, compressed: &CompressedData) -> Result<Vec<u8>> {
        decompress(&compressed.tree, &compressed.payload)
    }

    /// Read all of `input`, compress it and write one framed artifact.
    pub fn encode_stream<R: Read, W: Write>(&self, mut input: R, mut output: W) -> Result<CompressionStats> {
        let mut data = Vec::new();
        input.read_to_end(&mut data)?;

        let (compressed, mut stats) = compress_counted(&data, self.config.frequency_precision)?;
        let bytes = compressed.serialize(self.config.framing)?;
        output.write_all(&bytes)?;
        output.flush()?;

        stats.output_bytes = bytes.len();
        debug!(?stats, framing = ?self.config.framing, "encoded stream");
        Ok(stats)
    }

    /// Read one framed artifact from `input` and write the decoded bytes.
    pub fn decode_stream<R: Read, W: Write>(&self, mut input: R, mut output: W) -> Result<usize> {
        let mut data = Vec::new();
        input.read_to_end(&mut data)?;

        let compressed = CompressedData::deserialize(&data, self.config.framing)?;
        let decoded = self.decode(&compressed)?;
        output.write_all(&decoded)?;
        output.flush()?;

        debug!(input_bytes = data.len(), output_bytes = decoded.len(), "decoded stream");
        Ok(decoded.len())
    }

    /// `output` is only written once encoding has succeeded.
    pub fn encode_file(&self, input: &Path, output: &Path) -> Result<CompressionStats> {
        let data = fs::read(input)?;
        let mut artifact = Vec::new();
        let stats = self.encode_stream(data.as_slice(), &mut artifact)?;
        fs::write(output, artifact)?;
        Ok(stats)
    }

    /// `output` is only written once decoding has succeeded.
    pub fn decode_file(&self, input: &Path, output: &Path) -> Result<usize> {
        let artifact = fs::read(input)?;
        let mut decoded = Vec::new();
        let written = self.decode_stream(artifact.as_slice(), &mut decoded)?;
        fs::write(output, decoded)?;
        Ok(written)
    }
}
