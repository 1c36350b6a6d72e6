use huffcode::{CodecConfig, HuffmanCodec};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dir = std::env::temp_dir().join("huffcode-demo");
    std::fs::create_dir_all(&dir)?;
    let sample = dir.join("sample.txt");
    let compressed = dir.join("sample.huff");
    let restored = dir.join("decompressed.txt");

    // Create a sample file
    let sample_text = "Hello, world! This is a sample text for Huffman compression. \
                      The quick brown fox jumps over the lazy dog. \
                      Huffman encoding is a greedy algorithm that builds optimal prefix codes.";
    std::fs::write(&sample, sample_text)?;
    println!("Created sample file: {} bytes", sample_text.len());

    let codec = HuffmanCodec::new(CodecConfig::default());

    // Compress the file
    let stats = codec.encode_file(&sample, &compressed)?;
    println!(
        "Compressed to: {} bytes ({:.1}% of original), {} distinct symbols, {} payload bits",
        stats.output_bytes,
        stats.ratio() * 100.0,
        stats.distinct_symbols,
        stats.payload_bits
    );

    // Decompress the file
    codec.decode_file(&compressed, &restored)?;

    // Verify the result
    let decompressed_text = std::fs::read_to_string(&restored)?;
    if sample_text != decompressed_text {
        return Err("Decompression verification failed".into());
    }
    println!("Decompression successful, data matches exactly.");

    // Cleanup
    std::fs::remove_dir_all(&dir)?;

    Ok(())
}
