//! huffcode command-line tool
//!
//! ```bash
//! huffcode encode notes.txt notes.huff
//! huffcode decode notes.huff notes.txt
//!
//! # original line-framed layout, verbose logging
//! huffcode --config line.json --log-level debug encode notes.txt notes.huff
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use huffcode::{CodecConfig, HuffmanCodec};

#[derive(Parser, Debug)]
#[command(name = "huffcode")]
#[command(version)]
#[command(about = "Huffman encode or decode a file", long_about = None)]
struct Args {
    /// Configuration file path (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read <INPUT> and write an encoded version to <OUTPUT>
    Encode { input: PathBuf, output: PathBuf },
    /// Read <INPUT> and write a decoded version to <OUTPUT>
    Decode { input: PathBuf, output: PathBuf },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match CodecConfig::from_json_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("huffcode: {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => CodecConfig::default(),
    };

    let level_name = args.log_level.as_deref().unwrap_or(&config.log_level);
    let level = match level_name.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("huffcode: could not install log subscriber");
    }

    let codec = HuffmanCodec::new(config);
    let result = match &args.command {
        Command::Encode { input, output } => codec.encode_file(input, output).map(|stats| {
            info!(
                "encoded {} -> {}: {} bytes to {} bytes ({:.1}%)",
                input.display(),
                output.display(),
                stats.input_bytes,
                stats.output_bytes,
                stats.ratio() * 100.0
            );
        }),
        Command::Decode { input, output } => codec.decode_file(input, output).map(|written| {
            info!("decoded {} -> {}: {} bytes", input.display(), output.display(), written);
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("huffcode: {}", e);
            ExitCode::FAILURE
        }
    }
}
