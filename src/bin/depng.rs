//! depng CLI - PNG inspection tool
//!
//! Decodes a PNG file with the depng library and reports its shape.
//! With `--logging`, chunk and DEFLATE block processing is traced to
//! stderr as the file is decoded.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;

/// Decode a PNG file and print a summary of its contents.
#[derive(Parser, Debug)]
#[command(name = "depng")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// PNG file to decode
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Enable verbose diagnostic logging of chunk and block decoding
    #[arg(short = 'l', long = "logging")]
    logging: bool,
}

fn main() {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(if args.logging {
            log::LevelFilter::Trace
        } else {
            log::LevelFilter::Error
        })
        .init();

    if let Err(e) = run(&args) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = fs::read(&args.file)?;

    let start = Instant::now();
    let image = depng::decode(&bytes)?;
    let decode_time = start.elapsed();

    println!(
        "{}: {}x{}, {:?}, {} channel(s) at {} bit(s), {} sample byte(s)",
        args.file.display(),
        image.width,
        image.height,
        image.color_type,
        image.channels(),
        image.bit_depth,
        image.pixels.len()
    );

    for (chunk_type, records) in &image.metadata {
        for record in records {
            match record {
                depng::MetadataRecord::Text { keyword, text } => {
                    println!("  {chunk_type} {keyword}: {text}");
                }
                depng::MetadataRecord::InternationalText {
                    keyword,
                    language_tag,
                    text,
                    ..
                } => {
                    println!("  {chunk_type} {keyword} [{language_tag}]: {text}");
                }
                depng::MetadataRecord::Time {
                    year,
                    month,
                    day,
                    hour,
                    minute,
                    second,
                } => {
                    println!(
                        "  {chunk_type} {year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}"
                    );
                }
                depng::MetadataRecord::Gamma(gamma) => {
                    println!("  {chunk_type} {}", *gamma as f64 / 100_000.0);
                }
            }
        }
    }

    if args.logging {
        eprintln!("Decode time: {decode_time:.2?}");
    }

    Ok(())
}
