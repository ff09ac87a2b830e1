//! PNG decoder implementation.
//!
//! Decoding is a fixed pipeline over four buffers: the concatenated IDAT
//! payloads, the decompressed (still filtered) stream, the reconstructed
//! rows, and the canonical pixel array. Each stage owns its output and
//! nothing is revisited once a stage completes.

pub mod chunk;
pub mod filter;
pub mod metadata;
pub mod pixels;

use log::debug;

use crate::color::ColorType;
use crate::error::{Error, Result};
use crate::inflate::inflate_zlib;

pub use self::metadata::{ImageHeader, MetadataMap, MetadataRecord, Palette};

/// A decoded PNG image.
#[derive(Debug, Clone)]
pub struct PngImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Bits per sample as stored in the file (1, 2, 4, 8, or 16).
    pub bit_depth: u8,
    /// Channel layout of `pixels`.
    pub color_type: ColorType,
    /// Row-major, channel-interleaved samples: one byte per sample for
    /// depths up to 8 (sub-byte samples keep their raw values), two
    /// big-endian bytes per sample at depth 16.
    pub pixels: Vec<u8>,
    /// Ancillary records keyed by chunk type (tEXt, zTXt, iTXt, tIME, gAMA).
    pub metadata: MetadataMap,
}

impl PngImage {
    /// Number of channels per pixel.
    pub fn channels(&self) -> usize {
        self.color_type.channels()
    }
}

/// Decode a PNG image from bytes.
pub fn decode(data: &[u8]) -> Result<PngImage> {
    let parsed = metadata::parse_stream(data)?;
    let header = parsed.header;
    debug!(
        "decoding {}x{} {:?} at {} bit(s)",
        header.width, header.height, header.color_type, header.bit_depth
    );

    // IHDR fixes the decompressed length exactly, which both pre-sizes the
    // inflate output and validates the stream afterwards.
    let expected_len = header.decompressed_len()?;
    let decompressed = inflate_zlib(&parsed.idat, Some(expected_len))?;
    if decompressed.len() != expected_len {
        return Err(Error::InvalidStructure(format!(
            "decompressed image data is {} bytes (expected {})",
            decompressed.len(),
            expected_len
        )));
    }

    let raw = filter::unfilter(
        &decompressed,
        header.height as usize,
        header.scanline_bytes(),
        header.filter_bytes_per_pixel(),
    )?;

    let pixels = pixels::unpack(&header, &raw, parsed.palette.as_ref())?;

    Ok(PngImage {
        width: header.width,
        height: header.height,
        bit_depth: header.bit_depth,
        color_type: header.color_type.output_color_type(),
        pixels,
        metadata: parsed.metadata,
    })
}
