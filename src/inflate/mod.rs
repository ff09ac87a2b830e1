//! zlib container and DEFLATE decompression (RFC 1950 / RFC 1951).
//!
//! PNG wraps its image data in a zlib stream: a two-byte header, a DEFLATE
//! payload, and a big-endian Adler-32 trailer over the decompressed bytes.

pub mod deflate;
pub mod huffman;

use log::trace;

use crate::bits::BitReader;
use crate::checksum::adler32;
use crate::error::{Error, Result};

/// Smallest possible zlib stream: header, one empty stored block, trailer.
const MIN_STREAM_LEN: usize = 6;

/// Decompress a zlib-wrapped DEFLATE stream.
///
/// `size_hint` pre-sizes the output buffer (PNG knows the exact
/// decompressed length from IHDR before inflating); it does not bound or
/// validate the result.
pub fn inflate_zlib(data: &[u8], size_hint: Option<usize>) -> Result<Vec<u8>> {
    if data.len() < MIN_STREAM_LEN {
        return Err(Error::TruncatedStream {
            offset: data.len(),
            needed: MIN_STREAM_LEN - data.len(),
        });
    }

    let cmf = data[0];
    let flg = data[1];

    let method = cmf & 0x0F;
    if method != 8 {
        return Err(Error::InvalidZlib(format!(
            "compression method {} (only 8 = deflate)",
            method
        )));
    }
    let cinfo = cmf >> 4;
    if cinfo > 7 {
        return Err(Error::InvalidZlib(format!(
            "window size exponent {} (max 7)",
            cinfo
        )));
    }
    if (u16::from(cmf) << 8 | u16::from(flg)) % 31 != 0 {
        return Err(Error::InvalidZlib("header check failed".into()));
    }
    if flg & 0x20 != 0 {
        return Err(Error::InvalidZlib("preset dictionary not supported".into()));
    }
    trace!(
        "zlib header: window {} bytes, compression level {}",
        1usize << (cinfo as usize + 8),
        ["fastest", "fast", "default", "maximum"][(flg >> 6) as usize]
    );

    // DEFLATE payload sits between the header and the 4-byte trailer.
    let payload_end = data.len() - 4;
    let mut reader = BitReader::new(&data[2..payload_end]);
    let mut output = Vec::with_capacity(size_hint.unwrap_or(data.len() * 4));
    deflate::inflate(&mut reader, &mut output)?;

    let stored = u32::from_be_bytes([
        data[payload_end],
        data[payload_end + 1],
        data[payload_end + 2],
        data[payload_end + 3],
    ]);
    let computed = adler32(&output);
    if stored != computed {
        return Err(Error::ChecksumMismatch {
            context: "zlib Adler-32".into(),
            expected: stored,
            actual: computed,
        });
    }

    Ok(output)
}
