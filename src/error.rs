//! Error types for the depng library.

use std::fmt;

/// Result type alias for depng operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during PNG decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The first 8 bytes are not the PNG signature.
    BadSignature,
    /// The input ended before a declared length was satisfied.
    TruncatedStream {
        /// Byte offset at which more data was needed.
        offset: usize,
        /// Number of bytes that were still expected.
        needed: usize,
    },
    /// An IHDR field is outside the accepted range.
    InvalidHeader(String),
    /// Chunks appear in an order the format forbids.
    InvalidStructure(String),
    /// A chunk CRC-32 or the zlib Adler-32 trailer did not match.
    ChecksumMismatch {
        /// What was being verified (e.g. `"IDAT chunk CRC-32"`).
        context: String,
        /// Checksum stored in the stream.
        expected: u32,
        /// Checksum computed over the data.
        actual: u32,
    },
    /// An unknown chunk marked critical was encountered.
    UnsupportedChunk {
        /// The four type bytes of the offending chunk.
        chunk_type: [u8; 4],
    },
    /// The zlib container header is malformed.
    InvalidZlib(String),
    /// A DEFLATE block is malformed.
    InvalidBlock(String),
    /// A Huffman code table or coded symbol is invalid.
    InvalidHuffman(String),
    /// An LZ77 back-reference points before the start of the output.
    InvalidDistance {
        /// Distance requested by the stream.
        distance: usize,
        /// Bytes emitted so far.
        available: usize,
    },
    /// A scanline carries a filter-type byte outside 0..=4.
    InvalidFilter(u8),
    /// The palette is missing, misplaced, or an index falls outside it.
    InvalidPalette(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BadSignature => {
                write!(f, "Not a PNG file: signature mismatch")
            }
            Error::TruncatedStream { offset, needed } => {
                write!(
                    f,
                    "Truncated stream: needed {} more byte(s) at offset {}",
                    needed, offset
                )
            }
            Error::InvalidHeader(msg) => {
                write!(f, "Invalid IHDR: {}", msg)
            }
            Error::InvalidStructure(msg) => {
                write!(f, "Invalid chunk layout: {}", msg)
            }
            Error::ChecksumMismatch {
                context,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "{} mismatch: stored {:08X}, computed {:08X}",
                    context, expected, actual
                )
            }
            Error::UnsupportedChunk { chunk_type } => {
                write!(
                    f,
                    "Unknown critical chunk \"{}\"",
                    String::from_utf8_lossy(chunk_type)
                )
            }
            Error::InvalidZlib(msg) => {
                write!(f, "Invalid zlib stream: {}", msg)
            }
            Error::InvalidBlock(msg) => {
                write!(f, "Invalid DEFLATE block: {}", msg)
            }
            Error::InvalidHuffman(msg) => {
                write!(f, "Invalid Huffman code: {}", msg)
            }
            Error::InvalidDistance {
                distance,
                available,
            } => {
                write!(
                    f,
                    "Back-reference distance {} exceeds {} byte(s) of output",
                    distance, available
                )
            }
            Error::InvalidFilter(filter) => {
                write!(f, "Invalid scanline filter type {}", filter)
            }
            Error::InvalidPalette(msg) => {
                write!(f, "Invalid palette: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}
