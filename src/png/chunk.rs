//! PNG chunk stream parsing.
//!
//! A PNG file is the 8-byte signature followed by length-prefixed,
//! CRC-terminated chunks. [`ChunkReader`] walks that framing and yields
//! chunks whose CRC has already been verified; interpretation of chunk
//! contents happens one layer up.

use std::fmt;

use log::debug;

use crate::checksum::Crc32;
use crate::error::{Error, Result};

/// PNG file signature (magic bytes).
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Chunk lengths are capped at 2^31 - 1 by the PNG specification.
const MAX_CHUNK_LENGTH: u32 = i32::MAX as u32;

/// A four-byte chunk type.
///
/// Bit 5 of each byte carries the chunk property flags; only the first
/// (ancillary vs critical) affects decoding policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkType(pub [u8; 4]);

impl ChunkType {
    /// Whether the chunk is ancillary (first letter lowercase). Unknown
    /// ancillary chunks may be skipped; unknown critical chunks may not.
    #[inline]
    pub fn is_ancillary(self) -> bool {
        self.0[0].is_ascii_lowercase()
    }

    /// Whether the chunk is critical to displaying the image.
    #[inline]
    pub fn is_critical(self) -> bool {
        !self.is_ancillary()
    }

    /// Whether the chunk is private (second letter lowercase).
    #[inline]
    pub fn is_private(self) -> bool {
        self.0[1].is_ascii_lowercase()
    }

    /// Whether editors may copy the chunk blindly (fourth letter lowercase).
    #[inline]
    pub fn is_safe_to_copy(self) -> bool {
        self.0[3].is_ascii_lowercase()
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

/// A CRC-validated chunk borrowed from the input stream.
#[derive(Debug, Clone, Copy)]
pub struct Chunk<'a> {
    /// The four type bytes.
    pub chunk_type: ChunkType,
    /// Chunk payload (everything between type and CRC).
    pub data: &'a [u8],
    /// Byte offset of the chunk's length field, for diagnostics.
    pub offset: usize,
}

/// Iterator over the chunks of a PNG byte stream.
///
/// Verifies the signature at construction and each chunk's CRC-32 as it is
/// yielded. Iteration stops after IEND; trailing bytes are ignored.
pub struct ChunkReader<'a> {
    data: &'a [u8],
    pos: usize,
    finished: bool,
}

impl<'a> ChunkReader<'a> {
    /// Create a reader over `data`, checking the PNG signature.
    pub fn new(data: &'a [u8]) -> Result<Self> {
        if data.len() < PNG_SIGNATURE.len() || data[..8] != PNG_SIGNATURE {
            return Err(Error::BadSignature);
        }
        Ok(Self {
            data,
            pos: PNG_SIGNATURE.len(),
            finished: false,
        })
    }

    fn read_chunk(&mut self) -> Result<Chunk<'a>> {
        let offset = self.pos;
        if self.data.len() - self.pos < 8 {
            return Err(Error::TruncatedStream {
                offset: self.data.len(),
                needed: 8 - (self.data.len() - self.pos),
            });
        }

        let length = u32::from_be_bytes([
            self.data[self.pos],
            self.data[self.pos + 1],
            self.data[self.pos + 2],
            self.data[self.pos + 3],
        ]);
        if length > MAX_CHUNK_LENGTH {
            return Err(Error::InvalidStructure(format!(
                "chunk length {} exceeds 2^31 - 1 at offset {}",
                length, offset
            )));
        }

        let chunk_type = ChunkType([
            self.data[self.pos + 4],
            self.data[self.pos + 5],
            self.data[self.pos + 6],
            self.data[self.pos + 7],
        ]);

        let data_start = self.pos + 8;
        let data_end = data_start + length as usize;
        let crc_end = data_end + 4;
        if crc_end > self.data.len() {
            return Err(Error::TruncatedStream {
                offset: self.data.len(),
                needed: crc_end - self.data.len(),
            });
        }

        let data = &self.data[data_start..data_end];
        let stored_crc = u32::from_be_bytes([
            self.data[data_end],
            self.data[data_end + 1],
            self.data[data_end + 2],
            self.data[data_end + 3],
        ]);

        // The CRC covers the type bytes and the payload, not the length.
        let mut crc = Crc32::new();
        crc.update(&chunk_type.0);
        crc.update(data);
        let computed_crc = crc.finalize();
        if stored_crc != computed_crc {
            return Err(Error::ChecksumMismatch {
                context: format!("{} chunk CRC-32", chunk_type),
                expected: stored_crc,
                actual: computed_crc,
            });
        }

        debug!("chunk {} ({} bytes) at offset {}", chunk_type, length, offset);

        self.pos = crc_end;
        if chunk_type.0 == *b"IEND" {
            self.finished = true;
        }

        Ok(Chunk {
            chunk_type,
            data,
            offset,
        })
    }
}

impl<'a> Iterator for ChunkReader<'a> {
    type Item = Result<Chunk<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished || self.pos >= self.data.len() {
            return None;
        }
        let result = self.read_chunk();
        if result.is_err() {
            self.finished = true;
        }
        Some(result)
    }
}
