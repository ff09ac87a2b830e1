//! Integrity-check primitives.
//!
//! PNG verifies every chunk with CRC-32 and the decompressed image data with
//! Adler-32; both live here with one-shot and incremental interfaces.

pub mod adler32;
pub mod crc32;

pub use self::adler32::{adler32, Adler32};
pub use self::crc32::{crc32, Crc32};
