//! # depng
//!
//! A minimal-dependency PNG decoding library.
//!
//! This library decodes PNG images into raw pixel data with hand-implemented
//! decompression (zlib/DEFLATE, canonical Huffman, LZ77) and integrity
//! checks (CRC-32, Adler-32) for maximum control and transparency.
//!
//! ## Features
//!
//! - **Zero runtime dependencies** beyond the `log` facade
//! - **Full (color type, bit depth) matrix**: grayscale, truecolor,
//!   indexed, and alpha variants at every legal bit depth
//! - **Built-in inflater**: chunk CRCs and the zlib Adler-32 trailer are
//!   verified along the way
//! - Ancillary metadata (tEXt, zTXt, iTXt, tIME, gAMA) parsed into a
//!   structured map
//!
//! ## Example
//!
//! ```no_run
//! let bytes = std::fs::read("photo.png").unwrap();
//! let image = depng::decode(&bytes).unwrap();
//!
//! println!(
//!     "{}x{}, {} channel(s) at {} bit(s)",
//!     image.width,
//!     image.height,
//!     image.channels(),
//!     image.bit_depth
//! );
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bits;
pub mod checksum;
pub mod color;
pub mod error;
pub mod inflate;
pub mod png;

pub use color::{ColorType, PngColorType};
pub use error::{Error, Result};
pub use png::{decode, MetadataMap, MetadataRecord, PngImage};
