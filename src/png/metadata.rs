//! Typed parsing of PNG chunk contents.
//!
//! Sits on top of the chunk reader: enforces chunk ordering rules, decodes
//! IHDR and PLTE into validated records, gathers the IDAT payloads into one
//! buffer, and collects ancillary chunks (tEXt, zTXt, iTXt, tIME, gAMA)
//! into a metadata map without interpreting them further.

use std::collections::BTreeMap;

use log::debug;

use crate::color::PngColorType;
use crate::error::{Error, Result};
use crate::inflate::inflate_zlib;

use super::chunk::{Chunk, ChunkReader};

/// Validated contents of the IHDR chunk.
#[derive(Debug, Clone, Copy)]
pub struct ImageHeader {
    /// Image width in pixels (1 ..= 2^31 - 1).
    pub width: u32,
    /// Image height in pixels (1 ..= 2^31 - 1).
    pub height: u32,
    /// Bits per sample (1, 2, 4, 8, or 16 depending on color type).
    pub bit_depth: u8,
    /// Color type of the coded image.
    pub color_type: PngColorType,
}

impl ImageHeader {
    /// Parse and validate the 13-byte IHDR payload.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() != 13 {
            return Err(Error::InvalidHeader(format!(
                "IHDR payload is {} bytes (expected 13)",
                data.len()
            )));
        }

        let width = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
        let height = u32::from_be_bytes([data[4], data[5], data[6], data[7]]);
        let bit_depth = data[8];
        let color_type = PngColorType::try_from(data[9])?;
        let compression_method = data[10];
        let filter_method = data[11];
        let interlace_method = data[12];

        if width == 0 || width > i32::MAX as u32 {
            return Err(Error::InvalidHeader(format!("width {}", width)));
        }
        if height == 0 || height > i32::MAX as u32 {
            return Err(Error::InvalidHeader(format!("height {}", height)));
        }
        if !color_type.allows_bit_depth(bit_depth) {
            return Err(Error::InvalidHeader(format!(
                "bit depth {} not allowed for color type {:?}",
                bit_depth, color_type
            )));
        }
        if compression_method != 0 {
            return Err(Error::InvalidHeader(format!(
                "compression method {}",
                compression_method
            )));
        }
        if filter_method != 0 {
            return Err(Error::InvalidHeader(format!(
                "filter method {}",
                filter_method
            )));
        }
        if interlace_method != 0 {
            return Err(Error::InvalidHeader(format!(
                "interlace method {} (interlacing not supported)",
                interlace_method
            )));
        }

        Ok(Self {
            width,
            height,
            bit_depth,
            color_type,
        })
    }

    /// Bits per pixel in the coded image.
    fn bits_per_pixel(&self) -> usize {
        self.bit_depth as usize * self.color_type.channels()
    }

    /// The filter unit: whole bytes per pixel, at least 1.
    pub fn filter_bytes_per_pixel(&self) -> usize {
        self.bits_per_pixel().div_ceil(8).max(1)
    }

    /// Bytes per scanline, excluding the filter byte.
    pub fn scanline_bytes(&self) -> usize {
        (self.bits_per_pixel() * self.width as usize).div_ceil(8)
    }

    /// Exact length of the decompressed image data:
    /// `height * (1 + scanline_bytes)`.
    pub fn decompressed_len(&self) -> Result<usize> {
        (1 + self.scanline_bytes())
            .checked_mul(self.height as usize)
            .ok_or_else(|| Error::InvalidHeader("image size overflow".into()))
    }
}

/// The PLTE palette: an ordered list of RGB entries.
#[derive(Debug, Clone)]
pub struct Palette {
    entries: Vec<[u8; 3]>,
}

impl Palette {
    /// Parse a PLTE payload, bounded by `max_entries`.
    pub fn parse(data: &[u8], max_entries: usize) -> Result<Self> {
        if data.len() % 3 != 0 {
            return Err(Error::InvalidPalette(format!(
                "PLTE length {} is not a multiple of 3",
                data.len()
            )));
        }
        let count = data.len() / 3;
        if count == 0 {
            return Err(Error::InvalidPalette("PLTE has no entries".into()));
        }
        if count > max_entries {
            return Err(Error::InvalidPalette(format!(
                "{} entries (max {})",
                count, max_entries
            )));
        }

        let entries = data
            .chunks_exact(3)
            .map(|rgb| [rgb[0], rgb[1], rgb[2]])
            .collect();
        Ok(Self { entries })
    }

    /// Number of palette entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the palette has no entries (never true after `parse`).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by index.
    pub fn get(&self, index: u8) -> Option<[u8; 3]> {
        self.entries.get(index as usize).copied()
    }
}

/// One parsed ancillary record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataRecord {
    /// tEXt or zTXt: keyword plus Latin-1 text.
    Text {
        /// Record keyword (e.g. "Title", "Author").
        keyword: String,
        /// Text content.
        text: String,
    },
    /// iTXt: keyword plus UTF-8 text with language information.
    InternationalText {
        /// Record keyword.
        keyword: String,
        /// RFC 3066 language tag (may be empty).
        language_tag: String,
        /// Keyword translated into the tagged language (may be empty).
        translated_keyword: String,
        /// UTF-8 text content.
        text: String,
    },
    /// tIME: last-modification timestamp (UTC).
    Time {
        /// Full year (e.g. 2024).
        year: u16,
        /// Month, 1-12.
        month: u8,
        /// Day, 1-31.
        day: u8,
        /// Hour, 0-23.
        hour: u8,
        /// Minute, 0-59.
        minute: u8,
        /// Second, 0-60 (60 for leap seconds).
        second: u8,
    },
    /// gAMA: image gamma times 100000.
    Gamma(u32),
}

/// Ancillary records grouped by the chunk type that carried them.
pub type MetadataMap = BTreeMap<String, Vec<MetadataRecord>>;

/// Tracks the IDAT contiguity rule while walking chunks.
#[derive(PartialEq)]
enum IdatState {
    NotSeen,
    InProgress,
    Done,
}

/// Everything extracted from the chunk stream, ready for decompression.
pub struct ParsedChunks {
    /// Validated IHDR fields.
    pub header: ImageHeader,
    /// PLTE contents, when present.
    pub palette: Option<Palette>,
    /// Concatenated IDAT payloads (one zlib stream).
    pub idat: Vec<u8>,
    /// Parsed ancillary records.
    pub metadata: MetadataMap,
}

/// Walk the chunk stream and apply the per-chunk policy.
pub fn parse_stream(data: &[u8]) -> Result<ParsedChunks> {
    let mut header: Option<ImageHeader> = None;
    let mut palette: Option<Palette> = None;
    let mut idat = Vec::new();
    let mut idat_state = IdatState::NotSeen;
    let mut metadata = MetadataMap::new();
    let mut seen_iend = false;

    for (index, chunk) in ChunkReader::new(data)?.enumerate() {
        let chunk = chunk?;

        if index == 0 && chunk.chunk_type.0 != *b"IHDR" {
            return Err(Error::InvalidStructure(format!(
                "first chunk is {} (expected IHDR)",
                chunk.chunk_type
            )));
        }

        if chunk.chunk_type.0 != *b"IDAT" && idat_state == IdatState::InProgress {
            idat_state = IdatState::Done;
        }

        match &chunk.chunk_type.0 {
            b"IHDR" => {
                if index != 0 {
                    return Err(Error::InvalidStructure("IHDR is not the first chunk".into()));
                }
                header = Some(ImageHeader::parse(chunk.data)?);
            }
            b"PLTE" => {
                let header = header
                    .ok_or_else(|| Error::InvalidStructure("PLTE before IHDR".into()))?;
                if palette.is_some() {
                    return Err(Error::InvalidStructure("duplicate PLTE".into()));
                }
                if idat_state != IdatState::NotSeen {
                    return Err(Error::InvalidStructure("PLTE after IDAT".into()));
                }
                match header.color_type {
                    PngColorType::Grayscale | PngColorType::GrayscaleAlpha => {
                        return Err(Error::InvalidPalette(
                            "PLTE not allowed for grayscale images".into(),
                        ));
                    }
                    PngColorType::Indexed => {
                        palette = Some(Palette::parse(
                            chunk.data,
                            1usize << header.bit_depth,
                        )?);
                    }
                    // Suggested palette for truecolor; recorded, never used.
                    PngColorType::Rgb | PngColorType::Rgba => {
                        palette = Some(Palette::parse(chunk.data, 256)?);
                    }
                }
            }
            b"IDAT" => {
                match idat_state {
                    IdatState::NotSeen => idat_state = IdatState::InProgress,
                    IdatState::InProgress => {}
                    IdatState::Done => {
                        return Err(Error::InvalidStructure(
                            "IDAT chunks are not contiguous".into(),
                        ));
                    }
                }
                idat.extend_from_slice(chunk.data);
            }
            b"IEND" => {
                if !chunk.data.is_empty() {
                    return Err(Error::InvalidStructure("IEND has a payload".into()));
                }
                seen_iend = true;
            }
            b"tEXt" => {
                let record = parse_text(chunk.data)?;
                store(&mut metadata, &chunk, record);
            }
            b"zTXt" => {
                let record = parse_compressed_text(chunk.data)?;
                store(&mut metadata, &chunk, record);
            }
            b"iTXt" => {
                let record = parse_international_text(chunk.data)?;
                store(&mut metadata, &chunk, record);
            }
            b"tIME" => {
                let record = parse_time(chunk.data)?;
                store(&mut metadata, &chunk, record);
            }
            b"gAMA" => {
                let record = parse_gamma(chunk.data)?;
                store(&mut metadata, &chunk, record);
            }
            _ => {
                if chunk.chunk_type.is_critical() {
                    return Err(Error::UnsupportedChunk {
                        chunk_type: chunk.chunk_type.0,
                    });
                }
                debug!("skipping ancillary chunk {}", chunk.chunk_type);
            }
        }
    }

    let header = header.ok_or_else(|| Error::InvalidStructure("missing IHDR".into()))?;
    if !seen_iend {
        return Err(Error::InvalidStructure("missing IEND".into()));
    }
    if idat.is_empty() {
        return Err(Error::InvalidStructure("no IDAT data".into()));
    }
    if header.color_type == PngColorType::Indexed && palette.is_none() {
        return Err(Error::InvalidPalette(
            "indexed image without PLTE".into(),
        ));
    }

    Ok(ParsedChunks {
        header,
        palette,
        idat,
        metadata,
    })
}

fn store(metadata: &mut MetadataMap, chunk: &Chunk<'_>, record: MetadataRecord) {
    debug!("metadata {}: {:?}", chunk.chunk_type, record);
    metadata
        .entry(chunk.chunk_type.to_string())
        .or_default()
        .push(record);
}

/// Latin-1 maps bytes directly to the first 256 Unicode code points.
fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

fn utf8(bytes: &[u8], what: &str) -> Result<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|_| Error::InvalidStructure(format!("{} is not valid UTF-8", what)))
}

/// Split at the first NUL separator.
fn split_keyword<'a>(data: &'a [u8], chunk: &str) -> Result<(&'a [u8], &'a [u8])> {
    let nul = data
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| Error::InvalidStructure(format!("{} missing keyword separator", chunk)))?;
    Ok((&data[..nul], &data[nul + 1..]))
}

fn parse_text(data: &[u8]) -> Result<MetadataRecord> {
    let (keyword, text) = split_keyword(data, "tEXt")?;
    Ok(MetadataRecord::Text {
        keyword: latin1(keyword),
        text: latin1(text),
    })
}

fn parse_compressed_text(data: &[u8]) -> Result<MetadataRecord> {
    let (keyword, rest) = split_keyword(data, "zTXt")?;
    let (&method, compressed) = rest
        .split_first()
        .ok_or_else(|| Error::InvalidStructure("zTXt missing compression method".into()))?;
    if method != 0 {
        return Err(Error::InvalidStructure(format!(
            "zTXt compression method {}",
            method
        )));
    }
    let text = inflate_zlib(compressed, None)?;
    Ok(MetadataRecord::Text {
        keyword: latin1(keyword),
        text: latin1(&text),
    })
}

fn parse_international_text(data: &[u8]) -> Result<MetadataRecord> {
    let (keyword, rest) = split_keyword(data, "iTXt")?;
    if rest.len() < 2 {
        return Err(Error::InvalidStructure("iTXt missing compression fields".into()));
    }
    let compression_flag = rest[0];
    let compression_method = rest[1];
    if compression_flag > 1 {
        return Err(Error::InvalidStructure(format!(
            "iTXt compression flag {}",
            compression_flag
        )));
    }
    if compression_method != 0 {
        return Err(Error::InvalidStructure(format!(
            "iTXt compression method {}",
            compression_method
        )));
    }

    let (language_tag, rest) = split_keyword(&rest[2..], "iTXt")?;
    let (translated_keyword, text_bytes) = split_keyword(rest, "iTXt")?;

    let text = if compression_flag == 1 {
        utf8(&inflate_zlib(text_bytes, None)?, "iTXt text")?
    } else {
        utf8(text_bytes, "iTXt text")?
    };

    Ok(MetadataRecord::InternationalText {
        keyword: utf8(keyword, "iTXt keyword")?,
        language_tag: utf8(language_tag, "iTXt language tag")?,
        translated_keyword: utf8(translated_keyword, "iTXt translated keyword")?,
        text,
    })
}

fn parse_time(data: &[u8]) -> Result<MetadataRecord> {
    if data.len() != 7 {
        return Err(Error::InvalidStructure(format!(
            "tIME payload is {} bytes (expected 7)",
            data.len()
        )));
    }
    Ok(MetadataRecord::Time {
        year: u16::from_be_bytes([data[0], data[1]]),
        month: data[2],
        day: data[3],
        hour: data[4],
        minute: data[5],
        second: data[6],
    })
}

fn parse_gamma(data: &[u8]) -> Result<MetadataRecord> {
    if data.len() != 4 {
        return Err(Error::InvalidStructure(format!(
            "gAMA payload is {} bytes (expected 4)",
            data.len()
        )));
    }
    Ok(MetadataRecord::Gamma(u32::from_be_bytes([
        data[0], data[1], data[2], data[3],
    ])))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::Crc32;
    use crate::png::chunk::PNG_SIGNATURE;

    fn push_chunk(out: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
        out.extend_from_slice(&(data.len() as u32).to_be_bytes());
        out.extend_from_slice(chunk_type);
        out.extend_from_slice(data);
        let mut crc = Crc32::new();
        crc.update(chunk_type);
        crc.update(data);
        out.extend_from_slice(&crc.finalize().to_be_bytes());
    }

    fn ihdr_payload(
        width: u32,
        height: u32,
        bit_depth: u8,
        color_type: u8,
    ) -> Vec<u8> {
        let mut data = Vec::with_capacity(13);
        data.extend_from_slice(&width.to_be_bytes());
        data.extend_from_slice(&height.to_be_bytes());
        data.extend_from_slice(&[bit_depth, color_type, 0, 0, 0]);
        data
    }

    /// A 1x1 grayscale image: one stored DEFLATE block holding the filter
    /// byte and a single sample.
    fn minimal_idat() -> Vec<u8> {
        let payload = [0u8, 0x7F];
        let mut idat = vec![0x78, 0x01, 0x01];
        idat.extend_from_slice(&2u16.to_le_bytes());
        idat.extend_from_slice(&(!2u16).to_le_bytes());
        idat.extend_from_slice(&payload);
        idat.extend_from_slice(&crate::checksum::adler32(&payload).to_be_bytes());
        idat
    }

    fn minimal_png(extra: impl FnOnce(&mut Vec<u8>)) -> Vec<u8> {
        let mut data = PNG_SIGNATURE.to_vec();
        push_chunk(&mut data, b"IHDR", &ihdr_payload(1, 1, 8, 0));
        extra(&mut data);
        push_chunk(&mut data, b"IDAT", &minimal_idat());
        push_chunk(&mut data, b"IEND", &[]);
        data
    }

    #[test]
    fn test_minimal_stream_parses() {
        let data = minimal_png(|_| {});
        let parsed = parse_stream(&data).unwrap();
        assert_eq!(parsed.header.width, 1);
        assert_eq!(parsed.header.height, 1);
        assert!(parsed.palette.is_none());
        assert!(!parsed.idat.is_empty());
        assert!(parsed.metadata.is_empty());
    }

    #[test]
    fn test_ihdr_must_be_first() {
        let mut data = PNG_SIGNATURE.to_vec();
        push_chunk(&mut data, b"tEXt", b"k\0v");
        push_chunk(&mut data, b"IHDR", &ihdr_payload(1, 1, 8, 0));
        push_chunk(&mut data, b"IDAT", &minimal_idat());
        push_chunk(&mut data, b"IEND", &[]);

        assert!(matches!(
            parse_stream(&data),
            Err(Error::InvalidStructure(_))
        ));
    }

    #[test]
    fn test_duplicate_ihdr_rejected() {
        let mut data = PNG_SIGNATURE.to_vec();
        push_chunk(&mut data, b"IHDR", &ihdr_payload(1, 1, 8, 0));
        push_chunk(&mut data, b"IHDR", &ihdr_payload(1, 1, 8, 0));
        push_chunk(&mut data, b"IDAT", &minimal_idat());
        push_chunk(&mut data, b"IEND", &[]);

        assert!(matches!(
            parse_stream(&data),
            Err(Error::InvalidStructure(_))
        ));
    }

    #[test]
    fn test_missing_iend() {
        let mut data = PNG_SIGNATURE.to_vec();
        push_chunk(&mut data, b"IHDR", &ihdr_payload(1, 1, 8, 0));
        push_chunk(&mut data, b"IDAT", &minimal_idat());

        assert!(matches!(
            parse_stream(&data),
            Err(Error::InvalidStructure(_))
        ));
    }

    #[test]
    fn test_missing_idat() {
        let mut data = PNG_SIGNATURE.to_vec();
        push_chunk(&mut data, b"IHDR", &ihdr_payload(1, 1, 8, 0));
        push_chunk(&mut data, b"IEND", &[]);

        assert!(matches!(
            parse_stream(&data),
            Err(Error::InvalidStructure(_))
        ));
    }

    #[test]
    fn test_non_contiguous_idat_rejected() {
        let idat = minimal_idat();
        let mut data = PNG_SIGNATURE.to_vec();
        push_chunk(&mut data, b"IHDR", &ihdr_payload(1, 1, 8, 0));
        push_chunk(&mut data, b"IDAT", &idat[..4]);
        push_chunk(&mut data, b"tEXt", b"k\0v");
        push_chunk(&mut data, b"IDAT", &idat[4..]);
        push_chunk(&mut data, b"IEND", &[]);

        assert!(matches!(
            parse_stream(&data),
            Err(Error::InvalidStructure(_))
        ));
    }

    #[test]
    fn test_split_idat_payloads_concatenate() {
        let idat = minimal_idat();
        let mut data = PNG_SIGNATURE.to_vec();
        push_chunk(&mut data, b"IHDR", &ihdr_payload(1, 1, 8, 0));
        push_chunk(&mut data, b"IDAT", &idat[..5]);
        push_chunk(&mut data, b"IDAT", &idat[5..]);
        push_chunk(&mut data, b"IEND", &[]);

        let parsed = parse_stream(&data).unwrap();
        assert_eq!(parsed.idat, idat);
    }

    #[test]
    fn test_unknown_critical_chunk_fails() {
        let data = minimal_png(|data| push_chunk(data, b"ABCD", &[1, 2, 3]));
        assert!(matches!(
            parse_stream(&data),
            Err(Error::UnsupportedChunk { chunk_type }) if &chunk_type == b"ABCD"
        ));
    }

    #[test]
    fn test_unknown_ancillary_chunk_skipped() {
        let data = minimal_png(|data| push_chunk(data, b"eXMP", &[1, 2, 3]));
        assert!(parse_stream(&data).is_ok());
    }

    #[test]
    fn test_text_record() {
        let data = minimal_png(|data| push_chunk(data, b"tEXt", b"Title\0Lake at dawn"));
        let parsed = parse_stream(&data).unwrap();
        assert_eq!(
            parsed.metadata["tEXt"],
            vec![MetadataRecord::Text {
                keyword: "Title".into(),
                text: "Lake at dawn".into(),
            }]
        );
    }

    #[test]
    fn test_ztxt_record_round_trips_through_inflater() {
        // zlib stream for "abc" (fixed Huffman).
        let compressed = [
            0x78, 0x9C, 0x4B, 0x4C, 0x4A, 0x06, 0x00, 0x02, 0x4D, 0x01, 0x27,
        ];
        let mut payload = b"Comment\0\0".to_vec();
        payload.extend_from_slice(&compressed);

        let data = minimal_png(|data| push_chunk(data, b"zTXt", &payload));
        let parsed = parse_stream(&data).unwrap();
        assert_eq!(
            parsed.metadata["zTXt"],
            vec![MetadataRecord::Text {
                keyword: "Comment".into(),
                text: "abc".into(),
            }]
        );
    }

    #[test]
    fn test_itxt_uncompressed_record() {
        let payload = b"Title\0\0\0en\0Titre\0Bonjour".to_vec();
        let data = minimal_png(|data| push_chunk(data, b"iTXt", &payload));
        let parsed = parse_stream(&data).unwrap();
        assert_eq!(
            parsed.metadata["iTXt"],
            vec![MetadataRecord::InternationalText {
                keyword: "Title".into(),
                language_tag: "en".into(),
                translated_keyword: "Titre".into(),
                text: "Bonjour".into(),
            }]
        );
    }

    #[test]
    fn test_time_record() {
        let payload = [0x07, 0xE8, 6, 15, 12, 30, 59];
        let data = minimal_png(|data| push_chunk(data, b"tIME", &payload));
        let parsed = parse_stream(&data).unwrap();
        assert_eq!(
            parsed.metadata["tIME"],
            vec![MetadataRecord::Time {
                year: 2024,
                month: 6,
                day: 15,
                hour: 12,
                minute: 30,
                second: 59,
            }]
        );
    }

    #[test]
    fn test_gamma_record() {
        let data = minimal_png(|data| push_chunk(data, b"gAMA", &45455u32.to_be_bytes()));
        let parsed = parse_stream(&data).unwrap();
        assert_eq!(
            parsed.metadata["gAMA"],
            vec![MetadataRecord::Gamma(45455)]
        );
    }

    #[test]
    fn test_time_wrong_length() {
        let data = minimal_png(|data| push_chunk(data, b"tIME", &[0; 6]));
        assert!(matches!(
            parse_stream(&data),
            Err(Error::InvalidStructure(_))
        ));
    }

    #[test]
    fn test_header_rejects_zero_width() {
        assert!(matches!(
            ImageHeader::parse(&ihdr_payload(0, 1, 8, 0)),
            Err(Error::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_header_rejects_interlace() {
        let mut payload = ihdr_payload(1, 1, 8, 0);
        payload[12] = 1;
        assert!(matches!(
            ImageHeader::parse(&payload),
            Err(Error::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_header_rejects_bad_depth_for_rgb() {
        assert!(matches!(
            ImageHeader::parse(&ihdr_payload(1, 1, 4, 2)),
            Err(Error::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_header_geometry() {
        // 10 pixels at 1 bit: 2 bytes per scanline, filter unit 1.
        let header = ImageHeader::parse(&ihdr_payload(10, 3, 1, 0)).unwrap();
        assert_eq!(header.scanline_bytes(), 2);
        assert_eq!(header.filter_bytes_per_pixel(), 1);
        assert_eq!(header.decompressed_len().unwrap(), 9);

        // RGBA at 16 bits: 8 bytes per pixel.
        let header = ImageHeader::parse(&ihdr_payload(2, 2, 16, 6)).unwrap();
        assert_eq!(header.filter_bytes_per_pixel(), 8);
        assert_eq!(header.scanline_bytes(), 16);
        assert_eq!(header.decompressed_len().unwrap(), 34);
    }

    #[test]
    fn test_plte_for_grayscale_rejected() {
        let mut data = PNG_SIGNATURE.to_vec();
        push_chunk(&mut data, b"IHDR", &ihdr_payload(1, 1, 8, 0));
        push_chunk(&mut data, b"PLTE", &[255, 0, 0]);
        push_chunk(&mut data, b"IDAT", &minimal_idat());
        push_chunk(&mut data, b"IEND", &[]);

        assert!(matches!(
            parse_stream(&data),
            Err(Error::InvalidPalette(_))
        ));
    }

    #[test]
    fn test_plte_suggested_for_truecolor_accepted() {
        // Not a complete RGB image (the IDAT is grayscale-sized), but the
        // chunk walk itself must accept a suggested palette.
        let mut data = PNG_SIGNATURE.to_vec();
        push_chunk(&mut data, b"IHDR", &ihdr_payload(1, 1, 8, 2));
        push_chunk(&mut data, b"PLTE", &[255, 0, 0, 0, 255, 0]);
        push_chunk(&mut data, b"IDAT", &minimal_idat());
        push_chunk(&mut data, b"IEND", &[]);

        let parsed = parse_stream(&data).unwrap();
        assert_eq!(parsed.palette.unwrap().len(), 2);
    }

    #[test]
    fn test_indexed_without_plte_rejected() {
        let mut data = PNG_SIGNATURE.to_vec();
        push_chunk(&mut data, b"IHDR", &ihdr_payload(1, 1, 8, 3));
        push_chunk(&mut data, b"IDAT", &minimal_idat());
        push_chunk(&mut data, b"IEND", &[]);

        assert!(matches!(
            parse_stream(&data),
            Err(Error::InvalidPalette(_))
        ));
    }

    #[test]
    fn test_plte_after_idat_rejected() {
        let mut data = PNG_SIGNATURE.to_vec();
        push_chunk(&mut data, b"IHDR", &ihdr_payload(1, 1, 8, 3));
        push_chunk(&mut data, b"IDAT", &minimal_idat());
        push_chunk(&mut data, b"PLTE", &[255, 0, 0]);
        push_chunk(&mut data, b"IEND", &[]);

        assert!(matches!(
            parse_stream(&data),
            Err(Error::InvalidStructure(_))
        ));
    }

    #[test]
    fn test_plte_entry_count_bounded_by_depth() {
        // 1-bit indexed image allows at most 2 entries.
        let mut data = PNG_SIGNATURE.to_vec();
        push_chunk(&mut data, b"IHDR", &ihdr_payload(1, 1, 1, 3));
        push_chunk(&mut data, b"PLTE", &[0, 0, 0, 85, 85, 85, 255, 255, 255]);
        push_chunk(&mut data, b"IDAT", &minimal_idat());
        push_chunk(&mut data, b"IEND", &[]);

        assert!(matches!(
            parse_stream(&data),
            Err(Error::InvalidPalette(_))
        ));
    }

    #[test]
    fn test_palette_parse() {
        let palette = Palette::parse(&[1, 2, 3, 4, 5, 6], 256).unwrap();
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.get(0), Some([1, 2, 3]));
        assert_eq!(palette.get(1), Some([4, 5, 6]));
        assert_eq!(palette.get(2), None);

        assert!(Palette::parse(&[1, 2], 256).is_err());
        assert!(Palette::parse(&[], 256).is_err());
    }
}
