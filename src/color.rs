//! Color type definitions.
//!
//! Two views of the same concept live here: [`PngColorType`] is the color
//! type byte as it appears in IHDR, [`ColorType`] is the channel layout of
//! the decoded output. Indexed images enter as `PngColorType::Indexed` and
//! leave as `ColorType::Rgb` once the palette is resolved.

use crate::error::{Error, Result};

/// Channel layout of decoded pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ColorType {
    /// Grayscale, 1 sample per pixel.
    Gray,
    /// Grayscale with alpha, 2 samples per pixel.
    GrayAlpha,
    /// RGB, 3 samples per pixel.
    Rgb,
    /// RGBA, 4 samples per pixel.
    Rgba,
}

impl ColorType {
    /// Returns the number of channels per pixel.
    #[inline]
    pub const fn channels(self) -> usize {
        match self {
            ColorType::Gray => 1,
            ColorType::GrayAlpha => 2,
            ColorType::Rgb => 3,
            ColorType::Rgba => 4,
        }
    }
}

/// PNG color type values from the specification (IHDR byte 9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PngColorType {
    /// Color type 0: grayscale samples.
    Grayscale,
    /// Color type 2: R, G, B triples.
    Rgb,
    /// Color type 3: palette indices.
    Indexed,
    /// Color type 4: grayscale plus alpha.
    GrayscaleAlpha,
    /// Color type 6: R, G, B, A quadruples.
    Rgba,
}

impl TryFrom<u8> for PngColorType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(PngColorType::Grayscale),
            2 => Ok(PngColorType::Rgb),
            3 => Ok(PngColorType::Indexed),
            4 => Ok(PngColorType::GrayscaleAlpha),
            6 => Ok(PngColorType::Rgba),
            _ => Err(Error::InvalidHeader(format!("color type {}", value))),
        }
    }
}

impl PngColorType {
    /// Channels per pixel in the coded (pre-palette) image.
    #[inline]
    pub const fn channels(self) -> usize {
        match self {
            PngColorType::Grayscale | PngColorType::Indexed => 1,
            PngColorType::GrayscaleAlpha => 2,
            PngColorType::Rgb => 3,
            PngColorType::Rgba => 4,
        }
    }

    /// Whether `bit_depth` is legal for this color type.
    #[inline]
    pub const fn allows_bit_depth(self, bit_depth: u8) -> bool {
        match self {
            PngColorType::Grayscale => matches!(bit_depth, 1 | 2 | 4 | 8 | 16),
            PngColorType::Indexed => matches!(bit_depth, 1 | 2 | 4 | 8),
            PngColorType::Rgb | PngColorType::GrayscaleAlpha | PngColorType::Rgba => {
                matches!(bit_depth, 8 | 16)
            }
        }
    }

    /// Channel layout of the decoded output for this color type.
    ///
    /// Indexed images resolve to RGB through the palette.
    #[inline]
    pub const fn output_color_type(self) -> ColorType {
        match self {
            PngColorType::Grayscale => ColorType::Gray,
            PngColorType::GrayscaleAlpha => ColorType::GrayAlpha,
            PngColorType::Rgb | PngColorType::Indexed => ColorType::Rgb,
            PngColorType::Rgba => ColorType::Rgba,
        }
    }
}
