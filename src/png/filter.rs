//! PNG scanline filter reversal.
//!
//! Every scanline of the decompressed image data starts with a filter-type
//! byte; the remaining bytes are predictions relative to the reconstructed
//! neighborhood (left, above, above-left). Reconstruction is strictly
//! left-to-right, top-to-bottom: each byte depends on bytes already
//! reconstructed in this row and the previous one.

use crate::error::{Error, Result};

/// Filter type bytes as defined by the PNG specification.
const FILTER_NONE: u8 = 0;
const FILTER_SUB: u8 = 1;
const FILTER_UP: u8 = 2;
const FILTER_AVERAGE: u8 = 3;
const FILTER_PAETH: u8 = 4;

/// Reverse the per-scanline filters over the decompressed stream.
///
/// `data` must hold exactly `height * (1 + stride)` bytes: each row is a
/// filter byte followed by `stride` filtered bytes. `bpp` is the filter
/// unit, `ceil(bit_depth * channels / 8)` clamped to at least 1. Returns
/// the reconstructed rows, `height * stride` bytes, without filter bytes.
pub fn unfilter(data: &[u8], height: usize, stride: usize, bpp: usize) -> Result<Vec<u8>> {
    debug_assert_eq!(data.len(), height * (1 + stride));

    let mut raw = Vec::with_capacity(height * stride);
    let mut current = vec![0u8; stride];
    let mut previous = vec![0u8; stride];

    for y in 0..height {
        let row_start = y * (1 + stride);
        let filter = data[row_start];
        current.copy_from_slice(&data[row_start + 1..row_start + 1 + stride]);

        unfilter_row(filter, &mut current, &previous, bpp)?;

        raw.extend_from_slice(&current);
        std::mem::swap(&mut current, &mut previous);
    }

    Ok(raw)
}

/// Reconstruct one row in place. `prev` is the reconstructed row above
/// (all zeros for the first row).
fn unfilter_row(filter: u8, row: &mut [u8], prev: &[u8], bpp: usize) -> Result<()> {
    match filter {
        FILTER_NONE => Ok(()),
        FILTER_SUB => {
            for i in bpp..row.len() {
                row[i] = row[i].wrapping_add(row[i - bpp]);
            }
            Ok(())
        }
        FILTER_UP => {
            for i in 0..row.len() {
                row[i] = row[i].wrapping_add(prev[i]);
            }
            Ok(())
        }
        FILTER_AVERAGE => {
            for i in 0..row.len() {
                let left = if i >= bpp { row[i - bpp] as u16 } else { 0 };
                let above = prev[i] as u16;
                row[i] = row[i].wrapping_add(((left + above) / 2) as u8);
            }
            Ok(())
        }
        FILTER_PAETH => {
            for i in 0..row.len() {
                let a = if i >= bpp { row[i - bpp] } else { 0 };
                let b = prev[i];
                let c = if i >= bpp { prev[i - bpp] } else { 0 };
                row[i] = row[i].wrapping_add(paeth_predictor(a, b, c));
            }
            Ok(())
        }
        _ => Err(Error::InvalidFilter(filter)),
    }
}

/// Paeth predictor: whichever of left, above, above-left is closest to
/// `a + b - c`, ties resolved left, then above.
#[inline]
fn paeth_predictor(a: u8, b: u8, c: u8) -> u8 {
    let p = a as i32 + b as i32 - c as i32;
    let pa = (p - a as i32).abs();
    let pb = (p - b as i32).abs();
    let pc = (p - c as i32).abs();

    if pa <= pb && pa <= pc {
        a
    } else if pb <= pc {
        b
    } else {
        c
    }
}
