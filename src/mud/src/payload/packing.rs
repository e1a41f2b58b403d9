//! Histogram data packing (spec.md §6's `bytesPerBin` rule).
//!
//! When a `HistHeader`'s `bytesPerBin` is nonzero, bin counts are a flat
//! array of fixed-width little-endian integers (1, 2, or 4 bytes per bin)
//! and no tag is stored — `bytesPerBin` alone decodes the array. When
//! `bytesPerBin` is 0, each bin instead gets a 1-byte width tag (0 = u8,
//! 1 = u16, 2 = u32) immediately ahead of its value, chosen per-bin as the
//! narrowest width the count fits in — the variable-length scheme this
//! module implements. It is modeled on `metadata/streams.rs`'s
//! `read_blob_length`, which picks a prefix width from the leading byte
//! rather than committing to one width for an entire stream.

use crate::buffer::{ByteReader, ByteWriter};
use crate::error::{MudError, Result};

const TAG_U8: u8 = 0;
const TAG_U16: u8 = 1;
const TAG_U32: u8 = 2;

/// Encode bin counts with the variable-width tag scheme.
pub fn pack_variable(bins: &[u32]) -> Vec<u8> {
    let mut w = ByteWriter::new();
    for &v in bins {
        if let Ok(v8) = u8::try_from(v) {
            w.write_raw(&[TAG_U8, v8]);
        } else if let Ok(v16) = u16::try_from(v) {
            w.write_raw(&[TAG_U16]);
            w.write_u16(v16);
        } else {
            w.write_raw(&[TAG_U32]);
            w.write_u32(v);
        }
    }
    w.into_vec()
}

/// Decode bin counts packed by [`pack_variable`].
pub fn unpack_variable(bytes: &[u8]) -> Result<Vec<u32>> {
    let mut r = ByteReader::new(bytes);
    let mut bins = Vec::new();
    while r.remaining() > 0 {
        let tag = r.read_raw(1)?[0];
        let value = match tag {
            TAG_U8 => r.read_raw(1)?[0] as u32,
            TAG_U16 => r.read_u16()? as u32,
            TAG_U32 => r.read_u32()?,
            other => {
                return Err(MudError::CorruptSection(format!(
                    "invalid histogram pack tag byte {other}"
                )))
            }
        };
        bins.push(value);
    }
    Ok(bins)
}

/// Encode bin counts at a fixed width (`bytesPerBin` of 1, 2, or 4).
/// `bytesPerBin == 0` is the variable-width scheme and does not go through
/// this function.
pub fn pack_fixed(bins: &[u32], bytes_per_bin: u8) -> Result<Vec<u8>> {
    let mut w = ByteWriter::new();
    for &v in bins {
        match bytes_per_bin {
            1 => w.write_raw(&[u8::try_from(v).map_err(|_| {
                MudError::InvalidInput(format!("bin value {v} does not fit in 1 byte"))
            })?]),
            2 => w.write_u16(u16::try_from(v).map_err(|_| {
                MudError::InvalidInput(format!("bin value {v} does not fit in 2 bytes"))
            })?),
            4 => w.write_u32(v),
            other => {
                return Err(MudError::InvalidInput(format!(
                    "unsupported bytesPerBin {other}"
                )))
            }
        }
    }
    Ok(w.into_vec())
}

/// Decode bin counts packed at a fixed width.
pub fn unpack_fixed(bytes: &[u8], bytes_per_bin: u8, num_bins: u32) -> Result<Vec<u32>> {
    if !matches!(bytes_per_bin, 1 | 2 | 4) {
        return Err(MudError::InvalidInput(format!(
            "unsupported bytesPerBin {bytes_per_bin}"
        )));
    }
    // `num_bins` is a wire-supplied u32; bound it against what `bytes`
    // could actually hold before reserving `num_bins` capacity.
    if u64::from(num_bins) * u64::from(bytes_per_bin) > bytes.len() as u64 {
        return Err(MudError::CorruptSection(format!(
            "{num_bins} bins at {bytes_per_bin} bytes each exceeds the {} available bytes",
            bytes.len()
        )));
    }
    let mut r = ByteReader::new(bytes);
    let mut bins = Vec::with_capacity(num_bins as usize);
    for _ in 0..num_bins {
        let v = match bytes_per_bin {
            1 => r.read_raw(1)?[0] as u32,
            2 => r.read_u16()? as u32,
            4 => r.read_u32()?,
            other => {
                return Err(MudError::InvalidInput(format!(
                    "unsupported bytesPerBin {other}"
                )))
            }
        };
        bins.push(v);
    }
    Ok(bins)
}
