//! Conversion between raw little-endian sample bytes and native integers.
//!
//! 16-bit samples decode through `i16`, 24-bit samples are sign-extended
//! into an `i32` container. Both widths share the `i32` representation so
//! mixed-width records need no per-channel sample type.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{EdfError, Result};
use crate::types::SampleWidth;

/// Decodes `count` samples from the front of `bytes`
///
/// ```rust
/// use edfcodec::{sample::decode_samples, SampleWidth};
///
/// let bytes = [0x00, 0x00, 0xFF, 0xFF, 0x00, 0x80, 0xFF, 0x7F];
/// let samples = decode_samples(&bytes, SampleWidth::Two, 4)?;
/// assert_eq!(samples, vec![0, -1, -32768, 32767]);
///
/// let samples = decode_samples(&[0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x80], SampleWidth::Three, 2)?;
/// assert_eq!(samples, vec![-1, -8_388_608]);
/// # Ok::<(), edfcodec::EdfError>(())
/// ```
pub fn decode_samples(bytes: &[u8], width: SampleWidth, count: usize) -> Result<Vec<i32>> {
    let needed = count * width.bytes();
    if bytes.len() < needed {
        return Err(EdfError::TruncatedRecord {
            channel: 0,
            needed,
            remaining: bytes.len(),
        });
    }

    let bytes = &bytes[..needed];
    let samples = match width {
        SampleWidth::Two => bytes
            .chunks_exact(2)
            .map(|chunk| LittleEndian::read_i16(chunk) as i32)
            .collect(),
        // read_i24 符号扩展到 i32
        SampleWidth::Three => bytes.chunks_exact(3).map(LittleEndian::read_i24).collect(),
    };

    Ok(samples)
}

/// Encodes samples at `width`, rejecting values outside the width's range
pub fn encode_samples(samples: &[i32], width: SampleWidth) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(samples.len() * width.bytes());
    encode_samples_into(samples, width, &mut out)?;
    Ok(out)
}

/// Appends encoded samples to `out`; nothing is appended on error
pub fn encode_samples_into(samples: &[i32], width: SampleWidth, out: &mut Vec<u8>) -> Result<()> {
    if let Some(&value) = samples
        .iter()
        .find(|&&v| v < width.min_value() || v > width.max_value())
    {
        return Err(EdfError::SampleOutOfRange {
            value,
            width: width.bytes(),
        });
    }

    let start = out.len();
    out.resize(start + samples.len() * width.bytes(), 0);

    let chunks = out[start..].chunks_exact_mut(width.bytes());
    for (chunk, &value) in chunks.zip(samples) {
        match width {
            SampleWidth::Two => LittleEndian::write_i16(chunk, value as i16),
            // 低 24 位补码
            SampleWidth::Three => LittleEndian::write_i24(chunk, value),
        }
    }

    Ok(())
}
