//! Unsigned LEB128 varints bounded to 32-bit magnitudes.

use crate::constants::MAX_VARINT_LEN;
use crate::error::{DecodeError, Section};

/// Decode a u32 ULEB128 starting at `offset`
///
/// Returns `(value, bytes_consumed)`.
///
/// # Errors
/// * `Truncated` if no bytes remain or the buffer ends mid-varint
/// * `MalformedVarint` if five bytes pass without termination or the value exceeds `u32::MAX`
#[inline]
pub fn read_u32(buf: &[u8], offset: usize) -> Result<(u32, usize), DecodeError> {
    let data = buf.get(offset..).unwrap_or(&[]);

    // Fast path: single byte header covers runs up to 63 values
    match data.first() {
        None => {
            return Err(DecodeError::Truncated {
                section: Section::Header,
                offset,
                needed: 1,
                available: 0,
            });
        }
        Some(&b) if b & 0x80 == 0 => return Ok((u32::from(b), 1)),
        Some(_) => {}
    }

    let mut value = 0u64;
    for (i, &b) in data.iter().take(MAX_VARINT_LEN).enumerate() {
        value |= u64::from(b & 0x7F) << (7 * i);
        if b & 0x80 == 0 {
            let value = u32::try_from(value).map_err(|_| DecodeError::MalformedVarint { offset })?;
            return Ok((value, i + 1));
        }
    }

    if data.len() < MAX_VARINT_LEN {
        Err(DecodeError::Truncated {
            section: Section::Header,
            offset,
            needed: data.len() + 1,
            available: data.len(),
        })
    } else {
        Err(DecodeError::MalformedVarint { offset })
    }
}

/// Append the ULEB128 encoding of `value` to `out`, returning the bytes written
#[inline]
pub fn write_u32(mut value: u32, out: &mut Vec<u8>) -> usize {
    let start = out.len();
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return out.len() - start;
        }
        out.push(byte | 0x80);
    }
}
