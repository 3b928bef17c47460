//! Reference encoder producing hybrid RLE / bit-packed streams.

use serde::{Deserialize, Serialize};

use crate::bitpack::pack8;
use crate::constants::{
    byte_width, is_valid_bit_width, value_mask, GROUP_LEN, MAX_RUN_LEN, MIN_RLE_RUN,
};
use crate::error::{ConfigError, EncodeError};
use crate::header::RunHeader;

/// Streaming encoder for one bit width
///
/// Repeats of at least 8 values that start on a group boundary become RLE
/// runs. Everything else is collected into groups of 8 and bit-packed; the
/// last group is padded with zeros, so the decoder may yield up to 7 trailing
/// padding values past the real count.
///
/// Serializable so a partially written stream can be stored and resumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encoder {
    bit_width: u32,
    /// Completed runs
    buf: Vec<u8>,
    /// Values waiting to be bit-packed
    literals: Vec<u32>,
    /// Value of the repeat currently being counted
    run_value: u32,
    /// Length of that repeat (0 if none)
    run_len: u32,
    /// Values accepted so far
    count: u64,
}

impl Encoder {
    /// Create an encoder for `bit_width`
    ///
    /// # Panics
    /// Panics if `bit_width` is outside `1..=32`.
    #[must_use]
    pub fn new(bit_width: u32) -> Self {
        match Self::try_new(bit_width) {
            Ok(e) => e,
            Err(e) => panic!("{e}"),
        }
    }

    /// Create an encoder for `bit_width`
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidBitWidth` if `bit_width` is outside `1..=32`.
    pub fn try_new(bit_width: u32) -> Result<Self, ConfigError> {
        if !is_valid_bit_width(bit_width) {
            return Err(ConfigError::InvalidBitWidth(bit_width));
        }
        Ok(Self {
            bit_width,
            buf: Vec::new(),
            literals: Vec::with_capacity(GROUP_LEN),
            run_value: 0,
            run_len: 0,
            count: 0,
        })
    }

    #[inline]
    #[must_use]
    pub const fn bit_width(&self) -> u32 {
        self.bit_width
    }

    /// Number of values accepted so far
    #[inline]
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.count
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Append one value
    ///
    /// # Errors
    /// Returns `EncodeError::ValueTooWide` if `value` needs more than `bit_width` bits.
    #[inline]
    pub fn put(&mut self, value: u32) -> Result<(), EncodeError> {
        if value & !value_mask(self.bit_width) != 0 {
            return Err(EncodeError::ValueTooWide {
                value,
                bit_width: self.bit_width,
            });
        }
        if self.run_len > 0 && value == self.run_value && self.run_len < MAX_RUN_LEN {
            self.run_len += 1;
        } else {
            self.settle_run();
            self.run_value = value;
            self.run_len = 1;
        }
        self.count += 1;
        Ok(())
    }

    /// Append every value of `values`
    ///
    /// # Errors
    /// Stops at the first value that is too wide; earlier values stay encoded.
    pub fn extend<I: IntoIterator<Item = u32>>(&mut self, values: I) -> Result<(), EncodeError> {
        values.into_iter().try_for_each(|v| self.put(v))
    }

    /// Flush pending values and return the encoded stream
    #[must_use]
    pub fn finish(mut self) -> Vec<u8> {
        self.settle_run();
        self.flush_literals();
        self.buf
    }

    /// Move the counted repeat into either an RLE run or the literal buffer
    fn settle_run(&mut self) {
        let v = self.run_value;
        let mut len = self.run_len;
        self.run_len = 0;

        // An RLE run may only start once pending literals form whole groups
        while len > 0 && !self.literals.len().is_multiple_of(GROUP_LEN) {
            self.literals.push(v);
            len -= 1;
        }
        if len >= MIN_RLE_RUN {
            self.flush_literals();
            RunHeader::Rle { count: len }.encode(&mut self.buf);
            let bytes = v.to_le_bytes();
            self.buf.extend_from_slice(&bytes[..byte_width(self.bit_width)]);
        } else {
            self.literals.extend(std::iter::repeat_n(v, len as usize));
        }
    }

    /// Write pending literals as one bit-packed run, zero-padding the last group
    fn flush_literals(&mut self) {
        if self.literals.is_empty() {
            return;
        }
        let padded = self.literals.len().div_ceil(GROUP_LEN) * GROUP_LEN;
        self.literals.resize(padded, 0);

        for run in self.literals.chunks((MAX_RUN_LEN as usize).saturating_mul(GROUP_LEN)) {
            let groups = (run.len() / GROUP_LEN) as u32;
            RunHeader::BitPacked { groups }.encode(&mut self.buf);
            for chunk in run.chunks_exact(GROUP_LEN) {
                let mut group = [0u32; GROUP_LEN];
                group.copy_from_slice(chunk);
                pack8(&group, self.bit_width, &mut self.buf);
            }
        }
        self.literals.clear();
    }
}

/// Encode all of `values` at `bit_width`
///
/// # Errors
/// Returns `EncodeError::ValueTooWide` for the first value that does not fit.
///
/// # Panics
/// Panics if `bit_width` is outside `1..=32`.
pub fn encode(values: &[u32], bit_width: u32) -> Result<Vec<u8>, EncodeError> {
    let mut enc = Encoder::new(bit_width);
    enc.extend(values.iter().copied())?;
    Ok(enc.finish())
}
