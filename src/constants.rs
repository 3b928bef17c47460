//! Internal constants and helper functions for the hybrid encoding.

/// Smallest supported bit width
pub(crate) const MIN_BIT_WIDTH: u32 = 1;

/// Largest supported bit width (values are 32-bit payloads)
pub(crate) const MAX_BIT_WIDTH: u32 = 32;

/// Number of values in one bit-packed group
pub(crate) const GROUP_LEN: usize = 8;

/// A u32 ULEB128 never needs more than 5 bytes (5 * 7 = 35 bits)
pub(crate) const MAX_VARINT_LEN: usize = 5;

/// Largest run length that still fits a header once shifted left by one
pub(crate) const MAX_RUN_LEN: u32 = u32::MAX >> 1;

/// Shortest repeat the encoder emits as an RLE run
pub(crate) const MIN_RLE_RUN: u32 = 8;

/// Bytes used by an RLE repeated value: `ceil(bit_width / 8)`
#[inline]
pub(crate) const fn byte_width(bit_width: u32) -> usize {
    bit_width.div_ceil(8) as usize
}

/// Whether `bit_width` is in the supported `1..=32` range
#[inline]
pub(crate) const fn is_valid_bit_width(bit_width: u32) -> bool {
    bit_width >= MIN_BIT_WIDTH && bit_width <= MAX_BIT_WIDTH
}

/// Mask covering the low `bit_width` bits
#[inline]
pub(crate) const fn value_mask(bit_width: u32) -> u32 {
    if bit_width >= 32 {
        u32::MAX
    } else {
        (1u32 << bit_width) - 1
    }
}
