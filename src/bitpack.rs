//! Width-specialized packing of 8-value groups.
//!
//! A group of 8 values at bit width `W` occupies exactly `W` bytes. Values are
//! stored LSB-first and run contiguously across byte boundaries, so value `i`
//! starts at bit `i * W` of the group.
//!
//! Unpacking is monomorphized per width through a const generic and picked once
//! from [`UNPACKERS`], so the per-group call is a plain function pointer.

use crate::constants::{is_valid_bit_width, value_mask, GROUP_LEN};

/// Unpacks one group: takes exactly `bit_width` bytes, returns 8 zero-extended values
///
/// Panics if given fewer than `bit_width` bytes.
pub type Unpack8 = fn(&[u8]) -> [u32; GROUP_LEN];

/// Unpack 8 `W`-bit values from `packed` (must be exactly `W` bytes)
#[inline]
fn unpack8<const W: usize>(packed: &[u8]) -> [u32; GROUP_LEN] {
    debug_assert_eq!(packed.len(), W, "group must be exactly bit_width bytes");
    let mask = u64::from(value_mask(W as u32));
    let mut out = [0u32; GROUP_LEN];
    for (i, slot) in out.iter_mut().enumerate() {
        let bit = i * W;
        let start = bit / 8;
        // (bit + W) / 8 rounded up never exceeds W for i < 8
        let end = (bit + W).div_ceil(8);
        let mut word = 0u64;
        for (k, &b) in packed[start..end].iter().enumerate() {
            word |= u64::from(b) << (8 * k);
        }
        *slot = ((word >> (bit % 8)) & mask) as u32;
    }
    out
}

macro_rules! unpackers {
    ($($w:literal),+) => {
        [$(unpack8::<$w> as Unpack8),+]
    };
}

/// Unpack functions indexed by `bit_width - 1`
static UNPACKERS: [Unpack8; 32] = unpackers!(
    1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26,
    27, 28, 29, 30, 31, 32
);

/// Select the unpacker for `bit_width`
///
/// Returns `None` outside `1..=32`.
#[must_use]
pub fn unpacker_for(bit_width: u32) -> Option<Unpack8> {
    if is_valid_bit_width(bit_width) {
        Some(UNPACKERS[bit_width as usize - 1])
    } else {
        None
    }
}

/// Pack 8 values into `bit_width` bytes appended to `out`
///
/// Bits above `bit_width` in each value are discarded.
pub fn pack8(values: &[u32; GROUP_LEN], bit_width: u32, out: &mut Vec<u8>) {
    debug_assert!(is_valid_bit_width(bit_width));
    let w = bit_width as usize;
    let mask = u64::from(value_mask(bit_width));
    let start = out.len();
    out.resize(start + w, 0);
    let group = &mut out[start..];

    for (i, &v) in values.iter().enumerate() {
        let bit = i * w;
        let mut word = (u64::from(v) & mask) << (bit % 8);
        let mut idx = bit / 8;
        while word != 0 {
            group[idx] |= word as u8;
            word >>= 8;
            idx += 1;
        }
    }
}
