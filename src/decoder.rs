//! Decoding functionality for hybrid RLE / bit-packed streams.

use log::{debug, trace};

use crate::bitpack::{unpacker_for, Unpack8};
use crate::constants::{byte_width, GROUP_LEN};
use crate::error::{ConfigError, DecodeError, Section};
use crate::header::RunHeader;

/// Run currently being consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Run {
    /// A header must be parsed before the next value
    Idle,
    /// `remaining > 0` repeats of `value`
    Rle { remaining: u32, value: i32 },
    /// Bit-packed groups; `group` holds the unpacked values when `group_pos > 0`
    BitPacked {
        groups_remaining: u32,
        group_pos: u8,
        group: [i32; GROUP_LEN],
    },
}

/// Stateful decoder for one bit width
///
/// Construct once per bit width, then [`init`](Decoder::init) it with each
/// buffer to decode. Values come out one at a time in encoding order; the
/// stream carries no length, so the caller decides how many to request.
///
/// # Example
/// ```
/// use rlebp::Decoder;
///
/// // RLE run: 4 repeats of 7, at bit width 3
/// let buf = [4 << 1, 7];
/// let mut dec = Decoder::new(3);
/// dec.init(&buf);
/// for _ in 0..4 {
///     assert_eq!(dec.next().unwrap(), 7);
/// }
/// assert!(dec.next().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    bit_width: u32,
    byte_width: usize,
    unpack: Unpack8,
    buf: &'a [u8],
    pos: usize,
    run: Run,
}

impl<'a> Decoder<'a> {
    /// Create a decoder for `bit_width`
    ///
    /// # Panics
    /// Panics if `bit_width` is outside `1..=32`; an invalid width is a caller bug.
    /// Use [`try_new`](Decoder::try_new) when the width comes from untrusted metadata.
    #[must_use]
    pub fn new(bit_width: u32) -> Self {
        match Self::try_new(bit_width) {
            Ok(d) => d,
            Err(e) => panic!("{e}"),
        }
    }

    /// Create a decoder for `bit_width`
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidBitWidth` if `bit_width` is outside `1..=32`.
    pub fn try_new(bit_width: u32) -> Result<Self, ConfigError> {
        let unpack = unpacker_for(bit_width).ok_or(ConfigError::InvalidBitWidth(bit_width))?;
        Ok(Self {
            bit_width,
            byte_width: byte_width(bit_width),
            unpack,
            buf: &[],
            pos: 0,
            run: Run::Idle,
        })
    }

    /// Rebind to a new buffer
    ///
    /// Resets the position and discards any unfinished run.
    #[inline]
    pub fn init(&mut self, buf: &'a [u8]) {
        self.buf = buf;
        self.pos = 0;
        self.run = Run::Idle;
    }

    #[inline]
    #[must_use]
    pub const fn bit_width(&self) -> u32 {
        self.bit_width
    }

    /// Bytes per RLE repeated value: `ceil(bit_width / 8)`
    #[inline]
    #[must_use]
    pub const fn byte_width(&self) -> usize {
        self.byte_width
    }

    /// Read offset into the current buffer
    #[inline]
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Bytes not yet consumed
    #[inline]
    #[must_use]
    pub const fn remaining_bytes(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Whether a run is partially consumed
    #[inline]
    #[must_use]
    pub const fn has_active_run(&self) -> bool {
        !matches!(self.run, Run::Idle)
    }

    /// Decode the next value
    ///
    /// # Errors
    /// * `Truncated` if the buffer ends inside a header, RLE value or group
    /// * `EmptyRun` if a header declares a zero-length run
    /// * `MalformedVarint` if a header varint is invalid
    ///
    /// Nothing past the last complete header is committed on failure, so a retry
    /// fails the same way.
    #[allow(clippy::should_implement_trait)]
    #[inline]
    pub fn next(&mut self) -> Result<i32, DecodeError> {
        if self.run == Run::Idle {
            self.read_run_header()?;
        }

        match &mut self.run {
            Run::Rle { remaining, value } => {
                let v = *value;
                *remaining -= 1;
                if *remaining == 0 {
                    self.run = Run::Idle;
                }
                Ok(v)
            }
            Run::BitPacked {
                groups_remaining,
                group_pos,
                group,
            } => {
                if *group_pos == 0 {
                    if *groups_remaining == 0 {
                        return Err(DecodeError::InternalFault {
                            state: "bit-packed run with no groups left",
                        });
                    }
                    *group = Self::read_group(self.unpack, self.buf, &mut self.pos, self.bit_width)?;
                    *groups_remaining -= 1;
                }
                let v = group[usize::from(*group_pos)];
                *group_pos = (*group_pos + 1) % GROUP_LEN as u8;
                if *group_pos == 0 && *groups_remaining == 0 {
                    self.run = Run::Idle;
                }
                Ok(v)
            }
            Run::Idle => Err(DecodeError::InternalFault {
                state: "no active run after header",
            }),
        }
    }

    /// Fill `out` with the next values, returning how many were written
    ///
    /// A count below `out.len()` means decoding stopped early: `out[..n]` holds
    /// valid values and the next call reports the error, since failed reads
    /// commit nothing.
    ///
    /// # Errors
    /// Same as [`next`](Decoder::next), when not even the first value can be
    /// decoded.
    pub fn next_batch(&mut self, out: &mut [i32]) -> Result<usize, DecodeError> {
        let mut filled = 0;
        while filled < out.len() {
            match &mut self.run {
                Run::Rle { remaining, value } => {
                    let take = (*remaining as usize).min(out.len() - filled);
                    out[filled..filled + take].fill(*value);
                    filled += take;
                    *remaining -= take as u32;
                    if *remaining == 0 {
                        self.run = Run::Idle;
                    }
                }
                Run::BitPacked {
                    groups_remaining,
                    group_pos,
                    group,
                } if *group_pos > 0 => {
                    let start = usize::from(*group_pos);
                    let take = (GROUP_LEN - start).min(out.len() - filled);
                    out[filled..filled + take].copy_from_slice(&group[start..start + take]);
                    filled += take;
                    *group_pos = ((start + take) % GROUP_LEN) as u8;
                    if *group_pos == 0 && *groups_remaining == 0 {
                        self.run = Run::Idle;
                    }
                }
                _ => match self.next() {
                    Ok(v) => {
                        out[filled] = v;
                        filled += 1;
                    }
                    Err(e) if filled == 0 => return Err(e),
                    Err(e) => {
                        trace!("rle: batch stopped after {filled} values: {e}");
                        break;
                    }
                },
            }
        }
        Ok(filled)
    }

    /// Skip `n` values
    ///
    /// Whole bit-packed groups are stepped over without unpacking, but their
    /// bytes must still be present.
    ///
    /// # Errors
    /// Same as [`next`](Decoder::next).
    pub fn skip(&mut self, mut n: usize) -> Result<(), DecodeError> {
        while n > 0 {
            match &mut self.run {
                Run::Idle => self.read_run_header()?,
                Run::Rle { remaining, .. } => {
                    let take = (*remaining as usize).min(n);
                    *remaining -= take as u32;
                    n -= take;
                    if *remaining == 0 {
                        self.run = Run::Idle;
                    }
                }
                Run::BitPacked {
                    groups_remaining,
                    group_pos,
                    ..
                } => {
                    if *group_pos == 0 && n >= GROUP_LEN && *groups_remaining > 0 {
                        let whole = (n / GROUP_LEN).min(*groups_remaining as usize);
                        let bytes = whole * self.bit_width as usize;
                        let available = self.buf.len() - self.pos;
                        if bytes > available {
                            return Err(DecodeError::Truncated {
                                section: Section::BitPackedGroup,
                                offset: self.pos,
                                needed: bytes,
                                available,
                            });
                        }
                        self.pos += bytes;
                        *groups_remaining -= whole as u32;
                        n -= whole * GROUP_LEN;
                        if *groups_remaining == 0 {
                            self.run = Run::Idle;
                        }
                    } else {
                        self.next()?;
                        n -= 1;
                    }
                }
            }
        }
        Ok(())
    }

    /// Parse the header at `pos` and start its run
    ///
    /// Position and run state are only committed once the header and, for RLE,
    /// its value were read in full.
    fn read_run_header(&mut self) -> Result<(), DecodeError> {
        let (header, n) = RunHeader::parse(self.buf, self.pos).inspect_err(|e| {
            debug!("rle: failed to read run header at offset {}: {e}", self.pos);
        })?;
        let start = self.pos + n;

        self.run = match header {
            RunHeader::BitPacked { groups } => {
                trace!("rle: bit-packed run of {groups} groups at offset {}", self.pos);
                self.pos = start;
                Run::BitPacked {
                    groups_remaining: groups,
                    group_pos: 0,
                    group: [0; GROUP_LEN],
                }
            }
            RunHeader::Rle { count } => {
                let value = self.read_rle_value(start)?;
                trace!("rle: RLE run of {count} x {value} at offset {}", self.pos);
                self.pos = start + self.byte_width;
                Run::Rle {
                    remaining: count,
                    value,
                }
            }
        };
        Ok(())
    }

    /// Read the little-endian repeated value at `offset`, zero-extended to 32 bits
    fn read_rle_value(&self, offset: usize) -> Result<i32, DecodeError> {
        let end = offset + self.byte_width;
        let Some(b) = self.buf.get(offset..end) else {
            debug!("rle: cannot read run value at offset {offset} (not enough data)");
            return Err(DecodeError::Truncated {
                section: Section::RleValue,
                offset,
                needed: self.byte_width,
                available: self.buf.len().saturating_sub(offset),
            });
        };
        let v = match *b {
            [b0] => u32::from(b0),
            [b0, b1] => u32::from(u16::from_le_bytes([b0, b1])),
            [b0, b1, b2] => u32::from(b0) | u32::from(b1) << 8 | u32::from(b2) << 16,
            [b0, b1, b2, b3] => u32::from_le_bytes([b0, b1, b2, b3]),
            _ => {
                return Err(DecodeError::InternalFault {
                    state: "byte width outside 1..=4",
                })
            }
        };
        Ok(v as i32)
    }

    /// Unpack the group at `pos` and advance past it
    #[inline]
    fn read_group(
        unpack: Unpack8,
        buf: &[u8],
        pos: &mut usize,
        bit_width: u32,
    ) -> Result<[i32; GROUP_LEN], DecodeError> {
        let end = *pos + bit_width as usize;
        let Some(packed) = buf.get(*pos..end) else {
            debug!("rle: cannot read bit-packed group at offset {pos} (not enough data)");
            return Err(DecodeError::Truncated {
                section: Section::BitPackedGroup,
                offset: *pos,
                needed: bit_width as usize,
                available: buf.len() - *pos,
            });
        };
        *pos = end;
        Ok(unpack(packed).map(|v| v as i32))
    }
}

/// Decode exactly `count` values from `buf`
///
/// # Errors
/// Returns an error if `buf` holds fewer than `count` values or is malformed.
///
/// # Panics
/// Panics if `bit_width` is outside `1..=32`.
///
/// # Example
/// ```
/// use rlebp::{decode, Encoder};
///
/// let mut enc = Encoder::new(5);
/// enc.extend([1, 2, 3, 3, 3]).unwrap();
/// let bytes = enc.finish();
/// assert_eq!(decode(&bytes, 5, 5).unwrap(), vec![1, 2, 3, 3, 3]);
/// ```
pub fn decode(buf: &[u8], bit_width: u32, count: usize) -> Result<Vec<i32>, DecodeError> {
    let mut dec = Decoder::new(bit_width);
    dec.init(buf);
    let mut out = vec![0; count];
    let mut filled = 0;
    while filled < count {
        filled += dec.next_batch(&mut out[filled..])?;
    }
    Ok(out)
}
