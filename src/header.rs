//! Run headers and run-level inspection of an encoded stream.

use crate::constants::{byte_width, is_valid_bit_width, GROUP_LEN, MAX_RUN_LEN};
use crate::error::{ConfigError, DecodeError, RunKind, Section};
use crate::varint;

/// Decoded run header
///
/// On the wire a header is `varint(count << 1)` for RLE runs and
/// `varint(groups << 1 | 1)` for bit-packed runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunHeader {
    /// `count` repeats of one fixed-width value
    Rle { count: u32 },
    /// `groups` groups of 8 bit-packed values
    BitPacked { groups: u32 },
}

impl RunHeader {
    /// Parse the header at `offset`, returning it and the bytes consumed
    ///
    /// # Errors
    /// * `Truncated` / `MalformedVarint` from the varint
    /// * `EmptyRun` if the header declares zero values or groups
    pub fn parse(buf: &[u8], offset: usize) -> Result<(Self, usize), DecodeError> {
        let (h, n) = varint::read_u32(buf, offset)?;
        let len = h >> 1;
        let header = if h & 1 == 1 {
            Self::BitPacked { groups: len }
        } else {
            Self::Rle { count: len }
        };
        if len == 0 {
            return Err(DecodeError::EmptyRun {
                kind: header.kind(),
                offset,
            });
        }
        Ok((header, n))
    }

    /// Append this header's varint to `out`
    ///
    /// # Panics
    /// Panics if the run length exceeds `u32::MAX >> 1`.
    pub fn encode(self, out: &mut Vec<u8>) -> usize {
        let h = match self {
            Self::Rle { count } => {
                assert!(count <= MAX_RUN_LEN, "run length {count} does not fit a header");
                count << 1
            }
            Self::BitPacked { groups } => {
                assert!(groups <= MAX_RUN_LEN, "group count {groups} does not fit a header");
                (groups << 1) | 1
            }
        };
        varint::write_u32(h, out)
    }

    #[must_use]
    pub const fn kind(self) -> RunKind {
        match self {
            Self::Rle { .. } => RunKind::Rle,
            Self::BitPacked { .. } => RunKind::BitPacked,
        }
    }

    /// Number of values the run yields (bit-packed runs include group padding)
    #[must_use]
    pub const fn value_count(self) -> u64 {
        match self {
            Self::Rle { count } => count as u64,
            Self::BitPacked { groups } => groups as u64 * GROUP_LEN as u64,
        }
    }

    /// Payload bytes following the header at this bit width
    #[must_use]
    pub const fn payload_len(self, bit_width: u32) -> u64 {
        match self {
            Self::Rle { .. } => byte_width(bit_width) as u64,
            Self::BitPacked { groups } => groups as u64 * bit_width as u64,
        }
    }
}

/// One run located in an encoded stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSpan<'a> {
    /// Offset of the header's first byte
    pub offset: usize,
    pub header: RunHeader,
    /// Bytes taken by the header varint
    pub header_len: usize,
    /// Payload bytes: the repeated value or the packed groups
    pub payload: &'a [u8],
}

/// Iterator over the runs of a stream, see [`runs`]
#[derive(Debug, Clone)]
pub struct Runs<'a> {
    buf: &'a [u8],
    bit_width: u32,
    pos: usize,
    failed: bool,
}

/// Walk the runs of `buf` without decoding values
///
/// The iterator yields an error and stops at the first malformed header or
/// short payload.
///
/// # Errors
/// Returns `ConfigError::InvalidBitWidth` if `bit_width` is outside `1..=32`.
pub fn runs(buf: &[u8], bit_width: u32) -> Result<Runs<'_>, ConfigError> {
    if !is_valid_bit_width(bit_width) {
        return Err(ConfigError::InvalidBitWidth(bit_width));
    }
    Ok(Runs {
        buf,
        bit_width,
        pos: 0,
        failed: false,
    })
}

impl<'a> Runs<'a> {
    fn read_span(&mut self) -> Result<RunSpan<'a>, DecodeError> {
        let offset = self.pos;
        let (header, header_len) = RunHeader::parse(self.buf, offset)?;
        let start = offset + header_len;
        let available = self.buf.len() - start;
        let section = match header {
            RunHeader::Rle { .. } => Section::RleValue,
            RunHeader::BitPacked { .. } => Section::BitPackedGroup,
        };
        let needed = header.payload_len(self.bit_width);
        if needed > available as u64 {
            return Err(DecodeError::Truncated {
                section,
                offset: start,
                needed: usize::try_from(needed).unwrap_or(usize::MAX),
                available,
            });
        }
        let end = start + needed as usize;
        self.pos = end;
        Ok(RunSpan {
            offset,
            header,
            header_len,
            payload: &self.buf[start..end],
        })
    }
}

impl<'a> Iterator for Runs<'a> {
    type Item = Result<RunSpan<'a>, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.buf.len() {
            return None;
        }
        let span = self.read_span();
        self.failed = span.is_err();
        Some(span)
    }
}
