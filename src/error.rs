//! Error types for hybrid RLE / bit-packing encoding and decoding.

use std::fmt;

/// Error returned when a decoder or encoder is configured with an unsupported bit width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Bit width outside `1..=32`
    InvalidBitWidth(u32),
}

/// Part of the stream a truncated read was trying to consume
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Varint run header
    Header,
    /// Fixed-width repeated value of an RLE run
    RleValue,
    /// One group of 8 bit-packed values
    BitPackedGroup,
}

/// The two run types of the hybrid encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    /// Repeated-value run
    Rle,
    /// Run of bit-packed groups
    BitPacked,
}

/// Error returned when decoding fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Buffer ends before a header, RLE value or bit-packed group is complete
    Truncated {
        section: Section,
        offset: usize,
        needed: usize,
        available: usize,
    },
    /// Header declares a run of zero values
    EmptyRun { kind: RunKind, offset: usize },
    /// Varint header never terminates or exceeds `u32::MAX`
    MalformedVarint { offset: usize },
    /// Decoder reached a state its own bookkeeping should never produce
    InternalFault { state: &'static str },
}

/// Field-less classification of [`DecodeError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Truncated,
    EmptyRun,
    MalformedVarint,
    InternalFault,
}

impl DecodeError {
    /// Stable classification of this error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Truncated { .. } => ErrorKind::Truncated,
            Self::EmptyRun { .. } => ErrorKind::EmptyRun,
            Self::MalformedVarint { .. } => ErrorKind::MalformedVarint,
            Self::InternalFault { .. } => ErrorKind::InternalFault,
        }
    }

    /// Whether the error was caused by the input bytes rather than decoder state
    #[must_use]
    pub const fn is_data_error(&self) -> bool {
        !matches!(self, Self::InternalFault { .. })
    }
}

/// Error returned when encoding a value fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    /// Value needs more bits than the encoder's bit width
    ValueTooWide { value: u32, bit_width: u32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBitWidth(w) => write!(f, "invalid bit width {w}, must be in 1..=32"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Header => f.write_str("run header"),
            Self::RleValue => f.write_str("RLE run value"),
            Self::BitPackedGroup => f.write_str("bit-packed group"),
        }
    }
}

impl fmt::Display for RunKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rle => f.write_str("RLE"),
            Self::BitPacked => f.write_str("bit-packed"),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated {
                section,
                offset,
                needed,
                available,
            } => {
                write!(
                    f,
                    "cannot read {section} at offset {offset}: need {needed} bytes, {available} available"
                )
            }
            Self::EmptyRun { kind, offset } => write!(f, "empty {kind} run at offset {offset}"),
            Self::MalformedVarint { offset } => {
                write!(f, "malformed run header varint at offset {offset}")
            }
            Self::InternalFault { state } => write!(f, "internal decoder fault: {state}"),
        }
    }
}

impl std::error::Error for DecodeError {}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValueTooWide { value, bit_width } => {
                write!(f, "value {value} does not fit in {bit_width} bits")
            }
        }
    }
}

impl std::error::Error for EncodeError {}
