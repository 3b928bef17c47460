//! `rlebp` - Decoder for the RLE / bit-packing hybrid encoding
//!
//! The hybrid encoding stores a sequence of fixed-bit-width unsigned integers
//! as a series of runs. Repeated values collapse into RLE runs; everything else
//! is bit-packed in groups of 8. Columnar formats such as Parquet use it for
//! definition/repetition levels and dictionary indices.
//!
//! # Example
//! ```
//! use rlebp::{Decoder, Encoder};
//!
//! let bit_width = 3;
//! let mut enc = Encoder::new(bit_width);
//! enc.extend([1, 2, 3, 4, 5, 6, 7, 0]).unwrap();
//! enc.extend(std::iter::repeat_n(5, 20)).unwrap();
//! let bytes = enc.finish();
//!
//! let mut dec = Decoder::new(bit_width);
//! dec.init(&bytes);
//! assert_eq!(dec.next().unwrap(), 1);
//! dec.skip(7).unwrap();
//! assert_eq!(dec.next().unwrap(), 5);
//! ```
//!
//! # Wire Format
//!
//! ```text
//! stream        := run*
//! run           := bitpacked-run | rle-run
//! bitpacked-run := varint(groups << 1 | 1) group{groups}
//! rle-run       := varint(count << 1) value
//! ```
//!
//! | Element | Size | Description |
//! |---------|------|-------------|
//! | varint | 1-5 bytes | Unsigned LEB128, 7 payload bits per byte, high bit continues. At most `u32::MAX`. |
//! | group | `bit_width` bytes | 8 values of `bit_width` bits, LSB-first, contiguous across bytes |
//! | value | `ceil(bit_width / 8)` bytes | Little-endian repeated value |
//!
//! The low bit of the header selects the run type. A header declaring zero
//! values or zero groups is invalid.
//!
//! The stream has no overall length or terminator: the caller must know how
//! many values to request. Bit-packed runs always hold a multiple of 8 values,
//! so the last run may carry padding past the real count.
//!
//! # Supported Ranges
//! - Bit widths: 1-32
//! - Values: unsigned payloads up to 32 bits, returned as `i32` without sign extension
//! - Run lengths: up to `u32::MAX >> 1` values (RLE) or groups (bit-packed)

#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]

mod bitpack;
mod constants;
mod decoder;
mod encoder;
mod error;
mod header;
mod varint;


// Re-export public API
pub use bitpack::{pack8, unpacker_for, Unpack8};
pub use decoder::{decode, Decoder};
pub use encoder::{encode, Encoder};
pub use error::{ConfigError, DecodeError, EncodeError, ErrorKind, RunKind, Section};
pub use header::{runs, RunHeader, RunSpan, Runs};
pub use varint::{read_u32 as read_varint, write_u32 as write_varint};
