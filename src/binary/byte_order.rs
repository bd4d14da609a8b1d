//! Byte-order adapter for xyzv binary files.
//!
//! The file header declares the byte order of every multi-byte field that
//! follows it. [`ByteOrder`] is resolved once from that marker and then passed
//! to every read and write, so the swap decision lives in one place instead of
//! being repeated per field.
//!
//! Reads go through nom's endian-aware number parsers, selected from the
//! adapter's [`Endianness`]. Writes use the `to_le_bytes`/`to_be_bytes`
//! encodings. Floats keep their exact bit patterns both ways, so NaN payloads
//! survive untouched.
use std::fmt;

use nom::{
    number::{self, Endianness},
    IResult, Parser,
};

use crate::constants::{BIG_ENDIAN_MARKER, LITTLE_ENDIAN_MARKER};

/// Fixed-width numeric type that can be read from / written to a file.
pub trait WireScalar: Copy {
    /// Decode one value in `endian` order from the beginning of `input`.
    fn read_wire(endian: Endianness, input: &[u8]) -> IResult<&[u8], Self>;

    /// Append the encoding of the value in `order`.
    fn write_wire(self, order: ByteOrder, out: &mut Vec<u8>);
}

macro_rules! wire_scalar {
    ($($t:ident),*) => {
        $(
            impl WireScalar for $t {
                fn read_wire(endian: Endianness, input: &[u8]) -> IResult<&[u8], Self> {
                    number::complete::$t(endian).parse(input)
                }

                fn write_wire(self, order: ByteOrder, out: &mut Vec<u8>) {
                    match order {
                        ByteOrder::Little => out.extend_from_slice(&self.to_le_bytes()),
                        ByteOrder::Big => out.extend_from_slice(&self.to_be_bytes()),
                    }
                }
            }
        )*
    };
}

wire_scalar!(u16, u32, u64, f32, f64);

/// Byte order declared by an xyzv file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    /// Byte order of the running host.
    pub const fn native() -> Self {
        if cfg!(target_endian = "little") {
            ByteOrder::Little
        } else {
            ByteOrder::Big
        }
    }

    /// Numeric value of the header marker for this order.
    pub const fn marker(self) -> u16 {
        match self {
            ByteOrder::Little => LITTLE_ENDIAN_MARKER,
            ByteOrder::Big => BIG_ENDIAN_MARKER,
        }
    }

    /// The two marker bytes as they appear on disk.
    ///
    /// The marker is itself stored in the order it declares, which is what
    /// makes it self-describing: `01 00` is little-endian, `00 02` is big-endian.
    pub const fn marker_bytes(self) -> [u8; 2] {
        match self {
            ByteOrder::Little => LITTLE_ENDIAN_MARKER.to_le_bytes(),
            ByteOrder::Big => BIG_ENDIAN_MARKER.to_be_bytes(),
        }
    }

    /// Resolve the on-disk marker bytes, `None` when neither order matches.
    pub fn from_marker(raw: [u8; 2]) -> Option<Self> {
        if u16::from_le_bytes(raw) == LITTLE_ENDIAN_MARKER {
            Some(ByteOrder::Little)
        } else if u16::from_be_bytes(raw) == BIG_ENDIAN_MARKER {
            Some(ByteOrder::Big)
        } else {
            None
        }
    }

    /// `true` when values of this order must be swapped on this host.
    pub fn needs_swap(self) -> bool {
        self != ByteOrder::native()
    }

    /// nom endianness matching this order.
    pub const fn endianness(self) -> Endianness {
        match self {
            ByteOrder::Little => Endianness::Little,
            ByteOrder::Big => Endianness::Big,
        }
    }

    /// Read one scalar in this byte order.
    ///
    /// Arguments
    /// -----------------
    /// * `input`: byte slice starting at the scalar.
    ///
    /// Return
    /// ----------
    /// * The remaining input and the decoded value. Fails with a nom `Eof`
    ///   error when the input is shorter than the scalar.
    pub fn read<T: WireScalar>(self, input: &[u8]) -> IResult<&[u8], T> {
        T::read_wire(self.endianness(), input)
    }

    /// Append one scalar encoded in this byte order.
    pub fn write<T: WireScalar>(self, value: T, out: &mut Vec<u8>) {
        value.write_wire(self, out);
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ByteOrder::Little => write!(f, "little-endian"),
            ByteOrder::Big => write!(f, "big-endian"),
        }
    }
}
