//! xyzv file header parsing and encoding.
//!
//! The header is the fixed 24-byte record opening every xyzv binary file. It
//! makes the file self-describing: the magic signature identifies the format,
//! the byte-order marker tells how every following multi-byte field is
//! encoded, and the precision tag gives the width of the position/velocity
//! components.
//!
//! # Layout
//!
//! ```text
//! Offset  Size  Field       Notes
//! 0       8     magic       b"CELXYZV\0", exact match
//! 8       2     byte_order  1 = little-endian, 2 = big-endian (in its own order)
//! 10      2     digits      32 = f32 components, 64 = f64 components
//! 12      4     reserved    written as 0, preserved when re-encoding
//! 16      8     count       number of records following the header
//! ```
//!
//! Validation is fail-fast, in field order: a bad magic is reported before
//! anything else is read, then the marker, then the precision tag.
//!
//! # See also
//! ------------
//! * [`super::sample_record`] – Records following the header.
//! * [`super::byte_order::ByteOrder`] – Adapter resolved from the marker.
use std::{fmt, io::Read};

use tracing::debug;

use super::{byte_order::ByteOrder, precision::Precision, read_full};
use crate::{
    constants::{HEADER_SIZE, XYZV_MAGIC},
    xyzv_errors::{Result, XyzvError},
};

/// In-memory representation of the xyzv header.
///
/// Every value of this type is encodable: the byte order and precision are
/// closed enums, so [`FileHeader::encode`] cannot fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    /// Byte order of every multi-byte field after the magic.
    pub byte_order: ByteOrder,
    /// Width of the position and velocity components.
    pub precision: Precision,
    /// Unused slot, kept as read.
    pub reserved: u32,
    /// Number of records following the header.
    pub count: u64,
}

impl FileHeader {
    /// Header for a new file, with the reserved slot zeroed.
    pub fn new(byte_order: ByteOrder, precision: Precision, count: u64) -> Self {
        FileHeader {
            byte_order,
            precision,
            reserved: 0,
            count,
        }
    }

    /// Size in bytes of one record at the declared precision.
    pub fn record_size(&self) -> usize {
        self.precision.record_size()
    }

    /// Total size in bytes of the record section, `None` on overflow.
    pub fn payload_size(&self) -> Option<u64> {
        self.count.checked_mul(self.record_size() as u64)
    }

    /// Decode a header from the beginning of a byte slice.
    ///
    /// Arguments
    /// -----------------
    /// * `input`: bytes starting at the beginning of the file.
    ///
    /// Return
    /// ----------
    /// * The input following the header and the decoded [`FileHeader`], or
    ///   `TruncatedHeader`, `InvalidMagic`, `UnsupportedByteOrder`,
    ///   `UnsupportedPrecision`, checked in that order.
    pub fn parse(input: &[u8]) -> Result<(&[u8], Self)> {
        let magic_len = XYZV_MAGIC.len();
        if input.len() < magic_len {
            return Err(XyzvError::TruncatedHeader {
                available: input.len(),
                expected: HEADER_SIZE,
            });
        }

        let mut magic = [0u8; 8];
        magic.copy_from_slice(&input[..magic_len]);
        if magic != XYZV_MAGIC {
            return Err(XyzvError::InvalidMagic(magic));
        }

        if input.len() < HEADER_SIZE {
            return Err(XyzvError::TruncatedHeader {
                available: input.len(),
                expected: HEADER_SIZE,
            });
        }

        let marker = [input[magic_len], input[magic_len + 1]];
        let byte_order =
            ByteOrder::from_marker(marker).ok_or(XyzvError::UnsupportedByteOrder(marker))?;

        let (rest, (digits, reserved, count)) = parse_fields(byte_order, &input[magic_len + 2..])
            .map_err(|_| XyzvError::TruncatedHeader {
                available: input.len(),
                expected: HEADER_SIZE,
            })?;

        let precision =
            Precision::from_digits(digits).ok_or(XyzvError::UnsupportedPrecision(digits))?;

        Ok((
            rest,
            FileHeader {
                byte_order,
                precision,
                reserved,
                count,
            },
        ))
    }

    /// Read and decode the header from a stream.
    ///
    /// The magic signature is read and checked first; when it does not match,
    /// no byte past it is consumed from `reader`.
    ///
    /// Arguments
    /// -----------------
    /// * `reader`: stream positioned at the beginning of the file.
    ///
    /// Return
    /// ----------
    /// * The decoded header, the same errors as [`Self::parse`], or `Io` when
    ///   the stream itself fails.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut buffer = [0u8; HEADER_SIZE];
        let magic_len = XYZV_MAGIC.len();

        let read = read_full(reader, &mut buffer[..magic_len])?;
        if read < magic_len {
            return Err(XyzvError::TruncatedHeader {
                available: read,
                expected: HEADER_SIZE,
            });
        }
        if buffer[..magic_len] != XYZV_MAGIC {
            return Self::parse(&buffer[..magic_len]).map(|(_, header)| header);
        }

        let read = magic_len + read_full(reader, &mut buffer[magic_len..])?;
        let (_, header) = Self::parse(&buffer[..read])?;

        debug!(
            byte_order = %header.byte_order,
            precision = %header.precision,
            count = header.count,
            "decoded xyzv header"
        );
        Ok(header)
    }

    /// Encode the header into its 24 on-disk bytes.
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut out = Vec::with_capacity(HEADER_SIZE);
        self.encode_into(&mut out);

        let mut bytes = [0u8; HEADER_SIZE];
        bytes.copy_from_slice(&out);
        bytes
    }

    /// Append the encoded header to `out`.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&XYZV_MAGIC);
        out.extend_from_slice(&self.byte_order.marker_bytes());
        self.byte_order.write(self.precision.digits(), out);
        self.byte_order.write(self.reserved, out);
        self.byte_order.write(self.count, out);
    }
}

fn parse_fields(order: ByteOrder, input: &[u8]) -> nom::IResult<&[u8], (u16, u32, u64)> {
    let (input, digits) = order.read::<u16>(input)?;
    let (input, reserved) = order.read::<u32>(input)?;
    let (input, count) = order.read::<u64>(input)?;
    Ok((input, (digits, reserved, count)))
}

impl fmt::Display for FileHeader {
    /// Render a fixed-width table summarizing the header fields.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const LABEL_WIDTH: usize = 12;
        const VALUE_WIDTH: usize = 40;

        let border = format!(
            "+{:-<label$}+{:-<value$}+",
            "",
            "",
            label = LABEL_WIDTH + 1,
            value = VALUE_WIDTH + 1
        );

        let rows = [
            ("Byte Order", self.byte_order.to_string()),
            (
                "Precision",
                format!("{} ({} digits)", self.precision, self.precision.digits()),
            ),
            ("Reserved", self.reserved.to_string()),
            (
                "Records",
                format!("{} x {} bytes", self.count, self.record_size()),
            ),
        ];

        writeln!(f, "{border}")?;
        writeln!(
            f,
            "| {:<label$}| {:<value$}|",
            "xyzv Header",
            "",
            label = LABEL_WIDTH,
            value = VALUE_WIDTH
        )?;
        writeln!(f, "{border}")?;
        for (label, value) in rows {
            writeln!(
                f,
                "| {:<label$}| {:<value$}|",
                label,
                value,
                label = LABEL_WIDTH,
                value = VALUE_WIDTH
            )?;
        }
        writeln!(f, "{border}")
    }
}
