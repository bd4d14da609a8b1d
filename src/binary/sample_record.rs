//! xyzv record decoding and encoding.
//!
//! A record is one time-tagged state of the body:
//!
//! ```text
//! time      f64                 always 64-bit, whatever the precision tag
//! position  3 x f32 | 3 x f64   km
//! velocity  3 x f32 | 3 x f64   km/s
//! ```
//!
//! Components are widened to `f64` in memory. Encoding at 32-bit precision
//! narrows them again, so a value that went through a 32-bit file decodes to
//! the same `f32`-rounded number every time. No physical plausibility check is
//! made: NaN and infinities pass through unchanged. A 32-bit NaN is widened and
//! narrowed through its bit pattern, so its sign, quiet bit and payload
//! survive, signaling NaNs included.
use std::io::Read;

use nalgebra::Vector3;
use nom::IResult;

use super::{byte_order::ByteOrder, file_header::FileHeader, precision::Precision, read_full};
use crate::{
    constants::MAX_PREALLOCATED_SAMPLES,
    xyzv_errors::{Result, XyzvError},
};

/// One trajectory sample: a time and the body state at that time.
///
/// `time` is a dynamical time (TDB Julian date by convention), `position` is in
/// kilometers and `velocity` in kilometers per second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub time: f64,
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
}

impl Sample {
    pub fn new(time: f64, position: Vector3<f64>, velocity: Vector3<f64>) -> Self {
        Sample {
            time,
            position,
            velocity,
        }
    }

    /// Decode one record from the beginning of `input`.
    ///
    /// Arguments
    /// -----------------
    /// * `input`: bytes starting at the record.
    /// * `order`: byte order declared by the file header.
    /// * `precision`: component width declared by the file header.
    ///
    /// Return
    /// ----------
    /// * The remaining input and the decoded sample; a nom `Eof` error when
    ///   `input` is shorter than [`Precision::record_size`].
    pub fn parse(input: &[u8], order: ByteOrder, precision: Precision) -> IResult<&[u8], Self> {
        let (input, time) = order.read::<f64>(input)?;
        let (input, position) = parse_vector(input, order, precision)?;
        let (input, velocity) = parse_vector(input, order, precision)?;
        Ok((input, Sample::new(time, position, velocity)))
    }

    /// Append the encoded record to `out`.
    pub fn encode_into(&self, order: ByteOrder, precision: Precision, out: &mut Vec<u8>) {
        order.write(self.time, out);
        for component in self.position.iter().chain(self.velocity.iter()) {
            match precision {
                Precision::Float32 => order.write(narrow(*component), out),
                Precision::Float64 => order.write(*component, out),
            }
        }
    }

    /// Encode the record into a new buffer of [`Precision::record_size`] bytes.
    pub fn encode(&self, order: ByteOrder, precision: Precision) -> Vec<u8> {
        let mut out = Vec::with_capacity(precision.record_size());
        self.encode_into(order, precision, &mut out);
        out
    }

    /// Read and decode one record from a stream.
    ///
    /// `index` is only used to report which record was cut short.
    pub fn read_from<R: Read>(
        reader: &mut R,
        order: ByteOrder,
        precision: Precision,
        index: u64,
    ) -> Result<Self> {
        let mut buffer = [0u8; Precision::Float64.record_size()];
        let record = &mut buffer[..precision.record_size()];
        let read = read_full(reader, record)?;
        if read < record.len() {
            return Err(XyzvError::TruncatedRecord { index });
        }
        decode_record(record, order, precision, index)
    }
}

fn parse_vector(
    input: &[u8],
    order: ByteOrder,
    precision: Precision,
) -> IResult<&[u8], Vector3<f64>> {
    let mut components = [0.0f64; 3];
    let mut input = input;
    for slot in &mut components {
        let (rest, value) = match precision {
            Precision::Float32 => order
                .read::<f32>(input)
                .map(|(rest, v)| (rest, widen(v)))?,
            Precision::Float64 => order.read::<f64>(input)?,
        };
        *slot = value;
        input = rest;
    }
    Ok((input, Vector3::from(components)))
}

const F32_MANTISSA: u32 = 0x007f_ffff;
const F32_EXPONENT: u32 = 0x7f80_0000;
const F64_EXPONENT: u64 = 0x7ff0_0000_0000_0000;
/// Mantissa width difference between `f64` (52 bits) and `f32` (23 bits).
const MANTISSA_SHIFT: u32 = 29;

/// `f32` to `f64`; NaN bits are moved field by field instead of going through
/// the FPU, which would quiet a signaling NaN.
fn widen(value: f32) -> f64 {
    if !value.is_nan() {
        return f64::from(value);
    }
    let bits = value.to_bits();
    let sign = u64::from(bits >> 31) << 63;
    let mantissa = u64::from(bits & F32_MANTISSA) << MANTISSA_SHIFT;
    f64::from_bits(sign | F64_EXPONENT | mantissa)
}

/// Inverse of [`widen`] for NaN, plain rounding otherwise.
fn narrow(value: f64) -> f32 {
    if !value.is_nan() {
        return value as f32;
    }
    let bits = value.to_bits();
    let sign = ((bits >> 63) as u32) << 31;
    let mantissa = ((bits >> MANTISSA_SHIFT) as u32) & F32_MANTISSA;
    // payload only in the dropped low bits: keep it a NaN
    let mantissa = if mantissa == 0 { 1 << 22 } else { mantissa };
    f32::from_bits(sign | F32_EXPONENT | mantissa)
}

fn decode_record(
    record: &[u8],
    order: ByteOrder,
    precision: Precision,
    index: u64,
) -> Result<Sample> {
    Sample::parse(record, order, precision)
        .map(|(_, sample)| sample)
        .map_err(|_| XyzvError::TruncatedRecord { index })
}

/// Decode exactly `header.count` records from a stream.
///
/// Records are consumed strictly in file order. The stream must end right
/// after the last declared record.
///
/// Arguments
/// -----------------
/// * `reader`: stream positioned right after the header.
/// * `header`: the decoded file header.
///
/// Return
/// ----------
/// * The decoded samples, or
///   * `RecordCountMismatch` when the stream ends on a record boundary before
///     `count` records, or holds bytes after the last one (then `found` is
///     `count + 1`, a lower bound: trailing data is not read to its end),
///   * `TruncatedRecord` when it ends in the middle of a record,
///   * `Io` when the stream itself fails.
pub fn decode_all<R: Read>(reader: &mut R, header: &FileHeader) -> Result<Vec<Sample>> {
    let record_size = header.record_size();
    let capacity = usize::try_from(header.count)
        .unwrap_or(usize::MAX)
        .min(MAX_PREALLOCATED_SAMPLES);
    let mut samples = Vec::with_capacity(capacity);
    let mut buffer = vec![0u8; record_size];

    for index in 0..header.count {
        let read = read_full(reader, &mut buffer)?;
        if read == 0 {
            return Err(XyzvError::RecordCountMismatch {
                expected: header.count,
                found: index,
            });
        }
        if read < record_size {
            return Err(XyzvError::TruncatedRecord { index });
        }
        samples.push(decode_record(
            &buffer,
            header.byte_order,
            header.precision,
            index,
        )?);
    }

    // one extra byte is enough to reject the stream; the rest is not scanned
    let trailing = read_full(reader, &mut buffer[..1])?;
    if trailing > 0 {
        return Err(XyzvError::RecordCountMismatch {
            expected: header.count,
            found: header.count.saturating_add(1),
        });
    }

    Ok(samples)
}
