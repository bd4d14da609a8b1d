//! xyzv binary trajectory codec.
//!
//! This module reads and writes the **xyzv binary** format: a fixed header
//! followed by `count` time-tagged position/velocity records.
//!
//! - [`byte_order`] - Byte-order adapter resolved from the header marker and
//!   used for every multi-byte field.
//! - [`precision`] - The 32/64-bit component width resolved from the header
//!   `digits` tag.
//! - [`file_header`] - The 24-byte header: magic, marker, precision, reserved
//!   slot and record count.
//! - [`sample_record`] - One record (`time`, `position`, `velocity`) and the
//!   decoding of the whole record section.
//!
//! # File layout
//!
//! ```text
//! +-----------------------------------------------------------------------------+
//! |                               HEADER (24 bytes)                             |
//! +-----------------------------------------------------------------------------+
//! | magic      [u8; 8]   | b"CELXYZV\0"                                         |
//! | byte_order u16       | 1 = little-endian, 2 = big-endian                    |
//! | digits     u16       | 32 = f32 components, 64 = f64 components             |
//! | reserved   u32       | 0 on write, preserved on round-trip                  |
//! | count      u64       | number of records                                    |
//! +-----------------------------------------------------------------------------+
//! |                               RECORD #k (k < count)                         |
//! +-----------------------------------------------------------------------------+
//! | time       f64       | dynamical time (TDB Julian date)                     |
//! | position   3 x f32/f64 | km                                                 |
//! | velocity   3 x f32/f64 | km/s                                               |
//! +-----------------------------------------------------------------------------+
//! ```
//!
//! All multi-byte fields after the magic use the order declared by the
//! marker. Record size is `8 + 6 * 4` or `8 + 6 * 8` bytes. The stream must
//! end right after the last record.
//!
//! # See also
//! * [`crate::trajectory`] - Loads a whole file and answers time queries.
use std::io::{ErrorKind, Read};

pub mod byte_order;
pub mod file_header;
pub mod precision;
pub mod sample_record;

/// Fill `buf` from `reader`, stopping early only at end of stream.
///
/// Unlike [`Read::read_exact`], a short read is not an error: the number of
/// bytes actually read is returned so callers can tell a clean end of stream
/// (0) from a cut-off field.
pub(crate) fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
