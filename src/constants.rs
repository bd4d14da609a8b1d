//! # Constants for the xyzv binary format
//!
//! This module centralizes the **wire-format constants** of the xyzv binary
//! trajectory files and the few **unit conversions** used by the query layer.
//!
//! ## Overview
//!
//! - Magic signature, header and record sizes
//! - Byte-order markers and precision tags as written in the header
//! - Time and distance conversions (days ↔ seconds, km ↔ AU)

// -------------------------------------------------------------------------------------------------
// Wire format
// -------------------------------------------------------------------------------------------------

/// 8-byte signature opening every xyzv binary file
pub const XYZV_MAGIC: [u8; 8] = *b"CELXYZV\0";

/// Size in bytes of the fixed file header
pub const HEADER_SIZE: usize = 24;

/// Byte-order marker of a little-endian file
pub const LITTLE_ENDIAN_MARKER: u16 = 1;

/// Byte-order marker of a big-endian file
pub const BIG_ENDIAN_MARKER: u16 = 2;

/// Precision tag of files storing position/velocity as 32-bit floats
pub const FLOAT32_DIGITS: u16 = 32;

/// Precision tag of files storing position/velocity as 64-bit floats
pub const FLOAT64_DIGITS: u16 = 64;

/// Size in bytes of the record timestamp, independent of the precision tag
pub const TIME_FIELD_SIZE: usize = 8;

/// Upper bound on the number of samples reserved up front while decoding
pub const MAX_PREALLOCATED_SAMPLES: usize = 1 << 16;

// -------------------------------------------------------------------------------------------------
// Unit conversions
// -------------------------------------------------------------------------------------------------

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Astronomical Unit in kilometers (IAU 2012)
pub const AU: f64 = 149_597_870.7;
