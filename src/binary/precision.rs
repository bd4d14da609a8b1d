use std::{fmt, str::FromStr};

use crate::{
    constants::{FLOAT32_DIGITS, FLOAT64_DIGITS, TIME_FIELD_SIZE},
    xyzv_errors::XyzvError,
};

/// Width of the position and velocity components stored in a file.
///
/// Resolved once from the header `digits` tag and passed to the record codec.
/// The timestamp is always stored as `f64`, whatever the precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Precision {
    Float32,
    Float64,
}

impl Precision {
    /// Resolve the header tag, `None` for unrecognized values.
    pub fn from_digits(digits: u16) -> Option<Self> {
        match digits {
            FLOAT32_DIGITS => Some(Precision::Float32),
            FLOAT64_DIGITS => Some(Precision::Float64),
            _ => None,
        }
    }

    /// Header tag written for this precision.
    pub const fn digits(self) -> u16 {
        match self {
            Precision::Float32 => FLOAT32_DIGITS,
            Precision::Float64 => FLOAT64_DIGITS,
        }
    }

    /// Width in bytes of one vector component.
    pub const fn component_size(self) -> usize {
        match self {
            Precision::Float32 => 4,
            Precision::Float64 => 8,
        }
    }

    /// Size in bytes of one record: the time plus 3 position and 3 velocity components.
    pub const fn record_size(self) -> usize {
        TIME_FIELD_SIZE + 6 * self.component_size()
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Precision::Float32 => write!(f, "single"),
            Precision::Float64 => write!(f, "double"),
        }
    }
}

impl FromStr for Precision {
    type Err = XyzvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" | "float" | "f32" | "float32" => Ok(Precision::Float32),
            "double" | "f64" | "float64" => Ok(Precision::Float64),
            other => Err(XyzvError::InvalidOption(format!(
                "unknown precision '{other}' (expected single or double)"
            ))),
        }
    }
}
