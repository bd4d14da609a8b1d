use thiserror::Error;

#[derive(Error, Debug)]
pub enum XyzvError {
    #[error("Invalid xyzv magic signature: {0:02x?}")]
    InvalidMagic([u8; 8]),

    #[error("Unsupported byte order marker: {0:02x?}")]
    UnsupportedByteOrder([u8; 2]),

    #[error("Unsupported sample precision: {0} digits")]
    UnsupportedPrecision(u16),

    #[error("Truncated xyzv header: {available} of {expected} bytes available")]
    TruncatedHeader { available: usize, expected: usize },

    #[error("Truncated record {index}: stream ended mid-record")]
    TruncatedRecord { index: u64 },

    #[error("Record count mismatch: header declares {expected}, stream holds {found}")]
    RecordCountMismatch { expected: u64, found: u64 },

    #[error("Non monotonic time at sample {index}: {current} < {previous}")]
    NonMonotonicTime {
        index: usize,
        previous: f64,
        current: f64,
    },

    #[error("Trajectory has no samples")]
    EmptyTrajectory,

    #[error("Sample index {index} out of range (len: {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid option value: {0}")]
    InvalidOption(String),

    #[error("Unable to perform file operation: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, XyzvError>;

impl PartialEq for XyzvError {
    fn eq(&self, other: &Self) -> bool {
        use XyzvError::*;
        match (self, other) {
            (InvalidMagic(a), InvalidMagic(b)) => a == b,
            (UnsupportedByteOrder(a), UnsupportedByteOrder(b)) => a == b,
            (UnsupportedPrecision(a), UnsupportedPrecision(b)) => a == b,
            (
                TruncatedHeader {
                    available: a1,
                    expected: e1,
                },
                TruncatedHeader {
                    available: a2,
                    expected: e2,
                },
            ) => a1 == a2 && e1 == e2,
            (TruncatedRecord { index: a }, TruncatedRecord { index: b }) => a == b,
            (
                RecordCountMismatch {
                    expected: e1,
                    found: f1,
                },
                RecordCountMismatch {
                    expected: e2,
                    found: f2,
                },
            ) => e1 == e2 && f1 == f2,
            (
                NonMonotonicTime {
                    index: i1,
                    previous: p1,
                    current: c1,
                },
                NonMonotonicTime {
                    index: i2,
                    previous: p2,
                    current: c2,
                },
            ) => i1 == i2 && p1.to_bits() == p2.to_bits() && c1.to_bits() == c2.to_bits(),
            (IndexOutOfRange { index: i1, len: l1 }, IndexOutOfRange { index: i2, len: l2 }) => {
                i1 == i2 && l1 == l2
            }
            (InvalidOption(a), InvalidOption(b)) => a == b,

            // io errors are not comparable: same kind is enough
            (Io(a), Io(b)) => a.kind() == b.kind(),

            (EmptyTrajectory, EmptyTrajectory) => true,

            _ => false,
        }
    }
}
