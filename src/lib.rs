pub mod binary;
pub mod constants;
pub mod trajectory;
pub mod xyzv_errors;

use camino::Utf8Path;

pub use binary::{
    byte_order::ByteOrder, file_header::FileHeader, precision::Precision, sample_record::Sample,
};
pub use trajectory::{
    trajectory_cache::TrajectoryCache, Interpolation, State, Trajectory, TrajectoryOptions,
};
pub use xyzv_errors::{Result, XyzvError};

/// Load an xyzv trajectory file with default options.
///
/// Shorthand for [`Trajectory::open`].
pub fn open_trajectory(path: impl AsRef<Utf8Path>) -> Result<Trajectory> {
    Trajectory::open(path)
}
