//! Loaded trajectories and their time queries.
//!
//! A [`Trajectory`] is built once, in a single pass over an xyzv stream, and is
//! immutable afterwards. All queries take `&self`, so a trajectory can be
//! shared between threads (for instance through the [`trajectory_cache`])
//! without any locking.
//!
//! # Typical workflow
//! 1. Load a file with [`Trajectory::open`] (or [`crate::open_trajectory`]), or
//!    any byte stream with [`Trajectory::load`].
//! 2. Query the body state with [`Trajectory::state_at`] (TDB Julian date) or
//!    [`Trajectory::state_at_epoch`] (a [`hifitime::Epoch`]).
//! 3. Optionally convert with [`State::to_au`].
//!
//! Producers go the other way with [`Trajectory::from_samples`] and
//! [`Trajectory::save`].
use std::{
    cmp::Ordering,
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    slice,
};

use camino::Utf8Path;
use hifitime::Epoch;
use itertools::Itertools;
use tracing::debug;

use crate::{
    binary::{
        byte_order::ByteOrder,
        file_header::FileHeader,
        precision::Precision,
        sample_record::{decode_all, Sample},
    },
    xyzv_errors::{Result, XyzvError},
};

pub mod interpolation;
pub mod options;
pub mod state;
pub mod trajectory_cache;

pub use options::{Interpolation, TrajectoryOptions};
pub use state::State;

/// An immutable, time-ordered sample sequence and the header it was read with.
///
/// Invariants
/// -----------------
/// * `samples.len() == header.count`.
/// * Sample times are non-decreasing (equal consecutive times are allowed).
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    header: FileHeader,
    samples: Vec<Sample>,
    options: TrajectoryOptions,
}

impl Trajectory {
    /// Decode a trajectory from a stream with default options.
    ///
    /// See [`Self::load_with`].
    pub fn load<R: Read>(reader: R) -> Result<Self> {
        Self::load_with(reader, TrajectoryOptions::default())
    }

    /// Decode a trajectory from a stream.
    ///
    /// Arguments
    /// -----------------
    /// * `reader`: stream positioned at the beginning of an xyzv file. It is
    ///   read to its end.
    /// * `options`: query options of the resulting trajectory.
    ///
    /// Return
    /// ----------
    /// * The loaded trajectory, or the first header/record error, or
    ///   `NonMonotonicTime` when a sample time goes backwards.
    ///
    /// See also
    /// ------------
    /// * [`FileHeader::read_from`] – Header validation.
    /// * [`decode_all`] – Record count enforcement.
    pub fn load_with<R: Read>(mut reader: R, options: TrajectoryOptions) -> Result<Self> {
        let header = FileHeader::read_from(&mut reader)?;
        let samples = decode_all(&mut reader, &header)?;
        check_time_order(&samples)?;

        debug!(
            samples = samples.len(),
            byte_order = %header.byte_order,
            precision = %header.precision,
            interpolation = %options.interpolation,
            "loaded xyzv trajectory"
        );

        Ok(Trajectory {
            header,
            samples,
            options,
        })
    }

    /// Load a trajectory file with default options.
    pub fn open(path: impl AsRef<Utf8Path>) -> Result<Self> {
        Self::open_with(path, TrajectoryOptions::default())
    }

    /// Load a trajectory file.
    pub fn open_with(path: impl AsRef<Utf8Path>, options: TrajectoryOptions) -> Result<Self> {
        let path = path.as_ref();
        debug!(%path, "opening xyzv trajectory");
        let file = BufReader::new(File::open(path)?);
        Self::load_with(file, options)
    }

    /// Build a trajectory from samples, for writing.
    ///
    /// Arguments
    /// -----------------
    /// * `byte_order`: byte order used when the trajectory is encoded.
    /// * `precision`: component width used when the trajectory is encoded.
    /// * `samples`: time-ordered samples.
    ///
    /// Return
    /// ----------
    /// * The trajectory, or `NonMonotonicTime` if the samples are not ordered.
    ///
    /// Note
    /// ----------
    /// * The samples are kept at full precision in memory. Encoding at
    ///   [`Precision::Float32`] rounds the components, so reloading the
    ///   encoded file gives the rounded values.
    pub fn from_samples(
        byte_order: ByteOrder,
        precision: Precision,
        samples: Vec<Sample>,
    ) -> Result<Self> {
        check_time_order(&samples)?;
        Ok(Trajectory {
            header: FileHeader::new(byte_order, precision, samples.len() as u64),
            samples,
            options: TrajectoryOptions::default(),
        })
    }

    /// Same trajectory with different query options.
    pub fn with_options(self, options: TrajectoryOptions) -> Self {
        Trajectory { options, ..self }
    }

    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.header.byte_order
    }

    pub fn precision(&self) -> Precision {
        self.header.precision
    }

    pub fn options(&self) -> &TrajectoryOptions {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Read-only view of all samples, in time order.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn iter(&self) -> slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    /// Copy of the sample at `index`, or `IndexOutOfRange`.
    pub fn sample_at(&self, index: usize) -> Result<Sample> {
        self.samples
            .get(index)
            .copied()
            .ok_or(XyzvError::IndexOutOfRange {
                index,
                len: self.samples.len(),
            })
    }

    /// First and last sample times, or `EmptyTrajectory`.
    pub fn time_range(&self) -> Result<(f64, f64)> {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => Ok((first.time, last.time)),
            _ => Err(XyzvError::EmptyTrajectory),
        }
    }

    /// [`Self::time_range`] as epochs, reading sample times as TDB Julian dates.
    pub fn time_range_epochs(&self) -> Result<(Epoch, Epoch)> {
        let (start, end) = self.time_range()?;
        Ok((Epoch::from_jde_tdb(start), Epoch::from_jde_tdb(end)))
    }

    /// Length of the sampled time span, or `EmptyTrajectory`.
    pub fn period(&self) -> Result<f64> {
        self.time_range().map(|(start, end)| end - start)
    }

    /// Largest distance from the origin reached by a sample position (km).
    ///
    /// Zero for an empty trajectory.
    pub fn bounding_radius(&self) -> f64 {
        self.samples
            .iter()
            .map(|s| s.position.norm())
            .fold(0.0, f64::max)
    }

    /// State at time `t` (TDB Julian date) using the trajectory options.
    ///
    /// Queries before the first or after the last sample are clamped to that
    /// sample. See [`interpolation`] for the exact policy.
    ///
    /// Return
    /// ----------
    /// * The interpolated [`State`], or `EmptyTrajectory`.
    pub fn state_at(&self, t: f64) -> Result<State> {
        self.state_at_with(t, self.options.interpolation)
    }

    /// State at time `t` with an explicit interpolation mode.
    pub fn state_at_with(&self, t: f64, interpolation: Interpolation) -> Result<State> {
        interpolation::state_at(&self.samples, t, interpolation, self.options.velocity_scale)
    }

    /// State at an epoch, converted to a TDB Julian date.
    pub fn state_at_epoch(&self, epoch: &Epoch) -> Result<State> {
        self.state_at(epoch.to_jde_tdb_days())
    }

    /// Encode the whole trajectory into xyzv bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let header = &self.header;
        let mut out = Vec::with_capacity(
            crate::constants::HEADER_SIZE + self.samples.len() * header.record_size(),
        );
        header.encode_into(&mut out);
        for sample in &self.samples {
            sample.encode_into(header.byte_order, header.precision, &mut out);
        }
        out
    }

    /// Write the encoded trajectory to `writer`.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.to_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Write the encoded trajectory to a file, replacing any existing one.
    pub fn save(&self, path: impl AsRef<Utf8Path>) -> Result<()> {
        let path = path.as_ref();
        self.write_to(BufWriter::new(File::create(path)?))?;
        debug!(%path, samples = self.samples.len(), "saved xyzv trajectory");
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a Sample;
    type IntoIter = slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Reject any sample whose time is before its predecessor's, or unordered (NaN).
fn check_time_order(samples: &[Sample]) -> Result<()> {
    let regression = samples
        .iter()
        .map(|s| s.time)
        .tuple_windows()
        .find_position(|(previous, current)| {
            matches!(current.partial_cmp(previous), None | Some(Ordering::Less))
        });

    match regression {
        Some((index, (previous, current))) => Err(XyzvError::NonMonotonicTime {
            index: index + 1,
            previous,
            current,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod test_trajectory {
    use std::io::Cursor;

    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    use super::*;

    fn sample(time: f64, x: f64) -> Sample {
        Sample::new(
            time,
            Vector3::new(x, 0.0, 0.0),
            Vector3::new(0.0, x / 2.0, 0.0),
        )
    }

    fn trajectory(times: &[f64]) -> Result<Trajectory> {
        Trajectory::from_samples(
            ByteOrder::Little,
            Precision::Float64,
            times.iter().map(|&t| sample(t, t)).collect(),
        )
    }

    #[test]
    fn test_check_time_order() {
        assert!(trajectory(&[]).is_ok());
        assert!(trajectory(&[1.0]).is_ok());
        assert!(trajectory(&[0.0, 0.0, 1.0, 1.0]).is_ok());

        assert_eq!(
            trajectory(&[0.0, 5.0, 3.0]).unwrap_err(),
            XyzvError::NonMonotonicTime {
                index: 2,
                previous: 5.0,
                current: 3.0
            }
        );
        assert!(matches!(
            trajectory(&[0.0, f64::NAN, 3.0]),
            Err(XyzvError::NonMonotonicTime { index: 1, .. })
        ));
    }

    #[test]
    fn test_accessors() {
        let traj = trajectory(&[1.0, 2.0, 4.0]).unwrap();
        assert_eq!(traj.len(), 3);
        assert_eq!(traj.header().count, 3);
        assert_eq!(traj.time_range().unwrap(), (1.0, 4.0));
        assert_eq!(traj.period().unwrap(), 3.0);
        assert_eq!(traj.bounding_radius(), 4.0);
        assert_eq!(traj.sample_at(1).unwrap(), sample(2.0, 2.0));
        assert_eq!(
            traj.sample_at(3).unwrap_err(),
            XyzvError::IndexOutOfRange { index: 3, len: 3 }
        );
        assert_eq!(
            traj.iter().map(|s| s.time).collect::<Vec<_>>(),
            vec![1.0, 2.0, 4.0]
        );
        assert_eq!((&traj).into_iter().count(), 3);
    }

    #[test]
    fn test_empty_trajectory_queries() {
        let traj = trajectory(&[]).unwrap();
        assert!(traj.is_empty());
        assert_eq!(traj.time_range().unwrap_err(), XyzvError::EmptyTrajectory);
        assert_eq!(traj.state_at(0.0).unwrap_err(), XyzvError::EmptyTrajectory);
        assert_eq!(traj.bounding_radius(), 0.0);
        assert_eq!(
            traj.sample_at(0).unwrap_err(),
            XyzvError::IndexOutOfRange { index: 0, len: 0 }
        );
    }

    #[test]
    fn test_bytes_round_trip() {
        let traj = trajectory(&[0.0, 1.5, 3.0]).unwrap();
        let bytes = traj.to_bytes();
        assert_eq!(bytes.len(), 24 + 3 * 56);

        let back = Trajectory::load(Cursor::new(bytes)).unwrap();
        assert_eq!(back, traj);
    }

    #[test]
    fn test_load_rejects_regression() {
        let mut bytes = trajectory(&[0.0, 5.0, 6.0]).unwrap().to_bytes();
        // overwrite the last record time with 3.0
        let offset = 24 + 2 * 56;
        bytes[offset..offset + 8].copy_from_slice(&3.0f64.to_le_bytes());

        assert_eq!(
            Trajectory::load(Cursor::new(bytes)).unwrap_err(),
            XyzvError::NonMonotonicTime {
                index: 2,
                previous: 5.0,
                current: 3.0
            }
        );
    }

    #[test]
    fn test_options_drive_state_at() {
        let samples = vec![
            Sample::new(0.0, Vector3::zeros(), Vector3::new(1.0, 0.0, 0.0)),
            Sample::new(1.0, Vector3::new(1.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0)),
        ];
        let traj = Trajectory::from_samples(ByteOrder::Big, Precision::Float64, samples).unwrap();
        let linear = traj.state_at(0.25).unwrap();

        let cubic = traj
            .clone()
            .with_options(
                TrajectoryOptions::default()
                    .with_interpolation(Interpolation::Cubic)
                    .with_velocity_scale(1.0)
                    .unwrap(),
            )
            .state_at(0.25)
            .unwrap();

        // uniform motion: both modes agree
        assert_relative_eq!(linear.position.x, 0.25, epsilon = 1e-15);
        assert_relative_eq!(cubic.position, linear.position, epsilon = 1e-15);
        assert_relative_eq!(cubic.velocity, linear.velocity, epsilon = 1e-15);
    }

    #[test]
    fn test_epoch_queries() {
        let traj = trajectory(&[2_451_545.0, 2_451_546.0]).unwrap();
        let (start, end) = traj.time_range_epochs().unwrap();
        assert_eq!(start, Epoch::from_jde_tdb(2_451_545.0));
        assert_eq!(end, Epoch::from_jde_tdb(2_451_546.0));
        // hifitime round trips Julian dates to about a millisecond
        assert_relative_eq!(start.to_jde_tdb_days(), 2_451_545.0, epsilon = 1e-7);
        assert_relative_eq!(end.to_jde_tdb_days(), 2_451_546.0, epsilon = 1e-7);

        let noon = Epoch::from_jde_tdb(2_451_545.5);
        let state = traj.state_at_epoch(&noon).unwrap();
        // halfway between both samples, away from either endpoint
        assert_relative_eq!(state.position.x, 2_451_545.5, epsilon = 1e-6);
        assert_relative_eq!(state.velocity.y, 2_451_545.5 / 2.0, epsilon = 1e-6);
    }
}
