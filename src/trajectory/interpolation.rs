//! Time queries over a sample sequence.
//!
//! Overview
//! -----------------
//! A query first locates the **bracketing pair** `(s[i], s[i+1])` with
//! `s[i].time <= t < s[i+1].time` by binary search over the sample times, so
//! each query costs `O(log n)` whatever the trajectory length. The state is
//! then interpolated between the two samples.
//!
//! Boundary policy
//! -----------------
//! * `t <= t_min` returns the first sample, `t >= t_max` the last one: the
//!   engine never extrapolates.
//! * A single-sample trajectory returns that sample for every `t`.
//! * An empty trajectory fails with `EmptyTrajectory`.
//! * A bracket whose two samples share the same time returns the earlier one.
//! * A NaN query time yields a NaN state.
//!
//! Interpolation modes
//! -----------------
//! * [`Interpolation::Linear`] - `f = (t - t_i) / (t_{i+1} - t_i)` clamped to
//!   `[0, 1]`, then position and velocity are each interpolated linearly.
//! * [`Interpolation::Cubic`] - cubic Hermite spline through both positions
//!   with the stored velocities as tangents; the velocity returned is the
//!   derivative of the spline.
use nalgebra::Vector3;

use super::{options::Interpolation, state::State};
use crate::{
    binary::sample_record::Sample,
    xyzv_errors::{Result, XyzvError},
};

/// Where a query time falls in the sample sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Bracket {
    /// At or before the first sample, or the sequence has a single sample.
    First,
    /// At or after the last sample.
    Last,
    /// Between samples `i` and `i + 1`.
    Between(usize),
}

/// Locate `t` in `samples`, which must be sorted by non-decreasing time.
pub(crate) fn locate(samples: &[Sample], t: f64) -> Result<Bracket> {
    let (first, last) = match (samples.first(), samples.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(XyzvError::EmptyTrajectory),
    };

    if samples.len() == 1 || t <= first.time {
        return Ok(Bracket::First);
    }
    if t >= last.time {
        return Ok(Bracket::Last);
    }

    // first index whose time is strictly after t
    let upper = samples.partition_point(|s| s.time <= t);
    Ok(Bracket::Between(
        upper.saturating_sub(1).min(samples.len() - 2),
    ))
}

/// Interpolated state of `samples` at `t`.
///
/// Arguments
/// -----------------
/// * `samples`: time-ordered samples.
/// * `t`: query time, in the sample time scale.
/// * `interpolation`: interpolation mode between the bracketing samples.
/// * `velocity_scale`: velocity time units per sample time unit (cubic mode).
///
/// Return
/// ----------
/// * The state at `t`, or `EmptyTrajectory` when `samples` is empty.
pub(crate) fn state_at(
    samples: &[Sample],
    t: f64,
    interpolation: Interpolation,
    velocity_scale: f64,
) -> Result<State> {
    let state = match locate(samples, t)? {
        Bracket::First => State::from(&samples[0]),
        Bracket::Last => State::from(&samples[samples.len() - 1]),
        Bracket::Between(i) => {
            let (s0, s1) = (&samples[i], &samples[i + 1]);
            match interpolation {
                Interpolation::Linear => linear(s0, s1, t),
                Interpolation::Cubic => cubic(s0, s1, t, velocity_scale),
            }
        }
    };
    Ok(state)
}

fn linear(s0: &Sample, s1: &Sample, t: f64) -> State {
    let dt = s1.time - s0.time;
    if dt <= 0.0 {
        return State::from(s0);
    }

    let f = ((t - s0.time) / dt).clamp(0.0, 1.0);
    State::new(
        s0.position.lerp(&s1.position, f),
        s0.velocity.lerp(&s1.velocity, f),
    )
}

fn cubic(s0: &Sample, s1: &Sample, t: f64, velocity_scale: f64) -> State {
    let h = s1.time - s0.time;
    if h <= 0.0 {
        return State::from(s0);
    }

    let ih = 1.0 / h;
    let u = ((t - s0.time) * ih).clamp(0.0, 1.0);

    // tangents in position units per bracket length
    let v0 = s0.velocity * (h * velocity_scale);
    let v1 = s1.velocity * (h * velocity_scale);
    let p0 = s0.position;
    let p1 = s1.position;

    let a: Vector3<f64> = 2.0 * (p0 - p1) + v1 + v0;
    let b: Vector3<f64> = 3.0 * (p1 - p0) - 2.0 * v0 - v1;

    let position = p0 + u * (v0 + u * (b + u * a));
    let velocity = (v0 + u * (2.0 * b + 3.0 * u * a)) * (ih / velocity_scale);
    State::new(position, velocity)
}
