//! Query options of a loaded trajectory.
//!
//! Options are fixed when the trajectory is built and apply to every
//! [`crate::trajectory::Trajectory::state_at`] call. Both interpolation modes
//! share the same boundary policy: queries outside the sampled range are
//! clamped to the first or last sample, never extrapolated.
use std::{fmt, str::FromStr};

use crate::{constants::SECONDS_PER_DAY, xyzv_errors::XyzvError};

/// How the state between two samples is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Interpolation {
    /// Position and velocity are each interpolated linearly between the
    /// bracketing samples.
    #[default]
    Linear,
    /// Cubic Hermite spline through the bracketing positions, using the stored
    /// velocities as tangents. The returned velocity is the spline derivative.
    Cubic,
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interpolation::Linear => write!(f, "linear"),
            Interpolation::Cubic => write!(f, "cubic"),
        }
    }
}

impl FromStr for Interpolation {
    type Err = XyzvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(Interpolation::Linear),
            "cubic" => Ok(Interpolation::Cubic),
            other => Err(XyzvError::InvalidOption(format!(
                "unknown interpolation '{other}' (expected linear or cubic)"
            ))),
        }
    }
}

/// Options applied to the queries of a [`crate::trajectory::Trajectory`].
///
/// Fields
/// -----------------
/// * `interpolation` - interpolation mode used by `state_at`.
/// * `velocity_scale` - number of velocity time units in one sample time
///   unit. Only the cubic mode needs it, to use velocities as spline
///   tangents. The default (86 400) matches times in days and velocities in
///   km/s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryOptions {
    pub interpolation: Interpolation,
    pub velocity_scale: f64,
}

impl Default for TrajectoryOptions {
    fn default() -> Self {
        TrajectoryOptions {
            interpolation: Interpolation::Linear,
            velocity_scale: SECONDS_PER_DAY,
        }
    }
}

impl TrajectoryOptions {
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Set the velocity time scale.
    ///
    /// Return
    /// ----------
    /// * The updated options, or `InvalidOption` when `scale` is not a strictly
    ///   positive finite number.
    pub fn with_velocity_scale(mut self, scale: f64) -> Result<Self, XyzvError> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(XyzvError::InvalidOption(format!(
                "velocity scale must be positive and finite, got {scale}"
            )));
        }
        self.velocity_scale = scale;
        Ok(self)
    }
}

#[cfg(test)]
mod test_options {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = TrajectoryOptions::default();
        assert_eq!(options.interpolation, Interpolation::Linear);
        assert_eq!(options.velocity_scale, 86_400.0);
    }

    #[test]
    fn test_interpolation_from_str() {
        assert_eq!(
            "Cubic".parse::<Interpolation>().unwrap(),
            Interpolation::Cubic
        );
        assert_eq!(
            Interpolation::Linear
                .to_string()
                .parse::<Interpolation>()
                .unwrap(),
            Interpolation::Linear
        );
        assert_eq!(
            "spline".parse::<Interpolation>().unwrap_err(),
            XyzvError::InvalidOption(
                "unknown interpolation 'spline' (expected linear or cubic)".to_string()
            )
        );
    }

    #[test]
    fn test_velocity_scale_validation() {
        let options = TrajectoryOptions::default()
            .with_interpolation(Interpolation::Cubic)
            .with_velocity_scale(1.0)
            .unwrap();
        assert_eq!(options.velocity_scale, 1.0);
        assert_eq!(options.interpolation, Interpolation::Cubic);

        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(TrajectoryOptions::default()
                .with_velocity_scale(bad)
                .is_err());
        }
    }
}
