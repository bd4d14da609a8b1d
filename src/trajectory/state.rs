use nalgebra::Vector3;

use crate::{
    binary::sample_record::Sample,
    constants::{AU, SECONDS_PER_DAY},
};

/// Interpolated state of a body at a query time.
///
/// * `position` - Cartesian position (km).
/// * `velocity` - Cartesian velocity (km/s).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct State {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
}

impl State {
    pub fn new(position: Vector3<f64>, velocity: Vector3<f64>) -> Self {
        State { position, velocity }
    }

    /// Convert to AU-based units: position in AU, velocity in AU/day.
    #[must_use = "`.to_au()` returns a new State; assign or use it"]
    pub fn to_au(&self) -> Self {
        State {
            position: self.position / AU,
            velocity: self.velocity * (SECONDS_PER_DAY / AU),
        }
    }
}

impl From<&Sample> for State {
    fn from(sample: &Sample) -> Self {
        State::new(sample.position, sample.velocity)
    }
}

impl From<Sample> for State {
    fn from(sample: Sample) -> Self {
        State::from(&sample)
    }
}
