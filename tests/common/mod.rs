#![allow(dead_code)]

use approx::assert_relative_eq;
use nalgebra::Vector3;
use xyzv::{ByteOrder, Precision, Sample, State, Trajectory};

/// A body on a slightly eccentric loop around the origin, one sample per day
/// from J2000, with components exactly representable in `f32`.
pub fn loop_samples(n: usize) -> Vec<Sample> {
    (0..n)
        .map(|i| {
            let day = i as f64;
            let angle = day / 8.0;
            let r = 1.5e8 + 2.0e6 * (angle / 2.0).cos();
            let round = |v: f64| v as f32 as f64;
            Sample::new(
                2_451_545.0 + day,
                Vector3::new(round(r * angle.cos()), round(r * angle.sin()), 0.0),
                Vector3::new(round(-29.8 * angle.sin()), round(29.8 * angle.cos()), 0.5),
            )
        })
        .collect()
}

/// xyzv bytes of `samples` written with `order` and `precision`.
pub fn encode(order: ByteOrder, precision: Precision, samples: Vec<Sample>) -> Vec<u8> {
    Trajectory::from_samples(order, precision, samples)
        .unwrap()
        .to_bytes()
}

pub fn all_layouts() -> [(ByteOrder, Precision); 4] {
    [
        (ByteOrder::Little, Precision::Float32),
        (ByteOrder::Little, Precision::Float64),
        (ByteOrder::Big, Precision::Float32),
        (ByteOrder::Big, Precision::Float64),
    ]
}

pub fn assert_state_close(actual: &State, expected: &State, epsilon: f64) {
    assert_relative_eq!(actual.position, expected.position, epsilon = epsilon);
    assert_relative_eq!(actual.velocity, expected.velocity, epsilon = epsilon);
}
