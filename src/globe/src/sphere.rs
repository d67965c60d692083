//! Fibonacci sphere sampling.
//!
//! Points walk from the north pole (`y = 1`) to the south pole (`y = -1`) in
//! equal steps of `y`, turning by the golden angle around the `Y` axis at each
//! step. Equal steps in `y` cover equal areas of the sphere, the golden angle
//! keeps neighbouring turns from lining up.

use std::f64::consts::PI;

use glam::DVec3;

use crate::{
    point::SpherePoint,
    projection::{project_unit_sphere, ImageSize},
    GlobeError, Result,
};

/// `π·(√5 − 1)`, one full turn divided by the golden ratio.
pub fn golden_angle() -> f64 {
    PI * (5_f64.sqrt() - 1.)
}

/// Unit vector of the `index`-th point out of `count`.
pub fn fibonacci_direction(index: usize, count: usize) -> DVec3 {
    // a lone point has no step to take and sits on the north pole
    let y = if count <= 1 {
        1.
    } else {
        1. - (index as f64 / (count - 1) as f64) * 2.
    };

    let radius_at_y = (1. - y * y).max(0.).sqrt();
    let theta = golden_angle() * index as f64;

    DVec3::new(theta.cos() * radius_at_y, y, theta.sin() * radius_at_y)
}

/// Generates `count` points on a sphere of `radius`, each tagged with its
/// pixel in an equirectangular grid of `reference` size.
///
/// Output is a pure function of the arguments.
pub fn generate(count: usize, radius: f64, reference: ImageSize) -> Result<Vec<SpherePoint>> {
    if count < 1 {
        return Err(GlobeError::invalid("point count must be at least 1"));
    }

    if !(radius.is_finite() && radius > 0.) {
        return Err(GlobeError::invalid(format!(
            "sphere radius must be positive and finite, got {radius}"
        )));
    }

    (0..count)
        .map(|i| {
            let direction = fibonacci_direction(i, count);
            let pixel = project_unit_sphere(direction, reference)?;

            Ok(SpherePoint::new(direction, radius, pixel))
        })
        .collect()
}
