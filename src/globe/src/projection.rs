//! Equirectangular projection into a top-left origin pixel space.
//!
//! Longitude maps linearly onto the horizontal axis with -180° at column 0,
//! latitude maps linearly onto the vertical axis with +90° at row 0. A unit
//! vector `(x, y, z)` on the sphere has latitude `asin(y)` and longitude
//! `atan2(x, z)`, so `+Z` looks at (0°, 0°) and `+Y` is the north pole.
//!
//! Both projections truncate toward zero. Columns wrap around the
//! antimeridian, rows clamp at the south pole.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use common::{Bounds, Coordinate, PixelCoordinate};
use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::{GlobeError, Result};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawImageSize")]
pub struct ImageSize {
    width: u32,
    height: u32,
}

#[derive(Deserialize)]
struct RawImageSize {
    width: u32,
    height: u32,
}

impl TryFrom<RawImageSize> for ImageSize {
    type Error = GlobeError;

    fn try_from(raw: RawImageSize) -> Result<Self> {
        Self::new(raw.width, raw.height)
    }
}

impl ImageSize {
    /// Sampling density used when placing dots, independent of any texture.
    pub const REFERENCE: ImageSize = ImageSize {
        width: 2048,
        height: 1024,
    };

    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(GlobeError::invalid(format!(
                "image size must be non-zero, got {width}x{height}"
            )));
        }

        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn column(&self, fraction: f64) -> u32 {
        (fraction * f64::from(self.width)) as u32 % self.width
    }

    fn row(&self, fraction: f64) -> u32 {
        ((fraction * f64::from(self.height)) as u32).min(self.height - 1)
    }
}

impl Default for ImageSize {
    fn default() -> Self {
        Self::REFERENCE
    }
}

/// Projects a unit vector onto the pixel grid of an image of `size`.
///
/// `y` is clamped to `[-1, 1]` before taking the elevation so points that
/// drifted off the sphere by rounding still land on the first or last row.
pub fn project_unit_sphere(point: DVec3, size: ImageSize) -> Result<PixelCoordinate> {
    if !point.is_finite() {
        return Err(GlobeError::invalid(format!(
            "cannot project non-finite point {point}"
        )));
    }

    let theta = point.y.clamp(-1., 1.).asin();
    let phi = point.x.atan2(point.z);

    Ok(PixelCoordinate {
        u: size.column((phi + PI) / TAU),
        v: size.row((FRAC_PI_2 - theta) / PI),
    })
}

/// Projects a latitude/longitude pair onto the pixel grid of an image of `size`.
pub fn project_coordinate(coordinate: Coordinate, size: ImageSize) -> Result<PixelCoordinate> {
    if !Bounds::WORLD.contains(&coordinate) {
        return Err(GlobeError::invalid(format!(
            "coordinate ({}, {}) is outside the world bounds",
            coordinate.lat, coordinate.lon
        )));
    }

    let normalized_lon = (coordinate.lon + 180.).rem_euclid(360.);

    Ok(PixelCoordinate {
        u: size.column(normalized_lon / 360.),
        v: size.row(-(coordinate.lat - 90.) / 180.),
    })
}

/// Unit vector pointing at `coordinate`, in the same axis convention as
/// [`project_unit_sphere`].
pub fn coordinate_to_direction(coordinate: Coordinate) -> DVec3 {
    let (lat_sin, lat_cos) = coordinate.lat.to_radians().sin_cos();
    let (lon_sin, lon_cos) = coordinate.lon.to_radians().sin_cos();

    DVec3::new(lat_cos * lon_sin, lat_sin, lat_cos * lon_cos)
}

/// Cartesian to geographic coordinates. The poles report longitude 0.
pub fn direction_to_coordinate(direction: DVec3) -> Coordinate {
    let direction = direction.normalize_or_zero();
    let horizontal = (direction.x * direction.x + direction.z * direction.z).sqrt();

    if horizontal < 1.0e-12 {
        let lat = if direction.y < 0. { -90. } else { 90. };
        return Coordinate { lat, lon: 0. };
    }

    Coordinate {
        lat: direction.y.atan2(horizontal).to_degrees(),
        lon: direction.x.atan2(direction.z).to_degrees(),
    }
}
