use common::{Coordinate, PixelCoordinate};
use glam::DVec3;

use crate::projection::direction_to_coordinate;

/// A sampled location on the dot sphere.
///
/// `pixel` lives in the reference sampling grid the point was generated
/// against, not in any particular texture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpherePoint {
    position: DVec3,
    direction: DVec3,
    pixel: PixelCoordinate,
}

impl SpherePoint {
    pub fn new(direction: DVec3, radius: f64, pixel: PixelCoordinate) -> Self {
        Self {
            position: direction * radius,
            direction,
            pixel,
        }
    }

    /// Position scaled by the sphere radius.
    pub fn position(&self) -> DVec3 {
        self.position
    }

    /// Position on the unit sphere.
    pub fn direction(&self) -> DVec3 {
        self.direction
    }

    pub fn pixel(&self) -> PixelCoordinate {
        self.pixel
    }

    pub fn coordinate(&self) -> Coordinate {
        direction_to_coordinate(self.direction)
    }

    pub fn to_array(&self) -> [f32; 3] {
        self.position.as_vec3().to_array()
    }
}
