use geo::Coord;
use serde::{Deserialize, Serialize};

/// Geographic coordinate in degrees. Latitude grows north, longitude grows east.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl From<Coord<f64>> for Coordinate {
    fn from(coord: Coord<f64>) -> Self {
        Self {
            lat: coord.y,
            lon: coord.x,
        }
    }
}

impl From<Coordinate> for Coord<f64> {
    fn from(coordinate: Coordinate) -> Self {
        Coord {
            x: coordinate.lon,
            y: coordinate.lat,
        }
    }
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct Bounds {
    pub north_west: Coordinate,
    pub south_east: Coordinate,
}

impl Bounds {
    pub const WORLD: Bounds = Bounds {
        north_west: Coordinate {
            lat: 90.,
            lon: -180.,
        },
        south_east: Coordinate {
            lat: -90.,
            lon: 180.,
        },
    };

    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        let lat = self.north_west.lat >= coordinate.lat && coordinate.lat >= self.south_east.lat;
        let lon = self.north_west.lon <= coordinate.lon && coordinate.lon <= self.south_east.lon;

        lat && lon
    }
}

/// Pixel in an image with a top-left origin.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelCoordinate {
    pub u: u32,
    pub v: u32,
}

impl PixelCoordinate {
    pub fn new(u: u32, v: u32) -> Self {
        Self { u, v }
    }

    pub fn distance_squared(&self, other: &PixelCoordinate) -> u64 {
        let du = u64::from(self.u.abs_diff(other.u));
        let dv = u64::from(self.v.abs_diff(other.v));

        du * du + dv * dv
    }
}

/// Unit quaternion applied to the assembled dot sphere by the renderer.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Orientation {
    pub const IDENTITY: Orientation = Orientation {
        x: 0.,
        y: 0.,
        z: 0.,
        w: 1.,
    };
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DotVertex {
    pub position: [f32; 3],
    pub kind: u32,
}

impl DotVertex {
    pub const LAND: u32 = 0;
    pub const HIGHLIGHT: u32 = 1;
}

#[cfg(test)]
mod tests {
    use crate::{Bounds, Coordinate, DotVertex, PixelCoordinate};

    #[test]
    fn contains() {
        let bounds = Bounds {
            north_west: Coordinate { lon: -1., lat: 1. },
            south_east: Coordinate { lon: 1., lat: -1. },
        };

        assert!(!bounds.contains(&Coordinate { lat: -2., lon: -2. }));
        assert!(!bounds.contains(&Coordinate { lat: 2., lon: -2. }));
        assert!(!bounds.contains(&Coordinate { lat: -2., lon: 2. }));
        assert!(!bounds.contains(&Coordinate { lat: 2., lon: 2. }));

        assert!(bounds.contains(&Coordinate { lat: 0., lon: 0. }));
    }

    #[test]
    fn world_bounds() {
        assert!(Bounds::WORLD.contains(&Coordinate::new(90., -180.)));
        assert!(Bounds::WORLD.contains(&Coordinate::new(-90., 179.9)));
        assert!(Bounds::WORLD.contains(&Coordinate::new(40.7826, -73.9656)));

        assert!(!Bounds::WORLD.contains(&Coordinate::new(90.5, 0.)));
        assert!(!Bounds::WORLD.contains(&Coordinate::new(0., -181.)));
        assert!(!Bounds::WORLD.contains(&Coordinate::new(f64::NAN, 0.)));
    }

    #[test]
    fn geo_coord_axes() {
        let coordinate: Coordinate = geo::Coord { x: 18.4241, y: -33.9249 }.into();

        assert_eq!(coordinate, Coordinate::new(-33.9249, 18.4241));
    }

    #[test]
    fn pixel_distance() {
        let a = PixelCoordinate::new(9, 9);

        assert_eq!(a.distance_squared(&PixelCoordinate::new(10, 10)), 2);
        assert_eq!(a.distance_squared(&PixelCoordinate::new(0, 0)), 162);
        assert_eq!(a.distance_squared(&a), 0);
    }

    #[test]
    fn vertex_layout() {
        assert_eq!(std::mem::size_of::<DotVertex>(), 16);

        let vertices = [DotVertex {
            position: [0., 1., 0.],
            kind: DotVertex::HIGHLIGHT,
        }];
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);

        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[12..], &1_u32.to_ne_bytes());
    }
}
