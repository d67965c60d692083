//! Sampling and projection kernel for a dotted world globe.
//!
//! Dots are spread over a sphere with a Fibonacci lattice, placed in an
//! equirectangular reference grid, and classified as land by sampling a
//! world texture. A geographic query is resolved to the nearest dot together
//! with the rotation that turns that dot towards the viewer.
//!
//! Every function here is a pure function of its arguments.

mod error;
pub use error::*;

pub mod dots;
pub use dots::*;
pub mod nearest;
pub use nearest::*;
pub mod pixels;
pub use pixels::*;
pub mod point;
pub use point::*;
pub mod projection;
pub use projection::*;
pub mod rotation;
pub use rotation::*;
pub mod sphere;
pub use sphere::*;

pub use common::{Coordinate, DotVertex, Orientation, PixelCoordinate};
