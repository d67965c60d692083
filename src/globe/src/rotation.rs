use common::Orientation;
use glam::{DQuat, DVec3};

use crate::{GlobeError, Result};

// below this `s = √(2·(1 + d))` the cross product no longer carries an axis
const ANTIPARALLEL_EPSILON: f64 = 1e-6;

/// Shortest-arc rotation carrying `from` onto `to`.
///
/// Inputs are normalized first. Opposite vectors have no unique shortest arc,
/// they get a half turn about an axis orthogonal to `from`.
pub fn rotation_between(from: DVec3, to: DVec3) -> Result<DQuat> {
    let from = from.try_normalize().ok_or(GlobeError::DegenerateRotation)?;
    let to = to.try_normalize().ok_or(GlobeError::DegenerateRotation)?;

    let c = from.cross(to);
    let d = from.dot(to);
    let s = (2. * (1. + d)).max(0.).sqrt();

    if s < ANTIPARALLEL_EPSILON {
        return Ok(DQuat::from_axis_angle(orthogonal_axis(from), std::f64::consts::PI));
    }

    Ok(DQuat::from_xyzw(c.x / s, c.y / s, c.z / s, s / 2.).normalize())
}

pub fn orientation(rotation: DQuat) -> Orientation {
    Orientation {
        x: rotation.x,
        y: rotation.y,
        z: rotation.z,
        w: rotation.w,
    }
}

// Crosses with the basis vector least aligned to `v`.
fn orthogonal_axis(v: DVec3) -> DVec3 {
    let abs = v.abs();

    let basis = if abs.x <= abs.y && abs.x <= abs.z {
        DVec3::X
    } else if abs.y <= abs.z {
        DVec3::Y
    } else {
        DVec3::Z
    };

    v.cross(basis).normalize()
}
