//! Nearest sampled point to a pixel.
//!
//! A linear scan over squared pixel distances. Queries happen once per
//! highlighted location while generation happens once per configuration, so
//! the scan stays well below generation cost. Ties go to the point generated
//! first.

use common::PixelCoordinate;

use crate::{point::SpherePoint, GlobeError, Result};

pub fn nearest_index(target: PixelCoordinate, points: &[SpherePoint]) -> Result<usize> {
    points
        .iter()
        .enumerate()
        // min_by_key keeps the first of equal minima
        .min_by_key(|(_, point)| point.pixel().distance_squared(&target))
        .map(|(index, _)| index)
        .ok_or(GlobeError::EmptyInput)
}

pub fn nearest(target: PixelCoordinate, points: &[SpherePoint]) -> Result<&SpherePoint> {
    nearest_index(target, points).map(|index| &points[index])
}

/// Borrowed view over a generated point set for repeated queries.
#[derive(Clone, Copy, Debug)]
pub struct NearestPointIndex<'a> {
    points: &'a [SpherePoint],
}

impl<'a> NearestPointIndex<'a> {
    pub fn new(points: &'a [SpherePoint]) -> Result<Self> {
        if points.is_empty() {
            return Err(GlobeError::EmptyInput);
        }

        Ok(Self { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn nearest(&self, target: PixelCoordinate) -> Result<(usize, &'a SpherePoint)> {
        let index = nearest_index(target, self.points)?;

        Ok((index, &self.points[index]))
    }
}
