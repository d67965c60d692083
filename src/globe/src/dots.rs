//! Dot globe assembly.
//!
//! Ties the kernel together: generate points at the reference sampling
//! density, classify each against the texture at the texture's own
//! resolution, and answer "which dot is this place" queries.

use common::{Coordinate, DotVertex, Orientation, PixelCoordinate};
use glam::{DQuat, DVec3};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    nearest::NearestPointIndex,
    pixels::{classify, validate_threshold, Category, PixelBuffer, Sample},
    point::SpherePoint,
    projection::{project_coordinate, project_unit_sphere, ImageSize},
    rotation::{orientation, rotation_between},
    sphere::generate,
    GlobeError, Result,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    pub dot_count: usize,
    /// Radius of a single dot. Zero or less falls back to 1% of the sphere radius.
    pub dot_radius: f64,
    pub sphere_radius: f64,
    pub threshold: f64,
    /// Grid the dots are placed and queried in. Unrelated to the texture size.
    pub reference_size: ImageSize,
    pub highlight_scale: f64,
    /// Direction the highlighted dot is turned towards, usually the camera.
    pub facing_axis: [f64; 3],
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            dot_count: 8000,
            dot_radius: 0.005,
            sphere_radius: 1.0,
            threshold: 0.03,
            reference_size: ImageSize::REFERENCE,
            highlight_scale: 5.0,
            facing_axis: [0., 0., 1.],
        }
    }
}

impl GlobeConfig {
    /// Largest dot count a rebuild accepts. Far beyond what a texture can
    /// resolve, small enough that a rebuild stays bounded in memory.
    pub const MAX_DOT_COUNT: usize = 1_000_000;

    pub fn validate(&self) -> Result<()> {
        if !(1..=Self::MAX_DOT_COUNT).contains(&self.dot_count) {
            return Err(GlobeError::invalid(format!(
                "dot count must lie between 1 and {}, got {}",
                Self::MAX_DOT_COUNT,
                self.dot_count
            )));
        }

        if !(self.sphere_radius.is_finite() && self.sphere_radius > 0.) {
            return Err(GlobeError::invalid(format!(
                "sphere radius must be positive, got {}",
                self.sphere_radius
            )));
        }

        if !(self.highlight_scale.is_finite() && self.highlight_scale > 0.) {
            return Err(GlobeError::invalid(format!(
                "highlight scale must be positive, got {}",
                self.highlight_scale
            )));
        }

        if DVec3::from_array(self.facing_axis).try_normalize().is_none() {
            return Err(GlobeError::invalid("facing axis must be a non-zero vector"));
        }

        validate_threshold(self.threshold)
    }

    pub fn effective_dot_radius(&self) -> f64 {
        if self.dot_radius > 0. {
            self.dot_radius
        } else {
            0.01 * self.sphere_radius
        }
    }

    pub fn highlight_radius(&self) -> f64 {
        self.effective_dot_radius() * self.highlight_scale
    }
}

/// A located dot and the rotation that brings it to the front.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Highlight {
    pub index: usize,
    pub point: SpherePoint,
    /// Query coordinate in the reference grid.
    pub target: PixelCoordinate,
    pub category: Category,
    pub rotation: DQuat,
    pub radius: f64,
}

impl Highlight {
    pub fn orientation(&self) -> Orientation {
        orientation(self.rotation)
    }
}

#[derive(Clone, Debug)]
pub struct Globe {
    config: GlobeConfig,
    points: Vec<SpherePoint>,
    samples: Vec<Sample>,
}

/// Regenerates every dot for `config` and classifies it against `buffer`.
pub fn rebuild(config: &GlobeConfig, buffer: &PixelBuffer) -> Result<Globe> {
    config.validate()?;

    let points = generate(config.dot_count, config.sphere_radius, config.reference_size)?;

    let samples = points
        .iter()
        .map(|point| {
            // the texture is sampled in its own pixel space, not the reference grid
            let pixel = project_unit_sphere(point.direction(), buffer.size())?;
            classify(buffer, pixel.u, pixel.v, config.threshold)
        })
        .collect::<Result<Vec<_>>>()?;

    let globe = Globe {
        config: config.clone(),
        points,
        samples,
    };

    info!(
        "rebuilt globe: {} points, {} land dots, texture {}x{}",
        globe.points.len(),
        globe.land_count(),
        buffer.width(),
        buffer.height()
    );

    Ok(globe)
}

impl Globe {
    pub fn config(&self) -> &GlobeConfig {
        &self.config
    }

    pub fn points(&self) -> &[SpherePoint] {
        &self.points
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn land(&self) -> impl Iterator<Item = (usize, &SpherePoint)> + '_ {
        self.points
            .iter()
            .zip(&self.samples)
            .enumerate()
            .filter(|(_, (_, sample))| sample.category == Category::Terrain)
            .map(|(index, (point, _))| (index, point))
    }

    pub fn land_count(&self) -> usize {
        self.samples
            .iter()
            .filter(|sample| sample.category == Category::Terrain)
            .count()
    }

    pub fn locate(&self, coordinate: Coordinate) -> Result<Highlight> {
        let target = project_coordinate(coordinate, self.config.reference_size)?;
        let (index, point) = NearestPointIndex::new(&self.points)?.nearest(target)?;

        let rotation =
            rotation_between(point.direction(), DVec3::from_array(self.config.facing_axis))?;

        debug!(
            "({}, {}) -> pixel {:?}, nearest dot {index} at {:?}",
            coordinate.lat,
            coordinate.lon,
            target,
            point.pixel()
        );

        Ok(Highlight {
            index,
            point: *point,
            target,
            category: self.samples[index].category,
            rotation,
            radius: self.config.highlight_radius(),
        })
    }

    /// Land dots in generation order, with the highlighted dot tagged and
    /// kept even when it falls outside land.
    pub fn vertices(&self, highlight: Option<&Highlight>) -> Vec<DotVertex> {
        let highlighted = highlight.map(|highlight| highlight.index);

        self.points
            .iter()
            .zip(&self.samples)
            .enumerate()
            .filter_map(|(index, (point, sample))| {
                let kind = if highlighted == Some(index) {
                    DotVertex::HIGHLIGHT
                } else if sample.category == Category::Terrain {
                    DotVertex::LAND
                } else {
                    return None;
                };

                Some(DotVertex {
                    position: point.to_array(),
                    kind,
                })
            })
            .collect()
    }
}

/// Keeps the last built globe for one texture and rebuilds only when the
/// configuration changes.
#[derive(Debug)]
pub struct GlobeCache {
    buffer: PixelBuffer,
    globe: Option<Globe>,
    rebuilds: usize,
}

impl GlobeCache {
    pub fn new(buffer: PixelBuffer) -> Self {
        Self {
            buffer,
            globe: None,
            rebuilds: 0,
        }
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn rebuilds(&self) -> usize {
        self.rebuilds
    }

    /// A failed rebuild keeps the previously cached globe.
    pub fn get_or_rebuild(&mut self, config: &GlobeConfig) -> Result<&Globe> {
        let globe = match self.globe.take() {
            Some(globe) if globe.config() == config => globe,
            previous => match rebuild(config, &self.buffer) {
                Ok(globe) => {
                    self.rebuilds += 1;
                    globe
                }
                Err(e) => {
                    self.globe = previous;
                    return Err(e);
                }
            },
        };

        Ok(&*self.globe.insert(globe))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use common::{Coordinate, DotVertex};
    use glam::DVec3;

    use super::*;

    // land is the western hemisphere, 360x180 so one pixel is one degree
    fn western_land() -> PixelBuffer {
        PixelBuffer::from_fn(360, 180, |u, _| {
            if u < 180 {
                [0, 0, 0, 255]
            } else {
                [40, 60, 200, 255]
            }
        })
        .unwrap()
    }

    fn small_config() -> GlobeConfig {
        GlobeConfig {
            dot_count: 2000,
            ..GlobeConfig::default()
        }
    }

    #[test]
    fn defaults() {
        let config = GlobeConfig::default();

        assert_eq!(config.dot_count, 8000);
        assert_eq!(config.sphere_radius, 1.0);
        assert_eq!(config.threshold, 0.03);
        assert_eq!(config.reference_size, ImageSize::REFERENCE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_config_file() {
        let config: GlobeConfig =
            serde_json::from_str(r#"{ "dot_count": 500, "threshold": 0.1 }"#).unwrap();

        assert_eq!(config.dot_count, 500);
        assert_eq!(config.threshold, 0.1);
        assert_eq!(config.sphere_radius, 1.0);
        assert_eq!(config.facing_axis, [0., 0., 1.]);
    }

    #[test]
    fn dot_radius_fallback() {
        let config = GlobeConfig {
            dot_radius: 0.,
            sphere_radius: 2.,
            ..GlobeConfig::default()
        };

        assert_relative_eq!(config.effective_dot_radius(), 0.02);
        assert_relative_eq!(config.highlight_radius(), 0.1);
        assert_relative_eq!(GlobeConfig::default().highlight_radius(), 0.025);
    }

    #[test]
    fn rejects_invalid_config() {
        let buffer = western_land();

        for config in [
            GlobeConfig {
                dot_count: 0,
                ..GlobeConfig::default()
            },
            GlobeConfig {
                dot_count: GlobeConfig::MAX_DOT_COUNT + 1,
                ..GlobeConfig::default()
            },
            GlobeConfig {
                threshold: 1.5,
                ..GlobeConfig::default()
            },
            GlobeConfig {
                sphere_radius: -1.,
                ..GlobeConfig::default()
            },
            GlobeConfig {
                facing_axis: [0., 0., 0.],
                ..GlobeConfig::default()
            },
        ] {
            assert!(matches!(
                rebuild(&config, &buffer),
                Err(GlobeError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn classifies_at_texture_resolution() {
        let globe = rebuild(&small_config(), &western_land()).unwrap();

        assert_eq!(globe.points().len(), 2000);
        assert_eq!(globe.samples().len(), 2000);

        for (point, sample) in globe.points().iter().zip(globe.samples()) {
            let lon = point.coordinate().lon;
            if lon.abs() < 1. || lon.abs() > 179. {
                continue;
            }

            let expected = if lon < 0. {
                Category::Terrain
            } else {
                Category::Other
            };
            assert_eq!(sample.category, expected, "lon {lon}");
        }

        let land = globe.land_count();
        assert!((900..=1100).contains(&land), "{land} land dots");
        assert_eq!(globe.land().count(), land);
    }

    #[test]
    fn locate_turns_dot_to_front() {
        let globe = rebuild(&small_config(), &western_land()).unwrap();
        let new_york = Coordinate::new(40.7826, -73.9656);

        let highlight = globe.locate(new_york).unwrap();

        assert_eq!(highlight.point, globe.points()[highlight.index]);
        assert_eq!(highlight.category, Category::Terrain);
        assert!(highlight.point.pixel().distance_squared(&highlight.target) < 40 * 40);

        let front = highlight.rotation * highlight.point.direction();
        assert!(front.abs_diff_eq(DVec3::Z, 1e-9), "{front}");

        let orientation = highlight.orientation();
        assert_relative_eq!(
            orientation.x * orientation.x
                + orientation.y * orientation.y
                + orientation.z * orientation.z
                + orientation.w * orientation.w,
            1.,
            epsilon = 1e-12
        );
    }

    #[test]
    fn vertices_tag_highlight() {
        let globe = rebuild(&small_config(), &western_land()).unwrap();

        let plain = globe.vertices(None);
        assert_eq!(plain.len(), globe.land_count());
        assert!(plain.iter().all(|vertex| vertex.kind == DotVertex::LAND));

        // Tokyo sits on the "ocean" half of this texture
        let highlight = globe.locate(Coordinate::new(35.6762, 139.6503)).unwrap();
        assert_eq!(highlight.category, Category::Other);

        let tagged = globe.vertices(Some(&highlight));
        assert_eq!(tagged.len(), globe.land_count() + 1);

        let highlighted: Vec<_> = tagged
            .iter()
            .filter(|vertex| vertex.kind == DotVertex::HIGHLIGHT)
            .collect();
        assert_eq!(highlighted.len(), 1);
        assert_eq!(highlighted[0].position, highlight.point.to_array());
    }

    #[test]
    fn cache_rebuilds_on_change_only() {
        let mut cache = GlobeCache::new(western_land());
        let config = small_config();

        let first = cache.get_or_rebuild(&config).unwrap().land_count();
        let second = cache.get_or_rebuild(&config).unwrap().land_count();
        assert_eq!(first, second);
        assert_eq!(cache.rebuilds(), 1);

        let denser = GlobeConfig {
            dot_count: 4000,
            ..config
        };
        assert_eq!(cache.get_or_rebuild(&denser).unwrap().points().len(), 4000);
        assert_eq!(cache.rebuilds(), 2);
    }

    #[test]
    fn failed_rebuild_keeps_cached_globe() {
        let mut cache = GlobeCache::new(western_land());
        let config = small_config();

        cache.get_or_rebuild(&config).unwrap();

        let bad = GlobeConfig {
            threshold: 1.5,
            ..config.clone()
        };
        assert!(matches!(
            cache.get_or_rebuild(&bad),
            Err(GlobeError::InvalidInput(_))
        ));

        assert_eq!(cache.get_or_rebuild(&config).unwrap().points().len(), 2000);
        assert_eq!(cache.rebuilds(), 1);
    }
}
