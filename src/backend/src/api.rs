use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use common::{Coordinate, DotVertex, Orientation, PixelCoordinate};
use globe::{Category, Globe, GlobeCache, GlobeConfig, GlobeError, PixelBuffer, Rgba};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct BackendState {
    cache: Arc<Mutex<GlobeCache>>,
    config: Arc<GlobeConfig>,
}

impl BackendState {
    pub fn new(buffer: PixelBuffer, config: GlobeConfig) -> Self {
        Self {
            cache: Arc::new(Mutex::new(GlobeCache::new(buffer))),
            config: Arc::new(config),
        }
    }

    /// Runs `f` against the globe for `query`, rebuilding it off the async
    /// runtime when the requested configuration changed.
    async fn with_globe<T, F>(&self, query: &GlobeQuery, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Globe) -> Result<T, GlobeError> + Send + 'static,
        T: Send + 'static,
    {
        let config = query.apply(&self.config);
        let cache = Arc::clone(&self.cache);

        tokio::task::spawn_blocking(move || {
            let mut cache = cache.lock().map_err(|_| ApiError::Poisoned)?;
            let globe = cache.get_or_rebuild(&config)?;

            Ok(f(globe)?)
        })
        .await
        .map_err(|e| ApiError::Task(e.to_string()))?
    }
}

pub fn router(state: BackendState) -> Router {
    Router::new()
        .route("/dots", get(get_dots))
        .route("/locate", get(get_locate))
        .route("/vertices", get(get_vertices))
        .with_state(state)
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Globe(#[from] GlobeError),

    #[error("both lat and lon are required")]
    MissingCoordinate,

    #[error("globe cache is poisoned")]
    Poisoned,

    #[error("globe task failed: {0}")]
    Task(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Globe(GlobeError::InvalidInput(_)) | ApiError::MissingCoordinate => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Globe(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Poisoned | ApiError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            log::error!("{self}");
        }

        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Per-request overrides of the configured globe.
#[derive(Debug, Default, Deserialize)]
pub struct GlobeQuery {
    pub dot_count: Option<usize>,
    pub sphere_radius: Option<f64>,
    pub threshold: Option<f64>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl GlobeQuery {
    pub fn apply(&self, base: &GlobeConfig) -> GlobeConfig {
        GlobeConfig {
            dot_count: self.dot_count.unwrap_or(base.dot_count),
            sphere_radius: self.sphere_radius.unwrap_or(base.sphere_radius),
            threshold: self.threshold.unwrap_or(base.threshold),
            ..base.clone()
        }
    }

    pub fn coordinate(&self) -> Result<Option<Coordinate>, ApiError> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Ok(Some(Coordinate { lat, lon })),
            (None, None) => Ok(None),
            _ => Err(ApiError::MissingCoordinate),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Dot {
    pub index: usize,
    pub position: [f64; 3],
    pub coordinate: Coordinate,
    pub color: Rgba,
}

#[derive(Debug, Serialize)]
pub struct DotsResponse {
    pub points: usize,
    pub dot_radius: f64,
    pub dots: Vec<Dot>,
}

pub async fn get_dots(
    State(state): State<BackendState>,
    Query(query): Query<GlobeQuery>,
) -> Result<Json<DotsResponse>, ApiError> {
    let response = state
        .with_globe(&query, |globe| {
            let dots = globe
                .land()
                .map(|(index, point)| Dot {
                    index,
                    position: point.position().to_array(),
                    coordinate: point.coordinate(),
                    color: globe.samples()[index].color,
                })
                .collect();

            Ok(DotsResponse {
                points: globe.points().len(),
                dot_radius: globe.config().effective_dot_radius(),
                dots,
            })
        })
        .await?;

    Ok(Json(response))
}

#[derive(Debug, Serialize)]
pub struct LocateResponse {
    pub index: usize,
    pub coordinate: Coordinate,
    pub position: [f64; 3],
    pub pixel: PixelCoordinate,
    pub target: PixelCoordinate,
    pub category: Category,
    pub radius: f64,
    pub orientation: Orientation,
}

pub async fn get_locate(
    State(state): State<BackendState>,
    Query(query): Query<GlobeQuery>,
) -> Result<Json<LocateResponse>, ApiError> {
    let coordinate = query.coordinate()?.ok_or(ApiError::MissingCoordinate)?;

    let response = state
        .with_globe(&query, move |globe| {
            let highlight = globe.locate(coordinate)?;

            Ok(LocateResponse {
                index: highlight.index,
                coordinate: highlight.point.coordinate(),
                position: highlight.point.position().to_array(),
                pixel: highlight.point.pixel(),
                target: highlight.target,
                category: highlight.category,
                radius: highlight.radius,
                orientation: highlight.orientation(),
            })
        })
        .await?;

    Ok(Json(response))
}

/// Land dots as packed `DotVertex` records in native byte order, ready for a
/// vertex buffer.
pub async fn get_vertices(
    State(state): State<BackendState>,
    Query(query): Query<GlobeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let coordinate = query.coordinate()?;

    let bytes = state
        .with_globe(&query, move |globe| {
            let highlight = coordinate.map(|c| globe.locate(c)).transpose()?;
            let vertices = globe.vertices(highlight.as_ref());

            Ok(bytemuck::cast_slice::<DotVertex, u8>(&vertices).to_vec())
        })
        .await?;

    Ok(([(header::CONTENT_TYPE, "application/octet-stream")], bytes))
}
