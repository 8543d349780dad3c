use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;

use crate::api::{ApiError, ApiState};
use crate::geocode::{AddressQuery, GeocodeResult};

/// GET /api/v1/geocode?street=&city=&postcode=&country=
pub async fn geocode(
    State(state): State<Arc<ApiState>>,
    Query(address): Query<AddressQuery>,
) -> Result<Json<GeocodeResult>, ApiError> {
    let result = state.geocoder.geocode(&address).await?;
    tracing::info!(lat = result.lat, lon = result.lon, "address geocoded");
    Ok(Json(result))
}
