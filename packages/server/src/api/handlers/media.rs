//! Media library handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use campus_content::{MediaQuery, MediaRecord, NewMedia};

use crate::api::{ApiError, ApiState};

/// GET /api/v1/media?tag=&limit=
pub async fn list_media(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<MediaQuery>,
) -> Result<Json<Vec<MediaRecord>>, ApiError> {
    let limit = query
        .limit
        .unwrap_or(state.media_page_size)
        .min(state.media_page_size);
    let query = MediaQuery {
        limit: Some(limit),
        ..query
    };

    Ok(Json(state.media.list_media(query).await?))
}

/// POST /api/v1/media
pub async fn add_media(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Json(media): Json<NewMedia>,
) -> Result<(StatusCode, Json<MediaRecord>), ApiError> {
    state.authorize(&headers)?;

    if media.url.trim().is_empty() {
        return Err(ApiError::BadRequest("media url is required".to_string()));
    }
    let record = state.media.add_media(media).await?;
    tracing::info!(media_id = %record.media_id, "media registered");
    Ok((StatusCode::CREATED, Json(record)))
}
