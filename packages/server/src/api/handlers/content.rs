//! Content record handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use campus_content::{ContentPatch, ContentRecord, ContentType, ContentWrite};
use serde::Deserialize;

use crate::api::{ApiError, ApiState};

#[derive(Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// Upsert body; the content id comes from the path
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBody {
    pub content: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub page: String,
    #[serde(default)]
    pub media_id: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
}

impl ContentBody {
    fn into_write(self, id: String) -> ContentWrite {
        ContentWrite {
            id,
            content: self.content,
            content_type: self.content_type,
            page: self.page,
            media_id: self.media_id,
            alt: self.alt,
        }
    }
}

/// GET /api/v1/content?page=
pub async fn list_page(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<ContentRecord>>, ApiError> {
    let page = query
        .page
        .filter(|page| !page.is_empty())
        .ok_or_else(|| ApiError::BadRequest("page query parameter is required".to_string()))?;

    Ok(Json(state.content.list_page(&page).await?))
}

/// GET /api/v1/content/:id
pub async fn get_content(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Json<ContentRecord>, ApiError> {
    state
        .content
        .read(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("content {}", id)))
}

/// PUT /api/v1/content/:id
pub async fn put_content(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<ContentBody>,
) -> Result<Json<ContentRecord>, ApiError> {
    state.authorize(&headers)?;

    let record = state.content.write(body.into_write(id)).await?;
    tracing::info!(id = %record.id, page = %record.page, "content saved");
    Ok(Json(record))
}

/// PATCH /api/v1/content/:id
pub async fn patch_content(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(patch): Json<ContentPatch>,
) -> Result<Json<ContentRecord>, ApiError> {
    state.authorize(&headers)?;

    if patch.is_empty() {
        return Err(ApiError::BadRequest("patch has no fields".to_string()));
    }
    let record = state.content.patch(&id, patch).await?;
    tracing::info!(id = %record.id, "content patched");
    Ok(Json(record))
}
