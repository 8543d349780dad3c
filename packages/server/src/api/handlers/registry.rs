//! Static content registry.

use axum::{extract::Path, Json};
use campus_content::{registry, PageContent};

use crate::api::ApiError;

/// GET /api/v1/registry
pub async fn list_pages() -> Json<&'static [PageContent]> {
    Json(registry::pages())
}

/// GET /api/v1/registry/:page
pub async fn get_page(Path(page): Path<String>) -> Result<Json<&'static PageContent>, ApiError> {
    registry::page(&page)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("page {}", page)))
}
