//! REST API for the campus site.
//!
//! - Content records: point reads, page listing, upsert and partial update
//! - Content registry: the static page → section → item map
//! - Media library listing and registration
//! - Address geocoding
//!
//! Write endpoints require `Authorization: Bearer <editorToken>`.

pub mod handlers;

use std::sync::Arc;

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use campus_content::{ContentError, ContentStore, MediaLibrary};
use chrono::{DateTime, Utc};
use serde_json::json;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::geocode::{GeocodeError, Geocoder};

/// Shared state for API handlers.
pub struct ApiState {
    pub content: Arc<dyn ContentStore>,
    pub media: Arc<dyn MediaLibrary>,
    pub geocoder: Geocoder,
    pub editor_token: Option<String>,
    pub media_page_size: usize,
    pub started_at: DateTime<Utc>,
}

impl ApiState {
    pub fn new(
        content: Arc<dyn ContentStore>,
        media: Arc<dyn MediaLibrary>,
        config: &Config,
    ) -> Result<Self, GeocodeError> {
        Ok(Self {
            content,
            media,
            geocoder: Geocoder::new(config.geocoder.base_url.as_str(), &config.geocoder.user_agent)?,
            editor_token: config.editor_token.clone(),
            media_page_size: config.media_page_size(),
            started_at: Utc::now(),
        })
    }

    /// Check the bearer token on a write request
    pub fn authorize(&self, headers: &HeaderMap) -> Result<(), ApiError> {
        let Some(expected) = self.editor_token.as_deref() else {
            return Err(ApiError::Unauthorized);
        };

        let presented = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        match presented {
            Some(token) if tokens_match(token, expected) => Ok(()),
            _ => Err(ApiError::Unauthorized),
        }
    }
}

/// Compares every byte regardless of where the first mismatch is; only the length leaks
fn tokens_match(presented: &str, expected: &str) -> bool {
    let (presented, expected) = (presented.as_bytes(), expected.as_bytes());
    presented.len() == expected.len()
        && presented
            .iter()
            .zip(expected)
            .fold(0u8, |diff, (a, b)| diff | (a ^ b))
            == 0
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Geocode(#[from] GeocodeError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Content(err) => match err {
                ContentError::NotFound(_) => StatusCode::NOT_FOUND,
                ContentError::Unauthorized => StatusCode::UNAUTHORIZED,
                ContentError::EmptyId
                | ContentError::MalformedSlider { .. }
                | ContentError::IndexOutOfRange { .. } => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Geocode(err) => match err {
                GeocodeError::EmptyAddress => StatusCode::BAD_REQUEST,
                GeocodeError::NotFound(_) => StatusCode::NOT_FOUND,
                _ => StatusCode::BAD_GATEWAY,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Build the API router with all routes.
pub fn router(state: Arc<ApiState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/status", get(handlers::status::health))
        // Content records
        .route("/api/v1/content", get(handlers::content::list_page))
        .route(
            "/api/v1/content/:id",
            get(handlers::content::get_content)
                .put(handlers::content::put_content)
                .patch(handlers::content::patch_content),
        )
        // Static registry
        .route("/api/v1/registry", get(handlers::registry::list_pages))
        .route("/api/v1/registry/:page", get(handlers::registry::get_page))
        // Media library
        .route(
            "/api/v1/media",
            get(handlers::media::list_media).post(handlers::media::add_media),
        )
        .route("/api/v1/geocode", get(handlers::geocode::geocode))
        // Middleware
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                })
                // Only failed responses are logged
                .on_request(())
                .on_response(|response: &axum::http::Response<_>, latency: std::time::Duration, _span: &tracing::Span| {
                    let status = response.status();
                    if !status.is_success() {
                        tracing::warn!(
                            status = %status,
                            latency_ms = latency.as_millis(),
                            "request failed"
                        );
                    }
                }),
        )
        .with_state(state)
}

/// Start the API server.
pub async fn serve(state: Arc<ApiState>, bind_addr: &str) -> anyhow::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;

    tracing::info!("campus API listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
